//! Custom rule actions within a security policy

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::errors::Result;
use super::filter::retain_matching;
use super::operation::{Call, OK_CREATED_OR_NO_CONTENT};
use super::{segment, Appsec, BASE_PATH};
use crate::session::Transport;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRuleAction {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub can_use_advanced_actions: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rule_id: i64,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetCustomRuleActionsRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
    #[validate(length(min = 1))]
    pub policy_id: String,
    /// Keep only the action of this rule
    pub rule_id: i64,
}

/// The API answers with a bare list
pub type GetCustomRuleActionsResponse = Vec<CustomRuleAction>;

#[derive(Debug, Clone, Default, Validate)]
pub struct GetCustomRuleActionRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
    #[validate(length(min = 1))]
    pub policy_id: String,
    pub rule_id: i64,
}

pub type GetCustomRuleActionResponse = CustomRuleAction;

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UpdateCustomRuleActionRequest {
    #[serde(skip)]
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[serde(skip)]
    #[validate(range(min = 1))]
    pub version: i64,
    #[serde(skip)]
    #[validate(length(min = 1))]
    pub policy_id: String,
    #[serde(skip)]
    #[validate(range(min = 1))]
    pub rule_id: i64,
    /// `alert`, `deny`, `none` or a custom deny id
    pub action: String,
}

pub type UpdateCustomRuleActionResponse = CustomRuleAction;

fn actions_path(config_id: i64, version: i64, policy_id: &str) -> String {
    format!(
        "{}/configs/{}/versions/{}/security-policies/{}/custom-rules",
        BASE_PATH,
        config_id,
        version,
        segment(policy_id)
    )
}

impl<T: Transport> Appsec<T> {
    pub async fn get_custom_rule_actions(
        &self,
        params: &GetCustomRuleActionsRequest,
    ) -> Result<GetCustomRuleActionsResponse> {
        let path = actions_path(params.config_id, params.version, &params.policy_id);

        let actions: Option<GetCustomRuleActionsResponse> = self
            .execute(Call::get("GetCustomRuleActions", path).validate(params))
            .await?;

        Ok(retain_matching(
            actions.unwrap_or_default(),
            &params.rule_id,
            |a| &a.rule_id,
        ))
    }

    /// The action of one rule; a default action when the rule has none
    pub async fn get_custom_rule_action(
        &self,
        params: &GetCustomRuleActionRequest,
    ) -> Result<GetCustomRuleActionResponse> {
        let path = actions_path(params.config_id, params.version, &params.policy_id);

        let actions: Option<Vec<CustomRuleAction>> = self
            .execute(Call::get("GetCustomRuleAction", path).validate(params))
            .await?;

        Ok(actions
            .unwrap_or_default()
            .into_iter()
            .find(|a| a.rule_id == params.rule_id)
            .unwrap_or_default())
    }

    pub async fn update_custom_rule_action(
        &self,
        params: &UpdateCustomRuleActionRequest,
    ) -> Result<UpdateCustomRuleActionResponse> {
        let path = format!(
            "{}/{}",
            actions_path(params.config_id, params.version, &params.policy_id),
            params.rule_id
        );

        let response: Option<UpdateCustomRuleActionResponse> = self
            .execute(
                Call::put("UpdateCustomRuleAction", path)
                    .validate(params)
                    .json(params)
                    .accept(OK_CREATED_OR_NO_CONTENT),
            )
            .await?;
        Ok(response.unwrap_or_default())
    }
}
