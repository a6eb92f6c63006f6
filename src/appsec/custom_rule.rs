//! Custom rules

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::errors::Result;
use super::filter::retain_matching;
use super::flex;
use super::json_payload;
use super::operation::Call;
use super::{Appsec, BASE_PATH};
use crate::session::Transport;

/// Summary entry of the custom rule list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomRuleSummary {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub status: String,
    #[serde(default)]
    pub version: i64,
}

/// One match condition of a custom rule
///
/// `name` and `value` arrive as either a string or a list of strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRuleCondition {
    #[serde(rename = "type", default)]
    pub condition_type: String,
    #[serde(default)]
    pub positive_match: bool,
    #[serde(
        default,
        deserialize_with = "flex::condition_name",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub name: Vec<String>,
    #[serde(
        default,
        deserialize_with = "flex::condition_value",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub value: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_case: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_wildcard: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_case: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_wildcard: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomRule {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default)]
    pub rule_activated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structured: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<CustomRuleCondition>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetCustomRulesRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    /// Keep only the rule with this id
    pub id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCustomRulesResponse {
    #[serde(default)]
    pub custom_rules: Vec<CustomRuleSummary>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetCustomRuleRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub id: i64,
}

pub type GetCustomRuleResponse = CustomRule;

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateCustomRuleRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(custom(function = "json_payload"))]
    pub json_payload: Value,
}

pub type CreateCustomRuleResponse = CustomRule;

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateCustomRuleRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub id: i64,
    #[validate(custom(function = "json_payload"))]
    pub json_payload: Value,
}

pub type UpdateCustomRuleResponse = CustomRule;

#[derive(Debug, Clone, Default, Validate)]
pub struct RemoveCustomRuleRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub id: i64,
}

impl<T: Transport> Appsec<T> {
    pub async fn get_custom_rules(&self, params: &GetCustomRulesRequest) -> Result<GetCustomRulesResponse> {
        let path = format!("{}/configs/{}/custom-rules", BASE_PATH, params.config_id);

        let mut response: GetCustomRulesResponse = self
            .execute(Call::get("GetCustomRules", path).validate(params))
            .await?;

        response.custom_rules = retain_matching(response.custom_rules, &params.id, |r| &r.id);
        Ok(response)
    }

    pub async fn get_custom_rule(&self, params: &GetCustomRuleRequest) -> Result<GetCustomRuleResponse> {
        let path = format!(
            "{}/configs/{}/custom-rules/{}",
            BASE_PATH, params.config_id, params.id
        );
        self.execute(Call::get("GetCustomRule", path).validate(params))
            .await
    }

    pub async fn create_custom_rule(
        &self,
        params: &CreateCustomRuleRequest,
    ) -> Result<CreateCustomRuleResponse> {
        let path = format!("{}/configs/{}/custom-rules", BASE_PATH, params.config_id);
        self.execute(
            Call::post("CreateCustomRule", path)
                .validate(params)
                .json(&params.json_payload),
        )
        .await
    }

    pub async fn update_custom_rule(
        &self,
        params: &UpdateCustomRuleRequest,
    ) -> Result<UpdateCustomRuleResponse> {
        let path = format!(
            "{}/configs/{}/custom-rules/{}",
            BASE_PATH, params.config_id, params.id
        );
        self.execute(
            Call::put("UpdateCustomRule", path)
                .validate(params)
                .json(&params.json_payload),
        )
        .await
    }

    pub async fn remove_custom_rule(&self, params: &RemoveCustomRuleRequest) -> Result<()> {
        let path = format!(
            "{}/configs/{}/custom-rules/{}",
            BASE_PATH, params.config_id, params.id
        );
        self.execute::<serde::de::IgnoredAny>(
            Call::delete("RemoveCustomRule", path).validate(params),
        )
        .await?;
        Ok(())
    }
}
