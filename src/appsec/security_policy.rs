//! Security policies

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::errors::Result;
use super::filter::retain_matching;
use super::operation::Call;
use super::{segment, Appsec, BASE_PATH};
use crate::session::Transport;

/// Protections enabled on a policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PolicySecurityControls {
    pub apply_api_constraints: bool,
    pub apply_application_layer_controls: bool,
    pub apply_botman_controls: bool,
    pub apply_network_layer_controls: bool,
    pub apply_rate_controls: bool,
    pub apply_reputation_controls: bool,
    pub apply_slow_post_controls: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(default)]
    pub policy_id: String,
    #[serde(default)]
    pub policy_name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub default_settings: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub has_rate_policy_with_api_key: bool,
    #[serde(default)]
    pub policy_security_controls: PolicySecurityControls,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetSecurityPoliciesRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
    /// Keep only the policy with this name
    pub policy_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSecurityPoliciesResponse {
    #[serde(default)]
    pub config_id: i64,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub policies: Vec<SecurityPolicy>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetSecurityPolicyRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
    #[validate(length(min = 1))]
    pub policy_id: String,
}

pub type GetSecurityPolicyResponse = SecurityPolicy;

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSecurityPolicyRequest {
    #[serde(skip)]
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[serde(skip)]
    #[validate(range(min = 1))]
    pub version: i64,
    #[validate(length(min = 1))]
    pub policy_name: String,
    #[validate(length(min = 1))]
    pub policy_prefix: String,
    pub default_settings: bool,
}

pub type CreateSecurityPolicyResponse = SecurityPolicy;

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSecurityPolicyRequest {
    #[serde(skip)]
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[serde(skip)]
    #[validate(range(min = 1))]
    pub version: i64,
    #[serde(skip)]
    #[validate(length(min = 1))]
    pub policy_id: String,
    #[validate(length(min = 1))]
    pub policy_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub policy_prefix: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub default_settings: bool,
}

pub type UpdateSecurityPolicyResponse = SecurityPolicy;

#[derive(Debug, Clone, Default, Validate)]
pub struct RemoveSecurityPolicyRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
    #[validate(length(min = 1))]
    pub policy_id: String,
}

impl<T: Transport> Appsec<T> {
    /// List the policies of a configuration version, optionally narrowed to one name
    pub async fn get_security_policies(
        &self,
        params: &GetSecurityPoliciesRequest,
    ) -> Result<GetSecurityPoliciesResponse> {
        let path = format!(
            "{}/configs/{}/versions/{}/security-policies",
            BASE_PATH, params.config_id, params.version
        );

        let mut response: GetSecurityPoliciesResponse = self
            .execute(Call::get("GetSecurityPolicies", path).validate(params))
            .await?;

        response.policies = retain_matching(response.policies, params.policy_name.as_str(), |p| {
            p.policy_name.as_str()
        });
        Ok(response)
    }

    pub async fn get_security_policy(
        &self,
        params: &GetSecurityPolicyRequest,
    ) -> Result<GetSecurityPolicyResponse> {
        let path = format!(
            "{}/configs/{}/versions/{}/security-policies/{}",
            BASE_PATH,
            params.config_id,
            params.version,
            segment(&params.policy_id)
        );
        self.execute(Call::get("GetSecurityPolicy", path).validate(params))
            .await
    }

    pub async fn create_security_policy(
        &self,
        params: &CreateSecurityPolicyRequest,
    ) -> Result<CreateSecurityPolicyResponse> {
        let path = format!(
            "{}/configs/{}/versions/{}/security-policies",
            BASE_PATH, params.config_id, params.version
        );
        self.execute(
            Call::post("CreateSecurityPolicy", path)
                .validate(params)
                .json(params),
        )
        .await
    }

    pub async fn update_security_policy(
        &self,
        params: &UpdateSecurityPolicyRequest,
    ) -> Result<UpdateSecurityPolicyResponse> {
        let path = format!(
            "{}/configs/{}/versions/{}/security-policies/{}",
            BASE_PATH,
            params.config_id,
            params.version,
            segment(&params.policy_id)
        );
        self.execute(
            Call::put("UpdateSecurityPolicy", path)
                .validate(params)
                .json(params),
        )
        .await
    }

    pub async fn remove_security_policy(&self, params: &RemoveSecurityPolicyRequest) -> Result<()> {
        let path = format!(
            "{}/configs/{}/versions/{}/security-policies/{}",
            BASE_PATH,
            params.config_id,
            params.version,
            segment(&params.policy_id)
        );
        self.execute::<serde::de::IgnoredAny>(
            Call::delete("RemoveSecurityPolicy", path).validate(params),
        )
        .await?;
        Ok(())
    }
}
