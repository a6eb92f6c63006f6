//! Rate policies
//!
//! Rate policies carry a wide and evolving set of match options. The common
//! ones are typed; anything else is kept in `extra` so a read-modify-write
//! cycle does not lose fields.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use super::errors::Result;
use super::filter::retain_matching;
use super::json_payload;
use super::operation::Call;
use super::{Appsec, BASE_PATH};
use crate::session::Transport;

/// A list of values with a match polarity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatePolicyMatchValues {
    #[serde(default)]
    pub positive_match: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatePolicyMatchOption {
    #[serde(default)]
    pub positive_match: bool,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub option_type: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatePolicyParameter {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(default)]
    pub positive_match: bool,
    #[serde(default)]
    pub value_in_range: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatePolicy {
    #[serde(default)]
    pub id: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub match_type: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub policy_type: String,
    #[serde(default)]
    pub average_threshold: i64,
    #[serde(default)]
    pub burst_threshold: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub burst_window: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub client_identifiers: Vec<String>,
    #[serde(default)]
    pub use_x_forward_for_headers: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub request_type: String,
    #[serde(default)]
    pub same_action_on_ipv6: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<RatePolicyMatchValues>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path_match_type: String,
    #[serde(default)]
    pub path_uri_positive_match: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_extensions: Option<RatePolicyMatchValues>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hostnames: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_match_options: Vec<RatePolicyMatchOption>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub query_parameters: Vec<RatePolicyParameter>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub counter_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub penalty_box_duration: String,
    /// `true`/`false`, or the list of policies using it on newer accounts
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub used: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetRatePoliciesRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub config_version: i64,
    /// Keep only the policy with this id
    pub rate_policy_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetRatePoliciesResponse {
    #[serde(default)]
    pub rate_policies: Vec<RatePolicy>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetRatePolicyRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub config_version: i64,
    #[validate(range(min = 1))]
    pub rate_policy_id: i64,
}

pub type GetRatePolicyResponse = RatePolicy;

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateRatePolicyRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub config_version: i64,
    #[validate(custom(function = "json_payload"))]
    pub json_payload: Value,
}

pub type CreateRatePolicyResponse = RatePolicy;

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateRatePolicyRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub config_version: i64,
    #[validate(range(min = 1))]
    pub rate_policy_id: i64,
    #[validate(custom(function = "json_payload"))]
    pub json_payload: Value,
}

pub type UpdateRatePolicyResponse = RatePolicy;

#[derive(Debug, Clone, Default, Validate)]
pub struct RemoveRatePolicyRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub config_version: i64,
    #[validate(range(min = 1))]
    pub rate_policy_id: i64,
}

fn rate_policies_path(config_id: i64, config_version: i64) -> String {
    format!(
        "{}/configs/{}/versions/{}/rate-policies",
        BASE_PATH, config_id, config_version
    )
}

impl<T: Transport> Appsec<T> {
    pub async fn get_rate_policies(&self, params: &GetRatePoliciesRequest) -> Result<GetRatePoliciesResponse> {
        let path = rate_policies_path(params.config_id, params.config_version);

        let mut response: GetRatePoliciesResponse = self
            .execute(Call::get("GetRatePolicies", path).validate(params))
            .await?;

        response.rate_policies = retain_matching(response.rate_policies, &params.rate_policy_id, |p| &p.id);
        Ok(response)
    }

    pub async fn get_rate_policy(&self, params: &GetRatePolicyRequest) -> Result<GetRatePolicyResponse> {
        let path = format!(
            "{}/{}",
            rate_policies_path(params.config_id, params.config_version),
            params.rate_policy_id
        );
        self.execute(Call::get("GetRatePolicy", path).validate(params))
            .await
    }

    pub async fn create_rate_policy(&self, params: &CreateRatePolicyRequest) -> Result<CreateRatePolicyResponse> {
        let path = rate_policies_path(params.config_id, params.config_version);
        self.execute(
            Call::post("CreateRatePolicy", path)
                .validate(params)
                .json(&params.json_payload),
        )
        .await
    }

    pub async fn update_rate_policy(&self, params: &UpdateRatePolicyRequest) -> Result<UpdateRatePolicyResponse> {
        let path = format!(
            "{}/{}",
            rate_policies_path(params.config_id, params.config_version),
            params.rate_policy_id
        );
        self.execute(
            Call::put("UpdateRatePolicy", path)
                .validate(params)
                .json(&params.json_payload),
        )
        .await
    }

    pub async fn remove_rate_policy(&self, params: &RemoveRatePolicyRequest) -> Result<()> {
        let path = format!(
            "{}/{}",
            rate_policies_path(params.config_id, params.config_version),
            params.rate_policy_id
        );
        self.execute::<serde::de::IgnoredAny>(
            Call::delete("RemoveRatePolicy", path).validate(params),
        )
        .await?;
        Ok(())
    }
}
