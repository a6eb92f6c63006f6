//! Client reputation profiles

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

/// One atomic condition; `name` arrives as a string or a list
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AtomicCondition {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub class_name: String,
    #[serde(default)]
    pub index: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive_match: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_ips: Option<String>,
    #[serde(
        default,
        deserialize_with = "flex::atomic_condition_name",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub name: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub value: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host: Vec<String>,
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
pub struct ReputationProfileCondition {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub atomic_conditions: Vec<AtomicCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positive_match: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReputationProfile {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Reputation category, e.g. `WEBSCRP` or `DOSATCK`
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub context_readable: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub shared_ip_handling: String,
    #[serde(default)]
    pub threshold: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ReputationProfileCondition>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetReputationProfilesRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub config_version: i64,
    /// Keep only the profile with this id
    pub reputation_profile_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetReputationProfilesResponse {
    #[serde(default)]
    pub reputation_profiles: Vec<ReputationProfile>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetReputationProfileRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub config_version: i64,
    #[validate(range(min = 1))]
    pub reputation_profile_id: i64,
}

pub type GetReputationProfileResponse = ReputationProfile;

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateReputationProfileRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub config_version: i64,
    #[validate(custom(function = "json_payload"))]
    pub json_payload: Value,
}

pub type CreateReputationProfileResponse = ReputationProfile;

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateReputationProfileRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub config_version: i64,
    #[validate(range(min = 1))]
    pub reputation_profile_id: i64,
    #[validate(custom(function = "json_payload"))]
    pub json_payload: Value,
}

pub type UpdateReputationProfileResponse = ReputationProfile;

#[derive(Debug, Clone, Default, Validate)]
pub struct RemoveReputationProfileRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub config_version: i64,
    #[validate(range(min = 1))]
    pub reputation_profile_id: i64,
}

fn profiles_path(config_id: i64, config_version: i64) -> String {
    format!(
        "{}/configs/{}/versions/{}/reputation-profiles",
        BASE_PATH, config_id, config_version
    )
}

impl<T: Transport> Appsec<T> {
    pub async fn get_reputation_profiles(
        &self,
        params: &GetReputationProfilesRequest,
    ) -> Result<GetReputationProfilesResponse> {
        let path = profiles_path(params.config_id, params.config_version);

        let mut response: GetReputationProfilesResponse = self
            .execute(Call::get("GetReputationProfiles", path).validate(params))
            .await?;

        response.reputation_profiles = retain_matching(
            response.reputation_profiles,
            &params.reputation_profile_id,
            |p| &p.id,
        );
        Ok(response)
    }

    pub async fn get_reputation_profile(
        &self,
        params: &GetReputationProfileRequest,
    ) -> Result<GetReputationProfileResponse> {
        let path = format!(
            "{}/{}",
            profiles_path(params.config_id, params.config_version),
            params.reputation_profile_id
        );
        self.execute(Call::get("GetReputationProfile", path).validate(params))
            .await
    }

    pub async fn create_reputation_profile(
        &self,
        params: &CreateReputationProfileRequest,
    ) -> Result<CreateReputationProfileResponse> {
        let path = profiles_path(params.config_id, params.config_version);
        self.execute(
            Call::post("CreateReputationProfile", path)
                .validate(params)
                .json(&params.json_payload),
        )
        .await
    }

    pub async fn update_reputation_profile(
        &self,
        params: &UpdateReputationProfileRequest,
    ) -> Result<UpdateReputationProfileResponse> {
        let path = format!(
            "{}/{}",
            profiles_path(params.config_id, params.config_version),
            params.reputation_profile_id
        );
        self.execute(
            Call::put("UpdateReputationProfile", path)
                .validate(params)
                .json(&params.json_payload),
        )
        .await
    }

    pub async fn remove_reputation_profile(&self, params: &RemoveReputationProfileRequest) -> Result<()> {
        let path = format!(
            "{}/{}",
            profiles_path(params.config_id, params.config_version),
            params.reputation_profile_id
        );
        self.execute::<serde::de::IgnoredAny>(
            Call::delete("RemoveReputationProfile", path).validate(params),
        )
        .await?;
        Ok(())
    }
}
