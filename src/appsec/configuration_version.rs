//! Configuration versions and clones

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::errors::Result;
use super::operation::Call;
use super::{Appsec, BASE_PATH};
use crate::session::Transport;

/// Activation state of a version on one network
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// One version of a security configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationVersion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_id: Option<i64>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub config_name: String,
    #[serde(default)]
    pub version: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version_notes: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub create_date: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub based_on: Option<i64>,
    #[serde(default)]
    pub production: NetworkStatus,
    #[serde(default)]
    pub staging: NetworkStatus,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetConfigurationVersionsRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetConfigurationVersionsResponse {
    #[serde(default)]
    pub config_id: i64,
    #[serde(default)]
    pub config_name: String,
    #[serde(default)]
    pub total_size: i64,
    #[serde(default)]
    pub page_size: i64,
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub last_created_version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_active_version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_active_version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_expedite_request_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_expedite_request_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub version_list: Vec<ConfigurationVersion>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetConfigurationVersionCloneRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
}

pub type GetConfigurationVersionCloneResponse = ConfigurationVersion;

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigurationVersionCloneRequest {
    #[serde(skip)]
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub create_from_version: i64,
    pub rule_update: bool,
}

pub type CreateConfigurationVersionCloneResponse = ConfigurationVersion;

#[derive(Debug, Clone, Default, Validate)]
pub struct RemoveConfigurationVersionCloneRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
}

/// Source of a configuration clone
#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CloneSource {
    #[validate(range(min = 1))]
    pub config_id: i64,
    pub version: i64,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigurationCloneRequest {
    pub name: String,
    pub description: String,
    pub contract_id: String,
    pub group_id: i64,
    pub hostnames: Vec<String>,
    #[validate(nested)]
    pub create_from: CloneSource,
}

pub type CreateConfigurationCloneResponse = super::CreateConfigurationResponse;

impl<T: Transport> Appsec<T> {
    /// Every version of a configuration, unpaged
    pub async fn get_configuration_versions(
        &self,
        params: &GetConfigurationVersionsRequest,
    ) -> Result<GetConfigurationVersionsResponse> {
        let path = format!("{}/configs/{}/versions", BASE_PATH, params.config_id);
        self.execute(
            Call::get("GetConfigurationVersions", path)
                .validate(params)
                .query("page", -1)
                .query("detail", true),
        )
        .await
    }

    pub async fn get_configuration_version_clone(
        &self,
        params: &GetConfigurationVersionCloneRequest,
    ) -> Result<GetConfigurationVersionCloneResponse> {
        let path = format!(
            "{}/configs/{}/versions/{}",
            BASE_PATH, params.config_id, params.version
        );
        self.execute(Call::get("GetConfigurationVersionClone", path).validate(params))
            .await
    }

    /// Create a new version from an existing one
    pub async fn create_configuration_version_clone(
        &self,
        params: &CreateConfigurationVersionCloneRequest,
    ) -> Result<CreateConfigurationVersionCloneResponse> {
        let path = format!("{}/configs/{}/versions", BASE_PATH, params.config_id);
        self.execute(
            Call::post("CreateConfigurationVersionClone", path)
                .validate(params)
                .json(params),
        )
        .await
    }

    pub async fn remove_configuration_version_clone(
        &self,
        params: &RemoveConfigurationVersionCloneRequest,
    ) -> Result<()> {
        let path = format!(
            "{}/configs/{}/versions/{}",
            BASE_PATH, params.config_id, params.version
        );
        self.execute::<serde::de::IgnoredAny>(
            Call::delete("RemoveConfigurationVersionClone", path).validate(params),
        )
        .await?;
        Ok(())
    }

    /// Create a new configuration from a version of an existing one
    pub async fn create_configuration_clone(
        &self,
        params: &CreateConfigurationCloneRequest,
    ) -> Result<CreateConfigurationCloneResponse> {
        let path = format!("{}/configs", BASE_PATH);
        self.execute(
            Call::post("CreateConfigurationClone", path)
                .validate(params)
                .json(params),
        )
        .await
    }
}
