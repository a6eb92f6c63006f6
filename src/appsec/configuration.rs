//! Security configurations

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::errors::Result;
use super::filter::retain_matching;
use super::operation::Call;
use super::{Appsec, BASE_PATH};
use crate::session::Transport;

#[derive(Debug, Clone, Default)]
pub struct GetConfigurationsRequest {
    /// Keep only the configuration with this name
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GetConfigurationsResponse {
    #[serde(default)]
    pub configurations: Vec<ConfigurationSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSummary {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub file_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub target_product: String,
    #[serde(default)]
    pub latest_version: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub staging_version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_version: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub production_hostnames: Vec<String>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetConfigurationRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
}

pub type GetConfigurationResponse = ConfigurationSummary;

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigurationRequest {
    #[validate(length(min = 1))]
    pub name: String,
    pub description: String,
    #[validate(length(min = 1))]
    pub contract_id: String,
    #[validate(range(min = 1))]
    pub group_id: i64,
    pub hostnames: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateConfigurationResponse {
    #[serde(default)]
    pub config_id: i64,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UpdateConfigurationRequest {
    #[serde(skip)]
    #[validate(range(min = 1))]
    pub config_id: i64,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateConfigurationResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct RemoveConfigurationRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
}

impl<T: Transport> Appsec<T> {
    /// List the security configurations, optionally narrowed to one name
    pub async fn get_configurations(
        &self,
        params: &GetConfigurationsRequest,
    ) -> Result<GetConfigurationsResponse> {
        let path = format!("{}/configs", BASE_PATH);

        let mut response: GetConfigurationsResponse =
            self.execute(Call::get("GetConfigurations", path)).await?;

        response.configurations =
            retain_matching(response.configurations, params.name.as_str(), |c| {
                c.name.as_str()
            });
        Ok(response)
    }

    pub async fn get_configuration(
        &self,
        params: &GetConfigurationRequest,
    ) -> Result<GetConfigurationResponse> {
        let path = format!("{}/configs/{}", BASE_PATH, params.config_id);
        self.execute(Call::get("GetConfiguration", path).validate(params))
            .await
    }

    pub async fn create_configuration(
        &self,
        params: &CreateConfigurationRequest,
    ) -> Result<CreateConfigurationResponse> {
        let path = format!("{}/configs", BASE_PATH);
        self.execute(
            Call::post("CreateConfiguration", path)
                .validate(params)
                .json(params),
        )
        .await
    }

    pub async fn update_configuration(
        &self,
        params: &UpdateConfigurationRequest,
    ) -> Result<UpdateConfigurationResponse> {
        let path = format!("{}/configs/{}", BASE_PATH, params.config_id);
        self.execute(
            Call::put("UpdateConfiguration", path)
                .validate(params)
                .json(params),
        )
        .await
    }

    pub async fn remove_configuration(&self, params: &RemoveConfigurationRequest) -> Result<()> {
        let path = format!("{}/configs/{}", BASE_PATH, params.config_id);
        self.execute::<serde::de::IgnoredAny>(
            Call::delete("RemoveConfiguration", path).validate(params),
        )
        .await?;
        Ok(())
    }
}
