//! Configuration activation on the staging and production networks

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::errors::Result;
use super::operation::{Call, OK};
use super::{Appsec, BASE_PATH};
use crate::session::Transport;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivationAction {
    #[default]
    Activate,
    Deactivate,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Network {
    #[default]
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationStatus {
    New,
    Received,
    Activated,
    Inactive,
    Aborted,
    Failed,
    Deactivated,
    PendingDeactivation,
    #[default]
    #[serde(other)]
    Unknown,
}

impl ActivationStatus {
    /// No further transition will happen without a new request
    pub fn is_final(self) -> bool {
        matches!(
            self,
            Self::Activated | Self::Aborted | Self::Failed | Self::Deactivated
        )
    }
}

/// A configuration version taking part in an activation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ActivationConfig {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub config_version: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub config_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_config_version: Option<i64>,
}

/// State of one activation request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivationState {
    #[serde(default)]
    pub activation_id: i64,
    #[serde(default)]
    pub dispatch_count: i64,
    #[serde(default)]
    pub action: ActivationAction,
    #[serde(default)]
    pub status: ActivationStatus,
    #[serde(default)]
    pub network: Network,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub estimate: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub created_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_date: Option<String>,
    #[serde(default)]
    pub activation_configs: Vec<ActivationConfig>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetActivationsRequest {
    #[validate(range(min = 1))]
    pub activation_id: i64,
}

pub type GetActivationsResponse = ActivationState;

#[derive(Debug, Clone, Default, Validate)]
pub struct GetActivationHistoryRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
}

/// One past activation of a configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activation {
    #[serde(default)]
    pub activation_id: i64,
    #[serde(default)]
    pub version: i64,
    #[serde(default)]
    pub status: ActivationStatus,
    #[serde(default)]
    pub network: Network,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub activated_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_date: Option<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notification_emails: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetActivationHistoryResponse {
    #[serde(default)]
    pub config_id: i64,
    #[serde(default)]
    pub activation_history: Vec<Activation>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateActivationsRequest {
    pub action: ActivationAction,
    pub network: Network,
    pub note: String,
    pub notification_emails: Vec<String>,
    #[validate(length(min = 1), nested)]
    pub activation_configs: Vec<ActivationConfig>,
}

pub type CreateActivationsResponse = ActivationState;

#[derive(Debug, Clone, Default, Validate)]
pub struct RemoveActivationsRequest {
    pub network: Network,
    pub note: String,
    pub notification_emails: Vec<String>,
    #[validate(length(min = 1), nested)]
    pub activation_configs: Vec<ActivationConfig>,
}

pub type RemoveActivationsResponse = ActivationState;

impl<T: Transport> Appsec<T> {
    pub async fn get_activations(&self, params: &GetActivationsRequest) -> Result<GetActivationsResponse> {
        let path = format!("{}/activations/{}", BASE_PATH, params.activation_id);
        self.execute(
            Call::get("GetActivations", path)
                .validate(params)
                .query("updateLatestNetworkStatus", true),
        )
        .await
    }

    pub async fn get_activation_history(
        &self,
        params: &GetActivationHistoryRequest,
    ) -> Result<GetActivationHistoryResponse> {
        let path = format!("{}/configs/{}/activations", BASE_PATH, params.config_id);
        self.execute(Call::get("GetActivationHistory", path).validate(params))
            .await
    }

    /// Submit an activation, then read back its current state
    pub async fn create_activations(
        &self,
        params: &CreateActivationsRequest,
    ) -> Result<CreateActivationsResponse> {
        let submitted: ActivationState = self
            .execute(
                Call::post("CreateActivations", format!("{}/activations", BASE_PATH))
                    .validate(params)
                    .json(params)
                    .accept(OK),
            )
            .await?;

        tracing::debug!(
            "Activation {} submitted, reading status",
            submitted.activation_id
        );

        let path = format!("{}/activations/{}", BASE_PATH, submitted.activation_id);
        self.execute(Call::get("CreateActivations", path)).await
    }

    /// Deactivate the given configuration versions
    pub async fn remove_activations(
        &self,
        params: &RemoveActivationsRequest,
    ) -> Result<RemoveActivationsResponse> {
        let body = CreateActivationsRequest {
            action: ActivationAction::Deactivate,
            network: params.network,
            note: params.note.clone(),
            notification_emails: params.notification_emails.clone(),
            activation_configs: params.activation_configs.clone(),
        };
        self.execute(
            Call::post("RemoveActivations", format!("{}/activations", BASE_PATH))
                .validate(params)
                .json(&body)
                .accept(OK),
        )
        .await
    }
}
