//! SIEM integration settings of a configuration version

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::errors::Result;
use super::operation::Call;
use super::{Appsec, BASE_PATH};
use crate::session::Transport;

/// Protections a SIEM exception may name
pub const SIEM_PROTECTIONS: &[&str] = &[
    "botmanagement",
    "ipgeo",
    "rate",
    "urlProtection",
    "slowpost",
    "customrules",
    "waf",
    "apirequestconstraints",
    "clientrep",
    "malwareprotection",
    "aprProtection",
];

/// Action types a SIEM exception may name
pub const SIEM_ACTION_TYPES: &[&str] = &[
    "alert",
    "deny",
    "all_custom",
    "abort",
    "allow",
    "delay",
    "ignore",
    "monitor",
    "slow",
    "tarpit",
    "*",
];

/// Events of one protection that are not sent to the SIEM
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SiemException {
    #[validate(custom(function = "valid_protection"))]
    pub protection: String,
    #[validate(length(min = 1), custom(function = "valid_action_types"))]
    pub action_types: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SiemSettings {
    #[serde(default)]
    pub enable_for_all_policies: bool,
    #[serde(default)]
    pub enable_siem: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_botman_siem_events: Option<bool>,
    #[serde(default)]
    pub siem_definition_id: i64,
    #[serde(default)]
    pub firewall_policy_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(nested)]
    pub exceptions: Vec<SiemException>,
}

fn valid_protection(protection: &str) -> std::result::Result<(), ValidationError> {
    if SIEM_PROTECTIONS.contains(&protection) {
        return Ok(());
    }
    let mut err = ValidationError::new("protection");
    err.message = Some(Cow::Owned(format!(
        "value '{}' is invalid. Must be one of: {}",
        protection,
        SIEM_PROTECTIONS.join(", ")
    )));
    Err(err)
}

fn valid_action_types(action_types: &[String]) -> std::result::Result<(), ValidationError> {
    match action_types
        .iter()
        .find(|a| !SIEM_ACTION_TYPES.contains(&a.as_str()))
    {
        None => Ok(()),
        Some(invalid) => {
            let mut err = ValidationError::new("action_type");
            err.message = Some(Cow::Owned(format!(
                "value '{}' is invalid. Must be one of: {}",
                invalid,
                SIEM_ACTION_TYPES.join(", ")
            )));
            Err(err)
        }
    }
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetSiemSettingsRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
}

pub type GetSiemSettingsResponse = SiemSettings;

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateSiemSettingsRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
    #[validate(nested)]
    pub settings: SiemSettings,
}

pub type UpdateSiemSettingsResponse = SiemSettings;

#[derive(Debug, Clone, Default, Validate)]
pub struct RemoveSiemSettingsRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
}

pub type RemoveSiemSettingsResponse = SiemSettings;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DisableSiem {
    enable_siem: bool,
}

fn siem_path(config_id: i64, version: i64) -> String {
    format!("{}/configs/{}/versions/{}/siem", BASE_PATH, config_id, version)
}

impl<T: Transport> Appsec<T> {
    pub async fn get_siem_settings(&self, params: &GetSiemSettingsRequest) -> Result<GetSiemSettingsResponse> {
        let path = siem_path(params.config_id, params.version);
        self.execute(Call::get("GetSiemSettings", path).validate(params))
            .await
    }

    /// Replace the SIEM settings; every exception is checked before sending
    pub async fn update_siem_settings(
        &self,
        params: &UpdateSiemSettingsRequest,
    ) -> Result<UpdateSiemSettingsResponse> {
        let path = siem_path(params.config_id, params.version);
        self.execute(
            Call::put("UpdateSiemSettings", path)
                .validate(params)
                .json(&params.settings),
        )
        .await
    }

    pub async fn remove_siem_settings(
        &self,
        params: &RemoveSiemSettingsRequest,
    ) -> Result<RemoveSiemSettingsResponse> {
        let path = siem_path(params.config_id, params.version);
        self.execute(
            Call::put("RemoveSiemSettings", path)
                .validate(params)
                .json(&DisableSiem { enable_siem: false }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appsec::testing::*;
    use reqwest::{Method, StatusCode};
    use serde_json::json;

    fn settings() -> SiemSettings {
        SiemSettings {
            enable_for_all_policies: false,
            enable_siem: true,
            enabled_botman_siem_events: Some(true),
            siem_definition_id: 1,
            firewall_policy_ids: vec!["AAAA_81230".into()],
            exceptions: vec![SiemException {
                protection: "ipgeo".into(),
                action_types: vec!["*".into()],
            }],
        }
    }

    #[tokio::test]
    async fn test_get_siem_settings() {
        let client = client_expecting(
            Method::GET,
            "/appsec/v1/configs/43253/versions/7/siem",
            StatusCode::OK,
            json!({
                "enableForAllPolicies": false,
                "enableSiem": true,
                "siemDefinitionId": 1,
                "firewallPolicyIds": ["AAAA_81230"],
                "exceptions": [{"protection": "rate", "actionTypes": ["alert", "deny"]}]
            }),
        );

        let result = client
            .get_siem_settings(&GetSiemSettingsRequest {
                config_id: 43253,
                version: 7,
            })
            .await
            .unwrap();

        assert!(result.enable_siem);
        assert_eq!(result.enabled_botman_siem_events, None);
        assert_eq!(result.exceptions[0].action_types, vec!["alert", "deny"]);
    }

    #[tokio::test]
    async fn test_update_siem_settings() {
        let client = client_with(
            |req| {
                let body = body_json(req);
                req.method == Method::PUT
                    && body["enableSiem"] == json!(true)
                    && body["enabledBotmanSiemEvents"] == json!(true)
                    && body["exceptions"][0]["protection"] == json!("ipgeo")
            },
            StatusCode::OK,
            serde_json::to_value(settings()).unwrap(),
        );

        let result = client
            .update_siem_settings(&UpdateSiemSettingsRequest {
                config_id: 43253,
                version: 7,
                settings: settings(),
            })
            .await
            .unwrap();
        assert_eq!(result, settings());
    }

    #[tokio::test]
    async fn test_update_siem_settings_rejects_unknown_values() {
        let mut bad = settings();
        bad.exceptions = vec![
            SiemException {
                protection: "firewall".into(),
                action_types: vec!["alert".into()],
            },
            SiemException {
                protection: "waf".into(),
                action_types: vec!["alert".into(), "explode".into()],
            },
        ];

        let err = client_never_called()
            .update_siem_settings(&UpdateSiemSettingsRequest {
                config_id: 43253,
                version: 7,
                settings: bad,
            })
            .await
            .unwrap_err();

        let rendered = err.validation().unwrap().to_string();
        assert!(rendered.contains("value 'firewall' is invalid"));
        assert!(rendered.contains("value 'explode' is invalid"));
    }

    #[test]
    fn test_exception_requires_action_types() {
        let exception = SiemException {
            protection: "waf".into(),
            action_types: Vec::new(),
        };
        let errors = exception.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("action_types"));
    }

    #[tokio::test]
    async fn test_remove_siem_settings_disables() {
        let client = client_with(
            |req| req.method == Method::PUT && body_json(req) == json!({"enableSiem": false}),
            StatusCode::OK,
            json!({"enableSiem": false, "enableForAllPolicies": false, "siemDefinitionId": 1}),
        );

        let result = client
            .remove_siem_settings(&RemoveSiemSettingsRequest {
                config_id: 43253,
                version: 7,
            })
            .await
            .unwrap();
        assert!(!result.enable_siem);
    }
}
