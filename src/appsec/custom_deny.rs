//! Custom deny actions
//!
//! A custom deny replaces the default deny response with a redirect or a
//! custom page. Ids look like `deny_custom_622918` but older configurations
//! report bare numbers, so the id always decodes into a string.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::errors::Result;
use super::filter::retain_matching;
use super::flex;
use super::json_payload;
use super::operation::Call;
use super::{segment, Appsec, BASE_PATH};
use crate::session::Transport;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomDenyParameter {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomDeny {
    #[serde(default, deserialize_with = "flex::custom_deny_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub parameters: Vec<CustomDenyParameter>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetCustomDenyListRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
    /// Keep only the custom deny with this id
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCustomDenyListResponse {
    #[serde(default)]
    pub custom_deny_list: Vec<CustomDeny>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetCustomDenyRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
    #[validate(length(min = 1))]
    pub id: String,
}

pub type GetCustomDenyResponse = CustomDeny;

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateCustomDenyRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
    #[validate(custom(function = "json_payload"))]
    pub json_payload: Value,
}

pub type CreateCustomDenyResponse = CustomDeny;

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateCustomDenyRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
    #[validate(length(min = 1))]
    pub id: String,
    #[validate(custom(function = "json_payload"))]
    pub json_payload: Value,
}

pub type UpdateCustomDenyResponse = CustomDeny;

#[derive(Debug, Clone, Default, Validate)]
pub struct RemoveCustomDenyRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
    #[validate(length(min = 1))]
    pub id: String,
}

fn custom_deny_path(config_id: i64, version: i64) -> String {
    format!(
        "{}/configs/{}/versions/{}/custom-deny",
        BASE_PATH, config_id, version
    )
}

impl<T: Transport> Appsec<T> {
    pub async fn get_custom_deny_list(
        &self,
        params: &GetCustomDenyListRequest,
    ) -> Result<GetCustomDenyListResponse> {
        let path = custom_deny_path(params.config_id, params.version);

        let mut response: GetCustomDenyListResponse = self
            .execute(Call::get("GetCustomDenyList", path).validate(params))
            .await?;

        response.custom_deny_list = retain_matching(response.custom_deny_list, &params.id, |d| &d.id);
        Ok(response)
    }

    pub async fn get_custom_deny(&self, params: &GetCustomDenyRequest) -> Result<GetCustomDenyResponse> {
        let path = format!(
            "{}/{}",
            custom_deny_path(params.config_id, params.version),
            segment(&params.id)
        );
        self.execute(Call::get("GetCustomDeny", path).validate(params))
            .await
    }

    pub async fn create_custom_deny(
        &self,
        params: &CreateCustomDenyRequest,
    ) -> Result<CreateCustomDenyResponse> {
        let path = custom_deny_path(params.config_id, params.version);
        self.execute(
            Call::post("CreateCustomDeny", path)
                .validate(params)
                .json(&params.json_payload),
        )
        .await
    }

    pub async fn update_custom_deny(
        &self,
        params: &UpdateCustomDenyRequest,
    ) -> Result<UpdateCustomDenyResponse> {
        let path = format!(
            "{}/{}",
            custom_deny_path(params.config_id, params.version),
            segment(&params.id)
        );
        self.execute(
            Call::put("UpdateCustomDeny", path)
                .validate(params)
                .json(&params.json_payload),
        )
        .await
    }

    pub async fn remove_custom_deny(&self, params: &RemoveCustomDenyRequest) -> Result<()> {
        let path = format!(
            "{}/{}",
            custom_deny_path(params.config_id, params.version),
            segment(&params.id)
        );
        self.execute::<serde::de::IgnoredAny>(
            Call::delete("RemoveCustomDeny", path).validate(params),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appsec::testing::*;
    use reqwest::{Method, StatusCode};
    use serde_json::json;

    fn deny_list() -> Value {
        json!({"customDenyList": [
            {"id": "deny_custom_622918", "name": "Custom page",
             "parameters": [{"name": "response_status_code", "value": "403"}]},
            {"id": 54994, "name": "Legacy redirect",
             "parameters": [{"name": "prevent_browser_cache", "value": "true"}]}
        ]})
    }

    #[tokio::test]
    async fn test_get_custom_deny_list_mixed_ids() {
        let client = client_expecting(
            Method::GET,
            "/appsec/v1/configs/43253/versions/7/custom-deny",
            StatusCode::OK,
            deny_list(),
        );

        let result = client
            .get_custom_deny_list(&GetCustomDenyListRequest {
                config_id: 43253,
                version: 7,
                id: String::new(),
            })
            .await
            .unwrap();

        assert_eq!(result.custom_deny_list.len(), 2);
        assert_eq!(result.custom_deny_list[1].id, "54994");
    }

    #[tokio::test]
    async fn test_get_custom_deny_list_filtered() {
        let client = client_expecting(
            Method::GET,
            "/appsec/v1/configs/43253/versions/7/custom-deny",
            StatusCode::OK,
            deny_list(),
        );

        let result = client
            .get_custom_deny_list(&GetCustomDenyListRequest {
                config_id: 43253,
                version: 7,
                id: "deny_custom_622918".into(),
            })
            .await
            .unwrap();

        assert_eq!(result.custom_deny_list.len(), 1);
        assert_eq!(result.custom_deny_list[0].parameters[0].value, "403");
    }

    #[tokio::test]
    async fn test_get_custom_deny() {
        let client = client_expecting(
            Method::GET,
            "/appsec/v1/configs/43253/versions/7/custom-deny/deny_custom_622918",
            StatusCode::OK,
            json!({"id": "deny_custom_622918", "name": "Custom page", "parameters": []}),
        );

        let deny = client
            .get_custom_deny(&GetCustomDenyRequest {
                config_id: 43253,
                version: 7,
                id: "deny_custom_622918".into(),
            })
            .await
            .unwrap();
        assert_eq!(deny.name, "Custom page");
    }

    #[tokio::test]
    async fn test_update_custom_deny_api_error() {
        let client = client_expecting(
            Method::PUT,
            "/appsec/v1/configs/43253/versions/7/custom-deny/deny_custom_622918",
            StatusCode::INTERNAL_SERVER_ERROR,
            json!({
                "type": "internal_error",
                "title": "Internal Server Error",
                "detail": "Error creating CustomDeny"
            }),
        );

        let err = client
            .update_custom_deny(&UpdateCustomDenyRequest {
                config_id: 43253,
                version: 7,
                id: "deny_custom_622918".into(),
                json_payload: json!({"name": "Custom page"}),
            })
            .await
            .unwrap_err();

        let api = err.api().unwrap();
        assert_eq!(api.error_type, "internal_error");
        assert_eq!(api.status_code, 500);
    }

    #[tokio::test]
    async fn test_create_custom_deny_requires_payload() {
        let err = client_never_called()
            .create_custom_deny(&CreateCustomDenyRequest {
                config_id: 43253,
                version: 7,
                json_payload: Value::Null,
            })
            .await
            .unwrap_err();
        assert!(err.validation().unwrap().field_errors().contains_key("json_payload"));
    }

    #[tokio::test]
    async fn test_remove_custom_deny() {
        let client = client_expecting(
            Method::DELETE,
            "/appsec/v1/configs/43253/versions/7/custom-deny/deny_custom_622918",
            StatusCode::OK,
            Value::Null,
        );
        client
            .remove_custom_deny(&RemoveCustomDenyRequest {
                config_id: 43253,
                version: 7,
                id: "deny_custom_622918".into(),
            })
            .await
            .unwrap();
    }
}
