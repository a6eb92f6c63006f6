//! API request constraint actions of a security policy

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::errors::Result;
use super::filter::retain_matching;
use super::operation::Call;
use super::{segment, Appsec, BASE_PATH};
use crate::session::Transport;

/// Action applied to requests violating an API definition's constraints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiEndpointConstraint {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub action: String,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetApiRequestConstraintsRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
    #[validate(length(min = 1))]
    pub policy_id: String,
    /// Keep only the endpoint with this API id
    pub api_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetApiRequestConstraintsResponse {
    #[serde(rename = "apiEndpoints", default)]
    pub api_endpoints: Vec<ApiEndpointConstraint>,
}

/// Without `api_id` the action applies to every API in the policy
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UpdateApiRequestConstraintsRequest {
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
    pub api_id: i64,
    /// `alert`, `deny`, `none` or a custom deny id
    pub action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateApiRequestConstraintsResponse {
    #[serde(default)]
    pub action: String,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct RemoveApiRequestConstraintsRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
    #[validate(length(min = 1))]
    pub policy_id: String,
    pub api_id: i64,
}

pub type RemoveApiRequestConstraintsResponse = UpdateApiRequestConstraintsResponse;

fn constraints_path(config_id: i64, version: i64, policy_id: &str, api_id: i64) -> String {
    let base = format!(
        "{}/configs/{}/versions/{}/security-policies/{}/api-request-constraints",
        BASE_PATH,
        config_id,
        version,
        segment(policy_id)
    );
    if api_id == 0 {
        base
    } else {
        format!("{}/{}", base, api_id)
    }
}

impl<T: Transport> Appsec<T> {
    pub async fn get_api_request_constraints(
        &self,
        params: &GetApiRequestConstraintsRequest,
    ) -> Result<GetApiRequestConstraintsResponse> {
        let path = constraints_path(params.config_id, params.version, &params.policy_id, 0);

        let mut response: GetApiRequestConstraintsResponse = self
            .execute(Call::get("GetApiRequestConstraints", path).validate(params))
            .await?;

        response.api_endpoints = retain_matching(response.api_endpoints, &params.api_id, |e| &e.id);
        Ok(response)
    }

    pub async fn update_api_request_constraints(
        &self,
        params: &UpdateApiRequestConstraintsRequest,
    ) -> Result<UpdateApiRequestConstraintsResponse> {
        let path = constraints_path(
            params.config_id,
            params.version,
            &params.policy_id,
            params.api_id,
        );
        self.execute(
            Call::put("UpdateApiRequestConstraints", path)
                .validate(params)
                .json(params),
        )
        .await
    }

    /// Set the action back to `none`
    pub async fn remove_api_request_constraints(
        &self,
        params: &RemoveApiRequestConstraintsRequest,
    ) -> Result<RemoveApiRequestConstraintsResponse> {
        let path = constraints_path(
            params.config_id,
            params.version,
            &params.policy_id,
            params.api_id,
        );
        let body = UpdateApiRequestConstraintsResponse {
            action: "none".to_string(),
        };
        self.execute(
            Call::put("RemoveApiRequestConstraints", path)
                .validate(params)
                .json(&body),
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

    const PATH: &str = "/appsec/v1/configs/43253/versions/15/security-policies/AAAA_81230/api-request-constraints";

    fn endpoints() -> serde_json::Value {
        json!({"apiEndpoints": [
            {"id": 1, "action": "alert"},
            {"id": 2, "action": "deny"},
            {"id": 3, "action": "none"}
        ]})
    }

    async fn fetch(api_id: i64) -> GetApiRequestConstraintsResponse {
        client_expecting(Method::GET, PATH, StatusCode::OK, endpoints())
            .get_api_request_constraints(&GetApiRequestConstraintsRequest {
                config_id: 43253,
                version: 15,
                policy_id: "AAAA_81230".into(),
                api_id,
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_api_request_constraints_filtering() {
        assert_eq!(fetch(0).await.api_endpoints.len(), 3);

        let one = fetch(1).await;
        assert_eq!(
            one.api_endpoints,
            vec![ApiEndpointConstraint {
                id: 1,
                action: "alert".into()
            }]
        );

        assert!(fetch(999).await.api_endpoints.is_empty());
    }

    #[tokio::test]
    async fn test_update_api_request_constraints_single_api() {
        let client = client_with(
            |req| {
                req.method == Method::PUT
                    && req.path == format!("{}/2", PATH)
                    && body_json(req) == json!({"action": "deny"})
            },
            StatusCode::OK,
            json!({"action": "deny"}),
        );

        let result = client
            .update_api_request_constraints(&UpdateApiRequestConstraintsRequest {
                config_id: 43253,
                version: 15,
                policy_id: "AAAA_81230".into(),
                api_id: 2,
                action: "deny".into(),
            })
            .await
            .unwrap();
        assert_eq!(result.action, "deny");
    }

    #[tokio::test]
    async fn test_update_api_request_constraints_all_apis() {
        let client = client_with(
            |req| req.method == Method::PUT && req.path == PATH,
            StatusCode::OK,
            json!({"action": "alert"}),
        );

        client
            .update_api_request_constraints(&UpdateApiRequestConstraintsRequest {
                config_id: 43253,
                version: 15,
                policy_id: "AAAA_81230".into(),
                api_id: 0,
                action: "alert".into(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_remove_api_request_constraints_sets_none() {
        let client = client_with(
            |req| {
                req.method == Method::PUT
                    && req.path == format!("{}/1", PATH)
                    && body_json(req) == json!({"action": "none"})
            },
            StatusCode::OK,
            json!({"action": "none"}),
        );

        let result = client
            .remove_api_request_constraints(&RemoveApiRequestConstraintsRequest {
                config_id: 43253,
                version: 15,
                policy_id: "AAAA_81230".into(),
                api_id: 1,
            })
            .await
            .unwrap();
        assert_eq!(result.action, "none");
    }

    #[tokio::test]
    async fn test_get_api_request_constraints_requires_policy() {
        let err = client_never_called()
            .get_api_request_constraints(&GetApiRequestConstraintsRequest {
                config_id: 43253,
                version: 15,
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(err.validation().unwrap().field_errors().contains_key("policy_id"));
    }
}
