//! Match targets
//!
//! A match target binds hostnames and paths (website targets) or API
//! endpoints (API targets) to a security policy. Create and update take the
//! target document as opaque JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use super::errors::Result;
use super::filter::retain_matching;
use super::json_payload;
use super::operation::Call;
use super::{Appsec, BASE_PATH};
use crate::session::Transport;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiReference {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkListReference {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyReference {
    #[serde(default)]
    pub policy_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTarget {
    #[serde(rename = "type", default)]
    pub target_type: String,
    #[serde(default)]
    pub target_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_version: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub apis: Vec<ApiReference>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub default_file: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hostnames: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_extensions: Vec<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_negative_file_extension_match: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_negative_path_match: Option<bool>,
    #[serde(default)]
    pub security_policy: PolicyReference,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bypass_network_lists: Vec<NetworkListReference>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetMatchTargetsRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub config_version: i64,
    /// Keep only the target with this id
    pub target_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTargets {
    #[serde(default)]
    pub api_targets: Vec<MatchTarget>,
    #[serde(default)]
    pub website_targets: Vec<MatchTarget>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMatchTargetsResponse {
    #[serde(default)]
    pub match_targets: MatchTargets,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetMatchTargetRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub config_version: i64,
    #[validate(range(min = 1))]
    pub target_id: i64,
}

pub type GetMatchTargetResponse = MatchTarget;

#[derive(Debug, Clone, Default, Validate)]
pub struct CreateMatchTargetRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub config_version: i64,
    #[validate(custom(function = "json_payload"))]
    pub json_payload: Value,
}

pub type CreateMatchTargetResponse = MatchTarget;

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateMatchTargetRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub config_version: i64,
    #[validate(range(min = 1))]
    pub target_id: i64,
    #[validate(custom(function = "json_payload"))]
    pub json_payload: Value,
}

pub type UpdateMatchTargetResponse = MatchTarget;

#[derive(Debug, Clone, Default, Validate)]
pub struct RemoveMatchTargetRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub config_version: i64,
    #[validate(range(min = 1))]
    pub target_id: i64,
}

impl<T: Transport> Appsec<T> {
    /// List website and API match targets, optionally narrowed to one target id
    pub async fn get_match_targets(
        &self,
        params: &GetMatchTargetsRequest,
    ) -> Result<GetMatchTargetsResponse> {
        let path = format!(
            "{}/configs/{}/versions/{}/match-targets",
            BASE_PATH, params.config_id, params.config_version
        );

        let mut response: GetMatchTargetsResponse = self
            .execute(Call::get("GetMatchTargets", path).validate(params))
            .await?;

        let targets = &mut response.match_targets;
        targets.api_targets = retain_matching(
            std::mem::take(&mut targets.api_targets),
            &params.target_id,
            |t| &t.target_id,
        );
        targets.website_targets = retain_matching(
            std::mem::take(&mut targets.website_targets),
            &params.target_id,
            |t| &t.target_id,
        );
        Ok(response)
    }

    pub async fn get_match_target(
        &self,
        params: &GetMatchTargetRequest,
    ) -> Result<GetMatchTargetResponse> {
        let path = format!(
            "{}/configs/{}/versions/{}/match-targets/{}",
            BASE_PATH, params.config_id, params.config_version, params.target_id
        );
        self.execute(
            Call::get("GetMatchTarget", path)
                .validate(params)
                .query("includeChildObjectName", true),
        )
        .await
    }

    pub async fn create_match_target(
        &self,
        params: &CreateMatchTargetRequest,
    ) -> Result<CreateMatchTargetResponse> {
        let path = format!(
            "{}/configs/{}/versions/{}/match-targets",
            BASE_PATH, params.config_id, params.config_version
        );
        self.execute(
            Call::post("CreateMatchTarget", path)
                .validate(params)
                .json(&params.json_payload),
        )
        .await
    }

    pub async fn update_match_target(
        &self,
        params: &UpdateMatchTargetRequest,
    ) -> Result<UpdateMatchTargetResponse> {
        let path = format!(
            "{}/configs/{}/versions/{}/match-targets/{}",
            BASE_PATH, params.config_id, params.config_version, params.target_id
        );
        self.execute(
            Call::put("UpdateMatchTarget", path)
                .validate(params)
                .json(&params.json_payload),
        )
        .await
    }

    /// Delete a match target; whatever the API answers with is discarded
    pub async fn remove_match_target(&self, params: &RemoveMatchTargetRequest) -> Result<()> {
        let path = format!(
            "{}/configs/{}/versions/{}/match-targets/{}",
            BASE_PATH, params.config_id, params.config_version, params.target_id
        );
        self.execute::<serde::de::IgnoredAny>(
            Call::delete("RemoveMatchTarget", path).validate(params),
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

    fn match_targets() -> Value {
        json!({
            "matchTargets": {
                "apiTargets": [
                    {"type": "api", "targetId": 2052813, "sequence": 1,
                     "apis": [{"id": 619183, "name": "Billing API"}],
                     "securityPolicy": {"policyId": "PLE_114049"},
                     "bypassNetworkLists": [{"id": "1304427_AAXXBBLIST", "name": "Bypass"}]}
                ],
                "websiteTargets": [
                    {"type": "website", "targetId": 2971336, "hostnames": ["www.example.com"],
                     "filePaths": ["/*"], "isNegativePathMatch": false,
                     "securityPolicy": {"policyId": "PLE_114049"}},
                    {"type": "website", "targetId": 2052813, "defaultFile": "NO_MATCH",
                     "securityPolicy": {"policyId": "PLE_114050"}}
                ]
            }
        })
    }

    #[tokio::test]
    async fn test_get_match_targets_filters_both_lists() {
        let client = client_expecting(
            Method::GET,
            "/appsec/v1/configs/43253/versions/15/match-targets",
            StatusCode::OK,
            match_targets(),
        );

        let result = client
            .get_match_targets(&GetMatchTargetsRequest {
                config_id: 43253,
                config_version: 15,
                target_id: 2052813,
            })
            .await
            .unwrap();

        assert_eq!(result.match_targets.api_targets.len(), 1);
        assert_eq!(result.match_targets.website_targets.len(), 1);
        assert_eq!(result.match_targets.website_targets[0].default_file, "NO_MATCH");
    }

    #[tokio::test]
    async fn test_no_match_keeps_empty_lists() {
        let client = client_expecting(
            Method::GET,
            "/appsec/v1/configs/43253/versions/15/match-targets",
            StatusCode::OK,
            match_targets(),
        );

        let result = client
            .get_match_targets(&GetMatchTargetsRequest {
                config_id: 43253,
                config_version: 15,
                target_id: 999,
            })
            .await
            .unwrap();

        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"matchTargets": {"apiTargets": [], "websiteTargets": []}})
        );
    }

    #[tokio::test]
    async fn test_get_match_targets_unfiltered() {
        let client = client_expecting(
            Method::GET,
            "/appsec/v1/configs/43253/versions/15/match-targets",
            StatusCode::OK,
            match_targets(),
        );

        let result = client
            .get_match_targets(&GetMatchTargetsRequest {
                config_id: 43253,
                config_version: 15,
                target_id: 0,
            })
            .await
            .unwrap();

        let api = &result.match_targets.api_targets[0];
        assert_eq!(api.apis[0].name, "Billing API");
        assert_eq!(api.bypass_network_lists[0].id, "1304427_AAXXBBLIST");
        assert_eq!(result.match_targets.website_targets.len(), 2);
        assert_eq!(result.match_targets.website_targets[0].is_negative_path_match, Some(false));
    }

    #[tokio::test]
    async fn test_get_match_target_includes_child_names() {
        let client = client_with(
            |req| {
                req.path == "/appsec/v1/configs/43253/versions/15/match-targets/2971336"
                    && query_param(req, "includeChildObjectName") == Some("true")
            },
            StatusCode::OK,
            json!({"type": "website", "targetId": 2971336, "hostnames": ["www.example.com"]}),
        );

        let target = client
            .get_match_target(&GetMatchTargetRequest {
                config_id: 43253,
                config_version: 15,
                target_id: 2971336,
            })
            .await
            .unwrap();
        assert_eq!(target.hostnames, vec!["www.example.com"]);
    }

    #[tokio::test]
    async fn test_create_match_target_sends_raw_payload() {
        let payload = json!({"type": "website", "hostnames": ["a.example.com"],
                             "securityPolicy": {"policyId": "PLE_114049"}});
        let expected = payload.clone();

        let client = client_with(
            move |req| req.method == Method::POST && body_json(req) == expected,
            StatusCode::CREATED,
            json!({"type": "website", "targetId": 3008967, "hostnames": ["a.example.com"]}),
        );

        let created = client
            .create_match_target(&CreateMatchTargetRequest {
                config_id: 43253,
                config_version: 15,
                json_payload: payload,
            })
            .await
            .unwrap();
        assert_eq!(created.target_id, 3008967);
    }

    #[tokio::test]
    async fn test_create_match_target_requires_payload() {
        let err = client_never_called()
            .create_match_target(&CreateMatchTargetRequest {
                config_id: 43253,
                config_version: 15,
                json_payload: Value::Null,
            })
            .await
            .unwrap_err();
        assert!(err.validation().unwrap().field_errors().contains_key("json_payload"));
    }

    #[tokio::test]
    async fn test_remove_match_target_ignores_body() {
        let client = client_expecting(
            Method::DELETE,
            "/appsec/v1/configs/43253/versions/15/match-targets/2971336",
            StatusCode::OK,
            json!({"type": "website", "targetId": 2971336, "unexpected": [1, 2, 3]}),
        );

        client
            .remove_match_target(&RemoveMatchTargetRequest {
                config_id: 43253,
                config_version: 15,
                target_id: 2971336,
            })
            .await
            .unwrap();
    }
}
