//! Network lists whose clients bypass a policy's protections

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::errors::Result;
use super::operation::Call;
use super::{segment, Appsec, BASE_PATH};
use crate::session::Transport;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BypassNetworkList {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetWapBypassNetworkListsRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
    #[validate(length(min = 1))]
    pub policy_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetWapBypassNetworkListsResponse {
    #[serde(default)]
    pub network_lists: Vec<BypassNetworkList>,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWapBypassNetworkListsRequest {
    #[serde(skip)]
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[serde(skip)]
    #[validate(range(min = 1))]
    pub version: i64,
    #[validate(length(min = 1))]
    pub policy_id: String,
    /// Network list ids; replaces the current set
    pub network_lists: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWapBypassNetworkListsResponse {
    #[serde(default)]
    pub network_lists: Vec<String>,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct RemoveWapBypassNetworkListsRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
    #[validate(length(min = 1))]
    pub policy_id: String,
}

pub type RemoveWapBypassNetworkListsResponse = UpdateWapBypassNetworkListsResponse;

fn bypass_path(config_id: i64, version: i64, policy_id: &str) -> String {
    format!(
        "{}/configs/{}/versions/{}/security-policies/{}/bypass-network-lists",
        BASE_PATH,
        config_id,
        version,
        segment(policy_id)
    )
}

impl<T: Transport> Appsec<T> {
    pub async fn get_wap_bypass_network_lists(
        &self,
        params: &GetWapBypassNetworkListsRequest,
    ) -> Result<GetWapBypassNetworkListsResponse> {
        let path = bypass_path(params.config_id, params.version, &params.policy_id);
        self.execute(Call::get("GetWAPBypassNetworkLists", path).validate(params))
            .await
    }

    pub async fn update_wap_bypass_network_lists(
        &self,
        params: &UpdateWapBypassNetworkListsRequest,
    ) -> Result<UpdateWapBypassNetworkListsResponse> {
        let path = bypass_path(params.config_id, params.version, &params.policy_id);
        self.execute(
            Call::put("UpdateWAPBypassNetworkLists", path)
                .validate(params)
                .json(params),
        )
        .await
    }

    /// Clear the bypass set
    pub async fn remove_wap_bypass_network_lists(
        &self,
        params: &RemoveWapBypassNetworkListsRequest,
    ) -> Result<RemoveWapBypassNetworkListsResponse> {
        let path = bypass_path(params.config_id, params.version, &params.policy_id);
        let body = UpdateWapBypassNetworkListsRequest {
            policy_id: params.policy_id.clone(),
            ..Default::default()
        };
        self.execute(
            Call::put("RemoveWAPBypassNetworkLists", path)
                .validate(params)
                .json(&body),
        )
        .await
    }
}
