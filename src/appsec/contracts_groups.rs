//! Contracts and groups the credentials can create configurations in

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::errors::Result;
use super::filter::retain_matching;
use super::operation::Call;
use super::{Appsec, BASE_PATH};
use crate::session::Transport;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractGroup {
    #[serde(default)]
    pub contract_id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub group_id: i64,
}

/// Both filters are optional and combine
#[derive(Debug, Clone, Default, Validate)]
pub struct GetContractsGroupsRequest {
    pub contract_id: String,
    pub group_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetContractsGroupsResponse {
    #[serde(rename = "contract_groups", default)]
    pub contract_groups: Vec<ContractGroup>,
}

impl<T: Transport> Appsec<T> {
    pub async fn get_contracts_groups(
        &self,
        params: &GetContractsGroupsRequest,
    ) -> Result<GetContractsGroupsResponse> {
        let path = format!("{}/contracts-groups", BASE_PATH);

        let mut response: GetContractsGroupsResponse = self
            .execute(Call::get("GetContractsGroups", path).validate(params))
            .await?;

        let groups = retain_matching(response.contract_groups, &params.contract_id, |g| &g.contract_id);
        response.contract_groups = retain_matching(groups, &params.group_id, |g| &g.group_id);
        Ok(response)
    }
}
