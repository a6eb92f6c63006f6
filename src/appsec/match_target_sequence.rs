//! Match target evaluation order

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::errors::Result;
use super::operation::Call;
use super::{Appsec, BASE_PATH};
use crate::session::Transport;

/// A match target and its position
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchTargetItem {
    pub sequence: i64,
    pub target_id: i64,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetMatchTargetSequenceRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub config_version: i64,
    /// `website` or `api`
    #[validate(length(min = 1))]
    pub target_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetMatchTargetSequenceResponse {
    #[serde(default)]
    pub target_sequence: Vec<MatchTargetItem>,
    #[serde(rename = "type", default)]
    pub target_type: String,
}

#[derive(Debug, Clone, Default, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMatchTargetSequenceRequest {
    #[serde(skip)]
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[serde(skip)]
    #[validate(range(min = 1))]
    pub config_version: i64,
    #[serde(rename = "type")]
    #[validate(length(min = 1))]
    pub target_type: String,
    pub target_sequence: Vec<MatchTargetItem>,
}

pub type UpdateMatchTargetSequenceResponse = GetMatchTargetSequenceResponse;

impl<T: Transport> Appsec<T> {
    pub async fn get_match_target_sequence(
        &self,
        params: &GetMatchTargetSequenceRequest,
    ) -> Result<GetMatchTargetSequenceResponse> {
        let path = format!(
            "{}/configs/{}/versions/{}/match-targets/sequence",
            BASE_PATH, params.config_id, params.config_version
        );
        self.execute(
            Call::get("GetMatchTargetSequence", path)
                .validate(params)
                .query("type", &params.target_type),
        )
        .await
    }

    /// Replace the evaluation order of one target type
    pub async fn update_match_target_sequence(
        &self,
        params: &UpdateMatchTargetSequenceRequest,
    ) -> Result<UpdateMatchTargetSequenceResponse> {
        let path = format!(
            "{}/configs/{}/versions/{}/match-targets/sequence",
            BASE_PATH, params.config_id, params.config_version
        );
        self.execute(
            Call::put("UpdateMatchTargetSequence", path)
                .validate(params)
                .json(params),
        )
        .await
    }
}
