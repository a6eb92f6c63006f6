//! Reputation analysis settings of a security policy

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::errors::Result;
use super::operation::Call;
use super::{segment, Appsec, BASE_PATH};
use crate::session::Transport;

/// Which reputation data is forwarded to the origin
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationAnalysis {
    #[serde(rename = "forwardToHTTPHeader", default)]
    pub forward_to_http_header: bool,
    #[serde(rename = "forwardSharedIPToHTTPHeaderAndSIEM", default)]
    pub forward_shared_ip_to_http_header_and_siem: bool,
}

#[derive(Debug, Clone, Default, Validate)]
pub struct GetReputationAnalysisRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
    #[validate(length(min = 1))]
    pub policy_id: String,
}

pub type GetReputationAnalysisResponse = ReputationAnalysis;

#[derive(Debug, Clone, Default, Validate)]
pub struct UpdateReputationAnalysisRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
    #[validate(length(min = 1))]
    pub policy_id: String,
    pub settings: ReputationAnalysis,
}

pub type UpdateReputationAnalysisResponse = ReputationAnalysis;

#[derive(Debug, Clone, Default, Validate)]
pub struct RemoveReputationAnalysisRequest {
    #[validate(range(min = 1))]
    pub config_id: i64,
    #[validate(range(min = 1))]
    pub version: i64,
    #[validate(length(min = 1))]
    pub policy_id: String,
}

pub type RemoveReputationAnalysisResponse = ReputationAnalysis;

fn analysis_path(config_id: i64, version: i64, policy_id: &str) -> String {
    format!(
        "{}/configs/{}/versions/{}/security-policies/{}/reputation-analysis",
        BASE_PATH,
        config_id,
        version,
        segment(policy_id)
    )
}

impl<T: Transport> Appsec<T> {
    pub async fn get_reputation_analysis(
        &self,
        params: &GetReputationAnalysisRequest,
    ) -> Result<GetReputationAnalysisResponse> {
        let path = analysis_path(params.config_id, params.version, &params.policy_id);
        self.execute(Call::get("GetReputationAnalysis", path).validate(params))
            .await
    }

    pub async fn update_reputation_analysis(
        &self,
        params: &UpdateReputationAnalysisRequest,
    ) -> Result<UpdateReputationAnalysisResponse> {
        let path = analysis_path(params.config_id, params.version, &params.policy_id);
        self.execute(
            Call::put("UpdateReputationAnalysis", path)
                .validate(params)
                .json(&params.settings),
        )
        .await
    }

    /// Stop forwarding reputation data; both flags go back to `false`
    pub async fn remove_reputation_analysis(
        &self,
        params: &RemoveReputationAnalysisRequest,
    ) -> Result<RemoveReputationAnalysisResponse> {
        let path = analysis_path(params.config_id, params.version, &params.policy_id);
        self.execute(
            Call::put("RemoveReputationAnalysis", path)
                .validate(params)
                .json(&ReputationAnalysis::default()),
        )
        .await
    }
}
