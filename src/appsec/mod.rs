//! Application Security API
//!
//! [`Appsec`] exposes one async method per `/appsec/v1` endpoint. Methods are
//! grouped by resource family, one module each:
//!
//! - [`configuration`], [`configuration_version`] - Security configurations, versions and clones
//! - [`security_policy`] - Security policies
//! - [`match_target`], [`match_target_sequence`] - Match targets and their order
//! - [`custom_rule`], [`custom_rule_action`] - Custom rules and per-policy actions
//! - [`custom_deny`] - Custom deny actions
//! - [`reputation_profile`], [`reputation_analysis`] - Client reputation
//! - [`rate_policy`] - Rate policies
//! - [`siem_settings`] - SIEM integration
//! - [`contracts_groups`] - Contracts and groups available to the account
//! - [`api_request_constraints`] - API request constraint actions
//! - [`wap_bypass_network_lists`] - Network lists that bypass protections
//! - [`activations`] - Configuration activation

pub mod errors;
pub mod filter;
pub mod flex;
pub(crate) mod operation;
#[cfg(test)]
pub(crate) mod testing;

pub mod activations;
pub mod api_request_constraints;
pub mod configuration;
pub mod configuration_version;
pub mod contracts_groups;
pub mod custom_deny;
pub mod custom_rule;
pub mod custom_rule_action;
pub mod match_target;
pub mod match_target_sequence;
pub mod rate_policy;
pub mod reputation_analysis;
pub mod reputation_profile;
pub mod security_policy;
pub mod siem_settings;
pub mod wap_bypass_network_lists;

use std::borrow::Cow;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use validator::ValidationError;

pub use activations::*;
pub use api_request_constraints::*;
pub use configuration::*;
pub use configuration_version::*;
pub use contracts_groups::*;
pub use custom_deny::*;
pub use custom_rule::*;
pub use custom_rule_action::*;
pub use errors::{ApiError, Error, Result};
pub use match_target::*;
pub use match_target_sequence::*;
pub use rate_policy::*;
pub use reputation_analysis::*;
pub use reputation_profile::*;
pub use security_policy::*;
pub use siem_settings::*;
pub use wap_bypass_network_lists::*;

/// Base path of every endpoint
pub(crate) const BASE_PATH: &str = "/appsec/v1";

/// Application Security API client
///
/// Cheap to clone; clones share the transport.
pub struct Appsec<T> {
    transport: Arc<T>,
    cancel: Option<CancellationToken>,
}

impl<T> Clone for Appsec<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            cancel: self.cancel.clone(),
        }
    }
}

impl<T> Appsec<T> {
    pub fn new(transport: T) -> Self {
        Self::from_arc(Arc::new(transport))
    }

    pub fn from_arc(transport: Arc<T>) -> Self {
        Self {
            transport,
            cancel: None,
        }
    }

    /// A handle whose calls fail with a cancelled transport error once
    /// `token` fires
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            cancel: Some(token),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

/// Percent-encode a string identifier for use as a path segment
pub(crate) fn segment(id: &str) -> Cow<'_, str> {
    urlencoding::encode(id)
}

/// Opaque JSON payloads must carry a document
pub(crate) fn json_payload(value: &serde_json::Value) -> std::result::Result<(), ValidationError> {
    if value.is_null() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}
