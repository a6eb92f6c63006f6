//! EdgeGrid authentication
//!
//! Akamai APIs authenticate every request with the `EG1-HMAC-SHA256` scheme.
//!
//! - [`config`] - API client credentials from `.edgerc` or the environment
//! - [`signer`] - Builds the `Authorization` header for a request

pub mod config;
pub mod signer;

pub use config::{Config, ConfigError, DEFAULT_CONFIG_FILE, DEFAULT_SECTION, MAX_BODY_SIZE};
pub use signer::Signer;
