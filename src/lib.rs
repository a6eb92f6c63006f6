//! Akamai Application Security API client
//!
//! Strongly typed requests and responses for the `/appsec/v1` REST surface,
//! one async method per endpoint, executed through an injected [`Transport`].
//!
//! # Module Structure
//!
//! - [`appsec`] - The [`Appsec`] client, its error type and every resource family
//! - [`session`] - The transport boundary and the EdgeGrid-signed HTTP [`Session`]
//! - [`edgegrid`] - `.edgerc` / environment credentials and request signing
//!
//! # Example
//!
//! ```ignore
//! use akamai_appsec::{edgegrid, Appsec, Session};
//! use akamai_appsec::appsec::GetSecurityPoliciesRequest;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let config = edgegrid::Config::load(None, None, true)?;
//!     let client = Appsec::new(Session::new(config)?);
//!     let policies = client
//!         .get_security_policies(&GetSecurityPoliciesRequest {
//!             config_id: 43253,
//!             version: 15,
//!             ..Default::default()
//!         })
//!         .await?;
//!     println!("{} policies", policies.policies.len());
//!     Ok(())
//! }
//! ```

pub mod appsec;
pub mod edgegrid;
pub mod session;

pub use appsec::{ApiError, Appsec, Error};
pub use session::{Session, Transport};

/// Version injected at compile time via APPSEC_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("APPSEC_VERSION") {
    Some(v) => v,
    None => "dev",
};
