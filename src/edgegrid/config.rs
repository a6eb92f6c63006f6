//! EdgeGrid credentials
//!
//! Loads the API client credentials from an `.edgerc` INI file or from
//! `AKAMAI_*` environment variables.

use std::fmt;
use std::path::{Path, PathBuf};

use ini::{Ini, ParseOption};
use thiserror::Error;

/// Default credentials file
pub const DEFAULT_CONFIG_FILE: &str = "~/.edgerc";

/// Default `.edgerc` section
pub const DEFAULT_SECTION: &str = "default";

/// Max request body size included in the content hash
pub const MAX_BODY_SIZE: usize = 131072;

const REQUIRED_OPTIONS: &[&str] = &["host", "client_token", "client_secret", "access_token"];

/// Errors raised while loading credentials
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not load config file {path}: {source}")]
    LoadingFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse edgerc: {0}")]
    Parse(#[from] ini::ParseError),

    #[error("section {0:?} does not exist in edgerc")]
    SectionDoesNotExist(String),

    #[error("required option {0:?} is missing from edgerc")]
    RequiredOptionEdgerc(String),

    #[error("required option {0:?} is missing from env")]
    RequiredOptionEnv(String),

    #[error("invalid value {value:?} for option {option:?}")]
    InvalidValue { option: String, value: String },

    #[error("unable to resolve home directory for {0}")]
    HomeDir(String),

    #[error("unable to load config from environment or .edgerc file: {0}")]
    Unavailable(Box<ConfigError>),
}

/// API client credentials
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub client_token: String,
    pub client_secret: String,
    pub access_token: String,
    /// Switches every request to another account (`accountSwitchKey`)
    pub account_key: Option<String>,
    pub headers_to_sign: Vec<String>,
    pub max_body: usize,
}

// Security: never print secrets into logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("client_token", &self.client_token)
            .field("client_secret", &"***")
            .field("access_token", &"***")
            .field("account_key", &self.account_key)
            .field("headers_to_sign", &self.headers_to_sign)
            .field("max_body", &self.max_body)
            .finish()
    }
}

impl Config {
    /// Load credentials, trying the environment first when `env` is set and
    /// falling back to the `.edgerc` file
    pub fn load(file: Option<&Path>, section: Option<&str>, env: bool) -> Result<Self, ConfigError> {
        let section = section.unwrap_or(DEFAULT_SECTION);

        if env {
            match Self::from_env(section) {
                Ok(config) => return Ok(config),
                Err(e) => tracing::debug!("Environment credentials unavailable: {}", e),
            }
        }

        let file = match file {
            Some(path) => path.to_path_buf(),
            None => expand_home(DEFAULT_CONFIG_FILE)?,
        };

        Self::from_file(&file, section).map_err(|e| ConfigError::Unavailable(Box::new(e)))
    }

    /// Read a section of an `.edgerc` file
    pub fn from_file(path: &Path, section: &str) -> Result<Self, ConfigError> {
        let path = expand_home(&path.to_string_lossy())?;
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::LoadingFile {
            path: path.clone(),
            source,
        })?;

        tracing::debug!("Loading EdgeGrid section [{}] from {:?}", section, path);
        Self::from_edgerc_str(&content, section)
    }

    /// Parse a section out of `.edgerc` content
    pub fn from_edgerc_str(content: &str, section: &str) -> Result<Self, ConfigError> {
        // Quotes are handled by `unquote`, escapes are left alone (secrets are base64)
        let ini = Ini::load_from_str_opt(
            content,
            ParseOption {
                enabled_quote: false,
                enabled_escape: false,
                ..Default::default()
            },
        )?;
        let values = ini
            .section(Some(section))
            .ok_or_else(|| ConfigError::SectionDoesNotExist(section.to_string()))?;

        for opt in REQUIRED_OPTIONS {
            if !values.contains_key(opt) {
                return Err(ConfigError::RequiredOptionEdgerc((*opt).to_string()));
            }
        }

        let value = |key: &str| values.get(key).map(unquote);
        let get = |key: &str| value(key).unwrap_or_default().to_string();

        let max_body = match value("max_body") {
            Some(raw) => parse_max_body("max_body", raw)?,
            None => MAX_BODY_SIZE,
        };

        Ok(Self {
            host: get("host"),
            client_token: get("client_token"),
            client_secret: get("client_secret"),
            access_token: get("access_token"),
            account_key: value("account_key")
                .filter(|v| !v.is_empty())
                .map(str::to_string),
            headers_to_sign: value("headers_to_sign").map(split_list).unwrap_or_default(),
            max_body,
        })
    }

    /// Read credentials from the process environment
    ///
    /// The default section uses `AKAMAI_HOST`, `AKAMAI_CLIENT_TOKEN`, ...;
    /// any other section `ccu` uses `AKAMAI_CCU_HOST`, and so on.
    pub fn from_env(section: &str) -> Result<Self, ConfigError> {
        Self::from_env_with(section, |key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary variable lookup
    pub fn from_env_with<F>(section: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = env_prefix(section);
        let required = |opt: &str| {
            let key = format!("{}_{}", prefix, opt);
            lookup(&key).ok_or(ConfigError::RequiredOptionEnv(key))
        };

        let host = required("HOST")?;
        let client_token = required("CLIENT_TOKEN")?;
        let client_secret = required("CLIENT_SECRET")?;
        let access_token = required("ACCESS_TOKEN")?;

        // Unparseable or non-positive values fall back to the default
        let max_body = lookup(&format!("{}_MAX_BODY", prefix))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|v| *v > 0)
            .unwrap_or(MAX_BODY_SIZE);

        Ok(Self {
            host,
            client_token,
            client_secret,
            access_token,
            account_key: lookup(&format!("{}_ACCOUNT_KEY", prefix)).filter(|v| !v.is_empty()),
            headers_to_sign: Vec::new(),
            max_body,
        })
    }

    /// Base URL for requests; a bare host is served over https
    pub fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{}", host)
        }
    }
}

fn env_prefix(section: &str) -> String {
    if section.eq_ignore_ascii_case(DEFAULT_SECTION) {
        "AKAMAI".to_string()
    } else {
        format!("AKAMAI_{}", section.to_uppercase().replace('-', "_"))
    }
}

fn parse_max_body(option: &str, raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Ok(MAX_BODY_SIZE),
        Ok(v) => Ok(v),
        Err(_) => Err(ConfigError::InvalidValue {
            option: option.to_string(),
            value: raw.to_string(),
        }),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Expand a leading `~` to the user's home directory
fn expand_home(path: &str) -> Result<PathBuf, ConfigError> {
    match path.strip_prefix('~') {
        Some(rest) => {
            let home = dirs::home_dir().ok_or_else(|| ConfigError::HomeDir(path.to_string()))?;
            Ok(home.join(rest.trim_start_matches(['/', '\\'])))
        }
        None => Ok(PathBuf::from(path)),
    }
}

/// Strip one pair of surrounding double quotes, if balanced
fn unquote(value: &str) -> &str {
    let value = value.trim();
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
