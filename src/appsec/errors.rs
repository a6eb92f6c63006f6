//! Errors returned by the Application Security client

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use validator::ValidationErrors;

use crate::session::{Response, TransportError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Title used when an error body is not a problem-details document
pub const UNPARSEABLE_ERROR_TITLE: &str =
    "Failed to unmarshal error body. Application Security API failed. Check details for more information.";

#[derive(Debug, Error)]
pub enum Error {
    /// Request parameters failed validation; nothing was sent
    #[error("{operation}: struct validation: {source}")]
    Validation {
        operation: &'static str,
        #[source]
        source: ValidationErrors,
    },

    #[error("{operation}: failed to encode request body: {source}")]
    Encode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{operation}: request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: TransportError,
    },

    /// The API answered with a status outside the operation's accepted set
    #[error(transparent)]
    Api(Box<ApiError>),

    #[error("{operation}: failed to decode response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// The API error, if the call reached the API and was rejected
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(e) => Some(e),
            _ => None,
        }
    }

    /// Field-level validation failures, if the request was invalid
    pub fn validation(&self) -> Option<&ValidationErrors> {
        match self {
            Error::Validation { source, .. } => Some(source),
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Error::Transport {
                source: TransportError::Cancelled,
                ..
            }
        )
    }
}

impl From<ApiError> for Error {
    fn from(e: ApiError) -> Self {
        Error::Api(Box::new(e))
    }
}

/// Problem-details error body returned by the API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Error)]
#[error("API error {status_code}: {title}: {detail}")]
pub struct ApiError {
    #[serde(rename = "type", default)]
    pub error_type: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub detail: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub instance: String,

    #[serde(rename = "status", default)]
    pub status_code: u16,

    /// Any further problem-details members (`fieldErrors`, `behaviorName`, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ApiError {
    /// Build an error from a rejected response
    ///
    /// `status_code` is always the status actually received. A body that is not
    /// a JSON object ends up verbatim in `detail`.
    pub fn from_response(response: &Response) -> Self {
        let status = response.status.as_u16();

        match serde_json::from_slice::<ApiError>(&response.body) {
            Ok(mut e) => {
                e.status_code = status;
                e
            }
            Err(err) => {
                tracing::error!("Could not parse error body ({}): {}", status, err);
                ApiError {
                    title: UNPARSEABLE_ERROR_TITLE.to_string(),
                    detail: unescape_content(&response.text()),
                    status_code: status,
                    ..Default::default()
                }
            }
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.status_code).ok()
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code == StatusCode::NOT_FOUND.as_u16()
    }
}

/// Undo JSON string escaping left in raw error bodies
fn unescape_content(content: &str) -> String {
    content
        .replace("\\\\", "\\")
        .replace("\\\"", "\"")
        .replace("\\n", "\n")
        .replace("\\t", "\t")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_problem_details() {
        let response = Response::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{
                "type": "internal_error",
                "title": "Internal Server Error",
                "detail": "Error creating CustomDeny",
                "status": 500
            }"#,
        );

        let e = ApiError::from_response(&response);
        assert_eq!(e.error_type, "internal_error");
        assert_eq!(e.title, "Internal Server Error");
        assert_eq!(e.detail, "Error creating CustomDeny");
        assert_eq!(e.status_code, 500);
        assert!(e.extra.is_empty());
    }

    #[test]
    fn test_from_response_status_comes_from_http() {
        let response = Response::new(StatusCode::FORBIDDEN, r#"{"title":"Forbidden","status":500}"#);
        assert_eq!(ApiError::from_response(&response).status_code, 403);
    }

    #[test]
    fn test_from_response_keeps_extra_fields() {
        let response = Response::new(
            StatusCode::BAD_REQUEST,
            r#"{"type":"/appsec/error-types/INVALID-INPUT-ERROR","title":"Invalid Input Error","detail":"bad","fieldErrors":[{"name":"ruleId"}]}"#,
        );

        let e = ApiError::from_response(&response);
        assert!(e.extra.contains_key("fieldErrors"));
    }

    #[test]
    fn test_from_response_non_json_body() {
        let response = Response::new(StatusCode::BAD_GATEWAY, "<html>bad \\\"gateway\\\"</html>");

        let e = ApiError::from_response(&response);
        assert_eq!(e.title, UNPARSEABLE_ERROR_TITLE);
        assert_eq!(e.detail, "<html>bad \"gateway\"</html>");
        assert_eq!(e.status_code, 502);
    }

    #[test]
    fn test_from_response_empty_body() {
        let e = ApiError::from_response(&Response::new(StatusCode::NOT_FOUND, ""));
        assert_eq!(e.title, UNPARSEABLE_ERROR_TITLE);
        assert!(e.is_not_found());
    }

    #[test]
    fn test_error_accessors() {
        let err: Error = ApiError {
            status_code: 404,
            ..Default::default()
        }
        .into();
        assert_eq!(err.api().and_then(|e| e.status()), Some(StatusCode::NOT_FOUND));
        assert!(err.validation().is_none());
        assert!(!err.is_cancelled());

        let err = Error::Transport {
            operation: "GetConfigurations",
            source: TransportError::Cancelled,
        };
        assert!(err.is_cancelled());
        assert_eq!(err.to_string(), "GetConfigurations: request failed: request cancelled");
    }
}
