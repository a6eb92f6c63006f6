//! Transport boundary
//!
//! The API client never talks HTTP itself. It hands a [`Request`] to a
//! [`Transport`] and gets back a [`Response`] whose body has already been
//! read in full.

pub mod http;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use thiserror::Error;

use crate::edgegrid::signer::SignError;

pub use http::Session;

/// One outgoing API request; `path` is relative to the API host
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach an encoded JSON body
    pub fn json(mut self, body: Vec<u8>) -> Self {
        self.headers
            .push(("Content-Type".to_string(), "application/json".to_string()));
        self.body = Some(body);
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A fully-read API response
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Response with a JSON-encoded body
    pub fn json(status: StatusCode, body: &serde_json::Value) -> Self {
        Self::new(status, body.to_string())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Failures below the API level
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to build request: {0}")]
    Build(#[source] reqwest::Error),

    #[error("failed to sign request: {0}")]
    Sign(#[from] SignError),

    #[error("failed to send request: {0}")]
    Send(#[source] reqwest::Error),

    #[error("failed to read response body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("request cancelled")]
    Cancelled,
}

/// Executes API requests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: Request) -> Result<Response, TransportError>;
}
