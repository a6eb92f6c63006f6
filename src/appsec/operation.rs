//! Generic resource operation
//!
//! Every endpoint is one [`Call`]: validate the request, encode the payload,
//! dispatch once, check the status, decode the body.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use super::errors::{ApiError, Error, Result};
use super::Appsec;
use crate::session::{Request, Response, Transport, TransportError};

/// Accepted statuses for reads
pub(crate) const OK: &[StatusCode] = &[StatusCode::OK];

/// Accepted statuses for creates and updates
pub(crate) const OK_OR_CREATED: &[StatusCode] = &[StatusCode::OK, StatusCode::CREATED];

/// Accepted statuses for updates that may answer without a body
pub(crate) const OK_CREATED_OR_NO_CONTENT: &[StatusCode] =
    &[StatusCode::OK, StatusCode::CREATED, StatusCode::NO_CONTENT];

/// Accepted statuses for deletes
pub(crate) const OK_OR_NO_CONTENT: &[StatusCode] = &[StatusCode::OK, StatusCode::NO_CONTENT];

/// One API operation, ready to execute
pub(crate) struct Call<'a> {
    operation: &'static str,
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    validator: Option<&'a (dyn Validate + Sync)>,
    payload: Option<serde_json::Result<Vec<u8>>>,
    accepted: &'static [StatusCode],
}

impl<'a> Call<'a> {
    fn new(operation: &'static str, method: Method, path: String, accepted: &'static [StatusCode]) -> Self {
        Self {
            operation,
            method,
            path,
            query: Vec::new(),
            validator: None,
            payload: None,
            accepted,
        }
    }

    pub fn get(operation: &'static str, path: String) -> Self {
        Self::new(operation, Method::GET, path, OK)
    }

    pub fn post(operation: &'static str, path: String) -> Self {
        Self::new(operation, Method::POST, path, OK_OR_CREATED)
    }

    pub fn put(operation: &'static str, path: String) -> Self {
        Self::new(operation, Method::PUT, path, OK_OR_CREATED)
    }

    pub fn delete(operation: &'static str, path: String) -> Self {
        Self::new(operation, Method::DELETE, path, OK_OR_NO_CONTENT)
    }

    pub fn query(mut self, key: &str, value: impl ToString) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// Validate this value before anything is sent
    pub fn validate(mut self, params: &'a (dyn Validate + Sync)) -> Self {
        self.validator = Some(params);
        self
    }

    /// Send `body` as the JSON payload
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Self {
        self.payload = Some(serde_json::to_vec(body));
        self
    }

    pub fn accept(mut self, accepted: &'static [StatusCode]) -> Self {
        self.accepted = accepted;
        self
    }
}

impl<T: Transport> Appsec<T> {
    /// Run a call and decode its response body into `R`
    pub(crate) async fn execute<R: DeserializeOwned>(&self, call: Call<'_>) -> Result<R> {
        let Call {
            operation,
            method,
            path,
            query,
            validator,
            payload,
            accepted,
        } = call;

        tracing::debug!(operation, "{} {}", method, path);

        if let Some(params) = validator {
            params
                .validate()
                .map_err(|source| Error::Validation { operation, source })?;
        }

        let mut request = Request::new(method, path);
        request.query = query;
        if let Some(payload) = payload {
            let body = payload.map_err(|source| Error::Encode { operation, source })?;
            request = request.json(body);
        }

        let response = self
            .dispatch(request)
            .await
            .map_err(|source| Error::Transport { operation, source })?;

        if !accepted.contains(&response.status) {
            tracing::debug!(operation, "Unexpected status {}", response.status);
            return Err(ApiError::from_response(&response).into());
        }

        decode(operation, &response.body)
    }

    async fn dispatch(&self, request: Request) -> std::result::Result<Response, TransportError> {
        match &self.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => Err(TransportError::Cancelled),
                    response = self.transport.execute(request) => response,
                }
            }
            None => self.transport.execute(request).await,
        }
    }
}

/// Decode a response body; an empty body reads as JSON `null`
pub(crate) fn decode<R: DeserializeOwned>(operation: &'static str, body: &[u8]) -> Result<R> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        body
    };

    serde_json::from_slice(body).map_err(|source| Error::Decode { operation, source })
}
