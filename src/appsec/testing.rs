//! Mock transport helpers for endpoint tests

use reqwest::{Method, StatusCode};
use serde_json::Value;

use super::Appsec;
use crate::session::{MockTransport, Request, Response};

/// Client whose transport expects exactly one request matching `check`
pub(crate) fn client_with<F>(check: F, status: StatusCode, body: Value) -> Appsec<MockTransport>
where
    F: Fn(&Request) -> bool + Send + 'static,
{
    let mut transport = MockTransport::new();
    transport
        .expect_execute()
        .withf(move |req| check(req))
        .times(1)
        .returning(move |_| {
            let body = match &body {
                Value::Null => Vec::new(),
                other => other.to_string().into_bytes(),
            };
            Ok(Response::new(status, body))
        });
    Appsec::new(transport)
}

/// Client whose transport expects exactly one `method path` request
pub(crate) fn client_expecting(
    method: Method,
    path: &'static str,
    status: StatusCode,
    body: Value,
) -> Appsec<MockTransport> {
    client_with(
        move |req| req.method == method && req.path == path,
        status,
        body,
    )
}

/// Client whose transport must never be called
pub(crate) fn client_never_called() -> Appsec<MockTransport> {
    let mut transport = MockTransport::new();
    transport.expect_execute().times(0);
    Appsec::new(transport)
}

/// JSON body a request carried
pub(crate) fn body_json(req: &Request) -> Value {
    req.body
        .as_deref()
        .and_then(|b| serde_json::from_slice(b).ok())
        .unwrap_or(Value::Null)
}

/// Value of a query parameter
pub(crate) fn query_param<'a>(req: &'a Request, key: &str) -> Option<&'a str> {
    req.query
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}
