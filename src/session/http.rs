//! EdgeGrid-signed HTTP session for the Akamai APIs

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::{Request, Response, Transport, TransportError};
use crate::edgegrid::{Config, Signer};

/// Maximum length of response body to log (to avoid logging sensitive data)
const MAX_LOG_BODY_LENGTH: usize = 200;

/// Sanitize response body for logging
/// Truncates long responses and strips control characters
pub(crate) fn sanitize_for_log(body: &str) -> String {
    let truncated = match body.char_indices().nth(MAX_LOG_BODY_LENGTH) {
        Some((cut, _)) => format!("{}... [truncated, {} bytes total]", &body[..cut], body.len()),
        None => body.to_string(),
    };

    truncated.replace(|c: char| !c.is_ascii_graphic() && c != ' ', "")
}

/// HTTP transport that signs every request with EdgeGrid credentials
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    base_url: Url,
    signer: Signer,
}

impl Session {
    /// Create a session with a default HTTP client
    pub fn new(config: Config) -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(format!("akamai-appsec/{}", crate::VERSION))
            .build()
            .map_err(TransportError::Build)?;

        Self::with_client(config, client)
    }

    /// Create a session around an existing HTTP client
    pub fn with_client(config: Config, client: Client) -> Result<Self, TransportError> {
        let base_url = Url::parse(&config.base_url())?;
        tracing::debug!("EdgeGrid session for {}", base_url);

        Ok(Self {
            client,
            base_url,
            signer: Signer::new(config),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url_for(&self, request: &Request) -> Result<Url, TransportError> {
        let mut url = self.base_url.join(&request.path)?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        self.signer.apply_account_key(&mut url);
        Ok(url)
    }
}

#[async_trait]
impl Transport for Session {
    async fn execute(&self, request: Request) -> Result<Response, TransportError> {
        let url = self.url_for(&request)?;
        tracing::debug!("{} {}", request.method, url);

        let mut builder = self.client.request(request.method, url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            tracing::trace!("Request body: {}", sanitize_for_log(&String::from_utf8_lossy(&body)));
            builder = builder.body(body);
        }

        let mut http_request = builder.build().map_err(TransportError::Build)?;
        self.signer.sign(&mut http_request)?;

        let response = self
            .client
            .execute(http_request)
            .await
            .map_err(TransportError::Send)?;

        let status = response.status();
        let body = response.bytes().await.map_err(TransportError::Body)?;

        if !status.is_success() {
            // Security: Only log sanitized/truncated error body to avoid leaking sensitive data
            tracing::error!(
                "API error: {} - {}",
                status,
                sanitize_for_log(&String::from_utf8_lossy(&body))
            );
        }

        Ok(Response::new(status, body.to_vec()))
    }
}
