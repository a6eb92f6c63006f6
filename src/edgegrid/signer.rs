//! EG1-HMAC-SHA256 request signing

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Method;
use sha2::{Digest, Sha256};
use thiserror::Error;
use url::Url;

use super::Config;

type HmacSha256 = Hmac<Sha256>;

/// Query parameter used to act on behalf of another account
pub const ACCOUNT_SWITCH_KEY: &str = "accountSwitchKey";

#[derive(Debug, Error)]
pub enum SignError {
    #[error("invalid signing key: {0}")]
    Key(String),

    #[error("invalid authorization header: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}

/// Signs requests with a set of EdgeGrid credentials
#[derive(Debug, Clone)]
pub struct Signer {
    config: Config,
}

impl Signer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Append `accountSwitchKey` when the credentials carry an account key
    pub fn apply_account_key(&self, url: &mut Url) {
        if let Some(key) = &self.config.account_key {
            url.query_pairs_mut().append_pair(ACCOUNT_SWITCH_KEY, key);
        }
    }

    /// Set the `Authorization` header on a built request
    pub fn sign(&self, request: &mut reqwest::Request) -> Result<(), SignError> {
        let body = request.body().and_then(|b| b.as_bytes()).map(<[u8]>::to_vec);
        let header = self.authorization(
            request.method(),
            request.url(),
            request.headers(),
            body.as_deref(),
            &timestamp(Utc::now()),
            &nonce(),
        )?;

        request
            .headers_mut()
            .insert(AUTHORIZATION, HeaderValue::from_str(&header)?);
        Ok(())
    }

    /// Compute the `Authorization` header value for a fixed timestamp and nonce
    pub fn authorization(
        &self,
        method: &Method,
        url: &Url,
        headers: &HeaderMap,
        body: Option<&[u8]>,
        timestamp: &str,
        nonce: &str,
    ) -> Result<String, SignError> {
        let auth_header = format!(
            "EG1-HMAC-SHA256 client_token={};access_token={};timestamp={};nonce={};",
            self.config.client_token, self.config.access_token, timestamp, nonce
        );

        let data = [
            method.as_str().to_string(),
            url.scheme().to_string(),
            host_with_port(url),
            path_and_query(url),
            self.canonicalize_headers(headers),
            self.content_hash(method, body),
            auth_header.clone(),
        ]
        .join("\t");

        tracing::trace!("Signing {} {}", method, url);

        let signing_key = hmac_base64(self.config.client_secret.as_bytes(), timestamp.as_bytes())?;
        let signature = hmac_base64(signing_key.as_bytes(), data.as_bytes())?;

        Ok(format!("{}signature={}", auth_header, signature))
    }

    fn canonicalize_headers(&self, headers: &HeaderMap) -> String {
        let mut names: Vec<&str> = headers.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names.dedup();

        names
            .into_iter()
            .filter(|name| {
                self.config
                    .headers_to_sign
                    .iter()
                    .any(|sign| sign.eq_ignore_ascii_case(name))
            })
            .filter_map(|name| {
                let value = headers.get(name)?.to_str().ok()?;
                Some(format!("{}:{}", name.to_lowercase(), minify(value.trim()).to_lowercase()))
            })
            .collect::<Vec<_>>()
            .join("\t")
    }

    /// Base64 SHA-256 of a POST body, truncated at `max_body`; empty otherwise
    fn content_hash(&self, method: &Method, body: Option<&[u8]>) -> String {
        match body {
            Some(body) if *method == Method::POST && !body.is_empty() => {
                let limit = body.len().min(self.config.max_body);
                if limit < body.len() {
                    tracing::debug!(
                        "Data length {} is larger than maximum {}, truncating for the hash",
                        body.len(),
                        self.config.max_body
                    );
                }
                STANDARD.encode(Sha256::digest(&body[..limit]))
            }
            _ => String::new(),
        }
    }
}

/// EdgeGrid timestamp, `yyyyMMddTHH:mm:ss+0000` in UTC
pub fn timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y%m%dT%H:%M:%S+0000").to_string()
}

/// Random nonce for one request
pub fn nonce() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn hmac_base64(key: &[u8], message: &[u8]) -> Result<String, SignError> {
    let mut mac = HmacSha256::new_from_slice(key).map_err(|e| SignError::Key(e.to_string()))?;
    mac.update(message);
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

fn host_with_port(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    }
}

fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

/// Collapse runs of whitespace into a single space
fn minify(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "akaa-baseurl-xxxxxxxxxxx-xxxxxxxxxxxxx.luna.akamaiapis.net";
    const TIMESTAMP: &str = "20140321T19:34:21+0000";
    const NONCE: &str = "nonce-xx-xxxx-xxxx-xxxx-xxxxxxxxxxxx";

    fn signer() -> Signer {
        Signer::new(Config {
            host: HOST.into(),
            client_token: "akab-client-token-xxx-xxxxxxxxxxxxxxxx".into(),
            client_secret: "SOMESECRET/SOMESECRET+SOMESECRET=".into(),
            access_token: "akab-access-token-xxx-xxxxxxxxxxxxxxxx".into(),
            max_body: 4,
            ..Default::default()
        })
    }

    fn url(path: &str) -> Url {
        Url::parse(&format!("https://{}{}", HOST, path)).unwrap()
    }

    fn signature(header: &str) -> &str {
        header.rsplit("signature=").next().unwrap()
    }

    #[test]
    fn test_timestamp_format() {
        let now = DateTime::parse_from_rfc3339("2014-03-21T19:34:21Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(timestamp(now), TIMESTAMP);
    }

    #[test]
    fn test_nonce_is_unique() {
        assert_ne!(nonce(), nonce());
    }

    #[test]
    fn test_authorization_get() {
        let header = signer()
            .authorization(
                &Method::GET,
                &url("/appsec/v1/configs"),
                &HeaderMap::new(),
                None,
                TIMESTAMP,
                NONCE,
            )
            .unwrap();

        assert_eq!(
            header,
            "EG1-HMAC-SHA256 client_token=akab-client-token-xxx-xxxxxxxxxxxxxxxx;\
             access_token=akab-access-token-xxx-xxxxxxxxxxxxxxxx;\
             timestamp=20140321T19:34:21+0000;\
             nonce=nonce-xx-xxxx-xxxx-xxxx-xxxxxxxxxxxx;\
             signature=Xj++dEw2jmD1T5ywwcjJbaQky7qI4qorSb0a0E2RDm4="
        );
    }

    #[test]
    fn test_authorization_includes_query() {
        let header = signer()
            .authorization(
                &Method::GET,
                &url("/appsec/v1/configs/43253/versions?page=-1&detail=true"),
                &HeaderMap::new(),
                None,
                TIMESTAMP,
                NONCE,
            )
            .unwrap();

        assert_eq!(signature(&header), "xAS0Jps5fU2TaFk82dPLo1KzlXj4+AdQnsV7Yni+Exo=");
    }

    #[test]
    fn test_post_body_is_hashed_and_truncated() {
        let signer = signer();
        let sign = |body: &[u8]| {
            signer
                .authorization(
                    &Method::POST,
                    &url("/appsec/v1/configs"),
                    &HeaderMap::new(),
                    Some(body),
                    TIMESTAMP,
                    NONCE,
                )
                .unwrap()
        };

        // max_body is 4, so only `{"na` is hashed
        let full = sign(br#"{"name":"test"}"#);
        assert_eq!(signature(&full), "rIHKuDmJM5MQF7V5C09c5jYHK9UVoEHiDkwxuQDQ+Ac=");
        assert_eq!(full, sign(br#"{"na"#));
    }

    #[test]
    fn test_post_body_hash_without_truncation() {
        let mut signer = signer();
        signer.config.max_body = crate::edgegrid::MAX_BODY_SIZE;
        let header = signer
            .authorization(
                &Method::POST,
                &url("/appsec/v1/configs"),
                &HeaderMap::new(),
                Some(br#"{"name":"test"}"#),
                TIMESTAMP,
                NONCE,
            )
            .unwrap();

        assert_eq!(signature(&header), "NL8ApCVLL6PM0uMxdkcUjdjTjaUnUCWzeGrB5g+B9DA=");
    }

    #[test]
    fn test_put_body_is_not_hashed() {
        let signer = signer();
        let target = url("/appsec/v1/configs/1");
        let with_body = signer
            .authorization(&Method::PUT, &target, &HeaderMap::new(), Some(b"{}"), TIMESTAMP, NONCE)
            .unwrap();
        let without_body = signer
            .authorization(&Method::PUT, &target, &HeaderMap::new(), None, TIMESTAMP, NONCE)
            .unwrap();

        assert_eq!(with_body, without_body);
    }

    #[test]
    fn test_headers_to_sign_are_canonicalized() {
        let mut signer = signer();
        signer.config.headers_to_sign = vec!["X-Test1".into()];

        let mut headers = HeaderMap::new();
        headers.insert("x-test1", HeaderValue::from_static("  Hello    World "));
        headers.insert("x-unsigned", HeaderValue::from_static("ignored"));

        let header = signer
            .authorization(
                &Method::GET,
                &url("/appsec/v1/configs"),
                &headers,
                None,
                TIMESTAMP,
                NONCE,
            )
            .unwrap();

        assert_eq!(signature(&header), "7rcAaRwpk7xQ6h/kbZz//wWf77qasCrILeQ/ju+NVL4=");
    }

    #[test]
    fn test_apply_account_key() {
        let mut signer = signer();
        let mut target = url("/appsec/v1/configs");

        signer.apply_account_key(&mut target);
        assert_eq!(target.query(), None);

        signer.config.account_key = Some("1-ABCDE".into());
        signer.apply_account_key(&mut target);
        assert_eq!(target.query(), Some("accountSwitchKey=1-ABCDE"));
    }

    #[test]
    fn test_sign_sets_authorization_header() {
        let client = reqwest::Client::new();
        let mut request = client.get(url("/appsec/v1/configs")).build().unwrap();

        signer().sign(&mut request).unwrap();

        let value = request.headers().get(AUTHORIZATION).unwrap().to_str().unwrap();
        assert!(value.starts_with("EG1-HMAC-SHA256 client_token=akab-client-token"));
        assert!(value.contains(";signature="));
    }
}
