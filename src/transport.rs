//! HTTP transport
//!
//! The harness talks to the target store through the [`Transport`] trait so
//! scenarios can run against an in-memory fake in tests. The trait hands back
//! the status code and raw body without interpreting either; status codes
//! carry meaning for the scenarios (201 created, 200 updated/retrieved,
//! 422 rejected with a structured error body), so non-2xx responses are not
//! transport errors.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::common::{Error, Result};

/// Status code and raw body of one HTTP exchange
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Narrow interface to the remote API
///
/// Implementations must be safe for concurrent use: independent scenarios
/// share one transport.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str) -> Result<WireResponse>;
    async fn post(&self, path: &str, body: Option<&Value>) -> Result<WireResponse>;
    async fn put(&self, path: &str, body: Option<&Value>) -> Result<WireResponse>;
}

/// Header carrying the store API token
const TOKEN_HEADER: &str = "X-Spree-Token";

/// reqwest-backed transport
#[derive(Debug)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport for the given base URL.
    ///
    /// This is the only run-fatal construction in the harness: without a
    /// working client no scenario can produce a meaningful verdict.
    pub fn new(base_url: &str, token: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        if let Some(token) = token {
            let value = reqwest::header::HeaderValue::from_str(token)
                .map_err(|e| Error::TransportSetup(format!("invalid API token: {e}")))?;
            headers.insert(TOKEN_HEADER, value);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::TransportSetup(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<WireResponse> {
        let response = request
            .send()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(e.to_string()))?;
        Ok(WireResponse {
            status,
            body: body.to_vec(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str) -> Result<WireResponse> {
        tracing::debug!(path, "GET");
        self.send(self.client.get(self.url(path))).await
    }

    async fn post(&self, path: &str, body: Option<&Value>) -> Result<WireResponse> {
        tracing::debug!(path, "POST");
        let mut request = self.client.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request).await
    }

    async fn put(&self, path: &str, body: Option<&Value>) -> Result<WireResponse> {
        tracing::debug!(path, "PUT");
        let mut request = self.client.put(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let transport =
            HttpTransport::new("http://localhost:3000/", None, Duration::from_secs(1)).unwrap();
        assert_eq!(
            transport.url("/api/orders"),
            "http://localhost:3000/api/orders"
        );
    }

    #[test]
    fn invalid_token_is_a_setup_error() {
        let err = HttpTransport::new(
            "http://localhost:3000",
            Some("bad\ntoken"),
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(matches!(err, Error::TransportSetup(_)));
    }
}
