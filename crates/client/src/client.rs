//! Bearer-authenticated API client implementing [`VideoHost`].

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::debug;
use vidpush_upload::{ApiResponse, UploadError, VideoHost};

const DEFAULT_BASE_URL: &str = "https://api.vimeo.com";

/// API version pinned via the Accept header.
const ACCEPT_VERSION: &str = "application/vnd.vimeo.*+json;version=3.4";

/// Errors from constructing an [`ApiClient`].
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid access token")]
    InvalidToken,

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Video host API client.
///
/// Service-relative `POST`s go to the base URL; chunk `PATCH`es go to the
/// absolute upload link issued in the ticket. Every response is surfaced
/// with its status, headers and body — expected-status checks live in the
/// upload logic, not here.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl ApiClient {
    /// Creates a client with the given access token.
    pub fn new(access_token: &str) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {access_token}"))
                .map_err(|_| ClientError::InvalidToken)?,
        );
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_VERSION));

        let http = reqwest::Client::builder().default_headers(headers).build()?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        })
    }

    /// Sets a custom base URL (self-hosted instances, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Sets a per-request timeout.
    ///
    /// A timed-out request surfaces as a transport error and fails the
    /// upload call; there is no offset persistence, so the caller recovers
    /// by restarting the whole upload.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn execute(&self, req: reqwest::RequestBuilder) -> Result<ApiResponse, UploadError> {
        let req = match self.timeout {
            Some(t) => req.timeout(t),
            None => req,
        };
        let resp = req
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;
        let status = resp.status().as_u16();
        let headers = flatten_headers(resp.headers());
        let body = resp
            .bytes()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?
            .to_vec();
        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }
}

impl VideoHost for ApiClient {
    fn post(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<ApiResponse, UploadError>> + Send + '_>> {
        let url = format!("{}{}", self.base_url, path);
        let req = self.http.post(&url).json(body);
        Box::pin(async move {
            debug!(%url, "POST");
            self.execute(req).await
        })
    }

    fn patch(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: Vec<u8>,
    ) -> Pin<Box<dyn Future<Output = Result<ApiResponse, UploadError>> + Send + '_>> {
        let mut req = self.http.patch(url).body(body);
        for (name, value) in headers {
            req = req.header(name.as_str(), value.as_str());
        }
        let url = url.to_string();
        Box::pin(async move {
            debug!(%url, "PATCH");
            self.execute(req).await
        })
    }
}

/// Collects response headers into a plain map keyed by lowercased name.
fn flatten_headers(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|v| (name.as_str().to_string(), v.to_string()))
        })
        .collect()
}
