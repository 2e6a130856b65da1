//! Upstream API client with timeout and error classification.
//!
//! # Responsibilities
//! - Resolve sub-resources against the configured base URL
//! - Attach the bearer token and fixed JSON headers to every call
//! - Bound every call by the configured timeout
//! - Classify the outcome into an `UpstreamResult`
//!
//! # Classification order
//! 1. Transport failure or timeout → `Connection`
//! 2. 401 → `Unauthorized` carrying the upstream `error` field
//! 3. Other 4xx/5xx → `Http`
//! 4. Unparseable body → `InvalidResponse`
//! 5. Otherwise the sanitized JSON

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::StatusCode;
use serde_json::Value;
use std::time::{Duration, Instant};
use thiserror::Error;
use url::Url;

use crate::config::UpstreamConfig;
use crate::http::request::X_REQUEST_ID;
use crate::observability::metrics;
use crate::sanitize::sanitize_json;
use crate::upstream::error::{UpstreamError, UpstreamResult};
use crate::upstream::request::UpstreamRequest;

/// Message used when a 401 carries no usable `error` field.
const UNAUTHORIZED_FALLBACK: &str = "Unauthorized";

/// Errors raised while building the client from configuration.
#[derive(Debug, Error)]
pub enum ClientBuildError {
    #[error("invalid upstream base URL: {0}")]
    BaseUrl(#[from] url::ParseError),

    #[error("upstream base URL cannot have sub-resources appended")]
    NotABase,

    #[error("API token is not a valid header value")]
    Token(#[from] reqwest::header::InvalidHeaderValue),

    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Forwards requests to the upstream API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl UpstreamClient {
    /// Create a client from the upstream section of the configuration.
    pub fn new(config: &UpstreamConfig) -> Result<Self, ClientBuildError> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientBuildError::NotABase);
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_token))?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let timeout = Duration::from_secs(config.timeout_secs);
        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));
        if !config.use_system_proxy {
            builder = builder.no_proxy();
        }
        let http = builder.build()?;

        tracing::info!(
            base_url = %base_url,
            timeout_secs = config.timeout_secs,
            "Upstream client initialized"
        );

        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    /// Perform one upstream call and classify its outcome.
    pub async fn fetch(&self, request: &UpstreamRequest) -> UpstreamResult<Value> {
        let start = Instant::now();
        let result = self.execute(request).await;

        let endpoint = request.segments().next().unwrap_or("root");
        metrics::record_upstream(endpoint, &result, start);

        match &result {
            Ok(_) => tracing::debug!(
                path = %request.path(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Upstream call succeeded"
            ),
            Err(e) => tracing::warn!(
                path = %request.path(),
                kind = %e.kind(),
                error = %e,
                "Upstream call failed"
            ),
        }
        result
    }

    async fn execute(&self, request: &UpstreamRequest) -> UpstreamResult<Value> {
        let url = self.endpoint_url(request);

        tracing::debug!(
            request_id = request.get_request_id().unwrap_or("none"),
            url = %url,
            query = ?request.query(),
            "Forwarding upstream"
        );

        let mut builder = self.http.get(url).query(request.query());
        if let Some(id) = request.get_request_id() {
            builder = builder.header(X_REQUEST_ID, id);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.connection_error(&e))?;

        let status = response.status();
        tracing::debug!(
            status = %status,
            headers = ?response.headers(),
            "Upstream responded"
        );

        if status == StatusCode::UNAUTHORIZED {
            let body = response
                .bytes()
                .await
                .map_err(|e| self.connection_error(&e))?;
            return Err(UpstreamError::Unauthorized(unauthorized_message(&body)));
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(UpstreamError::http(status, response.url().as_str()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.connection_error(&e))?;

        sanitize_json(&body).map_err(|e| UpstreamError::InvalidResponse(e.to_string()))
    }

    /// Resolve the request's sub-path against the base URL.
    fn endpoint_url(&self, request: &UpstreamRequest) -> Url {
        let mut url = self.base_url.clone();
        // Checked in `new`: the base URL always accepts segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(request.segments());
        }
        url
    }

    fn connection_error(&self, error: &reqwest::Error) -> UpstreamError {
        if error.is_timeout() {
            return UpstreamError::Connection(format!(
                "request timed out after {}s",
                self.timeout.as_secs()
            ));
        }
        UpstreamError::Connection(error_chain(error))
    }
}

impl std::fmt::Debug for UpstreamClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamClient")
            .field("base_url", &self.base_url.as_str())
            .field("timeout_secs", &self.timeout.as_secs())
            .finish()
    }
}

/// Extract the upstream `error` field from a 401 body.
pub fn unauthorized_message(body: &[u8]) -> String {
    let parsed: Option<Value> = serde_json::from_slice(body).ok();
    match parsed.as_ref().and_then(|v| v.get("error")) {
        Some(Value::String(message)) => message.clone(),
        Some(Value::Null) | None => UNAUTHORIZED_FALLBACK.to_string(),
        Some(other) => other.to_string(),
    }
}

/// Render an error and its sources as one line.
fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
