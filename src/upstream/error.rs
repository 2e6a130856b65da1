//! Upstream failure taxonomy.

use thiserror::Error;

/// Coarse classification of a failed upstream call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    ConnectionError,
    Unauthorized,
    HttpError,
    InvalidResponse,
    MissingParameter,
    InvalidParameter,
}

impl FailureKind {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::ConnectionError => "connection_error",
            FailureKind::Unauthorized => "unauthorized",
            FailureKind::HttpError => "http_error",
            FailureKind::InvalidResponse => "invalid_response",
            FailureKind::MissingParameter => "missing_parameter",
            FailureKind::InvalidParameter => "invalid_parameter",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while forwarding a request upstream.
///
/// `Display` renders the message shown to the browser in the `error` field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The call could not be completed (connect, DNS, timeout, body read).
    #[error("Connection Error: {0}")]
    Connection(String),

    /// Upstream answered 401; carries its `error` field or "Unauthorized".
    #[error("{0}")]
    Unauthorized(String),

    /// Upstream answered with another 4xx or 5xx status.
    #[error("API Error: {status} {class} Error: {reason} for url: {url}")]
    Http {
        status: u16,
        class: &'static str,
        reason: String,
        url: String,
    },

    /// Upstream answered 2xx but the body is not JSON.
    #[error("Invalid Response: {0}")]
    InvalidResponse(String),

    /// A required query parameter was absent or empty.
    #[error("{label} is required")]
    MissingParameter { label: &'static str },

    /// A caller-supplied value cannot be forwarded.
    #[error("{0}")]
    InvalidParameter(String),
}

impl UpstreamError {
    pub fn kind(&self) -> FailureKind {
        match self {
            UpstreamError::Connection(_) => FailureKind::ConnectionError,
            UpstreamError::Unauthorized(_) => FailureKind::Unauthorized,
            UpstreamError::Http { .. } => FailureKind::HttpError,
            UpstreamError::InvalidResponse(_) => FailureKind::InvalidResponse,
            UpstreamError::MissingParameter { .. } => FailureKind::MissingParameter,
            UpstreamError::InvalidParameter(_) => FailureKind::InvalidParameter,
        }
    }

    /// Build an `Http` error from a status code and the URL that produced it.
    pub fn http(status: reqwest::StatusCode, url: &str) -> Self {
        let class = if status.is_server_error() { "Server" } else { "Client" };
        UpstreamError::Http {
            status: status.as_u16(),
            class,
            reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            url: url.to_string(),
        }
    }
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;
