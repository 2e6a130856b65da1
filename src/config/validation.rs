//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check the upstream base URL can have sub-resources appended
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::ProxyConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("upstream.base_url: {0}")]
    InvalidBaseUrl(String),

    #[error("upstream.api_token must not be empty")]
    EmptyToken,

    #[error("upstream.api_token contains characters not allowed in a header")]
    InvalidToken,

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("{0} must not be empty")]
    EmptyDefault(&'static str),
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "listener.bind_address",
            value: config.listener.bind_address.clone(),
        });
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidAddress {
            field: "observability.metrics_address",
            value: config.observability.metrics_address.clone(),
        });
    }

    match Url::parse(&config.upstream.base_url) {
        Ok(url) if !matches!(url.scheme(), "http" | "https") => {
            errors.push(ValidationError::InvalidBaseUrl(format!(
                "unsupported scheme '{}'",
                url.scheme()
            )));
        }
        Ok(url) if url.cannot_be_a_base() => {
            errors.push(ValidationError::InvalidBaseUrl(
                "URL cannot be used as a base".to_string(),
            ));
        }
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::InvalidBaseUrl(e.to_string())),
    }

    let token = &config.upstream.api_token;
    if token.trim().is_empty() {
        errors.push(ValidationError::EmptyToken);
    } else if !token.bytes().all(|b| b.is_ascii_graphic() || b == b' ') {
        errors.push(ValidationError::InvalidToken);
    }

    if config.upstream.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream.timeout_secs"));
    }
    if config.upstream.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream.connect_timeout_secs"));
    }

    if config.catalog.default_suburb.trim().is_empty() {
        errors.push(ValidationError::EmptyDefault("catalog.default_suburb"));
    }
    if config.catalog.default_property_type.trim().is_empty() {
        errors.push(ValidationError::EmptyDefault("catalog.default_property_type"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
