//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the suburb proxy.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream API connection settings.
    pub upstream: UpstreamConfig,

    /// Suburbs and property types offered to the browser.
    pub catalog: CatalogConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:5000".to_string(),
        }
    }
}

/// Upstream API configuration.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL every sub-resource is resolved against.
    pub base_url: String,

    /// Static bearer token sent in the `Authorization` header.
    pub api_token: String,

    /// Total time allowed for one upstream call, in seconds.
    pub timeout_secs: u64,

    /// Connection establishment timeout in seconds.
    pub connect_timeout_secs: u64,

    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub use_system_proxy: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.microburbs.com.au/report_generator/api".to_string(),
            // Sandbox token; only answers for Belmont North.
            api_token: "test".to_string(),
            timeout_secs: 10,
            connect_timeout_secs: 5,
            use_system_proxy: true,
        }
    }
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("base_url", &self.base_url)
            .field("api_token", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("use_system_proxy", &self.use_system_proxy)
            .finish()
    }
}

/// Fixed lists rendered on the landing page, plus the listing defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub suburbs: Vec<String>,
    pub property_types: Vec<String>,

    /// Suburb used when a request leaves `suburb` out or empty.
    pub default_suburb: String,

    /// Property type used when a request leaves `property_type` out or empty.
    pub default_property_type: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            suburbs: vec!["Belmont North".to_string()],
            property_types: vec![
                "unit".to_string(),
                "house".to_string(),
                "townhouse".to_string(),
            ],
            default_suburb: "Belmont North".to_string(),
            default_property_type: "unit".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_sandbox() {
        let config = ProxyConfig::default();
        assert_eq!(config.upstream.timeout_secs, 10);
        assert_eq!(config.catalog.suburbs, vec!["Belmont North"]);
        assert_eq!(config.catalog.property_types, vec!["unit", "house", "townhouse"]);
        assert_eq!(config.catalog.default_property_type, "unit");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: ProxyConfig = toml::from_str(
            r#"
            [upstream]
            timeout_secs = 3

            [catalog]
            suburbs = ["Belmont North", "Warners Bay"]
            "#,
        )
        .unwrap();

        assert_eq!(config.upstream.timeout_secs, 3);
        assert_eq!(config.upstream.api_token, "test");
        assert_eq!(config.catalog.suburbs.len(), 2);
        assert_eq!(config.catalog.default_suburb, "Belmont North");
        assert_eq!(config.listener.bind_address, "127.0.0.1:5000");
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = UpstreamConfig::default();
        config.api_token = "super-secret".to_string();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
