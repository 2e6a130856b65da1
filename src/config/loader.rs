//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides `upstream.api_token`.
pub const API_TOKEN_ENV: &str = "SUBURB_PROXY_API_TOKEN";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: ProxyConfig = toml::from_str(&content)?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build the configuration used when no file is given: defaults plus
/// environment overrides, validated.
pub fn default_config() -> Result<ProxyConfig, ConfigError> {
    let mut config = ProxyConfig::default();
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides through `lookup` so secrets stay out of files.
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(token) = lookup(API_TOKEN_ENV).filter(|t| !t.is_empty()) {
        config.upstream.api_token = token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn write_temp(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "suburb-proxy-{}-{}.toml",
            name,
            std::process::id()
        ));
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_valid_file() {
        let path = write_temp(
            "valid",
            r#"
            [listener]
            bind_address = "127.0.0.1:8088"

            [upstream]
            base_url = "http://127.0.0.1:9999/api"
            "#,
        );

        let config = load_config(&path).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:8088");
        assert_eq!(config.upstream.base_url, "http://127.0.0.1:9999/api");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_load_reports_validation_errors() {
        let path = write_temp(
            "invalid",
            r#"
            [upstream]
            timeout_secs = 0
            "#,
        );

        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("upstream.timeout_secs"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let path = write_temp("garbled", "[upstream\nbase_url = ");
        assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_env_override_replaces_token() {
        let mut config = ProxyConfig::default();
        apply_env_overrides(&mut config, |key| {
            (key == API_TOKEN_ENV).then(|| "from-env".to_string())
        });
        assert_eq!(config.upstream.api_token, "from-env");
    }

    #[test]
    fn test_empty_env_value_is_ignored() {
        let mut config = ProxyConfig::default();
        apply_env_overrides(&mut config, |_| Some(String::new()));
        assert_eq!(config.upstream.api_token, "test");
    }
}
