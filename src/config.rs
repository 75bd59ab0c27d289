//! Agent configuration
//!
//! Loaded from an optional TOML file, then overridden by environment
//! variables. CLI flags override both (handled in `cli`).
//!
//! ```toml
//! [store]
//! base_url = "https://records.internal"
//! timeout_ms = 10000
//! api_key = "..."
//!
//! [server]
//! bind_addr = "0.0.0.0:8080"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::client::RecordStoreConfig;
use crate::error::{AuditError, Result};

/// Record store connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSettings {
    /// Base URL of the record store API
    pub base_url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    /// API key for the store; unset sends no key header
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        let defaults = RecordStoreConfig::default();
        Self {
            base_url: defaults.base_url,
            timeout_ms: defaults.timeout_ms,
            api_key: None,
        }
    }
}

impl From<StoreSettings> for RecordStoreConfig {
    fn from(settings: StoreSettings) -> Self {
        RecordStoreConfig {
            base_url: settings.base_url,
            timeout_ms: settings.timeout_ms,
            api_key: settings.api_key,
        }
    }
}

/// HTTP server settings for `serve` mode
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Address and port to bind
    pub bind_addr: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Full agent configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreSettings,
    pub server: ServerSettings,
}

impl AppConfig {
    /// Load configuration: TOML file (when given), then environment
    /// variable overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    AuditError::config(format!("cannot read {}: {}", path.display(), e))
                })?;
                toml::from_str(&raw).map_err(|e| {
                    AuditError::config(format!("cannot parse {}: {}", path.display(), e))
                })?
            }
            None => Self::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("PACKAGE_HEALTH_STORE_URL") {
            self.store.base_url = url;
        }
        if let Ok(timeout) = std::env::var("PACKAGE_HEALTH_STORE_TIMEOUT_MS") {
            if let Ok(timeout) = timeout.parse() {
                self.store.timeout_ms = timeout;
            }
        }
        if let Ok(key) = std::env::var("PACKAGE_HEALTH_STORE_API_KEY") {
            self.store.api_key = Some(key);
        }
        if let Ok(addr) = std::env::var("PACKAGE_HEALTH_BIND_ADDR") {
            self.server.bind_addr = addr;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.store.base_url, "http://localhost:8080");
        assert_eq!(config.store.timeout_ms, 10_000);
        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
    }

    #[test]
    fn test_parse_toml() {
        let raw = r#"
            [store]
            base_url = "https://records.internal"
            api_key = "k-123"

            [server]
            bind_addr = "127.0.0.1:9000"
        "#;
        let config: AppConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.store.base_url, "https://records.internal");
        assert_eq!(config.store.api_key.as_deref(), Some("k-123"));
        // Unset keys keep their defaults
        assert_eq!(config.store.timeout_ms, 10_000);
        assert_eq!(config.server.bind_addr, "127.0.0.1:9000");
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/agent.toml"))).unwrap_err();
        assert!(matches!(err, AuditError::Config(_)));
    }
}
