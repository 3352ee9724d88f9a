//! Configuration management
//!
//! Layered: built-in defaults, then an optional TOML file, then
//! `AUTOPULSE_`-prefixed environment variables.

use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendSettings,
    pub poller: PollerSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Base URL of the call backend
    pub base_url: String,
    /// Workspace API key
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            api_key: None,
            request_timeout_secs: 10,
        }
    }
}

impl BackendSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerSettings {
    /// Poll period in milliseconds
    pub interval_ms: u64,
    /// Consecutive failed status checks tolerated per call before
    /// polling is abandoned; unset retries forever
    pub max_transient_failures: Option<u32>,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self {
            interval_ms: 3000,
            max_transient_failures: None,
        }
    }
}

impl PollerSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Config {
    /// Load configuration from an optional file plus the environment
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path));
        }

        builder
            .add_source(config::Environment::with_prefix("AUTOPULSE").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(toml: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend.base_url, "http://localhost:8080");
        assert_eq!(config.backend.api_key, None);
        assert_eq!(config.poller.interval(), Duration::from_millis(3000));
        assert_eq!(config.poller.max_transient_failures, None);
    }

    #[test]
    fn test_from_toml_overrides() {
        let config = Config::from_toml_str(
            r#"
            [backend]
            base_url = "https://api.autopulse.example"
            api_key = "ap_live_123"

            [poller]
            interval_ms = 1000
            max_transient_failures = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "https://api.autopulse.example");
        assert_eq!(config.backend.api_key.as_deref(), Some("ap_live_123"));
        assert_eq!(config.poller.interval(), Duration::from_millis(1000));
        assert_eq!(config.poller.max_transient_failures, Some(5));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            [poller]
            interval_ms = 500
            "#,
        )
        .unwrap();

        assert_eq!(config.backend.base_url, "http://localhost:8080");
        assert_eq!(config.poller.interval_ms, 500);
    }
}
