//! Configuration for the platform client.
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. Environment variables (`CLOUDPLANE_*`)
//! 2. Configuration file (TOML)
//! 3. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use cloudplane::config::PlatformConfig;
//!
//! // Load defaults
//! let config = PlatformConfig::default();
//! assert_eq!(config.api.poll_interval_seconds, 5);
//!
//! // Parse from TOML
//! let toml = r#"
//! service_url = "https://service.example"
//!
//! [api]
//! poll_interval_seconds = 2
//! "#;
//! let config: PlatformConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.api.poll_interval_seconds, 2);
//! ```

mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Unified configuration for the platform client.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PlatformConfig {
    /// Base URL of the tenant-level platform service
    pub service_url: String,
    /// Bearer token attached to every request, when present
    pub bearer_token: Option<String>,
    /// Transport and polling settings
    pub api: ApiConfig,
}

/// Transport and polling configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Timeout for each HTTP request
    pub request_timeout_seconds: u64,
    /// Seconds between status polls of a long-running operation
    pub poll_interval_seconds: u64,
    /// Fallback wait before retrying a transient status when the response
    /// carries no Retry-After header
    pub retry_after_seconds: u64,
    /// User-Agent sent on every request
    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            request_timeout_seconds: 120,
            poll_interval_seconds: 5,
            retry_after_seconds: 5,
            user_agent: format!("cloudplane-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn retry_after(&self) -> Duration {
        Duration::from_secs(self.retry_after_seconds)
    }
}

impl PlatformConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p)?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supports CLOUDPLANE_* environment variables for common settings.
    /// Invalid values are silently ignored (defaults are kept).
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("CLOUDPLANE_SERVICE_URL") {
            self.service_url = url;
        }
        if let Ok(token) = std::env::var("CLOUDPLANE_BEARER_TOKEN") {
            self.bearer_token = Some(token);
        }
        if let Ok(timeout) = std::env::var("CLOUDPLANE_REQUEST_TIMEOUT") {
            if let Ok(seconds) = timeout.parse() {
                self.api.request_timeout_seconds = seconds;
            }
        }
        if let Ok(interval) = std::env::var("CLOUDPLANE_POLL_INTERVAL") {
            if let Ok(seconds) = interval.parse() {
                self.api.poll_interval_seconds = seconds;
            }
        }
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_url.is_empty() {
            return Err(ConfigError::Validation {
                field: "service_url".to_string(),
                message: "service URL cannot be empty".to_string(),
            });
        }
        if !self.service_url.starts_with("http://") && !self.service_url.starts_with("https://") {
            return Err(ConfigError::Validation {
                field: "service_url".to_string(),
                message: "service URL must be absolute (http:// or https://)".to_string(),
            });
        }
        if self.api.request_timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                field: "api.request_timeout_seconds".to_string(),
                message: "request timeout must be non-zero".to_string(),
            });
        }
        if self.api.user_agent.is_empty() {
            return Err(ConfigError::Validation {
                field: "api.user_agent".to_string(),
                message: "user agent cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
