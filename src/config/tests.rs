//! Unit tests for configuration loading.

use super::*;
use std::path::Path;

#[test]
fn test_default_values() {
    let config = PlatformConfig::default();
    assert!(config.service_url.is_empty());
    assert!(config.bearer_token.is_none());
    assert_eq!(config.api.request_timeout_seconds, 120);
    assert_eq!(config.api.poll_interval_seconds, 5);
    assert_eq!(config.api.retry_after_seconds, 5);
    assert!(config.api.user_agent.starts_with("cloudplane-client/"));
}

#[test]
fn test_duration_accessors() {
    let config = ApiConfig::default();
    assert_eq!(config.request_timeout(), Duration::from_secs(120));
    assert_eq!(config.poll_interval(), Duration::from_secs(5));
    assert_eq!(config.retry_after(), Duration::from_secs(5));
}

#[test]
fn test_parse_minimal_toml() {
    let toml = r#"
    service_url = "https://service.example"
    "#;

    let config: PlatformConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.service_url, "https://service.example");
    assert_eq!(config.api.poll_interval_seconds, 5); // Default
}

#[test]
fn test_parse_full_toml() {
    let toml = r#"
    service_url = "https://service.example"
    bearer_token = "secret"

    [api]
    request_timeout_seconds = 30
    poll_interval_seconds = 2
    retry_after_seconds = 1
    user_agent = "custom-agent/1.0"
    "#;

    let config: PlatformConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.bearer_token.as_deref(), Some("secret"));
    assert_eq!(config.api.request_timeout_seconds, 30);
    assert_eq!(config.api.poll_interval_seconds, 2);
    assert_eq!(config.api.retry_after_seconds, 1);
    assert_eq!(config.api.user_agent, "custom-agent/1.0");
}

#[test]
fn test_load_from_file() {
    let temp = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), "service_url = \"https://service.example\"").unwrap();

    let config = PlatformConfig::load(Some(temp.path())).unwrap();
    assert_eq!(config.service_url, "https://service.example");
}

#[test]
fn test_load_missing_file_error() {
    let result = PlatformConfig::load(Some(Path::new("/nonexistent/cloudplane.toml")));
    assert!(matches!(result, Err(ConfigError::NotFound(_))));
}

#[test]
fn test_load_none_returns_defaults() {
    let config = PlatformConfig::load(None).unwrap();
    assert_eq!(config.api.request_timeout_seconds, 120);
}

#[test]
fn test_env_override_service_url() {
    std::env::set_var("CLOUDPLANE_SERVICE_URL", "https://override.example");
    let config = PlatformConfig::default().with_env_overrides();
    std::env::remove_var("CLOUDPLANE_SERVICE_URL");

    assert_eq!(config.service_url, "https://override.example");
}

#[test]
fn test_env_override_bearer_token() {
    std::env::set_var("CLOUDPLANE_BEARER_TOKEN", "env-token");
    let config = PlatformConfig::default().with_env_overrides();
    std::env::remove_var("CLOUDPLANE_BEARER_TOKEN");

    assert_eq!(config.bearer_token.as_deref(), Some("env-token"));
}

#[test]
fn test_env_override_poll_interval() {
    std::env::set_var("CLOUDPLANE_POLL_INTERVAL", "1");
    let config = PlatformConfig::default().with_env_overrides();
    std::env::remove_var("CLOUDPLANE_POLL_INTERVAL");

    assert_eq!(config.api.poll_interval_seconds, 1);
}

#[test]
fn test_env_invalid_value_ignored() {
    std::env::set_var("CLOUDPLANE_REQUEST_TIMEOUT", "not-a-number");
    let config = PlatformConfig::default().with_env_overrides();
    std::env::remove_var("CLOUDPLANE_REQUEST_TIMEOUT");

    // Should keep default, not crash
    assert_eq!(config.api.request_timeout_seconds, 120);
}

#[test]
fn test_validation_empty_service_url() {
    let config = PlatformConfig::default();
    let result = config.validate();
    assert!(matches!(
        result,
        Err(ConfigError::Validation { ref field, .. }) if field == "service_url"
    ));
}

#[test]
fn test_validation_relative_service_url() {
    let config = PlatformConfig {
        service_url: "service.example".to_string(),
        ..Default::default()
    };
    let result = config.validate();
    assert!(matches!(
        result,
        Err(ConfigError::Validation { ref field, .. }) if field == "service_url"
    ));
}

#[test]
fn test_validation_zero_timeout() {
    let mut config = PlatformConfig {
        service_url: "https://service.example".to_string(),
        ..Default::default()
    };
    config.api.request_timeout_seconds = 0;

    let result = config.validate();
    assert!(matches!(
        result,
        Err(ConfigError::Validation { ref field, .. }) if field == "api.request_timeout_seconds"
    ));
}

#[test]
fn test_validation_accepts_valid_config() {
    let config = PlatformConfig {
        service_url: "https://service.example".to_string(),
        ..Default::default()
    };
    assert!(config.validate().is_ok());
}
