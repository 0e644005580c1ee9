//! Shared helpers for integration tests.

#![allow(dead_code)]

use cloudplane::api::ApiClient;
use cloudplane::config::{ApiConfig, PlatformConfig};
use cloudplane::licensing::LicensingClient;
use cloudplane::lro::Deadline;
use cloudplane::solution::SolutionClient;
use std::sync::Once;
use std::time::Duration;
use wiremock::MockServer;

static TRACING: Once = Once::new();

/// Initialize tracing for tests (call once per test)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "cloudplane=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Configuration pointed at a mock server, with zero poll and retry
/// waits so sequenced mocks drive the loops instead of the clock.
pub fn test_config(server: &MockServer) -> PlatformConfig {
    PlatformConfig {
        service_url: server.uri(),
        bearer_token: Some("test-token".to_string()),
        api: ApiConfig {
            request_timeout_seconds: 5,
            poll_interval_seconds: 0,
            retry_after_seconds: 0,
            user_agent: "cloudplane-client/test".to_string(),
        },
    }
}

pub fn api_client(server: &MockServer) -> ApiClient {
    ApiClient::new(test_config(server))
}

pub fn licensing_client(server: &MockServer) -> LicensingClient {
    LicensingClient::new(api_client(server))
}

pub fn solution_client(server: &MockServer) -> SolutionClient {
    SolutionClient::new(api_client(server))
}

pub fn test_deadline() -> Deadline {
    Deadline::after(Duration::from_secs(30))
}

// ============================================================================
// Response fixtures
// ============================================================================

pub fn billing_policy_body(id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": "payg-policy",
        "type": "Tenant",
        "status": status,
        "location": "europe",
        "billingInstrument": {
            "id": "instr-1",
            "resourceGroup": "rg-billing",
            "subscriptionId": "sub-1"
        },
        "createdOn": "2026-01-15T10:00:00Z",
        "lastModifiedOn": "2026-01-15T10:05:00Z"
    })
}

pub fn staging_passed_body(upload_id: &str, unique_name: &str) -> serde_json::Value {
    serde_json::json!({
        "StageSolutionResults": {
            "StageSolutionUploadId": upload_id,
            "StageSolutionStatus": "Passed",
            "SolutionValidationResults": [],
            "MissingDependencies": [],
            "SolutionDetails": {
                "SolutionUniqueName": unique_name,
                "SolutionFriendlyName": "Contoso Solution",
                "SolutionVersion": "1.2.0.0"
            }
        }
    })
}

pub fn solution_body(id: &str, unique_name: &str) -> serde_json::Value {
    serde_json::json!({
        "solutionid": id,
        "uniquename": unique_name,
        "friendlyname": "Contoso Solution",
        "ismanaged": true,
        "version": "1.2.0.0",
        "createdon": "2026-02-01T08:00:00Z",
        "modifiedon": "2026-02-01T08:05:00Z",
        "installedon": "2026-02-01T08:05:00Z"
    })
}
