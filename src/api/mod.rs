//! HTTP transport shared by all service clients.
//!
//! Wraps a [`reqwest::Client`] with the cross-cutting behavior every
//! platform call needs: auth and correlation headers, expected-status
//! checking, and deadline-bounded retry of transient server statuses.
//!
//! Retry is status-driven, not error-driven: a response outside the
//! expected set is retried only when its status appears in
//! [`RETRYABLE_STATUSES`], waiting out the server's `Retry-After` hint
//! (integer seconds) or the configured fallback between attempts. The
//! caller's [`Deadline`] bounds the whole exchange, retries included.

mod error;
mod response;


pub use error::ApiError;
pub use response::ApiResponse;

use crate::config::PlatformConfig;
use crate::lro::Deadline;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, RETRY_AFTER, USER_AGENT};
use reqwest::{Method, StatusCode, Url};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

/// Statuses retried until the deadline expires.
///
/// 408, 425, 429 and the 5xx gateway family. 401 is deliberately not
/// here: an expired token needs a refresh, not a resend.
pub const RETRYABLE_STATUSES: [u16; 7] = [408, 425, 429, 500, 502, 503, 504];

/// Shared HTTP client for the platform services.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: PlatformConfig,
}

impl ApiClient {
    /// Create a new client from configuration.
    pub fn new(config: PlatformConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.api.request_timeout())
            .build()
            .expect("Failed to build HTTP client");
        Self { client, config }
    }

    /// Create a client with a custom reqwest client (for testing).
    pub fn with_client(config: PlatformConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &PlatformConfig {
        &self.config
    }

    /// Execute a request, retrying transient statuses until `deadline`.
    ///
    /// Returns the buffered response when its status is in `expected`;
    /// any other non-retryable status becomes
    /// [`ApiError::UnexpectedStatus`] carrying the response body.
    pub async fn execute<B>(
        &self,
        deadline: &Deadline,
        method: Method,
        url: &str,
        headers: Option<HeaderMap>,
        body: Option<&B>,
        expected: &[StatusCode],
    ) -> Result<ApiResponse, ApiError>
    where
        B: Serialize + ?Sized,
    {
        let url = Url::parse(url).map_err(|e| ApiError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        // Serialize once; the same bytes are resent on every attempt.
        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|e| ApiError::Encode(e.to_string()))?;

        loop {
            deadline.check()?;

            let response = self
                .send_once(method.clone(), url.clone(), headers.as_ref(), body.as_deref())
                .await?;

            if expected.contains(&response.status) {
                return Ok(response);
            }

            let status = response.status.as_u16();
            if !RETRYABLE_STATUSES.contains(&status) {
                return Err(ApiError::UnexpectedStatus {
                    expected: expected.iter().map(|s| s.as_u16()).collect(),
                    status,
                    body: response.body_text(),
                });
            }

            let wait = self.retry_wait(&response.headers);
            metrics::counter!("cloudplane_request_retries_total", "status" => status.to_string())
                .increment(1);
            tracing::debug!(
                status,
                wait_seconds = wait.as_secs(),
                url = %url,
                "Transient status, retrying after wait"
            );
            deadline.sleep(wait).await?;
        }
    }

    async fn send_once(
        &self,
        method: Method,
        url: Url,
        headers: Option<&HeaderMap>,
        body: Option<&[u8]>,
    ) -> Result<ApiResponse, ApiError> {
        let method_label = method.as_str().to_string();
        let mut request = self.client.request(method, url);

        if let Some(headers) = headers {
            request = request.headers(headers.clone());
        }
        request = request
            .header(USER_AGENT, self.config.api.user_agent.as_str())
            .header("Request-Id", Uuid::new_v4().to_string());
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(body.to_vec());
        }

        let started = std::time::Instant::now();
        let result = request.send().await;
        metrics::histogram!("cloudplane_request_duration_seconds", "method" => method_label)
            .record(started.elapsed().as_secs_f64());

        let response = result.map_err(|e| self.classify_send_error(e))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.classify_send_error(e))?
            .to_vec();

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }

    fn classify_send_error(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::Timeout(self.config.api.request_timeout_seconds)
        } else {
            ApiError::Network(err.to_string())
        }
    }

    /// Wait before the next attempt: the server's integer-seconds
    /// `Retry-After` when parseable, the configured fallback otherwise.
    fn retry_wait(&self, headers: &HeaderMap) -> Duration {
        headers
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or_else(|| self.config.api.retry_after())
    }
}
