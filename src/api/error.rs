//! Transport error types

use crate::lro::WaitError;
use thiserror::Error;

/// Errors from executing a platform request.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid request URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to encode request body: {0}")]
    Encode(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    #[error("unexpected status {status} (expected {expected:?}): {body}")]
    UnexpectedStatus {
        expected: Vec<u16>,
        status: u16,
        body: String,
    },

    #[error("failed to decode response body: {0}")]
    Decode(String),

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("operation cancelled")]
    Cancelled,
}

impl ApiError {
    /// Whether the failure is transient from the caller's point of view.
    ///
    /// Semantic rejections (unexpected status, undecodable body, bad URL)
    /// are not retryable; transport faults and exhausted time bounds are.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ApiError::Network(_)
                | ApiError::Timeout(_)
                | ApiError::DeadlineExceeded
                | ApiError::Cancelled
        )
    }

    /// The HTTP status carried by the error, when there is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<WaitError> for ApiError {
    fn from(err: WaitError) -> Self {
        match err {
            WaitError::DeadlineExceeded => ApiError::DeadlineExceeded,
            WaitError::Cancelled => ApiError::Cancelled,
        }
    }
}
