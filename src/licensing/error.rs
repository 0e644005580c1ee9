//! Billing policy error types

use crate::api::ApiError;
use thiserror::Error;
use uuid::Uuid;

/// Errors from billing policy operations.
#[derive(Error, Debug)]
pub enum LicensingError {
    #[error("billing policy {0} not found")]
    NotFound(Uuid),

    #[error("billing policy {0} did not reach a terminal status before the deadline")]
    DeadlineExceeded(Uuid),

    #[error("wait for billing policy {0} was cancelled")]
    Cancelled(Uuid),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl LicensingError {
    /// Whether retrying the whole operation could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            LicensingError::NotFound(_) => false,
            LicensingError::DeadlineExceeded(_) | LicensingError::Cancelled(_) => true,
            LicensingError::Api(e) => e.is_retryable(),
        }
    }
}
