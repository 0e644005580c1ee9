//! Deadline tracking for long-running operations.

use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use super::WaitError;

/// Absolute time bound for one reconciliation attempt.
///
/// A deadline is derived once from a caller-supplied timeout and threaded
/// unchanged through every phase and every poll iteration of that attempt.
/// Expiry is observable at phase entry, before each status fetch, and during
/// inter-poll sleeps. Once expired, no new network call starts; an in-flight
/// call is still allowed to return its result.
#[derive(Debug, Clone)]
pub struct Deadline {
    expires_at: Instant,
    cancel: Option<CancellationToken>,
}

impl Deadline {
    /// Create a deadline expiring `timeout` from now.
    pub fn after(timeout: Duration) -> Self {
        Self {
            expires_at: Instant::now() + timeout,
            cancel: None,
        }
    }

    /// Create a deadline that also observes an external cancellation token.
    pub fn with_cancellation(timeout: Duration, cancel: CancellationToken) -> Self {
        Self {
            expires_at: Instant::now() + timeout,
            cancel: Some(cancel),
        }
    }

    /// Time left before expiry, zero if already expired.
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Return an error if the token was cancelled or the deadline expired.
    ///
    /// Cancellation is reported ahead of expiry when both hold.
    pub fn check(&self) -> Result<(), WaitError> {
        if let Some(token) = &self.cancel {
            if token.is_cancelled() {
                return Err(WaitError::Cancelled);
            }
        }
        if self.is_expired() {
            return Err(WaitError::DeadlineExceeded);
        }
        Ok(())
    }

    /// Sleep for `duration`, waking early if the deadline expires or the
    /// cancellation token fires. A blocked sleep never outlives an expired
    /// deadline.
    pub async fn sleep(&self, duration: Duration) -> Result<(), WaitError> {
        self.check()?;
        let cancelled = async {
            match &self.cancel {
                Some(token) => token.cancelled().await,
                None => std::future::pending().await,
            }
        };
        tokio::select! {
            _ = tokio::time::sleep(duration) => Ok(()),
            _ = tokio::time::sleep_until(self.expires_at) => Err(WaitError::DeadlineExceeded),
            _ = cancelled => Err(WaitError::Cancelled),
        }
    }
}
