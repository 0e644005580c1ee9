//! Error types for deadline waits and the poll loop.

use thiserror::Error;

/// Reason a cancellable wait ended early.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WaitError {
    /// The caller-supplied deadline elapsed.
    #[error("deadline exceeded")]
    DeadlineExceeded,

    /// The caller's cancellation token fired.
    #[error("operation cancelled")]
    Cancelled,
}

/// Errors from [`poll_until_terminal`](super::poll_until_terminal).
///
/// Expiry and cancellation are distinct from a remote-reported terminal
/// failure (which is a successful poll result), so callers can tell "the job
/// failed" from "we stopped waiting".
#[derive(Debug, Error)]
pub enum PollError<E> {
    /// A status fetch failed; propagated immediately, never retried by the
    /// poller.
    #[error("status fetch failed: {0}")]
    Fetch(#[source] E),

    /// The deadline elapsed before a terminal state was observed.
    #[error("deadline exceeded before the operation reached a terminal state")]
    DeadlineExceeded,

    /// Cancelled while waiting for a terminal state.
    #[error("cancelled before the operation reached a terminal state")]
    Cancelled,
}

impl<E> From<WaitError> for PollError<E> {
    fn from(err: WaitError) -> Self {
        match err {
            WaitError::DeadlineExceeded => PollError::DeadlineExceeded,
            WaitError::Cancelled => PollError::Cancelled,
        }
    }
}
