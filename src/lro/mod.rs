//! Generic long-running-operation polling.
//!
//! Remote objects handled by this crate are created asynchronously: the
//! submitting call returns immediately and the caller polls a status endpoint
//! until a terminal state appears. This module owns that wait loop. Callers
//! inject a status fetch and a classifier; the loop sleeps a fixed interval
//! between attempts and stops at the first terminal state, deadline expiry,
//! cancellation, or transport failure.

mod deadline;
mod error;


pub use deadline::Deadline;
pub use error::{PollError, WaitError};

use std::future::Future;
use std::time::Duration;

/// Classification of one observed operation status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// Terminal: the operation finished successfully.
    Succeeded,
    /// Terminal: the operation finished and reported failure.
    Failed,
    /// Non-terminal: keep polling.
    Pending,
}

/// Terminal outcome of a poll loop, carrying the final observed status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Terminal<S> {
    Succeeded(S),
    Failed(S),
}

impl<S> Terminal<S> {
    pub fn is_succeeded(&self) -> bool {
        matches!(self, Terminal::Succeeded(_))
    }

    /// The final status, regardless of outcome.
    pub fn into_status(self) -> S {
        match self {
            Terminal::Succeeded(status) | Terminal::Failed(status) => status,
        }
    }
}

/// Poll `fetch` until `classify` reports a terminal state.
///
/// One status check is outstanding at a time; a non-terminal state sleeps
/// `interval` before the next attempt. The deadline is observed before every
/// fetch and during every sleep, so an expired deadline never starts a new
/// iteration and never leaves a sleep blocked. Transport errors from `fetch`
/// propagate immediately; retry policy belongs to the transport layer, not
/// this loop.
///
/// The interval is fixed rather than backed off: target operations complete
/// within a narrow window, and growing the interval would only delay
/// terminal-state detection.
pub async fn poll_until_terminal<S, E, F, Fut, C>(
    deadline: &Deadline,
    interval: Duration,
    mut fetch: F,
    classify: C,
) -> Result<Terminal<S>, PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<S, E>>,
    C: Fn(&S) -> StatusClass,
{
    let mut attempt: u32 = 0;
    loop {
        deadline.check()?;
        attempt += 1;
        let status = fetch().await.map_err(PollError::Fetch)?;
        match classify(&status) {
            StatusClass::Succeeded => {
                tracing::debug!(attempt, "operation reached terminal success");
                return Ok(Terminal::Succeeded(status));
            }
            StatusClass::Failed => {
                tracing::debug!(attempt, "operation reached terminal failure");
                return Ok(Terminal::Failed(status));
            }
            StatusClass::Pending => {
                tracing::debug!(
                    attempt,
                    interval_ms = interval.as_millis() as u64,
                    "operation still pending"
                );
                deadline.sleep(interval).await?;
            }
        }
    }
}
