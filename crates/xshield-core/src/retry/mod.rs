//! Retry engine
//!
//! Executes an HTTP exchange and decides, per outcome, whether to try again.
//!
//! ## Classification
//!
//! ```text
//! outcome ──┬── Ok(response) ── status matches a pattern? ── yes ─► retryable
//!           │                                              └─ no ──► final
//!           └── Err(error) ──── connection error && retry_connection_errors? ─► retryable
//!                                                                 otherwise ─► final
//! ```
//!
//! ## Termination
//!
//! After a retryable outcome, the engine stops once the wall-clock time since
//! the first attempt reaches `max_elapsed_time` and hands back that last outcome
//! unchanged. Otherwise it sleeps `min(initial * exponent^n, max_interval)`
//! (clipped to the remaining budget) and tries again. Cancellation of the
//! context during an attempt or a sleep ends the loop immediately.

mod pattern;

pub use pattern::StatusPattern;

use crate::config::{RetryConfig, RetryStrategy};
use crate::context::Context;
use crate::error::Result;
use std::future::Future;
use tokio::time::Instant;
use tracing::{debug, warn};

/// A response that exposes an HTTP status code
pub trait StatusCoded {
    /// The numeric HTTP status code
    fn status_code(&self) -> u16;
}

impl StatusCoded for u16 {
    fn status_code(&self) -> u16 {
        *self
    }
}

/// Retry policy plus the status codes that trigger it
#[derive(Debug, Clone)]
pub struct Retries<'a> {
    /// Timing policy
    pub config: &'a RetryConfig,

    /// Status patterns that mark a response as retryable
    pub status_codes: Vec<StatusPattern>,
}

impl<'a> Retries<'a> {
    /// Build from textual patterns such as `"5XX"` or `"429"`
    ///
    /// Rejects a retry policy that fails [`RetryConfig::validate`].
    pub fn new<S: AsRef<str>>(config: &'a RetryConfig, status_codes: &[S]) -> Result<Self> {
        config.validate()?;
        let status_codes = status_codes
            .iter()
            .map(|s| s.as_ref().parse())
            .collect::<Result<Vec<StatusPattern>>>()?;
        Ok(Self {
            config,
            status_codes,
        })
    }

    /// Whether `status` matches any configured pattern
    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.status_codes.iter().any(|p| p.matches(status))
    }

    fn is_retryable<R: StatusCoded>(&self, outcome: &Result<R>) -> bool {
        match outcome {
            Ok(res) => self.is_retryable_status(res.status_code()),
            Err(e) => self.config.retry_connection_errors && e.is_connection_error(),
        }
    }
}

/// Run `operation` under the retry policy
///
/// Returns the first non-retryable outcome, or the last retryable one once the
/// time budget is spent. Context errors (`Cancelled`, `DeadlineExceeded`) are
/// returned as soon as they occur.
pub async fn retry<R, F, Fut>(ctx: &Context, retries: &Retries<'_>, mut operation: F) -> Result<R>
where
    R: StatusCoded,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<R>>,
{
    let backoff = match &retries.config.strategy {
        RetryStrategy::Backoff(b) => b,
        RetryStrategy::None => {
            debug!("retry strategy is none, single attempt");
            return ctx.run(operation()).await;
        }
    };

    let start = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        debug!(attempt, "sending request");
        let outcome = ctx.run(operation()).await;

        if let Err(ref e) = outcome
            && e.is_context_error()
        {
            return outcome;
        }

        if !retries.is_retryable(&outcome) {
            return outcome;
        }

        let elapsed = start.elapsed();
        if elapsed >= backoff.max_elapsed_time {
            debug!(
                attempt,
                elapsed_ms = elapsed.as_millis() as u64,
                "retry budget exhausted, returning last outcome"
            );
            return outcome;
        }

        let remaining = backoff.max_elapsed_time - elapsed;
        let wait = backoff.interval(attempt).min(remaining);

        match &outcome {
            Ok(res) => warn!(
                attempt,
                status = res.status_code(),
                wait_ms = wait.as_millis() as u64,
                "retryable status, retrying with backoff"
            ),
            Err(e) => warn!(
                attempt,
                error = %e,
                wait_ms = wait.as_millis() as u64,
                "connection error, retrying with backoff"
            ),
        }

        // The outcome being retried is released before sleeping.
        drop(outcome);
        ctx.sleep(wait).await?;
        attempt = attempt.saturating_add(1);
    }
}
