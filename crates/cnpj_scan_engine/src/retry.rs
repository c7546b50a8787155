use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use scan_logging::{scan_debug, scan_warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Zero behaves like one.
    pub max_attempts: u32,
    /// Wait before retry `n` is `n * base_delay`.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Receives human-readable status lines while a request is retried.
pub trait StatusSink: Send + Sync {
    fn status(&self, text: String);
}

/// Discards status lines.
pub struct NullStatusSink;

impl StatusSink for NullStatusSink {
    fn status(&self, _text: String) {}
}

/// Runs `operation` until it succeeds or `policy.max_attempts` is reached,
/// sleeping linearly longer between attempts. Every error is retried; the
/// last one is returned. The operation receives the 1-based attempt number.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    sink: &dyn StatusSink,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;
    loop {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    scan_debug!("succeeded on attempt {} of {}", attempt, max_attempts);
                }
                return Ok(value);
            }
            Err(err) if attempt >= max_attempts => {
                scan_warn!("giving up after {} attempts: {}", attempt, err);
                return Err(err);
            }
            Err(err) => {
                scan_warn!("attempt {} of {} failed: {}", attempt, max_attempts, err);
                tokio::time::sleep(policy.delay_after(attempt)).await;
                attempt += 1;
                sink.status(format!("Attempt {attempt} of {max_attempts}..."));
            }
        }
    }
}
