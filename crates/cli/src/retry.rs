//! Retry helper for storefront sign-in requests.
//!
//! Login and registration are retried when the request times out and for no
//! other reason. A rejected password or a taken email is an answer, not a
//! transient failure.

use std::future::Future;
use std::time::Duration;

/// Errors that can tell whether they were caused by a timeout.
pub trait Timeout {
    /// Whether the failed attempt timed out.
    fn is_timeout(&self) -> bool;
}

impl Timeout for reqwest::Error {
    fn is_timeout(&self) -> bool {
        Self::is_timeout(self)
    }
}

/// Fixed attempt count with linear backoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    attempts: u32,
    base_delay: Duration,
}

impl Default for RetryPolicy {
    /// Three attempts, waiting 1s then 2s between them.
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

impl RetryPolicy {
    /// Create a policy. At least one attempt is always made.
    #[must_use]
    pub fn new(attempts: u32, base_delay: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            base_delay,
        }
    }

    /// Total number of attempts.
    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Delay after the given failed attempt (1-based): `attempt * base_delay`.
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    /// Run `op` until it succeeds, fails with a non-timeout error, or the
    /// attempts run out. The last error is returned.
    ///
    /// # Errors
    ///
    /// Returns the error of the final attempt.
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, E>
    where
        E: Timeout + std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_timeout() && attempt < self.attempts() => {
                    let delay = self.delay_after(attempt);
                    tracing::warn!(attempt, ?delay, error = %e, "request timed out, retrying");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
