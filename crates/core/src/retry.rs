//! Bounded retry with exponential backoff.
//!
//! Attempts run strictly one after another. After a failed attempt `k`
//! (0-indexed) the policy waits `base_delay * 2^k` before the next one;
//! no wait follows the final attempt.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// Default number of attempts.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

/// Default delay after the first failed attempt.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(500);

/// Exponential backoff policy for a retriable operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

/// Returned when every attempt failed.
#[derive(Debug, Error)]
#[error("gave up after {attempts} attempts: {last_error}")]
pub struct RetryExhausted<E: fmt::Display + fmt::Debug> {
    /// Number of attempts made
    pub attempts: u32,

    /// Error from the final attempt
    pub last_error: E,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, DEFAULT_BASE_DELAY)
    }
}

impl RetryPolicy {
    /// Create a policy. A `max_attempts` of zero is raised to one.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn base_delay(&self) -> Duration {
        self.base_delay
    }

    /// Delay to wait after failed attempt `attempt` (0-indexed).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Run `op` until it succeeds or the attempt budget is spent, sleeping
    /// on the tokio timer between attempts.
    pub async fn run<T, E, F, Fut>(&self, op: F) -> Result<T, RetryExhausted<E>>
    where
        E: fmt::Display + fmt::Debug,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        self.run_with_sleep(op, tokio::time::sleep).await
    }

    /// Same as [`RetryPolicy::run`] with a caller-supplied sleep function.
    pub async fn run_with_sleep<T, E, F, Fut, S, SFut>(
        &self,
        mut op: F,
        mut sleep: S,
    ) -> Result<T, RetryExhausted<E>>
    where
        E: fmt::Display + fmt::Debug,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        S: FnMut(Duration) -> SFut,
        SFut: Future<Output = ()>,
    {
        let mut attempt = 0;
        loop {
            match op(attempt).await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::debug!("Succeeded on attempt {}/{}", attempt + 1, self.max_attempts);
                    }
                    return Ok(value);
                }
                Err(err) => {
                    tracing::warn!(
                        "Attempt {}/{} failed: {}",
                        attempt + 1,
                        self.max_attempts,
                        err
                    );

                    if attempt + 1 >= self.max_attempts {
                        return Err(RetryExhausted {
                            attempts: attempt + 1,
                            last_error: err,
                        });
                    }

                    let delay = self.delay_for(attempt);
                    tracing::debug!("Backing off for {:?} before retry", delay);
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder() -> (
        Arc<Mutex<Vec<Duration>>>,
        impl FnMut(Duration) -> std::future::Ready<()>,
    ) {
        let delays = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&delays);
        let sleep = move |d: Duration| {
            sink.lock().unwrap().push(d);
            std::future::ready(())
        };
        (delays, sleep)
    }

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts(), 8);
        assert_eq!(policy.base_delay(), Duration::from_millis(500));
    }

    #[test]
    fn test_delay_doubles() {
        let policy = RetryPolicy::new(4, Duration::from_millis(500));
        assert_eq!(policy.delay_for(0), Duration::from_millis(500));
        assert_eq!(policy.delay_for(1), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(2), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(3), Duration::from_millis(4000));
    }

    #[test]
    fn test_zero_attempts_is_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts(), 1);
    }

    #[tokio::test]
    async fn test_exhausts_budget_with_doubling_delays() {
        let policy = RetryPolicy::new(5, Duration::from_millis(10));
        let (delays, sleep) = recorder();
        let calls = Arc::new(Mutex::new(0u32));
        let counter = Arc::clone(&calls);

        let result: Result<(), _> = policy
            .run_with_sleep(
                move |attempt| {
                    *counter.lock().unwrap() += 1;
                    std::future::ready(Err(format!("boom {}", attempt)))
                },
                sleep,
            )
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.attempts, 5);
        assert_eq!(err.last_error, "boom 4");
        assert_eq!(*calls.lock().unwrap(), 5);
        assert_eq!(
            *delays.lock().unwrap(),
            vec![
                Duration::from_millis(10),
                Duration::from_millis(20),
                Duration::from_millis(40),
                Duration::from_millis(80),
            ]
        );
    }

    #[tokio::test]
    async fn test_stops_on_first_success() {
        let policy = RetryPolicy::new(8, Duration::from_millis(1));
        let (delays, sleep) = recorder();

        let result = policy
            .run_with_sleep(
                |attempt| {
                    std::future::ready(if attempt < 2 {
                        Err("not ready")
                    } else {
                        Ok(attempt)
                    })
                },
                sleep,
            )
            .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(delays.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_run_uses_tokio_timer() {
        let policy = RetryPolicy::new(2, Duration::from_millis(1));
        let result: Result<u32, RetryExhausted<&str>> =
            policy.run(|_| std::future::ready(Err("down"))).await;
        assert_eq!(result.unwrap_err().attempts, 2);
    }
}
