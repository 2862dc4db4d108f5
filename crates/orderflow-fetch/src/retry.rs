//! Bounded retries with deterministic exponential backoff.

use crate::{ApiClient, FetchError};
use orderflow_types::RawDataset;
use std::future::Future;
use std::time::Duration;
use tracing::{error, info, warn};

/// Classification of a single fetch attempt.
///
/// The retry loop inspects this tag instead of catching typed errors:
/// retryable failures consume an attempt, fatal ones propagate immediately.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// The attempt succeeded.
    Success(RawDataset),
    /// The attempt failed transiently and may be retried.
    Retryable(FetchError),
    /// The attempt failed in a way retrying cannot repair.
    Fatal(FetchError),
}

impl AttemptOutcome {
    /// Classifies the result of one fetch attempt.
    ///
    /// Timeouts, transport failures and server errors (5xx) are retryable.
    /// Client errors (4xx) and undecodable payloads are fatal: the server
    /// answered, and repeating the request will not change the answer.
    #[must_use]
    pub fn classify(result: Result<RawDataset, FetchError>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(err @ FetchError::Timeout) => Self::Retryable(err),
            Err(err @ FetchError::Transport(_)) => Self::Retryable(err),
            Err(FetchError::Http { status }) if status >= 500 => {
                Self::Retryable(FetchError::Http { status })
            }
            Err(err) => Self::Fatal(err),
        }
    }
}

/// Retry policy with deterministic exponential backoff.
///
/// The wait before attempt `n + 1` is `backoff_factor^n` seconds (`n`
/// 0-based): 1 s, 2 s, 4 s… for the default factor of 2. No jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first.
    pub max_attempts: u32,
    /// Base of the exponential backoff, in seconds.
    pub backoff_factor: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_factor: 2.0,
        }
    }
}

impl RetryPolicy {
    /// Creates a policy with the given attempt budget and backoff factor.
    #[must_use]
    pub const fn new(max_attempts: u32, backoff_factor: f64) -> Self {
        Self {
            max_attempts,
            backoff_factor,
        }
    }

    /// Returns the wait before the attempt after `attempt_index` (0-based).
    #[must_use]
    pub fn backoff_delay(&self, attempt_index: u32) -> Duration {
        Duration::from_secs_f64(self.backoff_factor.powi(attempt_index as i32))
    }

    /// Fetches a dataset through the client, retrying per this policy.
    ///
    /// # Errors
    ///
    /// Propagates fatal errors immediately; returns
    /// [`FetchError::RetryExhausted`] when every attempt failed transiently.
    pub async fn fetch_with_retry(
        &self,
        client: &ApiClient,
        dataset: &str,
        rows: u32,
    ) -> Result<RawDataset, FetchError> {
        self.run(|| client.fetch(dataset, rows)).await
    }

    /// Drives up to `max_attempts` calls of `attempt`, sleeping between
    /// retryable failures.
    ///
    /// # Errors
    ///
    /// Returns the fatal error of the first fatal attempt, or
    /// [`FetchError::RetryExhausted`] after the attempt budget is spent.
    pub async fn run<F, Fut>(&self, mut attempt: F) -> Result<RawDataset, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<RawDataset, FetchError>>,
    {
        for index in 0..self.max_attempts {
            match AttemptOutcome::classify(attempt().await) {
                AttemptOutcome::Success(data) => return Ok(data),
                AttemptOutcome::Fatal(err) => {
                    error!("fatal error, not retrying: {err}");
                    return Err(err);
                }
                AttemptOutcome::Retryable(err) => {
                    warn!(
                        "attempt {}/{} failed: {err}",
                        index + 1,
                        self.max_attempts
                    );
                    if index + 1 < self.max_attempts {
                        let delay = self.backoff_delay(index);
                        info!("retrying in {}s", delay.as_secs_f64());
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(FetchError::RetryExhausted {
            attempts: self.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_backoff_delay_powers() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_delay(0), Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(1), Duration::from_secs(2));
        assert_eq!(policy.backoff_delay(2), Duration::from_secs(4));
    }

    #[test]
    fn test_classify_client_error_fatal() {
        let outcome = AttemptOutcome::classify(Err(FetchError::Http { status: 404 }));
        assert!(matches!(
            outcome,
            AttemptOutcome::Fatal(FetchError::Http { status: 404 })
        ));
    }

    #[test]
    fn test_classify_server_error_retryable() {
        let outcome = AttemptOutcome::classify(Err(FetchError::Http { status: 503 }));
        assert!(matches!(
            outcome,
            AttemptOutcome::Retryable(FetchError::Http { status: 503 })
        ));
    }

    #[test]
    fn test_classify_timeout_and_transport_retryable() {
        assert!(matches!(
            AttemptOutcome::classify(Err(FetchError::Timeout)),
            AttemptOutcome::Retryable(FetchError::Timeout)
        ));
        assert!(matches!(
            AttemptOutcome::classify(Err(FetchError::Transport("reset".into()))),
            AttemptOutcome::Retryable(FetchError::Transport(_))
        ));
    }

    #[test]
    fn test_classify_decode_fatal() {
        let err = serde_json::from_slice::<RawDataset>(b"{").unwrap_err();
        assert!(matches!(
            AttemptOutcome::classify(Err(FetchError::Decode(err))),
            AttemptOutcome::Fatal(FetchError::Decode(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_single_attempt_no_sleep() {
        let policy = RetryPolicy::default();
        let calls = Cell::new(0u32);
        let start = tokio::time::Instant::now();

        let result = policy
            .run(|| {
                calls.set(calls.get() + 1);
                async { Err(FetchError::Http { status: 404 }) }
            })
            .await;

        assert!(matches!(result, Err(FetchError::Http { status: 404 })));
        assert_eq!(calls.get(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_error_exhausts_attempts() {
        let policy = RetryPolicy::default();
        let calls = Cell::new(0u32);
        let start = tokio::time::Instant::now();

        let result = policy
            .run(|| {
                calls.set(calls.get() + 1);
                async { Err(FetchError::Http { status: 503 }) }
            })
            .await;

        assert!(matches!(result, Err(FetchError::RetryExhausted { attempts: 3 })));
        assert_eq!(calls.get(), 3);
        // Two sleeps: 1s after the first failure, 2s after the second.
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeouts_then_success() {
        let policy = RetryPolicy::default();
        let calls = Cell::new(0u32);

        let result = policy
            .run(|| {
                let n = calls.get() + 1;
                calls.set(n);
                async move {
                    if n < 3 {
                        Err(FetchError::Timeout)
                    } else {
                        Ok(RawDataset::default())
                    }
                }
            })
            .await;

        assert!(result.is_ok());
        assert_eq!(calls.get(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_timeouts_exhaust_after_two_sleeps() {
        let policy = RetryPolicy::default();
        let start = tokio::time::Instant::now();

        let result = policy.run(|| async { Err(FetchError::Timeout) }).await;

        assert!(matches!(result, Err(FetchError::RetryExhausted { attempts: 3 })));
        assert_eq!(start.elapsed(), Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_first_attempt() {
        let policy = RetryPolicy::default();
        let calls = Cell::new(0u32);

        let result = policy
            .run(|| {
                calls.set(calls.get() + 1);
                async { Ok(RawDataset::default()) }
            })
            .await;

        assert!(result.is_ok());
        assert_eq!(calls.get(), 1);
    }
}
