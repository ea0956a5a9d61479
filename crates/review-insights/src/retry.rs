//! Bounded retry with a fixed backoff
//!
//! Used by every remote call site. The caller decides which failures are
//! worth another attempt; everything else is returned immediately.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

/// Callback invoked before each backoff sleep, e.g. to update a spinner
pub type RetryObserver = Arc<dyn Fn(&RetryNotice) + Send + Sync>;

/// Attempt ceiling plus the delay inserted between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(2))
    }
}

/// Emitted when a retryable failure consumed one attempt
#[derive(Debug, Clone)]
pub struct RetryNotice {
    /// The attempt that just failed (1-based)
    pub attempt: u32,
    pub max_attempts: u32,
    pub delay: Duration,
    pub reason: String,
}

impl fmt::Display for RetryNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Model loading... Attempt {}/{}, retrying in {:?} ({})",
            self.attempt, self.max_attempts, self.delay, self.reason
        )
    }
}

impl RetryPolicy {
    /// A zero attempt ceiling is treated as a single attempt.
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Run `operation` until it succeeds, fails terminally, or the attempt
    /// budget is spent. The last error is returned on exhaustion.
    ///
    /// `operation` receives the 1-based attempt number.
    pub async fn run<T, E, F, Fut, P>(
        &self,
        mut operation: F,
        is_retryable: P,
        observer: Option<&RetryObserver>,
    ) -> Result<T, E>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: fmt::Display,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.max_attempts && is_retryable(&e) => {
                    let notice = RetryNotice {
                        attempt,
                        max_attempts: self.max_attempts,
                        delay: self.backoff,
                        reason: e.to_string(),
                    };
                    warn!("{}", notice);
                    if let Some(observer) = observer {
                        observer(&notice);
                    }
                    tokio::time::sleep(self.backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Debug, PartialEq)]
    enum TestError {
        Loading,
        Fatal,
    }

    impl fmt::Display for TestError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{self:?}")
        }
    }

    fn fast_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_succeeds_first_try() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, TestError> = fast_policy(3)
            .run(
                |attempt| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async move { Ok(attempt) }
                },
                |e| *e == TestError::Loading,
                None,
            )
            .await;

        assert_eq!(result, Ok(1));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let result: Result<u32, TestError> = fast_policy(3)
            .run(
                |attempt| async move {
                    if attempt < 3 {
                        Err(TestError::Loading)
                    } else {
                        Ok(attempt)
                    }
                },
                |e| *e == TestError::Loading,
                None,
            )
            .await;

        assert_eq!(result, Ok(3));
    }

    #[tokio::test]
    async fn test_exhaustion_returns_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<(), TestError> = fast_policy(3)
            .run(
                |_| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err(TestError::Loading) }
                },
                |e| *e == TestError::Loading,
                None,
            )
            .await;

        assert_eq!(result, Err(TestError::Loading));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_terminal_error_stops_immediately() {
        let calls = AtomicU32::new(0);
        let result: Result<(), TestError> = fast_policy(5)
            .run(
                |_| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Err(TestError::Fatal) }
                },
                |e| *e == TestError::Loading,
                None,
            )
            .await;

        assert_eq!(result, Err(TestError::Fatal));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_observer_sees_each_retry() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer: RetryObserver = Arc::new(move |notice: &RetryNotice| {
            sink.lock().unwrap().push((notice.attempt, notice.max_attempts));
        });

        let _: Result<(), TestError> = fast_policy(3)
            .run(
                |_| async { Err(TestError::Loading) },
                |e| *e == TestError::Loading,
                Some(&observer),
            )
            .await;

        assert_eq!(*seen.lock().unwrap(), vec![(1, 3), (2, 3)]);
    }

    #[test]
    fn test_zero_attempts_means_one() {
        let policy = RetryPolicy::new(0, Duration::from_secs(1));
        assert_eq!(policy.max_attempts(), 1);
    }

    #[test]
    fn test_notice_display() {
        let notice = RetryNotice {
            attempt: 1,
            max_attempts: 3,
            delay: Duration::from_secs(20),
            reason: "HTTP 503".to_string(),
        };
        assert!(notice.to_string().starts_with("Model loading... Attempt 1/3"));
    }
}
