//! Retry logic.
//!
//! # Responsibilities
//! - Classify failures (connect, timeout, no response, server status, client status, other)
//! - Execute retries with exponential backoff + jitter
//! - Enforce the retry budget (`max_retries` retries after the first attempt)
//!
//! # State Transitions
//! ```text
//! Idle → Attempting
//! Attempting → Success | Classifying
//! Classifying → Attempting (after delay) | Failed
//! ```
//!
//! # Design Decisions
//! - Connection failures always retryable; timeouts and dropped replies only if configured
//! - 5xx retryable, every other status is final
//! - The attempt action is opaque: the caller builds and signs once and
//!   resends the same payload on every attempt

use std::fmt;
use std::future::Future;
use std::time::Duration;

use crate::config::RetryPolicy;
use crate::observability::metrics;
use crate::observability::RetryLogger;
use crate::resilience::backoff::calculate_backoff;
use crate::transport::TransportError;

/// Classified cause of a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Connection could not be established.
    Connect,
    /// No response arrived in time.
    Timeout,
    /// Request sent, connection ended before any response.
    NoResponse,
    /// Response with status ≥ 500.
    ServerStatus(u16),
    /// Response with any other non-success status.
    ClientStatus(u16),
    /// Anything else, including unparseable replies.
    Other,
}

impl FailureKind {
    /// Classify a transport failure.
    pub fn of(err: &TransportError) -> Self {
        match err {
            TransportError::Connect(_) => FailureKind::Connect,
            TransportError::Timeout(_) => FailureKind::Timeout,
            TransportError::NoResponse(_) => FailureKind::NoResponse,
            TransportError::Status { status, .. } if *status >= 500 => {
                FailureKind::ServerStatus(*status)
            }
            TransportError::Status { status, .. } => FailureKind::ClientStatus(*status),
            TransportError::Other(_) => FailureKind::Other,
        }
    }

    pub fn is_retryable(self, policy: &RetryPolicy) -> bool {
        match self {
            FailureKind::Connect => true,
            FailureKind::Timeout | FailureKind::NoResponse => policy.retry_on_timeout,
            FailureKind::ServerStatus(_) => true,
            FailureKind::ClientStatus(_) | FailureKind::Other => false,
        }
    }

    /// Short label used for metrics.
    pub fn label(self) -> &'static str {
        match self {
            FailureKind::Connect => "connect",
            FailureKind::Timeout => "timeout",
            FailureKind::NoResponse => "no_response",
            FailureKind::ServerStatus(_) => "server_error",
            FailureKind::ClientStatus(_) => "client_error",
            FailureKind::Other => "other",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Connect => f.write_str("connection failure"),
            FailureKind::Timeout => f.write_str("timeout"),
            FailureKind::NoResponse => f.write_str("no response"),
            FailureKind::ServerStatus(status) => write!(f, "server error {}", status),
            FailureKind::ClientStatus(status) => write!(f, "client error {}", status),
            FailureKind::Other => f.write_str("non-retryable failure"),
        }
    }
}

/// Whether a transport failure should be retried under `policy`.
pub fn is_retryable(err: &TransportError, policy: &RetryPolicy) -> bool {
    FailureKind::of(err).is_retryable(policy)
}

/// One attempt within a single call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryAttempt {
    /// 0 for the first try.
    pub index: u32,
    /// Delay waited before this attempt.
    pub delay: Duration,
    /// Why the previous attempt failed (`None` for the first try).
    pub failure: Option<FailureKind>,
}

impl RetryAttempt {
    pub fn first() -> Self {
        Self {
            index: 0,
            delay: Duration::ZERO,
            failure: None,
        }
    }

    pub fn is_retry(&self) -> bool {
        self.index > 0
    }
}

/// Terminal outcome of a failed retry loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// The last failure was not retryable.
    Fatal { attempts: u32, source: E },
    /// Every allowed attempt failed with a retryable error.
    Exhausted { attempts: u32, source: E },
}

impl<E> RetryError<E> {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Fatal { attempts, .. } | RetryError::Exhausted { attempts, .. } => *attempts,
        }
    }

    pub fn into_source(self) -> E {
        match self {
            RetryError::Fatal { source, .. } | RetryError::Exhausted { source, .. } => source,
        }
    }
}

/// Drives attempts for one operation under a retry policy.
pub struct RetryController<'a> {
    policy: &'a RetryPolicy,
    logger: &'a dyn RetryLogger,
    operation: &'a str,
}

impl<'a> RetryController<'a> {
    /// `operation` names the call in log messages and metrics.
    pub fn new(policy: &'a RetryPolicy, logger: &'a dyn RetryLogger, operation: &'a str) -> Self {
        Self {
            policy,
            logger,
            operation,
        }
    }

    /// Run `action` until it succeeds, fails with a non-retryable error, or
    /// the retry budget is spent.
    ///
    /// `action` is invoked at most `max_retries + 1` times and receives the
    /// attempt being made.
    ///
    /// # Errors
    /// [`RetryError::Fatal`] when `classify` deems the latest error final,
    /// [`RetryError::Exhausted`] when retries ran out.
    pub async fn run<T, E, C, A, Fut>(&self, classify: C, mut action: A) -> Result<T, RetryError<E>>
    where
        E: fmt::Display,
        C: Fn(&E) -> FailureKind,
        A: FnMut(RetryAttempt) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let total = self.policy.max_retries.saturating_add(1);
        let mut attempt = RetryAttempt::first();

        loop {
            if !attempt.delay.is_zero() {
                tokio::time::sleep(attempt.delay).await;
            }

            metrics::record_attempt(self.operation);
            let error = match action(attempt).await {
                Ok(value) => {
                    if attempt.is_retry() {
                        tracing::info!(
                            operation = self.operation,
                            attempt = attempt.index + 1,
                            "Succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(error) => error,
            };

            let kind = classify(&error);
            let attempts = attempt.index + 1;

            if !kind.is_retryable(self.policy) {
                self.logger.log(&format!(
                    "{} failed on attempt {}/{} ({}, not retried): {}",
                    self.operation, attempts, total, kind, error
                ));
                return Err(RetryError::Fatal {
                    attempts,
                    source: error,
                });
            }

            if attempt.index >= self.policy.max_retries {
                self.logger.log(&format!(
                    "{} failed after {} attempt(s), retries exhausted ({}): {}",
                    self.operation, attempts, kind, error
                ));
                return Err(RetryError::Exhausted {
                    attempts,
                    source: error,
                });
            }

            let next = attempt.index + 1;
            let delay = calculate_backoff(next, self.policy);
            metrics::record_retry(self.operation, kind.label());
            tracing::info!(
                operation = self.operation,
                attempt = attempts,
                delay = ?delay,
                reason = %kind,
                "Retrying request"
            );
            self.logger.log(&format!(
                "{} attempt {}/{} failed ({}): {}; retrying in {}ms",
                self.operation,
                attempts,
                total,
                kind,
                error,
                delay.as_millis()
            ));

            attempt = RetryAttempt {
                index: next,
                delay,
                failure: Some(kind),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::MemoryRetryLogger;
    use std::cell::RefCell;
    use tokio::time::Instant;

    fn policy(max_retries: u32, retry_on_timeout: bool) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_delay_ms: 1000,
            multiplier: 2.0,
            max_delay_ms: 30_000,
            retry_on_timeout,
        }
    }

    fn connect() -> TransportError {
        TransportError::Connect("connection refused".to_string())
    }

    fn status(code: u16) -> TransportError {
        TransportError::Status {
            status: code,
            body: String::new(),
        }
    }

    #[test]
    fn test_classification_table() {
        let on = policy(3, true);
        let off = policy(3, false);

        assert!(is_retryable(&connect(), &on));
        assert!(is_retryable(&connect(), &off));
        assert!(is_retryable(&TransportError::Timeout("t".into()), &on));
        assert!(!is_retryable(&TransportError::Timeout("t".into()), &off));
        assert!(is_retryable(&TransportError::NoResponse("closed".into()), &on));
        assert!(!is_retryable(&TransportError::NoResponse("closed".into()), &off));
        assert!(is_retryable(&status(500), &off));
        assert!(is_retryable(&status(503), &off));
        assert!(!is_retryable(&status(404), &on));
        assert!(!is_retryable(&status(400), &on));
        assert!(!is_retryable(&status(302), &on));
        assert!(!is_retryable(&TransportError::Other("x".into()), &on));

        assert_eq!(FailureKind::of(&status(502)), FailureKind::ServerStatus(502));
        assert_eq!(FailureKind::of(&status(429)), FailureKind::ClientStatus(429));
    }

    #[tokio::test(start_paused = true)]
    async fn test_three_connection_failures_then_success() {
        let policy = policy(3, true);
        let logger = MemoryRetryLogger::new();
        let controller = RetryController::new(&policy, &logger, "TEST_REQ");
        let calls = RefCell::new(Vec::new());

        let result = controller
            .run(FailureKind::of, |attempt| {
                calls.borrow_mut().push((attempt, Instant::now()));
                async move {
                    if attempt.index < 3 {
                        Err(connect())
                    } else {
                        Ok("done")
                    }
                }
            })
            .await;

        assert_eq!(result, Ok("done"));
        let calls = calls.into_inner();
        assert_eq!(calls.len(), 4);

        let expected = [1000u128, 2000, 4000];
        for (i, base) in expected.iter().enumerate() {
            let gap = (calls[i + 1].1 - calls[i].1).as_millis();
            assert!(
                gap >= base * 9 / 10 && gap <= base * 11 / 10,
                "gap {} before call {} not within 10% of {}",
                gap,
                i + 2,
                base
            );
            assert!(gap >= calls[i + 1].0.delay.as_millis());
            assert_eq!(calls[i + 1].0.failure, Some(FailureKind::Connect));
        }
        assert_eq!(calls[0].0, RetryAttempt::first());

        let messages = logger.messages();
        assert_eq!(messages.len(), 3);
        assert!(messages[0].starts_with("TEST_REQ attempt 1/4 failed (connection failure)"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_never_sleeps() {
        let policy = policy(0, true);
        let logger = MemoryRetryLogger::new();
        let controller = RetryController::new(&policy, &logger, "TEST_REQ");
        let calls = RefCell::new(0u32);
        let start = Instant::now();

        let result: Result<(), _> = controller
            .run(FailureKind::of, |_| {
                *calls.borrow_mut() += 1;
                async { Err(connect()) }
            })
            .await;

        assert_eq!(*calls.borrow(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
        assert_eq!(
            result,
            Err(RetryError::Exhausted {
                attempts: 1,
                source: connect()
            })
        );
        assert_eq!(logger.messages().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_is_not_retried() {
        let policy = policy(3, true);
        let logger = MemoryRetryLogger::new();
        let controller = RetryController::new(&policy, &logger, "TEST_REQ");
        let calls = RefCell::new(0u32);

        let result: Result<(), _> = controller
            .run(FailureKind::of, |_| {
                *calls.borrow_mut() += 1;
                async { Err(status(404)) }
            })
            .await;

        assert_eq!(*calls.borrow(), 1);
        assert!(matches!(result, Err(RetryError::Fatal { attempts: 1, .. })));
        assert!(logger.messages()[0].contains("not retried"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_error_retried_until_budget_spent() {
        let policy = policy(2, true);
        let logger = MemoryRetryLogger::new();
        let controller = RetryController::new(&policy, &logger, "TEST_REQ");
        let calls = RefCell::new(0u32);

        let result: Result<(), _> = controller
            .run(FailureKind::of, |_| {
                *calls.borrow_mut() += 1;
                async { Err(status(503)) }
            })
            .await;

        assert_eq!(*calls.borrow(), 3);
        let err = result.unwrap_err();
        assert_eq!(err.attempts(), 3);
        assert!(matches!(err, RetryError::Exhausted { .. }));
        assert_eq!(err.into_source(), status(503));
        // two retries plus the terminal message
        assert_eq!(logger.messages().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_respects_policy() {
        for (retry_on_timeout, expected_calls) in [(true, 3u32), (false, 1)] {
            let policy = policy(2, retry_on_timeout);
            let logger = MemoryRetryLogger::new();
            let controller = RetryController::new(&policy, &logger, "TEST_REQ");
            let calls = RefCell::new(0u32);

            let _: Result<(), _> = controller
                .run(FailureKind::of, |_| {
                    *calls.borrow_mut() += 1;
                    async { Err(TransportError::Timeout("read timed out".into())) }
                })
                .await;

            assert_eq!(*calls.borrow(), expected_calls);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_call_count_matches_budget() {
        for max_retries in 0..4u32 {
            for failures in 0..6u32 {
                let policy = policy(max_retries, true);
                let logger = MemoryRetryLogger::new();
                let controller = RetryController::new(&policy, &logger, "TEST_REQ");
                let calls = RefCell::new(0u32);

                let result = controller
                    .run(FailureKind::of, |attempt| {
                        *calls.borrow_mut() += 1;
                        async move {
                            if attempt.index < failures {
                                Err(status(500))
                            } else {
                                Ok(attempt.index)
                            }
                        }
                    })
                    .await;

                assert_eq!(*calls.borrow(), failures.min(max_retries) + 1);
                assert_eq!(result.is_ok(), failures <= max_retries);
            }
        }
    }
}
