//! Retry combinator for transient upstream failures
//!
//! A [`RetryPolicy`] pairs a [`RetryLimit`] with a [`Backoff`]. The limit is
//! either a finite number of retries after the first attempt or
//! [`RetryLimit::Unbounded`], which keeps retrying until the operation
//! succeeds. The scan and pagination paths run under the unbounded policy:
//! the upstream API is flaky and a scan is only useful once every id has an
//! answer.

use crate::config::RetryConfig;
use rand::Rng;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// How many times a failed operation may be retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryLimit {
    /// At most this many retries after the first attempt
    Bounded(u32),
    /// Retry until the operation succeeds
    Unbounded,
}

/// Wait inserted between attempts
#[derive(Debug, Clone, PartialEq)]
pub enum Backoff {
    /// Retry immediately (after yielding to the scheduler)
    None,
    /// Constant delay
    Fixed(Duration),
    /// `initial * multiplier^attempt`, capped at `max`, optionally jittered to 50-100%
    Exponential {
        /// Delay before the first retry
        initial: Duration,
        /// Upper bound on any single delay
        max: Duration,
        /// Growth factor per attempt
        multiplier: f64,
        /// Randomize each delay
        jitter: bool,
    },
}

impl Backoff {
    /// Delay to wait after the given zero-based failed attempt
    pub fn delay(&self, attempt: u32) -> Duration {
        match self {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed(delay) => *delay,
            Backoff::Exponential {
                initial,
                max,
                multiplier,
                jitter,
            } => {
                let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
                let base = initial.as_secs_f64() * multiplier.powi(exponent);
                let capped = base.min(max.as_secs_f64());

                let delay = if *jitter {
                    capped * rand::thread_rng().gen_range(0.5..1.0)
                } else {
                    capped
                };

                Duration::from_secs_f64(delay)
            }
        }
    }
}

/// Retry limit plus backoff strategy
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retry budget
    pub limit: RetryLimit,
    /// Wait between attempts
    pub backoff: Backoff,
}

impl RetryPolicy {
    /// Retry forever with no delay
    pub fn unbounded() -> Self {
        Self {
            limit: RetryLimit::Unbounded,
            backoff: Backoff::None,
        }
    }

    /// Retry at most `max_retries` times with no delay
    pub fn bounded(max_retries: u32) -> Self {
        Self {
            limit: RetryLimit::Bounded(max_retries),
            backoff: Backoff::None,
        }
    }

    /// Replace the backoff strategy
    pub fn with_backoff(mut self, backoff: Backoff) -> Self {
        self.backoff = backoff;
        self
    }

    fn allows_retry(&self, retries_done: u64) -> bool {
        match self.limit {
            RetryLimit::Bounded(max) => retries_done < u64::from(max),
            RetryLimit::Unbounded => true,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        let limit = match config.max_retries {
            Some(max) => RetryLimit::Bounded(max),
            None => RetryLimit::Unbounded,
        };
        let backoff = if config.delay_ms == 0 {
            Backoff::None
        } else {
            Backoff::Fixed(Duration::from_millis(config.delay_ms))
        };
        Self { limit, backoff }
    }
}

/// Executes operations under a [`RetryPolicy`]
#[derive(Debug, Clone, Default)]
pub struct RetryManager {
    policy: RetryPolicy,
}

impl RetryManager {
    /// Create a new RetryManager with the given policy
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Execute an async operation with retry logic
    ///
    /// Every error counts as a failed attempt. Once the policy's budget is
    /// spent the last error is returned as is.
    pub async fn execute<F, Fut, T, E>(&self, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut retries = 0u64;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(err) => {
                    if !self.policy.allows_retry(retries) {
                        warn!(attempts = retries + 1, error = %err, "Max retries exhausted");
                        return Err(err);
                    }

                    let attempt = u32::try_from(retries).unwrap_or(u32::MAX);
                    let backoff = self.policy.backoff.delay(attempt);
                    debug!(
                        attempt = retries + 1,
                        backoff_ms = backoff.as_millis(),
                        error = %err,
                        "Retrying after transient error"
                    );

                    if backoff.is_zero() {
                        tokio::task::yield_now().await;
                    } else {
                        tokio::time::sleep(backoff).await;
                    }
                    retries += 1;
                }
            }
        }
    }

    /// Wrap a one-argument operation so every call goes through this policy
    pub fn wrap<F>(&self, operation: F) -> Retrying<F> {
        Retrying {
            manager: self.clone(),
            operation,
        }
    }

    /// Get the retry policy
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

/// An operation bound to a retry policy
///
/// Concurrent calls retry independently of each other.
#[derive(Debug, Clone)]
pub struct Retrying<F> {
    manager: RetryManager,
    operation: F,
}

impl<F> Retrying<F> {
    /// Invoke the wrapped operation, retrying on failure
    pub async fn call<A, Fut, T, E>(&self, args: A) -> Result<T, E>
    where
        F: Fn(A) -> Fut,
        A: Clone,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        self.manager
            .execute(|| (self.operation)(args.clone()))
            .await
    }
}
