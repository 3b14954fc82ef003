//! Policy engine
//!
//! One engine per upstream owns that upstream's breaker and bulkhead, so
//! every lookup client call to the upstream consults the same state.

use super::bulkhead::Bulkhead;
use super::circuit_breaker::CircuitBreaker;
use super::outcome::{CallOutcome, PolicyError};
use super::retry::RetryPolicy;
use super::timeout::TimeoutPolicy;
use ors_domain::value_objects::UpstreamPolicyConfig;
use std::future::Future;
use tracing::{debug, warn};

/// Composed Retry -> CircuitBreaker -> Bulkhead -> Timeout guard
#[derive(Debug)]
pub struct PolicyEngine {
    upstream: String,
    retry: RetryPolicy,
    breaker: CircuitBreaker,
    bulkhead: Bulkhead,
    timeout: TimeoutPolicy,
}

impl PolicyEngine {
    /// Build the engine for one upstream from its policy settings
    pub fn new(upstream: impl Into<String>, config: &UpstreamPolicyConfig) -> Self {
        let upstream = upstream.into();
        Self {
            retry: RetryPolicy::new(config.retry_count, config.retry_backoff_base_secs),
            breaker: CircuitBreaker::new(
                upstream.clone(),
                config.failure_threshold,
                config.break_duration(),
            ),
            bulkhead: Bulkhead::new(upstream.clone(), config.max_concurrent, config.max_queued),
            timeout: TimeoutPolicy::new(config.timeout()),
            upstream,
        }
    }

    /// Upstream this engine guards
    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    /// The upstream's circuit breaker
    pub fn breaker(&self) -> &CircuitBreaker {
        &self.breaker
    }

    /// The upstream's bulkhead
    pub fn bulkhead(&self) -> &Bulkhead {
        &self.bulkhead
    }

    /// The retry schedule
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Run `call` under all guards
    ///
    /// `call` must be idempotent: it is invoked once per attempt.
    /// Returns `Ok(Some(value))` on success and `Ok(None)` when the upstream
    /// reported the entity as not found.
    pub async fn execute<T, F, Fut>(&self, mut call: F) -> Result<Option<T>, PolicyError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = CallOutcome<T>>,
    {
        let mut failed_attempts = 0;
        loop {
            match self.attempt(&mut call).await {
                Err(error) if error.is_retryable() => {
                    failed_attempts += 1;
                    let Some(retry) = self.retry.next_attempt(failed_attempts) else {
                        debug!(upstream = %self.upstream, %error, "Retries exhausted");
                        return Err(error);
                    };
                    warn!(
                        upstream = %self.upstream,
                        attempt = retry.number,
                        delay_ms = u64::try_from(retry.delay.as_millis()).unwrap_or(u64::MAX),
                        %error,
                        "Retrying upstream call"
                    );
                    tokio::time::sleep(retry.delay).await;
                }
                other => return other,
            }
        }
    }

    /// One admission through breaker, bulkhead and timeout
    async fn attempt<T, F, Fut>(&self, call: &mut F) -> Result<Option<T>, PolicyError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = CallOutcome<T>>,
    {
        let permit = self.breaker.try_acquire()?;

        let guard = match self.bulkhead.acquire().await {
            Ok(guard) => guard,
            Err(error) => {
                permit.release();
                return Err(error);
            }
        };

        let result = self.timeout.run(call()).await;
        drop(guard);

        match result {
            Ok(CallOutcome::Success(value)) => {
                permit.record_success();
                Ok(Some(value))
            }
            Ok(CallOutcome::NotFound) => {
                permit.record_success();
                Ok(None)
            }
            Ok(CallOutcome::CallerError(reason)) => {
                permit.record_success();
                Err(PolicyError::CallerError(reason))
            }
            Ok(CallOutcome::TransientFailure(reason)) => {
                permit.record_failure();
                Err(PolicyError::Transient(reason))
            }
            Err(timeout) => {
                warn!(upstream = %self.upstream, timeout = ?self.timeout.duration(), "Upstream call timed out");
                permit.record_failure();
                Err(timeout)
            }
        }
    }
}
