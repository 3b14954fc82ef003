//! Retry with exponential backoff

use std::time::Duration;

/// One scheduled retry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryAttempt {
    /// Retry number, starting at 1
    pub number: u32,
    /// Delay before this retry
    pub delay: Duration,
}

/// Retry schedule: up to `retry_count` retries, waiting `base^n` seconds
/// before retry `n`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    retry_count: u32,
    backoff_base: f64,
}

impl RetryPolicy {
    /// Create a retry schedule
    pub fn new(retry_count: u32, backoff_base: f64) -> Self {
        Self {
            retry_count,
            backoff_base: backoff_base.max(0.0),
        }
    }

    /// A schedule that never retries
    pub fn none() -> Self {
        Self::new(0, 0.0)
    }

    /// Maximum number of retries after the first attempt
    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    /// Backoff before retry `number` (1-based)
    pub fn delay_for(&self, number: u32) -> Duration {
        let exponent = i32::try_from(number).unwrap_or(i32::MAX);
        Duration::try_from_secs_f64(self.backoff_base.powi(exponent)).unwrap_or(Duration::MAX)
    }

    /// The retry to schedule after `failed_attempts` failures, if any is left
    pub fn next_attempt(&self, failed_attempts: u32) -> Option<RetryAttempt> {
        (1..=self.retry_count).contains(&failed_attempts).then(|| RetryAttempt {
            number: failed_attempts,
            delay: self.delay_for(failed_attempts),
        })
    }
}
