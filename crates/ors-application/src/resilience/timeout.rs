//! Timeout guard

use super::outcome::PolicyError;
use std::future::Future;
use std::time::Duration;

/// Cancels the inner call once it exceeds a fixed duration
///
/// The inner future is dropped on expiry, so nothing it would have done
/// afterwards (such as writing to the cache) happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutPolicy {
    duration: Duration,
}

impl TimeoutPolicy {
    /// Create a timeout guard
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// Configured duration
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Run `future`, failing with [`PolicyError::Timeout`] on expiry
    pub async fn run<F: Future>(&self, future: F) -> Result<F::Output, PolicyError> {
        tokio::time::timeout(self.duration, future)
            .await
            .map_err(|_| PolicyError::Timeout(self.duration))
    }
}
