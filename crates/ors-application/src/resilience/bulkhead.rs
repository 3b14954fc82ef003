//! Bulkhead admission
//!
//! Up to `max_concurrent` calls run at once; the next `max_queued` callers
//! wait in FIFO order (tokio's semaphore is fair); anyone beyond that is
//! rejected immediately. In-flight plus queued never exceeds the sum of
//! both limits.

use super::outcome::PolicyError;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::warn;

/// Per-upstream concurrency limiter with a bounded wait queue
#[derive(Debug)]
pub struct Bulkhead {
    name: String,
    semaphore: Arc<Semaphore>,
    admitted: Arc<AtomicUsize>,
    max_concurrent: usize,
    max_queued: usize,
}

/// Holds one reserved admission; releases it on drop
#[derive(Debug)]
struct Reservation {
    admitted: Arc<AtomicUsize>,
}

impl Drop for Reservation {
    fn drop(&mut self) {
        self.admitted.fetch_sub(1, Ordering::AcqRel);
    }
}

/// A running slot in the bulkhead
///
/// Dropping the guard frees the slot for the next queued caller.
#[derive(Debug)]
pub struct BulkheadGuard {
    _permit: OwnedSemaphorePermit,
    _reservation: Reservation,
}

impl Bulkhead {
    /// Create a bulkhead
    pub fn new(name: impl Into<String>, max_concurrent: usize, max_queued: usize) -> Self {
        let max_concurrent = max_concurrent.max(1);
        Self {
            name: name.into(),
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            admitted: Arc::new(AtomicUsize::new(0)),
            max_concurrent,
            max_queued,
        }
    }

    /// Maximum concurrently running calls
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// Maximum waiting callers
    pub fn max_queued(&self) -> usize {
        self.max_queued
    }

    /// Calls currently running
    pub fn in_flight(&self) -> usize {
        self.max_concurrent
            .saturating_sub(self.semaphore.available_permits())
    }

    /// Callers currently waiting for a slot
    pub fn queued(&self) -> usize {
        self.admitted
            .load(Ordering::Acquire)
            .saturating_sub(self.in_flight())
    }

    /// Wait for a running slot, or fail at once when the queue is full
    ///
    /// Cancelling the returned future while queued gives the queue place back.
    pub async fn acquire(&self) -> Result<BulkheadGuard, PolicyError> {
        let capacity = self.max_concurrent + self.max_queued;
        let reserved = self
            .admitted
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |admitted| {
                (admitted < capacity).then_some(admitted + 1)
            });
        if reserved.is_err() {
            warn!(
                upstream = %self.name,
                max_concurrent = self.max_concurrent,
                max_queued = self.max_queued,
                "Bulkhead full, rejecting call"
            );
            return Err(PolicyError::BulkheadRejected);
        }

        let reservation = Reservation {
            admitted: Arc::clone(&self.admitted),
        };
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .map_err(|_| PolicyError::BulkheadRejected)?;

        Ok(BulkheadGuard {
            _permit: permit,
            _reservation: reservation,
        })
    }
}
