//! Bulkhead admission tests
//!
//! These run on the real clock: queued callers are parked on a semaphore,
//! and a paused clock would auto-advance past the waits.

use ors_application::resilience::{Bulkhead, PolicyError};
use std::sync::Arc;
use std::time::Duration;

async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !condition() {
        assert!(tokio::time::Instant::now() < deadline, "condition not reached");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}

#[tokio::test]
async fn test_rejects_beyond_concurrency_plus_queue() {
    let bulkhead = Arc::new(Bulkhead::new("products", 2, 30));

    let first = bulkhead.acquire().await.unwrap();
    let second = bulkhead.acquire().await.unwrap();
    assert_eq!(bulkhead.in_flight(), 2);

    let queued: Vec<_> = (0..30)
        .map(|_| {
            let bulkhead = Arc::clone(&bulkhead);
            tokio::spawn(async move { bulkhead.acquire().await.map(drop) })
        })
        .collect();
    wait_until(|| bulkhead.queued() == 30).await;

    for _ in 0..3 {
        assert_eq!(
            bulkhead.acquire().await.unwrap_err(),
            PolicyError::BulkheadRejected
        );
    }
    assert_eq!(bulkhead.in_flight(), 2);
    assert_eq!(bulkhead.queued(), 30);

    drop(first);
    drop(second);
    for handle in queued {
        handle.await.unwrap().unwrap();
    }
    assert_eq!(bulkhead.in_flight(), 0);
    assert_eq!(bulkhead.queued(), 0);
}

#[tokio::test]
async fn test_cancelled_waiter_gives_back_its_queue_place() {
    let bulkhead = Bulkhead::new("users", 1, 1);
    let _running = bulkhead.acquire().await.unwrap();

    let waited = tokio::time::timeout(Duration::from_millis(20), bulkhead.acquire()).await;
    assert!(waited.is_err());
    assert_eq!(bulkhead.queued(), 0);

    // The queue place is free again, so this caller waits instead of being rejected.
    let waited = tokio::time::timeout(Duration::from_millis(20), bulkhead.acquire()).await;
    assert!(waited.is_err());
}

#[tokio::test]
async fn test_slot_is_released_on_drop() {
    let bulkhead = Bulkhead::new("users", 1, 0);
    let guard = bulkhead.acquire().await.unwrap();
    assert_eq!(
        bulkhead.acquire().await.unwrap_err(),
        PolicyError::BulkheadRejected
    );

    drop(guard);
    assert!(bulkhead.acquire().await.is_ok());
}
