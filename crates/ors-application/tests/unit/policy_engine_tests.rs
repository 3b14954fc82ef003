//! Policy engine tests through the lookup client
//!
//! Breaker, retry and timeout tests run on a paused clock; the bulkhead
//! test runs on the real clock with a gated transport.

use crate::test_utils::{FakeTransport, Harness, found, policy, product, unavailable};
use ors_application::resilience::CircuitPhase;
use ors_domain::entities::ProductDto;
use ors_domain::ports::UpstreamResponse;
use ors_domain::value_objects::{Lookup, RequestContext, UpstreamPolicyConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::{Instant, advance};
use uuid::Uuid;

#[tokio::test(start_paused = true)]
async fn test_breaker_opens_deterministically() {
    let harness: Harness<ProductDto> =
        Harness::new(FakeTransport::new("products", unavailable()), &policy(0, 5, 30));
    let ctx = RequestContext::new();

    for _ in 0..5 {
        let lookup = harness.client.fetch_by_id(Uuid::new_v4(), &ctx).await.unwrap();
        assert!(lookup.is_degraded());
    }
    assert_eq!(harness.transport.calls(), 5);
    assert_eq!(harness.engine.breaker().phase(), CircuitPhase::Open);

    let lookup = harness.client.fetch_by_id(Uuid::new_v4(), &ctx).await.unwrap();
    assert!(lookup.is_degraded());
    assert_eq!(harness.transport.calls(), 5, "open circuit must not call upstream");
}

#[tokio::test(start_paused = true)]
async fn test_breaker_recovers_after_break() {
    let id = Uuid::new_v4();
    let harness: Harness<ProductDto> =
        Harness::new(FakeTransport::new("products", unavailable()), &policy(0, 5, 30));
    let ctx = RequestContext::new();

    for _ in 0..5 {
        harness.client.fetch_by_id(id, &ctx).await.unwrap();
    }
    assert_eq!(harness.engine.breaker().phase(), CircuitPhase::Open);

    harness.transport.set_response(found(&product(id, "Lamp")));
    advance(Duration::from_secs(30)).await;

    let lookup = harness.client.fetch_by_id(id, &ctx).await.unwrap();
    assert_eq!(lookup, Lookup::Found(product(id, "Lamp")));
    assert_eq!(harness.transport.calls(), 6);
    assert_eq!(harness.engine.breaker().phase(), CircuitPhase::Closed);
    assert_eq!(harness.engine.breaker().consecutive_failures(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_retry_backoff_waits_between_attempts() {
    let id = Uuid::new_v4();
    let transport = FakeTransport::new("products", found(&product(id, "Lamp")))
        .then(unavailable())
        .then(unavailable());
    let harness: Harness<ProductDto> = Harness::new(transport, &policy(3, 5, 30));

    let started = Instant::now();
    let lookup = harness
        .client
        .fetch_by_id(id, &RequestContext::new())
        .await
        .unwrap();

    assert!(matches!(lookup, Lookup::Found(_)));
    assert_eq!(harness.transport.calls(), 3);
    // base^1 + base^2 with base 2
    assert!(started.elapsed() >= Duration::from_secs(6));
}

#[tokio::test(start_paused = true)]
async fn test_retries_are_bounded() {
    let harness: Harness<ProductDto> =
        Harness::new(FakeTransport::new("products", unavailable()), &policy(3, 10, 30));

    let lookup = harness
        .client
        .fetch_by_id(Uuid::new_v4(), &RequestContext::new())
        .await
        .unwrap();

    assert!(lookup.is_degraded());
    assert_eq!(harness.transport.calls(), 4);
    assert_eq!(harness.engine.breaker().consecutive_failures(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_circuit_open_is_not_retried() {
    let harness: Harness<ProductDto> =
        Harness::new(FakeTransport::new("products", unavailable()), &policy(3, 1, 30));

    let started = Instant::now();
    let lookup = harness
        .client
        .fetch_by_id(Uuid::new_v4(), &RequestContext::new())
        .await
        .unwrap();

    assert!(lookup.is_degraded());
    assert_eq!(harness.transport.calls(), 1);
    // One backoff before the attempt that met the open circuit, none after.
    assert!(started.elapsed() < Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_timeout_counts_as_failure() {
    let config = UpstreamPolicyConfig {
        timeout_ms: 100,
        ..policy(0, 1, 30)
    };
    let id = Uuid::new_v4();
    let transport = FakeTransport::new("users", found(&product(id, "Lamp")))
        .with_delay(Duration::from_secs(10));
    let harness: Harness<ProductDto> = Harness::new(transport, &config);

    let lookup = harness
        .client
        .fetch_by_id(id, &RequestContext::new())
        .await
        .unwrap();

    assert!(lookup.is_degraded());
    assert_eq!(harness.engine.breaker().phase(), CircuitPhase::Open);
    assert_eq!(harness.cache.sets(), 0, "timed-out call must not write the cache");
}

#[tokio::test(start_paused = true)]
async fn test_caller_error_is_not_retried_or_counted() {
    let transport = FakeTransport::new(
        "products",
        UpstreamResponse::BadRequest("malformed id".to_string()),
    );
    let harness: Harness<ProductDto> = Harness::new(transport, &policy(3, 1, 30));

    let error = harness
        .client
        .fetch_by_id(Uuid::new_v4(), &RequestContext::new())
        .await
        .unwrap_err();

    assert!(error.is_caller_error());
    assert_eq!(harness.transport.calls(), 1);
    assert_eq!(harness.engine.breaker().phase(), CircuitPhase::Closed);
}

#[tokio::test(start_paused = true)]
async fn test_not_found_is_not_retried_or_counted() {
    let harness: Harness<ProductDto> = Harness::new(
        FakeTransport::new("products", UpstreamResponse::NotFound),
        &policy(3, 1, 30),
    );

    let lookup = harness
        .client
        .fetch_by_id(Uuid::new_v4(), &RequestContext::new())
        .await
        .unwrap();

    assert_eq!(lookup, Lookup::NotFound);
    assert_eq!(harness.transport.calls(), 1);
    assert_eq!(harness.engine.breaker().phase(), CircuitPhase::Closed);
}

#[tokio::test]
async fn test_bulkhead_capacity_under_load() {
    let id = Uuid::new_v4();
    let gate = Arc::new(Semaphore::new(0));
    let transport =
        FakeTransport::new("products", found(&product(id, "Lamp"))).with_gate(gate.clone());
    let config = UpstreamPolicyConfig {
        timeout_ms: 30_000,
        ..policy(3, 5, 30)
    };
    let harness: Harness<ProductDto> = Harness::new(transport, &config);
    // Every call must reach the bulkhead, so nothing may be served from cache.
    harness.cache.set_failing(true);

    let handles: Vec<_> = (0..35)
        .map(|_| {
            let client = Arc::clone(&harness.client);
            tokio::spawn(async move { client.fetch_by_id(id, &RequestContext::new()).await })
        })
        .collect();

    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        let finished = handles.iter().filter(|h| h.is_finished()).count();
        let bulkhead = harness.engine.bulkhead();
        if bulkhead.in_flight() == 2 && bulkhead.queued() == 30 && finished == 3 {
            break;
        }
        assert!(Instant::now() < deadline, "bulkhead never reached 2 running / 30 queued");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(harness.transport.calls(), 2);

    gate.add_permits(100);

    let mut served = 0;
    let mut rejected = 0;
    for handle in handles {
        match handle.await.unwrap().unwrap() {
            Lookup::Found(_) => served += 1,
            Lookup::Degraded(_) => rejected += 1,
            Lookup::NotFound => panic!("unexpected not found"),
        }
    }
    assert_eq!((served, rejected), (32, 3));
    assert_eq!(harness.transport.calls(), 32);
    assert_eq!(harness.engine.breaker().phase(), CircuitPhase::Closed);
}

#[tokio::test]
async fn test_bulkhead_rejection_does_not_trip_breaker() {
    let id = Uuid::new_v4();
    let gate = Arc::new(Semaphore::new(0));
    let transport =
        FakeTransport::new("products", found(&product(id, "Lamp"))).with_gate(gate.clone());
    let config = UpstreamPolicyConfig {
        timeout_ms: 30_000,
        max_concurrent: 1,
        max_queued: 0,
        ..policy(3, 1, 30)
    };
    let harness: Harness<ProductDto> = Harness::new(transport, &config);
    harness.cache.set_failing(true);

    let client = Arc::clone(&harness.client);
    let holder =
        tokio::spawn(async move { client.fetch_by_id(id, &RequestContext::new()).await });

    let deadline = Instant::now() + Duration::from_secs(5);
    while harness.engine.bulkhead().in_flight() < 1 {
        assert!(Instant::now() < deadline, "first call never took the bulkhead slot");
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let rejected = harness
        .client
        .fetch_by_id(id, &RequestContext::new())
        .await
        .unwrap();
    assert!(rejected.is_degraded());
    assert_eq!(harness.transport.calls(), 1, "rejected call must not reach upstream");
    assert_eq!(harness.engine.breaker().phase(), CircuitPhase::Closed);
    assert_eq!(harness.engine.breaker().consecutive_failures(), 0);

    gate.add_permits(1);
    let served = holder.await.unwrap().unwrap();
    assert_eq!(served, Lookup::Found(product(id, "Lamp")));
    assert_eq!(harness.engine.breaker().phase(), CircuitPhase::Closed);
}
