//! Invalidation consumer tests over the in-process channel source

use crate::test_utils::{CountingCache, FakeTransport, Harness, found, policy, product, user};
use ors_application::use_cases::{ConsumerReport, DeliveryOutcome, InvalidationConsumer};
use ors_domain::entities::ProductDto;
use ors_domain::events::InvalidationEvent;
use async_trait::async_trait;
use ors_domain::constants::INVALIDATION_RECEIVE_BACKOFF_MS;
use ors_domain::error::{Error, Result};
use ors_domain::ports::{CacheProvider, Delivery, DeliveryAcker, InvalidationSource};
use ors_domain::value_objects::{CacheEntryConfig, EntityKind, Lookup, RequestContext};
use ors_providers::events::{AckDecision, ChannelInvalidationSource, ChannelPublisher};
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

fn consumer(cache: &Arc<CountingCache>) -> InvalidationConsumer<ProductDto> {
    InvalidationConsumer::new(
        cache.clone() as Arc<dyn CacheProvider>,
        CacheEntryConfig::default(),
    )
}

/// Publish one raw message and hand it to the consumer
async fn deliver(
    consumer: &InvalidationConsumer<ProductDto>,
    payload: Vec<u8>,
    event: Option<&str>,
) -> (DeliveryOutcome, Option<AckDecision>) {
    let (publisher, mut source) = ChannelInvalidationSource::channel("products", 4);
    let pending = publisher.publish_raw(payload, event).await.unwrap();
    let delivery = source.next_delivery().await.unwrap().unwrap();
    let outcome = consumer.handle_delivery(delivery).await;
    (outcome, pending.decision().await)
}

async fn deliver_event(
    consumer: &InvalidationConsumer<ProductDto>,
    event: &InvalidationEvent,
) -> (DeliveryOutcome, Option<AckDecision>) {
    deliver(consumer, event.to_vec().unwrap(), Some(event.event.as_str())).await
}

#[tokio::test]
async fn test_deleted_event_forces_a_miss() {
    let id = Uuid::new_v4();
    let cache = Arc::new(CountingCache::new());
    let harness: Harness<ProductDto> = Harness::with_cache(
        FakeTransport::new("products", found(&product(id, "Lamp"))),
        &policy(3, 5, 30),
        cache.clone(),
    );
    let ctx = RequestContext::new();

    harness.client.fetch_by_id(id, &ctx).await.unwrap();
    harness.client.fetch_by_id(id, &ctx).await.unwrap();
    assert_eq!(harness.transport.calls(), 1);

    let event = InvalidationEvent::deleted(EntityKind::Product, id);
    let (outcome, decision) = deliver_event(&consumer(&cache), &event).await;
    assert_eq!(outcome, DeliveryOutcome::Acked);
    assert_eq!(decision, Some(AckDecision::Acked));
    assert!(cache.peek(&format!("product:{id}")).await.is_none());

    harness.client.fetch_by_id(id, &ctx).await.unwrap();
    assert_eq!(harness.transport.calls(), 2);
}

#[tokio::test]
async fn test_duplicate_delete_is_idempotent() {
    let id = Uuid::new_v4();
    let cache = Arc::new(CountingCache::new());
    cache
        .set_json(&format!("product:{id}"), "{}", CacheEntryConfig::default())
        .await
        .unwrap();
    let consumer = consumer(&cache);
    let event = InvalidationEvent::deleted(EntityKind::Product, id);

    let first = deliver_event(&consumer, &event).await;
    let second = deliver_event(&consumer, &event).await;

    assert_eq!(first, (DeliveryOutcome::Acked, Some(AckDecision::Acked)));
    assert_eq!(second, (DeliveryOutcome::Acked, Some(AckDecision::Acked)));
    assert!(cache.peek(&format!("product:{id}")).await.is_none());
}

#[tokio::test]
async fn test_updated_event_refreshes_without_upstream_call() {
    let id = Uuid::new_v4();
    let cache = Arc::new(CountingCache::new());
    let harness: Harness<ProductDto> = Harness::with_cache(
        FakeTransport::new("products", found(&product(id, "Lamp"))),
        &policy(3, 5, 30),
        cache.clone(),
    );
    let ctx = RequestContext::new();
    harness.client.fetch_by_id(id, &ctx).await.unwrap();

    let renamed = product(id, "Desk Lamp");
    let event = InvalidationEvent::updated(&renamed).unwrap();
    let (outcome, _) = deliver_event(&consumer(&cache), &event).await;
    assert_eq!(outcome, DeliveryOutcome::Acked);

    let lookup = harness.client.fetch_by_id(id, &ctx).await.unwrap();
    assert_eq!(lookup, Lookup::Found(renamed));
    assert_eq!(harness.transport.calls(), 1);
}

#[tokio::test]
async fn test_duplicate_update_is_idempotent() {
    let id = Uuid::new_v4();
    let cache = Arc::new(CountingCache::new());
    let consumer = consumer(&cache);
    let event = InvalidationEvent::updated(&product(id, "Lamp")).unwrap();

    deliver_event(&consumer, &event).await;
    let once = cache.peek(&format!("product:{id}")).await;
    deliver_event(&consumer, &event).await;

    assert_eq!(cache.peek(&format!("product:{id}")).await, once);
}

#[tokio::test]
async fn test_malformed_payload_is_rejected() {
    let cache = Arc::new(CountingCache::new());
    let (outcome, decision) = deliver(&consumer(&cache), b"{not json".to_vec(), None).await;

    assert_eq!(outcome, DeliveryOutcome::Rejected);
    assert_eq!(decision, Some(AckDecision::Rejected));
    assert_eq!(cache.sets() + cache.deletes(), 0);
}

#[tokio::test]
async fn test_event_for_other_entity_type_is_rejected() {
    let cache = Arc::new(CountingCache::new());
    let event = InvalidationEvent::updated(&user(Uuid::new_v4(), "Ana")).unwrap();

    let (outcome, _) = deliver_event(&consumer(&cache), &event).await;
    assert_eq!(outcome, DeliveryOutcome::Rejected);
    assert_eq!(cache.sets(), 0);
}

#[tokio::test]
async fn test_update_without_snapshot_is_rejected() {
    let cache = Arc::new(CountingCache::new());
    let id = Uuid::new_v4();
    let payload = format!(r#"{{"entityType":"product","entityId":"{id}","event":"updated"}}"#);

    let (outcome, _) = deliver(&consumer(&cache), payload.into_bytes(), Some("updated")).await;
    assert_eq!(outcome, DeliveryOutcome::Rejected);
}

#[tokio::test]
async fn test_snapshot_with_other_id_is_rejected() {
    let cache = Arc::new(CountingCache::new());
    let mut event = InvalidationEvent::updated(&product(Uuid::new_v4(), "Lamp")).unwrap();
    event.entity_id = Uuid::new_v4();

    let (outcome, _) = deliver_event(&consumer(&cache), &event).await;
    assert_eq!(outcome, DeliveryOutcome::Rejected);
    assert_eq!(cache.sets(), 0);
}

#[tokio::test]
async fn test_header_contradicting_payload_is_rejected() {
    let cache = Arc::new(CountingCache::new());
    let event = InvalidationEvent::deleted(EntityKind::Product, Uuid::new_v4());

    let (outcome, _) = deliver(&consumer(&cache), event.to_vec().unwrap(), Some("updated")).await;
    assert_eq!(outcome, DeliveryOutcome::Rejected);
    assert_eq!(cache.deletes(), 0);
}

#[tokio::test]
async fn test_cache_failure_rejects_delivery() {
    let cache = Arc::new(CountingCache::new());
    cache.set_failing(true);
    let event = InvalidationEvent::deleted(EntityKind::Product, Uuid::new_v4());

    let (outcome, decision) = deliver_event(&consumer(&cache), &event).await;
    assert_eq!(outcome, DeliveryOutcome::Rejected);
    assert_eq!(decision, Some(AckDecision::Rejected));
}

async fn publish_batch(publisher: &ChannelPublisher) -> Vec<Option<AckDecision>> {
    let events = [
        InvalidationEvent::deleted(EntityKind::Product, Uuid::new_v4()),
        InvalidationEvent::updated(&product(Uuid::new_v4(), "Lamp")).unwrap(),
    ];
    let mut pending = Vec::new();
    for event in &events {
        pending.push(publisher.publish(event).await.unwrap());
    }
    pending.push(publisher.publish_raw(b"garbage".to_vec(), None).await.unwrap());

    let mut decisions = Vec::new();
    for ack in pending {
        decisions.push(ack.decision().await);
    }
    decisions
}

#[tokio::test]
async fn test_run_loop_until_cancelled() {
    let cache = Arc::new(CountingCache::new());
    let consumer = consumer(&cache);
    let (publisher, mut source) = ChannelInvalidationSource::channel("products", 16);
    let shutdown = CancellationToken::new();

    let task = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { consumer.run(&mut source, shutdown).await })
    };

    let decisions = publish_batch(&publisher).await;
    assert_eq!(
        decisions,
        vec![
            Some(AckDecision::Acked),
            Some(AckDecision::Acked),
            Some(AckDecision::Rejected)
        ]
    );

    shutdown.cancel();
    let report = task.await.unwrap();
    assert_eq!(report, ConsumerReport {
            acked: 2,
            rejected: 1,
            unsettled: 0
        });
}

#[tokio::test]
async fn test_run_loop_ends_with_source() {
    let cache = Arc::new(CountingCache::new());
    let (publisher, mut source) = ChannelInvalidationSource::channel("products", 16);
    drop(publisher);

    let report = consumer(&cache)
        .run(&mut source, CancellationToken::new())
        .await;
    assert_eq!(report, ConsumerReport::default());
}

/// Acker whose acknowledgment never reaches the broker
struct LostAck;

#[async_trait]
impl DeliveryAcker for LostAck {
    async fn ack(&self) -> Result<()> {
        Err(Error::network("broker connection lost"))
    }

    async fn reject(&self) -> Result<()> {
        Ok(())
    }
}

/// Source replaying a fixed list of receive results, counting polls
struct ScriptedSource {
    script: VecDeque<Result<Delivery>>,
    repeat_error: bool,
    polls: Arc<AtomicUsize>,
}

#[async_trait]
impl InvalidationSource for ScriptedSource {
    async fn next_delivery(&mut self) -> Option<Result<Delivery>> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        if self.repeat_error {
            return Some(Err(Error::network("consumer no longer exists")));
        }
        self.script.pop_front()
    }

    fn source_name(&self) -> &str {
        "scripted"
    }
}

#[tokio::test]
async fn test_failed_ack_is_not_counted_as_acked() {
    let cache = Arc::new(CountingCache::new());
    let event = InvalidationEvent::deleted(EntityKind::Product, Uuid::new_v4());
    let delivery = || {
        Delivery::new(
            event.to_vec().unwrap(),
            Some("deleted".to_string()),
            Box::new(LostAck),
        )
    };
    let consumer = consumer(&cache);

    assert_eq!(
        consumer.handle_delivery(delivery()).await,
        DeliveryOutcome::Unsettled
    );

    let mut source = ScriptedSource {
        script: VecDeque::from([Ok(delivery())]),
        repeat_error: false,
        polls: Arc::new(AtomicUsize::new(0)),
    };
    let report = consumer.run(&mut source, CancellationToken::new()).await;
    assert_eq!(
        report,
        ConsumerReport {
            acked: 0,
            rejected: 0,
            unsettled: 1
        }
    );
    assert_eq!(cache.deletes(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_receive_errors_back_off() {
    let cache = Arc::new(CountingCache::new());
    let consumer = consumer(&cache);
    let polls = Arc::new(AtomicUsize::new(0));
    let mut source = ScriptedSource {
        script: VecDeque::new(),
        repeat_error: true,
        polls: Arc::clone(&polls),
    };
    let shutdown = CancellationToken::new();

    let task = {
        let shutdown = shutdown.clone();
        tokio::spawn(async move { consumer.run(&mut source, shutdown).await })
    };

    // Polls at 0, 1, 2 and 3 backoff intervals; the window ends before the fifth.
    tokio::time::sleep(Duration::from_millis(INVALIDATION_RECEIVE_BACKOFF_MS * 4 - 100)).await;
    assert_eq!(polls.load(Ordering::SeqCst), 4);

    shutdown.cancel();
    let report = task.await.unwrap();
    assert_eq!(report, ConsumerReport::default());
}
