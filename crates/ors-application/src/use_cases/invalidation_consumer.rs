//! Invalidation Consumer Use Case
//!
//! Applies entity-change events from an upstream to the shared cache:
//!
//! - `deleted`: remove `{entity-type}:{id}`
//! - `updated`: overwrite it with the event's snapshot, using the same
//!   expiration as the lookup client
//!
//! A delivery is acknowledged only after the cache mutation succeeded.
//! Anything else is rejected without requeue and logged. Both mutations
//! are idempotent, so redelivered events are harmless.

use ors_domain::constants::INVALIDATION_RECEIVE_BACKOFF_MS;
use ors_domain::entities::RemoteEntity;
use ors_domain::error::{Error, Result};
use ors_domain::events::{ChangeKind, InvalidationEvent};
use ors_domain::ports::{CacheProvider, Delivery, DeliveryAcker, InvalidationSource};
use ors_domain::value_objects::CacheEntryConfig;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Final state of one delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Applied and acknowledged
    Acked,
    /// Rejected without requeue
    Rejected,
    /// Applied, but the acknowledgment failed; the source will redeliver it
    Unsettled,
}

/// Counters returned when the consumer loop stops
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConsumerReport {
    /// Deliveries applied and acknowledged
    pub acked: u64,
    /// Deliveries rejected
    pub rejected: u64,
    /// Deliveries applied whose acknowledgment failed
    pub unsettled: u64,
}

/// Invalidation consumer for entity type `E`
pub struct InvalidationConsumer<E: RemoteEntity> {
    cache: Arc<dyn CacheProvider>,
    cache_config: CacheEntryConfig,
    _entity: PhantomData<fn() -> E>,
}

impl<E: RemoteEntity> InvalidationConsumer<E> {
    /// Create a consumer writing to `cache`
    ///
    /// `cache_config` should match the lookup client's so refreshed entries
    /// expire like fetched ones.
    pub fn new(cache: Arc<dyn CacheProvider>, cache_config: CacheEntryConfig) -> Self {
        Self {
            cache,
            cache_config,
            _entity: PhantomData,
        }
    }

    /// Consume `source` until it ends or `shutdown` fires
    ///
    /// A delivery that has been received is always settled before the
    /// loop checks for shutdown again.
    pub async fn run<S>(&self, source: &mut S, shutdown: CancellationToken) -> ConsumerReport
    where
        S: InvalidationSource + ?Sized,
    {
        let mut report = ConsumerReport::default();
        info!(source = %source.source_name(), entity_type = %E::KIND, "Invalidation consumer started");

        loop {
            let next = tokio::select! {
                biased;
                () = shutdown.cancelled() => break,
                next = source.next_delivery() => next,
            };

            match next {
                None => break,
                Some(Err(e)) => {
                    error!(source = %source.source_name(), error = %e, "Failed to receive invalidation message");
                    tokio::select! {
                        () = shutdown.cancelled() => break,
                        () = tokio::time::sleep(Duration::from_millis(INVALIDATION_RECEIVE_BACKOFF_MS)) => {}
                    }
                }
                Some(Ok(delivery)) => match self.handle_delivery(delivery).await {
                    DeliveryOutcome::Acked => report.acked += 1,
                    DeliveryOutcome::Rejected => report.rejected += 1,
                    DeliveryOutcome::Unsettled => report.unsettled += 1,
                },
            }
        }

        info!(
            source = %source.source_name(),
            acked = report.acked,
            rejected = report.rejected,
            unsettled = report.unsettled,
            "Invalidation consumer stopped"
        );
        report
    }

    /// Process one delivery and settle it
    pub async fn handle_delivery(&self, delivery: Delivery) -> DeliveryOutcome {
        match self.process(&delivery).await {
            Ok(event) => {
                info!(
                    key = %event.cache_key(),
                    event = %event.event,
                    "Invalidation applied"
                );
                if let Err(e) = delivery.acker.ack().await {
                    warn!(key = %event.cache_key(), error = %e, "Failed to acknowledge invalidation message");
                    return DeliveryOutcome::Unsettled;
                }
                DeliveryOutcome::Acked
            }
            Err(e) => {
                error!(
                    entity_type = %E::KIND,
                    event = ?delivery.event,
                    error = %e,
                    "Rejecting invalidation message"
                );
                if let Err(e) = delivery.acker.reject().await {
                    error!(error = %e, "Failed to reject invalidation message");
                }
                DeliveryOutcome::Rejected
            }
        }
    }

    async fn process(&self, delivery: &Delivery) -> Result<InvalidationEvent> {
        let event = InvalidationEvent::from_slice(&delivery.payload)?;

        if let Some(header) = &delivery.event {
            let routed: ChangeKind = header.parse()?;
            if routed != event.event {
                return Err(Error::invalidation(format!(
                    "Event header '{routed}' does not match payload event '{}'",
                    event.event
                )));
            }
        }

        self.apply(&event).await?;
        Ok(event)
    }

    /// Apply one event to the cache
    pub async fn apply(&self, event: &InvalidationEvent) -> Result<()> {
        if event.entity_type != E::KIND {
            return Err(Error::invalidation(format!(
                "Event for '{}' delivered to the '{}' consumer",
                event.entity_type,
                E::KIND
            )));
        }

        let key = event.cache_key().to_string();
        match event.event {
            ChangeKind::Deleted => {
                let existed = self.cache.delete(&key).await?;
                debug!(key = %key, existed, "Removed cache entry");
            }
            ChangeKind::Updated => {
                let entity = Self::snapshot(event)?;
                let json = serde_json::to_string(&entity)?;
                self.cache.set_json(&key, &json, self.cache_config).await?;
                debug!(key = %key, "Refreshed cache entry from snapshot");
            }
        }
        Ok(())
    }

    fn snapshot(event: &InvalidationEvent) -> Result<E> {
        let snapshot = event.snapshot.clone().ok_or_else(|| {
            Error::invalidation(format!(
                "Updated event for {} carries no snapshot",
                event.cache_key()
            ))
        })?;
        let entity: E = serde_json::from_value(snapshot).map_err(|e| {
            Error::invalidation(format!(
                "Snapshot for {} does not decode: {e}",
                event.cache_key()
            ))
        })?;
        if entity.entity_id() != event.entity_id {
            return Err(Error::invalidation(format!(
                "Snapshot id {} does not match event id {}",
                entity.entity_id(),
                event.entity_id
            )));
        }
        Ok(entity)
    }
}

impl<E: RemoteEntity> std::fmt::Debug for InvalidationConsumer<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InvalidationConsumer")
            .field("entity_type", &E::KIND)
            .field("cache", &self.cache.provider_name())
            .field("cache_config", &self.cache_config)
            .finish()
    }
}
