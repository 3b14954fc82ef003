//! In-process invalidation channel
//!
//! A tokio mpsc channel standing in for a broker. Each published message
//! hands back a [`PendingAck`] that resolves once the consumer acknowledged
//! or rejected it, which makes the ack protocol observable in tests and in
//! single-process deployments.
//!
//! ## Example
//!
//! ```ignore
//! use ors_providers::events::ChannelInvalidationSource;
//!
//! let (publisher, source) = ChannelInvalidationSource::channel("products", 64);
//! let pending = publisher.publish(&event).await?;
//! // ... consumer runs on `source` ...
//! assert_eq!(pending.decision().await, Some(AckDecision::Acked));
//! ```

use crate::constants::CHANNEL_DEFAULT_CAPACITY;
use async_trait::async_trait;
use ors_domain::error::{Error, Result};
use ors_domain::events::InvalidationEvent;
use ors_domain::ports::{Delivery, DeliveryAcker, InvalidationSource};
use tokio::sync::{Mutex, mpsc, oneshot};
use tracing::debug;

/// What the consumer decided about a delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckDecision {
    /// Processed; removed from the queue
    Acked,
    /// Dropped without requeue
    Rejected,
}

/// Handle to the eventual ack decision of one published message
#[derive(Debug)]
pub struct PendingAck {
    receiver: oneshot::Receiver<AckDecision>,
}

impl PendingAck {
    /// Wait for the decision
    ///
    /// Returns `None` if the delivery was dropped without a decision.
    pub async fn decision(self) -> Option<AckDecision> {
        self.receiver.await.ok()
    }
}

struct ChannelMessage {
    payload: Vec<u8>,
    event: Option<String>,
    reply: oneshot::Sender<AckDecision>,
}

struct ChannelAcker {
    reply: Mutex<Option<oneshot::Sender<AckDecision>>>,
}

impl ChannelAcker {
    async fn settle(&self, decision: AckDecision) -> Result<()> {
        let reply = self
            .reply
            .lock()
            .await
            .take()
            .ok_or_else(|| Error::invalidation("Delivery already settled"))?;
        // The publisher may have stopped waiting; the decision still stands.
        let _ = reply.send(decision);
        Ok(())
    }
}

#[async_trait]
impl DeliveryAcker for ChannelAcker {
    async fn ack(&self) -> Result<()> {
        self.settle(AckDecision::Acked).await
    }

    async fn reject(&self) -> Result<()> {
        self.settle(AckDecision::Rejected).await
    }
}

/// Sending half of an in-process invalidation channel
#[derive(Debug, Clone)]
pub struct ChannelPublisher {
    sender: mpsc::Sender<ChannelMessage>,
}

impl ChannelPublisher {
    /// Publish an event, setting the `event` header from its change kind
    pub async fn publish(&self, event: &InvalidationEvent) -> Result<PendingAck> {
        self.publish_raw(event.to_vec()?, Some(event.event.as_str()))
            .await
    }

    /// Publish an arbitrary payload with an optional `event` header
    pub async fn publish_raw(&self, payload: Vec<u8>, event: Option<&str>) -> Result<PendingAck> {
        let (reply, receiver) = oneshot::channel();
        self.sender
            .send(ChannelMessage {
                payload,
                event: event.map(str::to_string),
                reply,
            })
            .await
            .map_err(|_| Error::invalidation("Invalidation channel closed"))?;
        Ok(PendingAck { receiver })
    }
}

impl std::fmt::Debug for ChannelMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelMessage")
            .field("payload_len", &self.payload.len())
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

/// Receiving half of an in-process invalidation channel
///
/// Ends once every [`ChannelPublisher`] has been dropped.
#[derive(Debug)]
pub struct ChannelInvalidationSource {
    name: String,
    receiver: mpsc::Receiver<ChannelMessage>,
}

impl ChannelInvalidationSource {
    /// Create a connected publisher and source
    pub fn channel(name: impl Into<String>, capacity: usize) -> (ChannelPublisher, Self) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (
            ChannelPublisher { sender },
            Self {
                name: name.into(),
                receiver,
            },
        )
    }

    /// Create a channel with the default capacity
    pub fn with_default_capacity(name: impl Into<String>) -> (ChannelPublisher, Self) {
        Self::channel(name, CHANNEL_DEFAULT_CAPACITY)
    }
}

#[async_trait]
impl InvalidationSource for ChannelInvalidationSource {
    async fn next_delivery(&mut self) -> Option<Result<Delivery>> {
        let message = self.receiver.recv().await?;
        debug!(source = %self.name, event = ?message.event, "Received invalidation message");
        let acker = ChannelAcker {
            reply: Mutex::new(Some(message.reply)),
        };
        Some(Ok(Delivery::new(
            message.payload,
            message.event,
            Box::new(acker),
        )))
    }

    fn source_name(&self) -> &str {
        &self.name
    }
}
