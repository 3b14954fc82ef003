//! Invalidation Source Port
//!
//! Message sources deliver raw invalidation messages with manual
//! acknowledgment. A delivery is either acknowledged after the cache
//! mutation succeeded, or rejected without requeue.

use crate::error::Result;
use async_trait::async_trait;

/// Acknowledgment handle of one delivered message
#[async_trait]
pub trait DeliveryAcker: Send + Sync {
    /// Confirm the message was processed
    async fn ack(&self) -> Result<()>;

    /// Drop the message without redelivery
    async fn reject(&self) -> Result<()>;
}

/// One message received from the broker
pub struct Delivery {
    /// Raw message body (JSON `InvalidationEvent`)
    pub payload: Vec<u8>,
    /// Value of the `event` routing header, if the transport carries one
    pub event: Option<String>,
    /// Acknowledgment handle
    pub acker: Box<dyn DeliveryAcker>,
}

impl Delivery {
    /// Create a delivery
    pub fn new(payload: Vec<u8>, event: Option<String>, acker: Box<dyn DeliveryAcker>) -> Self {
        Self {
            payload,
            event,
            acker,
        }
    }
}

impl std::fmt::Debug for Delivery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Delivery")
            .field("payload_len", &self.payload.len())
            .field("event", &self.event)
            .finish_non_exhaustive()
    }
}

/// Source of invalidation messages for one queue
///
/// `next_delivery` blocks until a message arrives; `None` means the source
/// is closed and the consumer loop should stop. An `Err` is a transient
/// receive failure: the consumer logs it, pauses briefly and keeps reading.
#[async_trait]
pub trait InvalidationSource: Send {
    /// Receive the next message
    async fn next_delivery(&mut self) -> Option<Result<Delivery>>;

    /// Name of the queue, used in logs
    fn source_name(&self) -> &str;
}
