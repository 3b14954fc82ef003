//! Invalidation Source Implementations
//!
//! Feed raw entity-change messages to the invalidation consumer.
//!
//! ## Available Sources
//!
//! | Source | Type | Description |
//! |--------|------|-------------|
//! | NullInvalidationSource | Disabled | Yields nothing and ends immediately |
//! | ChannelInvalidationSource | In-Process | tokio mpsc with observable ack decisions |
//! | NatsInvalidationSource | Distributed | NATS JetStream durable pull consumer |

pub mod channel;
#[cfg(feature = "events-nats")]
pub mod nats;
pub mod null;

// Re-export sources
pub use channel::{AckDecision, ChannelInvalidationSource, ChannelPublisher, PendingAck};
#[cfg(feature = "events-nats")]
pub use nats::{NatsInvalidationSource, NatsSourceConfig};
pub use null::NullInvalidationSource;

// Re-export port traits from the domain layer
pub use ors_domain::ports::{Delivery, DeliveryAcker, InvalidationSource};
