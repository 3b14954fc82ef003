//! Infrastructure Ports

/// Invalidation message source port
pub mod invalidation;

pub use invalidation::{Delivery, DeliveryAcker, InvalidationSource};
