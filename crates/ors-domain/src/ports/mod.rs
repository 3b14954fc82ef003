//! Domain Port Interfaces
//!
//! Boundary contracts implemented by `ors-providers` and consumed by the
//! application layer. High-level code depends on these traits only.
//!
//! ## Organization
//!
//! - **providers/** - Cache stores and upstream transports
//! - **infrastructure/** - Message sources feeding the invalidation consumer

/// Infrastructure service ports
pub mod infrastructure;
/// External service provider ports
pub mod providers;

pub use infrastructure::{Delivery, DeliveryAcker, InvalidationSource};
pub use providers::{CacheProvider, CacheStats, UpstreamResponse, UpstreamTransport};
