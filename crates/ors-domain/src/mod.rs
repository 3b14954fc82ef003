//! # Orders Lookup Service - Domain Layer
//!
//! Core types and port contracts for the resilient, cached lookup of users
//! and products that the order path depends on.
//!
//! ## Module Categories
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`entities`] | Remote entities (users, products) and the order aggregate view |
//! | [`value_objects`] | Cache keys, entity kinds, policy and cache settings |
//! | [`events`] | Invalidation events published by the upstream services |
//! | [`ports`] | Contracts for cache stores, upstream transports and message sources |
//! | [`error`] | Domain error type |
//! | [`constants`] | Domain constants and placeholder values |

pub mod constants;
pub mod entities;
pub mod error;
pub mod events;
pub mod ports;
pub mod value_objects;

// Re-export commonly used types
pub use entities::{EnrichedOrder, Order, OrderItem, ProductDto, RemoteEntity, UserDto};
pub use error::{Error, Result};
pub use events::{ChangeKind, InvalidationEvent};
pub use value_objects::{
    CacheEntryConfig, CacheKey, EntityKind, Lookup, RequestContext, UpstreamPolicyConfig,
};
