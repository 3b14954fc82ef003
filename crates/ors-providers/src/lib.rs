//! # Orders Lookup Service - Provider Implementations
//!
//! This crate contains the user-selectable implementations of the ports
//! defined in `ors-domain`.
//!
//! ## Provider Categories
//!
//! | Category | Port | Implementations |
//! |----------|------|-----------------|
//! | Cache | `CacheProvider` | Memory, Redis, Null |
//! | Upstream | `UpstreamTransport` | HTTP (reqwest) |
//! | Invalidation | `InvalidationSource` | Channel, NATS JetStream, Null |
//!
//! ## Feature Flags
//!
//! ```toml
//! [dependencies]
//! ors-providers = { version = "0.1", default-features = false, features = ["cache-redis"] }
//! ```

// Re-export ors-domain types commonly used with providers
pub use ors_domain::error::{Error, Result};
pub use ors_domain::ports::{CacheProvider, InvalidationSource, UpstreamTransport};

/// Provider-specific constants
pub mod constants;

/// Cache provider implementations
///
/// Implements `CacheProvider` for the shared entity cache.
pub mod cache;

/// Invalidation source implementations
///
/// Implements `InvalidationSource` for message brokers and in-process channels.
pub mod events;

/// Upstream HTTP transport
///
/// Implements `UpstreamTransport` over reqwest.
pub mod http;
