//! Domain Value Objects
//!
//! Immutable values without identity used across the lookup path.
//!
//! ## Value Objects
//!
//! | Value Object | Description |
//! |--------------|-------------|
//! | [`EntityKind`] | Which upstream entity type a lookup targets |
//! | [`CacheKey`] | `{entity-type}:{id}` key shared by lookups and invalidation |
//! | [`CacheEntryConfig`] | Absolute and sliding expiration of a cache entry |
//! | [`UpstreamPolicyConfig`] | Resilience parameters for one upstream |
//! | [`RequestContext`] | Caller-scoped data forwarded to the upstream |
//! | [`Lookup`] | Result of a lookup: found, not found or degraded |

/// Cache entry expiration settings
pub mod cache;
/// Entity kinds and cache keys
pub mod entity;
/// Lookup results
pub mod lookup;
/// Per-upstream resilience parameters
pub mod policy;
/// Request-scoped context
pub mod request;

pub use cache::CacheEntryConfig;
pub use entity::{CacheKey, EntityKind};
pub use lookup::Lookup;
pub use policy::UpstreamPolicyConfig;
pub use request::RequestContext;
