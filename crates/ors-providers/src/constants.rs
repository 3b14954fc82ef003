//! Provider Constants
//!
//! Constants specific to provider implementations. These are separated from
//! domain constants (which live in ors-domain) and infrastructure constants.

// ============================================================================
// CACHE PROVIDER CONSTANTS
// ============================================================================

/// Default maximum number of entries held by the in-memory cache
pub const MEMORY_CACHE_DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Default Redis connection URL
pub const REDIS_DEFAULT_URL: &str = "redis://localhost:6379";

/// Hash field holding the absolute expiry (unix millis, -1 when unset)
pub const REDIS_FIELD_ABSOLUTE_EXPIRY: &str = "absexp";

/// Hash field holding the sliding window (millis, -1 when unset)
pub const REDIS_FIELD_SLIDING_EXPIRY: &str = "sldexp";

/// Hash field holding the cached JSON document
pub const REDIS_FIELD_DATA: &str = "data";

/// Sentinel stored for an expiration rule that is not set
pub const REDIS_NOT_PRESENT: i64 = -1;

// ============================================================================
// HTTP TRANSPORT CONSTANTS
// ============================================================================

/// Default request timeout at the HTTP layer (seconds)
///
/// The resilience engine applies the tighter per-upstream timeout on top.
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default idle connection timeout (seconds)
pub const HTTP_POOL_IDLE_TIMEOUT_SECS: u64 = 90;

/// Default maximum idle connections per host
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// Header carrying the caller's credential
pub const HTTP_HEADER_AUTHORIZATION: &str = "Authorization";

// ============================================================================
// INVALIDATION SOURCE CONSTANTS
// ============================================================================

/// Default in-process channel capacity
pub const CHANNEL_DEFAULT_CAPACITY: usize = 1024;

/// Default NATS server URL
pub const NATS_DEFAULT_URL: &str = "nats://localhost:4222";
