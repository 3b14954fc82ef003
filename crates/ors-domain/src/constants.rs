//! Domain layer constants
//!
//! Values shared by the lookup client, the fallback policy and the
//! invalidation consumer. Infrastructure defaults live in
//! `ors_infrastructure::constants`.

// ============================================================================
// CACHE KEY CONSTANTS
// ============================================================================

/// Separator between entity type and id in cache keys (`product:{id}`)
pub const CACHE_KEY_SEPARATOR: char = ':';

/// Entity type name for users
pub const USER_ENTITY_TYPE: &str = "user";

/// Entity type name for products
pub const PRODUCT_ENTITY_TYPE: &str = "product";

// ============================================================================
// CACHE TTL CONSTANTS
// ============================================================================

/// Default absolute expiration for cached entities (seconds)
pub const CACHE_ABSOLUTE_TTL_SECS: u64 = 400;

/// Default sliding expiration for cached entities (seconds)
pub const CACHE_SLIDING_TTL_SECS: u64 = 100;

// ============================================================================
// PLACEHOLDER CONSTANTS
// ============================================================================

/// Marker written into every text field of a degraded user
pub const USER_UNAVAILABLE: &str = "Temporarily Unavailable!";

/// Product name of a degraded product
pub const PRODUCT_UNAVAILABLE_NAME: &str = "Temporarily Unavailable";

/// Category of a degraded product
pub const PRODUCT_UNAVAILABLE_CATEGORY: &str = "Unavailable";

/// Image shown for a degraded product
pub const PRODUCT_UNAVAILABLE_IMAGE: &str =
    "https://via.placeholder.com/300x300?text=Product+Unavailable";

// ============================================================================
// MESSAGING CONSTANTS
// ============================================================================

/// Message header carrying the change kind (`updated` / `deleted`)
pub const EVENT_HEADER: &str = "event";

/// Pause after a failed receive before polling the source again (milliseconds)
pub const INVALIDATION_RECEIVE_BACKOFF_MS: u64 = 500;
