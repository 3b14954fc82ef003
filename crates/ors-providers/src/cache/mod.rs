//! Cache Provider Implementations
//!
//! Provides the store behind the cache-aside lookup path.
//!
//! ## Available Providers
//!
//! | Provider | Type | Description |
//! |----------|------|-------------|
//! | [`NullCacheProvider`] | Disabled | Stores nothing, every read misses |
//! | [`MemoryCacheProvider`] | Local | Concurrent map with absolute and sliding expiry |
//! | [`RedisCacheProvider`] | Distributed | Redis hash entries shared by all instances |
//!
//! ## Provider Selection Guide
//!
//! - **Testing**: Use `MemoryCacheProvider` (it follows tokio's clock)
//! - **Single Instance**: Use `MemoryCacheProvider`
//! - **Multi Instance**: Use `RedisCacheProvider` so invalidation reaches every reader

pub mod memory;
pub mod null;
#[cfg(feature = "cache-redis")]
pub mod redis;

// Re-export for convenience
pub use memory::MemoryCacheProvider;
pub use null::NullCacheProvider;
#[cfg(feature = "cache-redis")]
pub use redis::RedisCacheProvider;

// Re-export domain types used by cache providers
pub use ors_domain::ports::CacheStats;
pub use ors_domain::value_objects::CacheEntryConfig;
