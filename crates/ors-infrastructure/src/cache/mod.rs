//! Cache store selection
//!
//! Builds the single cache store shared by every lookup client and
//! invalidation consumer of the process.

use crate::config::{CacheBackend, CacheConfig};
use ors_domain::error::Result;
use ors_domain::ports::CacheProvider;
use ors_providers::cache::{MemoryCacheProvider, NullCacheProvider};
use std::sync::Arc;
use tracing::info;

/// Create the configured cache store
///
/// The Redis client connects lazily, so an unreachable server surfaces as
/// cache errors on first use rather than here.
pub fn create_cache_provider(config: &CacheConfig) -> Result<Arc<dyn CacheProvider>> {
    let provider: Arc<dyn CacheProvider> = match config.provider {
        CacheBackend::Memory => Arc::new(MemoryCacheProvider::with_capacity(config.max_entries)),
        CacheBackend::Null => Arc::new(NullCacheProvider::new()),
        CacheBackend::Redis => create_redis_provider(config)?,
    };
    info!(provider = provider.provider_name(), "Cache store created");
    Ok(provider)
}

#[cfg(feature = "cache-redis")]
fn create_redis_provider(config: &CacheConfig) -> Result<Arc<dyn CacheProvider>> {
    use ors_domain::error::Error;
    use ors_providers::cache::RedisCacheProvider;

    let url = config
        .redis_url
        .as_deref()
        .ok_or_else(|| Error::config("Redis URL is required when the Redis cache is selected"))?;
    Ok(Arc::new(RedisCacheProvider::new(url)?))
}

#[cfg(not(feature = "cache-redis"))]
fn create_redis_provider(_config: &CacheConfig) -> Result<Arc<dyn CacheProvider>> {
    Err(ors_domain::error::Error::config(
        "Redis cache support is not compiled in (enable the `cache-redis` feature)",
    ))
}
