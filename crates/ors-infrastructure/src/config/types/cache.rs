//! Cache configuration types

use ors_providers::constants::MEMORY_CACHE_DEFAULT_MAX_ENTRIES;
use serde::{Deserialize, Serialize};

/// Cache store backends
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// In-process concurrent map
    #[default]
    Memory,
    /// Distributed cache shared by every instance (Redis)
    Redis,
    /// Caching disabled
    Null,
}

/// Shared cache store configuration
///
/// Expiration rules are set per upstream, see
/// [`UpstreamCacheConfig`](super::UpstreamCacheConfig).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache backend
    pub provider: CacheBackend,

    /// Redis URL (for the Redis backend)
    pub redis_url: Option<String>,

    /// Entry limit of the in-memory backend
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: CacheBackend::Memory,
            redis_url: None,
            max_entries: MEMORY_CACHE_DEFAULT_MAX_ENTRIES,
        }
    }
}

impl CacheConfig {
    /// Configuration for a Redis backend
    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            provider: CacheBackend::Redis,
            redis_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Configuration with caching disabled
    pub fn null() -> Self {
        Self {
            provider: CacheBackend::Null,
            ..Default::default()
        }
    }
}
