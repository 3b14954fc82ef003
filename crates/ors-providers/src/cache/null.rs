//! Null cache provider
//!
//! A cache provider implementation that doesn't store anything.
//! Selected when caching is disabled; every lookup goes to the upstream.

use async_trait::async_trait;
use ors_domain::error::Result;
use ors_domain::ports::{CacheProvider, CacheStats};
use ors_domain::value_objects::CacheEntryConfig;

/// Null cache provider that doesn't store anything
///
/// Always misses on reads and accepts all writes without storing them.
///
/// # Example
///
/// ```rust
/// use ors_providers::cache::NullCacheProvider;
///
/// let provider = NullCacheProvider::new();
/// // All operations succeed but nothing is cached
/// ```
#[derive(Debug, Clone, Default)]
pub struct NullCacheProvider;

impl NullCacheProvider {
    /// Create a new null cache provider
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheProvider for NullCacheProvider {
    async fn get_json(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    async fn set_json(&self, _key: &str, _value: &str, _config: CacheEntryConfig) -> Result<()> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<bool> {
        Ok(false)
    }

    async fn stats(&self) -> Result<CacheStats> {
        Ok(CacheStats::new())
    }

    fn provider_name(&self) -> &str {
        "null"
    }
}
