//! Cache Provider Port
//!
//! Port for the shared cache store. Implementations: in-memory, Redis and
//! a null store that disables caching.

use crate::error::Result;
use crate::value_objects::CacheEntryConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Cache Operation Statistics
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses (absent or expired)
    pub misses: u64,
    /// Number of entries currently stored
    pub entries: u64,
    /// Number of entries evicted on read because they had expired
    pub expired: u64,
}

impl CacheStats {
    /// Create empty cache statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Hit rate from 0.0 to 1.0
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Cache Provider Port
///
/// Stores serialized values under string keys with per-entry absolute and
/// sliding expiration.
///
/// # Contract
///
/// - `get_json` checks both expiry rules before reporting a hit; an expired
///   entry is evicted and reported absent. A hit resets the sliding window.
/// - Concurrent operations on one key never corrupt the entry; the last
///   writer wins.
/// - Errors mean the store is unavailable. Callers on the lookup path treat
///   them as a miss, never as fatal.
///
/// # Example
///
/// ```ignore
/// let config = CacheEntryConfig::default();
/// cache.set_json("user:42", &user_json, config).await?;
///
/// if let Some(json) = cache.get_json("user:42").await? {
///     let user: UserDto = serde_json::from_str(&json)?;
/// }
/// ```
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug {
    /// Get a value; `None` if absent or expired
    async fn get_json(&self, key: &str) -> Result<Option<String>>;

    /// Store a value, replacing any previous entry under the key
    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()>;

    /// Remove a value
    ///
    /// Returns true if an entry was removed. Removing an absent key is not
    /// an error.
    async fn delete(&self, key: &str) -> Result<bool>;

    /// Get cache statistics
    async fn stats(&self) -> Result<CacheStats>;

    /// Get the name/identifier of this provider implementation
    fn provider_name(&self) -> &str;
}
