//! In-memory cache provider
//!
//! Concurrent in-process cache built on `DashMap`.
//!
//! ## Features
//!
//! - Absolute expiry measured from the moment an entry is written
//! - Sliding expiry renewed by every successful read
//! - Bounded capacity; expired entries are purged first, then the least
//!   recently read entry is evicted
//!
//! Expiry is measured with `tokio::time::Instant`, so tests running on a
//! paused runtime can move the clock with `tokio::time::advance`.
//!
//! ## Example
//!
//! ```ignore
//! use ors_providers::cache::MemoryCacheProvider;
//!
//! let provider = MemoryCacheProvider::with_capacity(1000);
//! ```

use crate::constants::MEMORY_CACHE_DEFAULT_MAX_ENTRIES;
use async_trait::async_trait;
use dashmap::DashMap;
use ors_domain::error::Result;
use ors_domain::ports::{CacheProvider, CacheStats};
use ors_domain::value_objects::CacheEntryConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

/// A stored document with its expiration bookkeeping
#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    expires_at: Option<Instant>,
    sliding_ttl: Option<Duration>,
    last_access: Instant,
}

impl MemoryEntry {
    fn new(value: &str, config: CacheEntryConfig, now: Instant) -> Self {
        Self {
            value: value.to_string(),
            expires_at: config.absolute_ttl.map(|ttl| now + ttl),
            sliding_ttl: config.sliding_ttl,
            last_access: now,
        }
    }

    /// Earliest instant at which one of the two rules expires the entry
    fn deadline(&self) -> Option<Instant> {
        let sliding = self.sliding_ttl.map(|ttl| self.last_access + ttl);
        match (self.expires_at, sliding) {
            (Some(absolute), Some(sliding)) => Some(absolute.min(sliding)),
            (absolute, sliding) => absolute.or(sliding),
        }
    }

    fn is_expired(&self, now: Instant) -> bool {
        self.deadline().is_some_and(|deadline| now >= deadline)
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
}

/// In-memory cache provider
///
/// Clones share the same underlying map.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    entries: Arc<DashMap<String, MemoryEntry>>,
    counters: Arc<Counters>,
    max_entries: usize,
}

impl Default for MemoryCacheProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCacheProvider {
    /// Create a new memory cache provider with default capacity
    pub fn new() -> Self {
        Self::with_capacity(MEMORY_CACHE_DEFAULT_MAX_ENTRIES)
    }

    /// Create a new memory cache provider holding at most `max_entries`
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            counters: Arc::new(Counters::default()),
            max_entries: max_entries.max(1),
        }
    }

    /// Get the maximum capacity of the cache
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        let purged = before.saturating_sub(self.entries.len());
        if purged > 0 {
            self.counters
                .expired
                .fetch_add(purged as u64, Ordering::Relaxed);
        }
        purged
    }

    fn make_room(&self, key: &str) {
        if self.entries.len() < self.max_entries || self.entries.contains_key(key) {
            return;
        }
        if self.purge_expired() > 0 && self.entries.len() < self.max_entries {
            return;
        }
        let victim = self
            .entries
            .iter()
            .min_by_key(|entry| entry.last_access)
            .map(|entry| entry.key().clone());
        if let Some(victim) = victim {
            debug!(key = %victim, "Evicting least recently read cache entry");
            self.entries.remove(&victim);
        }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        let now = Instant::now();
        let mut expired = false;

        let value = match self.entries.get_mut(key) {
            Some(mut entry) if !entry.is_expired(now) => {
                entry.last_access = now;
                Some(entry.value.clone())
            }
            Some(_) => {
                expired = true;
                None
            }
            None => None,
        };

        if expired && self
            .entries
            .remove_if(key, |_, entry| entry.is_expired(now))
            .is_some()
        {
            self.counters.expired.fetch_add(1, Ordering::Relaxed);
        }

        let counter = if value.is_some() {
            &self.counters.hits
        } else {
            &self.counters.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);

        Ok(value)
    }

    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()> {
        self.make_room(key);
        self.entries.insert(
            key.to_string(),
            MemoryEntry::new(value, config, Instant::now()),
        );
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let now = Instant::now();
        Ok(self
            .entries
            .remove(key)
            .is_some_and(|(_, entry)| !entry.is_expired(now)))
    }

    async fn stats(&self) -> Result<CacheStats> {
        Ok(CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            entries: self.entries.len() as u64,
            expired: self.counters.expired.load(Ordering::Relaxed),
        })
    }

    fn provider_name(&self) -> &str {
        "memory"
    }
}
