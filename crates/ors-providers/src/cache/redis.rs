//! Redis distributed cache provider
//!
//! Distributed cache implementation using Redis as the backend. Every
//! instance reads and writes the same entries, so one invalidation reaches
//! all readers.
//!
//! ## Storage Layout
//!
//! Each entry is a hash with three fields:
//!
//! | Field | Content |
//! |-------|---------|
//! | `absexp` | Absolute expiry as unix milliseconds, `-1` when unset |
//! | `sldexp` | Sliding window in milliseconds, `-1` when unset |
//! | `data` | The cached JSON document |
//!
//! The key TTL is kept at `min(sliding window, time left until absolute
//! expiry)` and refreshed on every hit. The absolute expiry is also checked
//! on read, so an entry never outlives it even if a refresh raced.
//!
//! ## Example
//!
//! ```ignore
//! use ors_providers::cache::RedisCacheProvider;
//!
//! let provider = RedisCacheProvider::new("redis://localhost:6379")?;
//! ```

use crate::constants::{
    REDIS_FIELD_ABSOLUTE_EXPIRY, REDIS_FIELD_DATA, REDIS_FIELD_SLIDING_EXPIRY, REDIS_NOT_PRESENT,
};
use async_trait::async_trait;
use chrono::Utc;
use ors_domain::error::{Error, Result};
use ors_domain::ports::{CacheProvider, CacheStats};
use ors_domain::value_objects::CacheEntryConfig;
use redis::{AsyncCommands, Client, aio::MultiplexedConnection};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::debug;

/// Milliseconds in a duration, saturating at `i64::MAX`
fn millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

/// Key TTL for an entry read or written at `now_ms`
///
/// Returns `None` when neither rule is set (the key must not expire) and
/// `Some(0)` when the absolute expiry already passed.
fn remaining_ttl_ms(absolute_expiry_ms: i64, sliding_ms: i64, now_ms: i64) -> Option<i64> {
    let absolute_left =
        (absolute_expiry_ms != REDIS_NOT_PRESENT).then(|| (absolute_expiry_ms - now_ms).max(0));
    let sliding = (sliding_ms != REDIS_NOT_PRESENT).then_some(sliding_ms);
    match (absolute_left, sliding) {
        (Some(a), Some(s)) => Some(a.min(s)),
        (a, s) => a.or(s),
    }
}

/// Redis cache provider
///
/// Uses multiplexed connections for efficient connection reuse.
#[derive(Clone)]
pub struct RedisCacheProvider {
    client: Client,
    url: String,
    stats: Arc<RwLock<CacheStats>>,
}

impl RedisCacheProvider {
    /// Create a new Redis cache provider with connection string
    ///
    /// # Arguments
    ///
    /// * `connection_string` - Redis connection URL (e.g., "redis://localhost:6379")
    pub fn new(connection_string: &str) -> Result<Self> {
        let client = Client::open(connection_string).map_err(|e| {
            Error::infrastructure_with_source(format!("Failed to create Redis client: {e}"), e)
        })?;

        Ok(Self {
            client,
            url: connection_string.to_string(),
            stats: Arc::new(RwLock::new(CacheStats::new())),
        })
    }

    /// Create a new Redis cache provider with host and port
    pub fn with_host_port(host: &str, port: u16) -> Result<Self> {
        Self::new(&format!("redis://{host}:{port}"))
    }

    /// Get a connection from the pool
    async fn get_connection(&self) -> Result<MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| {
                Error::infrastructure_with_source(format!("Failed to get Redis connection: {e}"), e)
            })
    }

    fn record(&self, hit: bool) {
        if let Ok(mut stats) = self.stats.write() {
            if hit {
                stats.hits += 1;
            } else {
                stats.misses += 1;
            }
        }
    }

    fn record_expired(&self) {
        if let Ok(mut stats) = self.stats.write() {
            stats.expired += 1;
        }
    }
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get_json(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.get_connection().await?;

        let (absolute, sliding, data): (Option<i64>, Option<i64>, Option<String>) =
            redis::cmd("HMGET")
                .arg(key)
                .arg(REDIS_FIELD_ABSOLUTE_EXPIRY)
                .arg(REDIS_FIELD_SLIDING_EXPIRY)
                .arg(REDIS_FIELD_DATA)
                .query_async(&mut conn)
                .await
                .map_err(|e| {
                    Error::infrastructure_with_source(format!("Redis HMGET failed: {e}"), e)
                })?;

        let Some(data) = data else {
            self.record(false);
            return Ok(None);
        };

        let absolute = absolute.unwrap_or(REDIS_NOT_PRESENT);
        let sliding = sliding.unwrap_or(REDIS_NOT_PRESENT);
        let now_ms = Utc::now().timestamp_millis();

        match remaining_ttl_ms(absolute, sliding, now_ms) {
            Some(0) => {
                debug!(key, "Redis entry past its absolute expiry");
                let _: i64 = conn.del(key).await.map_err(|e| {
                    Error::infrastructure_with_source(format!("Redis DEL failed: {e}"), e)
                })?;
                self.record_expired();
                self.record(false);
                return Ok(None);
            }
            Some(ttl) if sliding != REDIS_NOT_PRESENT => {
                let _: bool = conn.pexpire(key, ttl).await.map_err(|e| {
                    Error::infrastructure_with_source(format!("Redis PEXPIRE failed: {e}"), e)
                })?;
            }
            _ => {}
        }

        self.record(true);
        Ok(Some(data))
    }

    async fn set_json(&self, key: &str, value: &str, config: CacheEntryConfig) -> Result<()> {
        let mut conn = self.get_connection().await?;

        let now_ms = Utc::now().timestamp_millis();
        let absolute = config
            .absolute_ttl
            .map_or(REDIS_NOT_PRESENT, |ttl| now_ms.saturating_add(millis(ttl)));
        let sliding = config.sliding_ttl.map_or(REDIS_NOT_PRESENT, millis);

        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("DEL")
            .arg(key)
            .ignore()
            .cmd("HSET")
            .arg(key)
            .arg(REDIS_FIELD_ABSOLUTE_EXPIRY)
            .arg(absolute)
            .arg(REDIS_FIELD_SLIDING_EXPIRY)
            .arg(sliding)
            .arg(REDIS_FIELD_DATA)
            .arg(value)
            .ignore();
        if let Some(ttl) = remaining_ttl_ms(absolute, sliding, now_ms) {
            pipe.cmd("PEXPIRE").arg(key).arg(ttl.max(1)).ignore();
        }

        pipe.query_async::<()>(&mut conn)
            .await
            .map_err(|e| Error::infrastructure_with_source(format!("Redis HSET failed: {e}"), e))
    }

    async fn delete(&self, key: &str) -> Result<bool> {
        let mut conn = self.get_connection().await?;

        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| Error::infrastructure_with_source(format!("Redis DEL failed: {e}"), e))?;
        Ok(deleted > 0)
    }

    async fn stats(&self) -> Result<CacheStats> {
        let mut conn = self.get_connection().await?;

        let dbsize: redis::RedisResult<u64> = redis::cmd("DBSIZE").query_async(&mut conn).await;

        let mut stats = self
            .stats
            .read()
            .map_err(|_| Error::cache("Failed to read cache stats"))?
            .clone();
        stats.entries = dbsize.unwrap_or(0);

        Ok(stats)
    }

    fn provider_name(&self) -> &str {
        "redis"
    }
}

impl std::fmt::Debug for RedisCacheProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCacheProvider")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}
