//! Cache entry expiration settings

use crate::constants::{CACHE_ABSOLUTE_TTL_SECS, CACHE_SLIDING_TTL_SECS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cache Entry Configuration
///
/// An entry is absent once it is older than `absolute_ttl` or has not been
/// read for `sliding_ttl`, whichever comes first. `None` disables a rule.
///
/// # Example
///
/// ```
/// use ors_domain::CacheEntryConfig;
/// use std::time::Duration;
///
/// let config = CacheEntryConfig::default()
///     .with_absolute_ttl_secs(400)
///     .with_sliding_ttl_secs(100);
/// assert_eq!(config.initial_ttl(), Some(Duration::from_secs(100)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntryConfig {
    /// Time to live measured from the write
    pub absolute_ttl: Option<Duration>,
    /// Idle time after which the entry expires; reset on every hit
    pub sliding_ttl: Option<Duration>,
}

impl CacheEntryConfig {
    /// Entry that never expires on its own
    pub fn unbounded() -> Self {
        Self {
            absolute_ttl: None,
            sliding_ttl: None,
        }
    }

    /// Create from second values; zero disables the corresponding rule
    pub fn from_secs(absolute_secs: u64, sliding_secs: u64) -> Self {
        Self {
            absolute_ttl: (absolute_secs > 0).then(|| Duration::from_secs(absolute_secs)),
            sliding_ttl: (sliding_secs > 0).then(|| Duration::from_secs(sliding_secs)),
        }
    }

    /// Set the absolute TTL
    pub fn with_absolute_ttl(mut self, ttl: Duration) -> Self {
        self.absolute_ttl = Some(ttl);
        self
    }

    /// Set the absolute TTL in seconds
    pub fn with_absolute_ttl_secs(self, secs: u64) -> Self {
        self.with_absolute_ttl(Duration::from_secs(secs))
    }

    /// Set the sliding TTL
    pub fn with_sliding_ttl(mut self, ttl: Duration) -> Self {
        self.sliding_ttl = Some(ttl);
        self
    }

    /// Set the sliding TTL in seconds
    pub fn with_sliding_ttl_secs(self, secs: u64) -> Self {
        self.with_sliding_ttl(Duration::from_secs(secs))
    }

    /// Lifetime of a freshly written entry: the shorter of both rules
    pub fn initial_ttl(&self) -> Option<Duration> {
        match (self.absolute_ttl, self.sliding_ttl) {
            (Some(a), Some(s)) => Some(a.min(s)),
            (a, s) => a.or(s),
        }
    }
}

impl Default for CacheEntryConfig {
    fn default() -> Self {
        Self::from_secs(CACHE_ABSOLUTE_TTL_SECS, CACHE_SLIDING_TTL_SECS)
    }
}
