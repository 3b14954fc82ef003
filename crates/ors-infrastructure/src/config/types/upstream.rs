//! Upstream configuration types
//!
//! One section per remote service: where it lives, how calls to it are
//! guarded, how long its answers stay cached and where its change events
//! come from.

use crate::constants::{
    PRODUCTS_DEFAULT_BASE_URL, PRODUCTS_DEFAULT_RESOURCE_PATH, PRODUCTS_DEFAULT_STREAM,
    USERS_DEFAULT_BASE_URL, USERS_DEFAULT_RESOURCE_PATH, USERS_DEFAULT_STREAM,
};
use ors_domain::constants::{CACHE_ABSOLUTE_TTL_SECS, CACHE_SLIDING_TTL_SECS};
use ors_domain::value_objects::{CacheEntryConfig, UpstreamPolicyConfig};
use serde::{Deserialize, Serialize};

/// Expiration of cached entities of one upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamCacheConfig {
    /// Lifetime measured from the write (seconds)
    pub absolute_ttl_secs: u64,
    /// Idle time after which an entry expires (seconds, 0 disables)
    pub sliding_ttl_secs: u64,
}

impl Default for UpstreamCacheConfig {
    fn default() -> Self {
        Self {
            absolute_ttl_secs: CACHE_ABSOLUTE_TTL_SECS,
            sliding_ttl_secs: CACHE_SLIDING_TTL_SECS,
        }
    }
}

impl UpstreamCacheConfig {
    /// Entry settings used by the lookup client and the consumer
    pub fn entry_config(&self) -> CacheEntryConfig {
        CacheEntryConfig::from_secs(self.absolute_ttl_secs, self.sliding_ttl_secs)
    }
}

/// Invalidation events of one upstream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvalidationConfig {
    /// Run a consumer for this upstream
    pub enabled: bool,
    /// Stream carrying the change events
    pub stream: String,
}

/// Settings of one remote service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Scheme, host and port
    pub base_url: String,
    /// Path segment before the entity id
    pub resource_path: String,
    /// Resilience policy
    pub policy: UpstreamPolicyConfig,
    /// Cache expiration
    pub cache: UpstreamCacheConfig,
    /// Change events
    pub invalidation: InvalidationConfig,
}

impl UpstreamConfig {
    /// Defaults for the users directory
    pub fn users() -> Self {
        Self {
            base_url: USERS_DEFAULT_BASE_URL.to_string(),
            resource_path: USERS_DEFAULT_RESOURCE_PATH.to_string(),
            policy: UpstreamPolicyConfig::users(),
            cache: UpstreamCacheConfig::default(),
            invalidation: InvalidationConfig {
                enabled: true,
                stream: USERS_DEFAULT_STREAM.to_string(),
            },
        }
    }

    /// Defaults for the product catalog
    pub fn products() -> Self {
        Self {
            base_url: PRODUCTS_DEFAULT_BASE_URL.to_string(),
            resource_path: PRODUCTS_DEFAULT_RESOURCE_PATH.to_string(),
            policy: UpstreamPolicyConfig::products(),
            cache: UpstreamCacheConfig::default(),
            invalidation: InvalidationConfig {
                enabled: true,
                stream: PRODUCTS_DEFAULT_STREAM.to_string(),
            },
        }
    }
}

/// Both upstreams of the order path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamsConfig {
    /// Users directory
    pub users: UpstreamConfig,
    /// Product catalog
    pub products: UpstreamConfig,
}

impl Default for UpstreamsConfig {
    fn default() -> Self {
        Self {
            users: UpstreamConfig::users(),
            products: UpstreamConfig::products(),
        }
    }
}
