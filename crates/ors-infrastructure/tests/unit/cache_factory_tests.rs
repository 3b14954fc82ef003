//! Cache store selection tests

use ors_domain::value_objects::CacheEntryConfig;
use ors_infrastructure::cache::create_cache_provider;
use ors_infrastructure::config::{CacheBackend, CacheConfig};

#[tokio::test]
async fn test_memory_backend_by_default() {
    let cache = create_cache_provider(&CacheConfig::default()).unwrap();
    assert_eq!(cache.provider_name(), "memory");

    cache
        .set_json("product:1", "{}", CacheEntryConfig::default())
        .await
        .unwrap();
    assert_eq!(cache.get_json("product:1").await.unwrap().as_deref(), Some("{}"));
}

#[tokio::test]
async fn test_null_backend_stores_nothing() {
    let cache = create_cache_provider(&CacheConfig::null()).unwrap();
    assert_eq!(cache.provider_name(), "null");

    cache
        .set_json("user:1", "{}", CacheEntryConfig::default())
        .await
        .unwrap();
    assert!(cache.get_json("user:1").await.unwrap().is_none());
}

#[cfg(feature = "cache-redis")]
#[test]
fn test_redis_backend_connects_lazily() {
    let cache = create_cache_provider(&CacheConfig::redis("redis://127.0.0.1:1")).unwrap();
    assert_eq!(cache.provider_name(), "redis");
}

#[test]
fn test_redis_backend_requires_url() {
    let config = CacheConfig {
        provider: CacheBackend::Redis,
        ..Default::default()
    };
    assert!(create_cache_provider(&config).is_err());
}
