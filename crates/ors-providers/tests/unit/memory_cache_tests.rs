//! Tests for the in-memory cache provider
//!
//! Expiry tests run on a paused tokio clock.

use ors_domain::ports::CacheProvider;
use ors_domain::value_objects::CacheEntryConfig;
use ors_providers::cache::MemoryCacheProvider;
use std::time::Duration;
use tokio::time::advance;

const KEY: &str = "product:6f1c0d2e-8a43-4b7e-9c55-0d1e2f3a4b5c";

#[tokio::test]
async fn test_set_get_delete() {
    let cache = MemoryCacheProvider::new();

    cache
        .set_json(KEY, r#"{"productName":"Lamp"}"#, CacheEntryConfig::default())
        .await
        .expect("set");
    let value = cache.get_json(KEY).await.expect("get");
    assert_eq!(value.as_deref(), Some(r#"{"productName":"Lamp"}"#));

    assert!(cache.delete(KEY).await.expect("delete"));
    assert!(cache.get_json(KEY).await.expect("get").is_none());
}

#[tokio::test]
async fn test_delete_absent_key_is_not_an_error() {
    let cache = MemoryCacheProvider::new();
    assert!(!cache.delete(KEY).await.expect("delete"));
    assert!(!cache.delete(KEY).await.expect("delete twice"));
}

#[tokio::test]
async fn test_set_overwrites_existing_entry() {
    let cache = MemoryCacheProvider::new();
    let config = CacheEntryConfig::default();
    cache.set_json(KEY, "1", config).await.expect("set");
    cache.set_json(KEY, "2", config).await.expect("overwrite");

    assert_eq!(cache.get_json(KEY).await.expect("get").as_deref(), Some("2"));
    assert_eq!(cache.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_absolute_expiry_caps_sliding_renewal() {
    let cache = MemoryCacheProvider::new();
    cache
        .set_json(KEY, "{}", CacheEntryConfig::default())
        .await
        .expect("set");

    // Read every 90s: each read renews the 100s sliding window.
    for _ in 0..4 {
        advance(Duration::from_secs(90)).await;
        assert!(cache.get_json(KEY).await.expect("get").is_some());
    }

    // 401s after the write the absolute limit has passed.
    advance(Duration::from_secs(41)).await;
    assert!(cache.get_json(KEY).await.expect("get").is_none());

    let stats = cache.stats().await.expect("stats");
    assert_eq!(stats.hits, 4);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.expired, 1);
    assert_eq!(stats.entries, 0);
}

#[tokio::test(start_paused = true)]
async fn test_sliding_expiry_without_reads() {
    let cache = MemoryCacheProvider::new();
    cache
        .set_json(KEY, "{}", CacheEntryConfig::default())
        .await
        .expect("set");

    advance(Duration::from_secs(99)).await;
    assert!(cache.get_json(KEY).await.expect("get").is_some());

    advance(Duration::from_secs(101)).await;
    assert!(cache.get_json(KEY).await.expect("get").is_none());
}

#[tokio::test(start_paused = true)]
async fn test_unbounded_entry_never_expires() {
    let cache = MemoryCacheProvider::new();
    cache
        .set_json(KEY, "{}", CacheEntryConfig::unbounded())
        .await
        .expect("set");

    advance(Duration::from_secs(86_400)).await;
    assert!(cache.get_json(KEY).await.expect("get").is_some());
}

#[tokio::test(start_paused = true)]
async fn test_purge_expired_drops_only_stale_entries() {
    let cache = MemoryCacheProvider::new();
    cache
        .set_json("user:a", "{}", CacheEntryConfig::from_secs(10, 0))
        .await
        .expect("set");
    cache
        .set_json("user:b", "{}", CacheEntryConfig::from_secs(60, 0))
        .await
        .expect("set");

    advance(Duration::from_secs(30)).await;
    assert_eq!(cache.purge_expired(), 1);
    assert_eq!(cache.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_capacity_evicts_least_recently_read() {
    let cache = MemoryCacheProvider::with_capacity(2);
    let config = CacheEntryConfig::default();

    cache.set_json("user:a", "a", config).await.expect("set a");
    advance(Duration::from_secs(1)).await;
    cache.set_json("user:b", "b", config).await.expect("set b");
    advance(Duration::from_secs(1)).await;
    cache.get_json("user:a").await.expect("read a");

    cache.set_json("user:c", "c", config).await.expect("set c");

    assert_eq!(cache.len(), 2);
    assert!(cache.get_json("user:b").await.expect("get b").is_none());
    assert!(cache.get_json("user:a").await.expect("get a").is_some());
    assert!(cache.get_json("user:c").await.expect("get c").is_some());
}

#[tokio::test]
async fn test_clones_share_entries() {
    let cache = MemoryCacheProvider::new();
    let other = cache.clone();
    cache
        .set_json(KEY, "{}", CacheEntryConfig::default())
        .await
        .expect("set");
    assert!(other.get_json(KEY).await.expect("get").is_some());
    assert_eq!(other.provider_name(), "memory");
}
