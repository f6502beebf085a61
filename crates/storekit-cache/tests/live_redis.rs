//! Tests against a running Redis server.
//!
//! Ignored by default. Run with `cargo test -- --ignored` and point
//! `STOREKIT_REDIS_URL` at a scratch database: the cache flushes it.

use std::sync::Arc;
use storekit_cache::{Cache, CacheOptions, FlushScope, KeyValueStore, RedisStore, STORE};

async fn store() -> Arc<RedisStore> {
    let url = std::env::var("STOREKIT_REDIS_URL")
        .unwrap_or_else(|_| "redis://127.0.0.1:6379/15".to_string());
    Arc::new(RedisStore::open(&url).await.expect("redis not reachable"))
}

#[tokio::test]
#[ignore]
async fn live_store_and_get() {
    let cache = Cache::new(store().await).await.unwrap();

    let key = cache.store("foo").await.unwrap();
    assert_eq!(cache.get_str(&key).await.unwrap(), Some("foo".to_string()));

    let key = cache.store(7).await.unwrap();
    assert_eq!(cache.get_int(&key).await.unwrap(), Some(7));
    assert_eq!(cache.get("missing").await.unwrap(), None);
    assert_eq!(cache.call_count(STORE).await.unwrap(), 2);
}

#[tokio::test]
#[ignore]
async fn live_namespace_flush() {
    let store = store().await;
    store.set("storekit-test:stale", b"x").await.unwrap();
    store.set("storekit-foreign", b"y").await.unwrap();

    let options = CacheOptions {
        flush: FlushScope::Namespace,
        key_prefix: Some("storekit-test".into()),
        track_history: true,
    };
    let cache = Cache::with_options(store.clone(), options).await.unwrap();
    assert!(!store.exists("storekit-test:stale").await.unwrap());
    assert!(store.exists("storekit-foreign").await.unwrap());

    cache.store("foo").await.unwrap();
    assert_eq!(cache.replay(STORE).await.unwrap().calls.len(), 1);
}
