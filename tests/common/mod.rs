#![allow(dead_code)]

pub mod mocks;
pub mod strategies;

pub use mocks::*;

use db_load_health::cache::{CacheHandle, MemoryCache};
use db_load_health::{ConfigStore, HealthEngine};
use std::sync::Arc;
use std::time::Duration;

/// Cache pre-seeded with `value` for database `identity`
pub async fn seeded_cache(identity: &str, value: f64) -> Arc<MemoryCache> {
    use db_load_health::CacheStore;

    let cache = Arc::new(MemoryCache::new());
    cache
        .write(
            &db_load_health::cache_key(identity),
            value,
            Duration::from_secs(60),
        )
        .await
        .expect("memory cache write");
    cache
}

/// Engine over a fresh store configured with `vcpu_count`, `threshold` and `cache`
pub fn engine_with(vcpu_count: u32, threshold: Option<f64>, cache: CacheHandle) -> HealthEngine {
    let store = Arc::new(ConfigStore::new());
    store.configure(|config| {
        config.vcpu_count(vcpu_count).cache(cache);
        if let Some(threshold) = threshold {
            config.threshold(threshold);
        }
    });
    HealthEngine::new(store)
}
