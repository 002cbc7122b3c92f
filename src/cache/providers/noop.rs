//! No-op cache provider
//!
//! Always misses, always succeeds. Every health check then samples the
//! database directly, which keeps shedding live when no cache is available.

use crate::cache::errors::CacheResult;
use crate::cache::traits::CacheStore;
use async_trait::async_trait;
use std::time::Duration;

/// No-op cache store that never caches anything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCache;

impl NoOpCache {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CacheStore for NoOpCache {
    async fn read(&self, _key: &str) -> CacheResult<Option<f64>> {
        Ok(None)
    }

    async fn write(&self, _key: &str, _value: f64, _ttl: Duration) -> CacheResult<()> {
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "noop"
    }
}
