//! Cache store trait definition

use super::errors::CacheResult;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Key/value store holding recent load samples
///
/// Implemented by concrete cache providers (in-memory, no-op) and by
/// host applications wrapping their own cache. The trait is object safe so a
/// handle can live inside configuration as [`CacheHandle`].
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Read a value from the cache by key
    ///
    /// Returns `Ok(Some(value))` on a hit and `Ok(None)` on a miss. A stored
    /// `0.0` is a hit, not a miss.
    async fn read(&self, key: &str) -> CacheResult<Option<f64>>;

    /// Write a value to the cache with a TTL
    async fn write(&self, key: &str, value: f64, ttl: Duration) -> CacheResult<()>;

    /// Get the name of the cache provider
    fn provider_name(&self) -> &'static str;
}

/// Shared handle to a cache store, as held by configuration
pub type CacheHandle = Arc<dyn CacheStore>;
