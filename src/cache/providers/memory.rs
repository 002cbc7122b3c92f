//! In-memory cache provider
//!
//! Provides in-process caching with per-entry TTL for single-instance
//! deployments and tests. Expired entries are dropped lazily on read.
//!
//! **Important**: This cache is NOT distributed. Each process samples the
//! database independently, so N processes issue up to N probes per TTL window.

use crate::cache::errors::CacheResult;
use crate::cache::traits::CacheStore;
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct Entry {
    value: f64,
    /// `None` when the TTL reaches past what `Instant` can represent
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.map_or(true, |expires_at| expires_at > now)
    }
}

/// In-memory cache store backed by a `DashMap`
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, Entry>,
}

impl MemoryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of entries, including ones that expired but were not read since
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn read(&self, key: &str) -> CacheResult<Option<f64>> {
        // Copy out before removing: holding a shard ref across remove deadlocks.
        let entry = self.entries.get(key).map(|e| *e);

        match entry {
            Some(entry) if entry.is_live(Instant::now()) => {
                debug!(key = key, value = entry.value, "Cache HIT (memory)");
                Ok(Some(entry.value))
            }
            Some(_) => {
                self.entries
                    .remove_if(key, |_, e| !e.is_live(Instant::now()));
                debug!(key = key, "Cache EXPIRED (memory)");
                Ok(None)
            }
            None => {
                debug!(key = key, "Cache MISS (memory)");
                Ok(None)
            }
        }
    }

    async fn write(&self, key: &str, value: f64, ttl: Duration) -> CacheResult<()> {
        let expires_at = Instant::now().checked_add(ttl);
        self.entries
            .insert(key.to_string(), Entry { value, expires_at });

        debug!(
            key = key,
            value = value,
            ttl_seconds = ttl.as_secs(),
            "Cache SET (memory)"
        );
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}
