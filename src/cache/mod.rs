//! # Cache Port
//!
//! Short-lived storage for load samples so that bursts of health checks do not
//! turn into bursts of `count(*)` queries against a database that is already busy.
//!
//! ## Architecture
//!
//! ```text
//! CacheHandle = Arc<dyn CacheStore>
//!   ├── MemoryCache   <- DashMap with per-entry TTL, single process
//!   ├── NoOpCache     <- Always-miss, always-succeed
//!   └── (host cache)  <- anything implementing CacheStore
//! ```
//!
//! Keys are `load_pct:<database identity>`; see [`cache_key`].

pub mod errors;
pub mod providers;
pub mod traits;

pub use errors::{CacheError, CacheResult};
pub use providers::{MemoryCache, NoOpCache};
pub use traits::{CacheHandle, CacheStore};

/// Prefix of every load sample key
pub const CACHE_KEY_PREFIX: &str = "load_pct:";

/// Cache key under which the load sample for `database_identity` is stored
///
/// The format is stable so operators can inspect entries with external tools.
pub fn cache_key(database_identity: &str) -> String {
    format!("{CACHE_KEY_PREFIX}{database_identity}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_format() {
        assert_eq!(cache_key("primary"), "load_pct:primary");
        assert_eq!(cache_key("animals"), "load_pct:animals");
    }
}
