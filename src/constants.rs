//! # System Constants
//!
//! Fixed values that define the operational boundaries of the load probe.

use std::time::Duration;

/// Server-side limit on the session count query
///
/// The probe must never be slower than the thing it monitors, so this is
/// small and not configurable.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(1);

/// Client-side backstop for a probe whose server never answers
pub const QUERY_TIMEOUT_BACKSTOP: Duration = Duration::from_secs(2);

/// Threshold used when neither the default nor an override sets one
pub const DEFAULT_THRESHOLD: f64 = 0.75;

/// Cache TTL used when neither the default nor an override sets one
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Load reported when the cache cannot be read or written
pub const FAIL_OPEN_LOAD: f64 = 0.0;

/// Load reported when the database cannot be sampled
pub const FAIL_CLOSED_LOAD: f64 = 1.0;

/// Observability event names
pub mod events {
    pub const LOAD_SAMPLED: &str = "db_load_health.load_pct";
}
