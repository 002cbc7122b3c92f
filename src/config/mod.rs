//! # Health Configuration
//!
//! Hierarchical configuration for the load probe: one default layer plus
//! optional per-model override layers.
//!
//! ## Architecture
//!
//! - **Layers record only what was set**: [`ConfigLayer`] fields are optional
//! - **Read-time inheritance**: [`resolve`] fills unset override fields from the
//!   default at the moment of lookup, so later changes to the default still
//!   reach overrides that never set those fields
//! - **Explicit context**: [`ConfigStore`] is owned by the process entry point
//!   and injected into the engine; [`ConfigStore::reset`] restores a clean state
//! - **Validate once**: [`ConfigStore::validate`] runs after every source has
//!   been applied, not on each request
//!
//! ## Usage
//!
//! ```rust,no_run
//! use db_load_health::cache::MemoryCache;
//! use db_load_health::config::{ConfigStore, ModelKey};
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ConfigStore::new();
//! store.configure(|config| {
//!     config.vcpu_count(16).threshold(0.75).cache(Arc::new(MemoryCache::new()));
//! });
//! store.configure_model("animals", |db| {
//!     db.vcpu_count(8);
//! });
//! store.validate()?;
//!
//! assert_eq!(store.for_model(&ModelKey::new("animals")).threshold, 0.75);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod loader;
pub mod model_key;
pub mod resolved;
pub mod store;

pub use error::ConfigurationError;
pub use loader::{HealthSettings, LayerSettings};
pub use model_key::ModelKey;
pub use resolved::{resolve, ConfigLayer, EffectiveConfig};
pub use store::ConfigStore;
