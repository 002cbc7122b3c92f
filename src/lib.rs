#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, MySQL in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # DB Load Health
//!
//! Database load sampling and load-shedding primitives.
//!
//! ## Overview
//!
//! The load of a database is its count of active client sessions divided by
//! its provisioned vCPUs. Samples are cached briefly so health checks do not
//! add load of their own, and every sample runs under a one second
//! server-side statement limit so a saturated database cannot stall the probe.
//!
//! Callers use the result to skip optional work:
//!
//! - [`HealthEngine::load_pct`] - the (cached) load, `0.0..`
//! - [`HealthEngine::ok`] - load at or below the configured threshold
//! - [`HealthEngine::sheddable`] - run work only when healthy
//! - [`HealthEngine::sheddable_pct`] - run work only below a caller-chosen cutoff
//!
//! ## Failure Policy
//!
//! The decision primitives never fail. A cache fault reports `0.0` (work
//! proceeds); a database fault reports `1.0` (work is shed). Only
//! configuration errors surface, and only from validation at startup.
//!
//! ## Module Organization
//!
//! - [`config`] - Default and per-model configuration, resolution, loading
//! - [`cache`] - Cache port and bundled providers
//! - [`database`] - Connection port and engine adapters
//! - [`health`] - The engine and decision primitives
//! - [`events`] - Load sample events
//! - [`boot`] - Deferred validation at startup
//! - [`extensions`] - Convenience methods on connections and models
//! - [`logging`] - Structured logging bootstrap
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use db_load_health::cache::MemoryCache;
//! use db_load_health::database::PgHealthConnection;
//! use db_load_health::{BoundModel, ConfigStore, HealthEngine};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(ConfigStore::new());
//! store.configure(|config| {
//!     config.vcpu_count(16).cache(Arc::new(MemoryCache::new()));
//! });
//! store.validate()?;
//!
//! let engine = HealthEngine::new(store);
//! let primary = BoundModel::base(Arc::new(
//!     PgHealthConnection::connect("postgresql://localhost/app", "primary").await?,
//! ));
//!
//! engine
//!     .sheddable(&primary, || async {
//!         // refresh a materialized view, warm a cache, ...
//!     })
//!     .await;
//! # Ok(())
//! # }
//! ```

pub mod boot;
pub mod cache;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod events;
pub mod extensions;
pub mod health;
pub mod logging;

pub use boot::Bootstrap;
pub use cache::{cache_key, CacheError, CacheHandle, CacheStore};
pub use config::{ConfigLayer, ConfigStore, ConfigurationError, EffectiveConfig, ModelKey};
pub use database::{DatabaseAdapter, DatabaseEngine, HealthConnection};
pub use error::{HealthError, HealthResult};
pub use events::{HealthEventPublisher, LoadSampled};
pub use health::{BoundModel, HealthEngine, HealthModel};
