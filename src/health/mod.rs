//! # Health Engine
//!
//! Turns a model into a load percentage and a load-shedding decision.
//!
//! ## Pipeline
//!
//! ```text
//! ok / sheddable / sheddable_pct
//!   └── load_pct(model)
//!         ├── ConfigStore::for_model        effective configuration
//!         ├── cache.read("load_pct:<db>")   hit → return
//!         ├── DatabaseAdapter::build        miss → sample
//!         ├── execute_with_timeout          server-side limit, 1s
//!         ├── active / vcpu_count
//!         ├── publish LoadSampled
//!         └── cache.write(value, ttl)
//! ```
//!
//! ## Degradation
//!
//! | Failure                          | `load_pct` | `ok`                |
//! |----------------------------------|------------|---------------------|
//! | cache read or write              | `0.0`      | `true`              |
//! | adapter, query, timeout          | `1.0`      | `false` (threshold < 1) |
//!
//! Cache faults win: with both the cache and the database down the result
//! is `0.0`.

pub mod engine;
pub mod model;

pub use engine::HealthEngine;
pub use model::{BoundModel, HealthModel};
