//! Convenience methods on connections and models
//!
//! Pure delegation to [`HealthEngine`]; nothing here decides anything.
//!
//! ```rust,no_run
//! use db_load_health::extensions::ConnectionHealthExt;
//! # async fn example(
//! #     engine: &db_load_health::HealthEngine,
//! #     connection: &db_load_health::database::PgHealthConnection,
//! # ) {
//! if connection.healthy(engine).await {
//!     // run the optional work
//! }
//! # }
//! ```

use crate::config::ModelKey;
use crate::database::HealthConnection;
use crate::health::{HealthEngine, HealthModel};
use async_trait::async_trait;

/// A bare connection viewed as a model under the default configuration
struct ConnectionModel<'a>(&'a dyn HealthConnection);

impl HealthModel for ConnectionModel<'_> {
    fn model_key(&self) -> ModelKey {
        ModelKey::base()
    }

    fn connection(&self) -> &dyn HealthConnection {
        self.0
    }
}

/// `healthy` / `load_pct` for any connection, under the default configuration
#[async_trait]
pub trait ConnectionHealthExt {
    async fn healthy(&self, engine: &HealthEngine) -> bool;

    async fn load_pct(&self, engine: &HealthEngine) -> f64;
}

#[async_trait]
impl<C: HealthConnection> ConnectionHealthExt for C {
    async fn healthy(&self, engine: &HealthEngine) -> bool {
        engine.ok(&ConnectionModel(self)).await
    }

    async fn load_pct(&self, engine: &HealthEngine) -> f64 {
        engine.load_pct(&ConnectionModel(self)).await
    }
}

/// `database_healthy` / `database_load_pct` for any model
#[async_trait]
pub trait ModelHealthExt {
    async fn database_healthy(&self, engine: &HealthEngine) -> bool;

    async fn database_load_pct(&self, engine: &HealthEngine) -> f64;
}

#[async_trait]
impl<M: HealthModel> ModelHealthExt for M {
    async fn database_healthy(&self, engine: &HealthEngine) -> bool {
        engine.ok(self).await
    }

    async fn database_load_pct(&self, engine: &HealthEngine) -> f64 {
        engine.load_pct(self).await
    }
}
