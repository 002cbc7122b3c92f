//! Models: the unit the engine resolves configuration and connections for

use crate::config::ModelKey;
use crate::database::HealthConnection;
use std::fmt;
use std::sync::Arc;

/// Something bound to one database that callers ask about
///
/// The key selects per-model configuration; the connection is sampled on a
/// cache miss; the database identity discriminates cache entries.
pub trait HealthModel: Send + Sync {
    fn model_key(&self) -> ModelKey;

    fn connection(&self) -> &dyn HealthConnection;

    fn database_identity(&self) -> &str {
        self.connection().database_identity()
    }
}

/// A model key paired with a shared connection
#[derive(Clone)]
pub struct BoundModel {
    key: ModelKey,
    connection: Arc<dyn HealthConnection>,
}

impl BoundModel {
    pub fn new(key: impl Into<ModelKey>, connection: Arc<dyn HealthConnection>) -> Self {
        Self {
            key: key.into(),
            connection,
        }
    }

    /// Bind a connection to the default configuration
    pub fn base(connection: Arc<dyn HealthConnection>) -> Self {
        Self::new(ModelKey::base(), connection)
    }
}

impl fmt::Debug for BoundModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundModel")
            .field("key", &self.key)
            .field("engine", &self.connection.engine_name())
            .field("database", &self.connection.database_identity())
            .finish()
    }
}

impl HealthModel for BoundModel {
    fn model_key(&self) -> ModelKey {
        self.key.clone()
    }

    fn connection(&self) -> &dyn HealthConnection {
        self.connection.as_ref()
    }
}
