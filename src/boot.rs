//! # Boot-time Validation
//!
//! Hosts usually configure the probe from several places during startup.
//! Validating before the last of them has run reports fields as missing that
//! are about to be set, so [`Bootstrap`] runs every registered initializer
//! first and validates only after all of them.

use crate::config::{ConfigStore, ConfigurationError};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

type Initializer = Box<dyn FnOnce(&ConfigStore) + Send>;

/// Ordered initializers followed by one validation pass
pub struct Bootstrap {
    store: Arc<ConfigStore>,
    initializers: Vec<(String, Initializer)>,
}

impl fmt::Debug for Bootstrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bootstrap")
            .field(
                "initializers",
                &self.initializers.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Bootstrap {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self {
            store,
            initializers: Vec::new(),
        }
    }

    /// Register a named initializer; initializers run in registration order
    pub fn initializer<F>(mut self, name: impl Into<String>, init: F) -> Self
    where
        F: FnOnce(&ConfigStore) + Send + 'static,
    {
        self.initializers.push((name.into(), Box::new(init)));
        self
    }

    /// Run every initializer, then validate the resulting configuration
    pub fn initialize(self) -> Result<Arc<ConfigStore>, ConfigurationError> {
        for (name, init) in self.initializers {
            debug!(initializer = %name, "Running health initializer");
            init(&self.store);
        }

        self.store.validate()?;
        info!(
            overrides = self.store.overrides().len(),
            max_healthy_sessions = self.store.max_healthy_sessions(),
            "Health configuration validated"
        );
        Ok(self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;

    #[test]
    fn test_validation_runs_after_all_initializers() {
        let store = Arc::new(ConfigStore::new());
        let result = Bootstrap::new(store)
            .initializer("framework", |store| {
                store.configure(|c| {
                    c.threshold(0.8);
                });
            })
            .initializer("app.health", |store| {
                store.configure(|c| {
                    c.vcpu_count(4).cache(Arc::new(MemoryCache::new()));
                });
            })
            .initialize();

        let store = result.unwrap();
        assert_eq!(store.default_config().vcpu_count, Some(4));
        assert_eq!(store.default_config().threshold, 0.8);
    }

    #[test]
    fn test_incomplete_configuration_fails_initialize() {
        let err = Bootstrap::new(Arc::new(ConfigStore::new()))
            .initializer("app.health", |store| {
                store.configure(|c| {
                    c.cache(Arc::new(MemoryCache::new()));
                });
            })
            .initialize()
            .unwrap_err();

        assert_eq!(err.field(), Some("vcpu_count"));
    }
}
