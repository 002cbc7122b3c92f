//! Process-wide configuration store
//!
//! Holds the default layer plus per-model override layers. Reads take a
//! lock-free snapshot; writes are serialized and published atomically, so a
//! reader sees either the configuration before a write or after it.

use super::error::ConfigurationError;
use super::model_key::ModelKey;
use super::resolved::{resolve, ConfigLayer, EffectiveConfig};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
struct StoreState {
    default: ConfigLayer,
    overrides: HashMap<ModelKey, ConfigLayer>,
}

/// Default configuration plus per-model overrides
///
/// Owned by the process entry point and shared with the engine through an
/// `Arc`. Expected to be written at startup and read on every health check.
#[derive(Debug, Default)]
pub struct ConfigStore {
    state: ArcSwap<StoreState>,
    write_lock: Mutex<()>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply `mutator` to the default layer
    ///
    /// Calls layer on top of each other: fields not touched by `mutator`
    /// keep their previous values.
    pub fn configure<F>(&self, mutator: F)
    where
        F: FnOnce(&mut ConfigLayer),
    {
        self.update(|state| mutator(&mut state.default));
        debug!("Default health configuration updated");
    }

    /// Create or update the override for `model`
    pub fn configure_model<F>(&self, model: impl Into<ModelKey>, mutator: F)
    where
        F: FnOnce(&mut ConfigLayer),
    {
        let model = model.into();
        debug!(model = %model, "Model health configuration updated");
        self.update(|state| mutator(state.overrides.entry(model).or_default()));
    }

    /// Effective configuration for `model`
    ///
    /// Falls back to the default when no override exists; fields the
    /// override leaves unset come from the default as it is right now.
    pub fn for_model(&self, model: &ModelKey) -> EffectiveConfig {
        let state = self.state.load();
        resolve(&state.default, state.overrides.get(model))
    }

    /// Effective default configuration
    pub fn default_config(&self) -> EffectiveConfig {
        resolve(&self.state.load().default, None)
    }

    /// Models with an override, sorted by key
    pub fn overrides(&self) -> Vec<ModelKey> {
        let mut keys: Vec<ModelKey> = self.state.load().overrides.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// `floor(vcpu_count * threshold)` of the default configuration
    pub fn max_healthy_sessions(&self) -> Option<u64> {
        self.default_config().max_healthy_sessions()
    }

    /// Validate the default and every override, as resolved
    ///
    /// Run once after every configuration source has been applied; see
    /// [`crate::boot::Bootstrap`].
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let state = self.state.load();
        resolve(&state.default, None).validate("default")?;

        let mut models: Vec<&ModelKey> = state.overrides.keys().collect();
        models.sort();
        for model in models {
            resolve(&state.default, state.overrides.get(model))
                .validate(&format!("model {model}"))?;
        }
        Ok(())
    }

    /// Drop the default and every override
    pub fn reset(&self) {
        let _guard = self.write_lock.lock();
        self.state.store(Arc::new(StoreState::default()));
        info!("Health configuration reset");
    }

    fn update<F>(&self, apply: F)
    where
        F: FnOnce(&mut StoreState),
    {
        let _guard = self.write_lock.lock();
        let mut next = StoreState::clone(&self.state.load());
        apply(&mut next);
        self.state.store(Arc::new(next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheHandle, MemoryCache};
    use std::time::Duration;

    struct AnimalsRecord;

    fn cache() -> CacheHandle {
        Arc::new(MemoryCache::new())
    }

    #[test]
    fn test_configure_sets_fields_with_defaults() {
        let store = ConfigStore::new();
        store.configure(|c| {
            c.vcpu_count(16).cache(cache());
        });

        let config = store.default_config();
        assert_eq!(config.vcpu_count, Some(16));
        assert_eq!(config.threshold, 0.75);
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_configure_layers_instead_of_resetting() {
        let store = ConfigStore::new();
        store.configure(|c| {
            c.vcpu_count(16).threshold(0.5);
        });
        store.configure(|c| {
            c.cache_ttl(Duration::from_secs(120));
        });

        let config = store.default_config();
        assert_eq!(config.vcpu_count, Some(16));
        assert_eq!(config.threshold, 0.5);
        assert_eq!(config.cache_ttl, Duration::from_secs(120));
    }

    #[test]
    fn test_for_model_without_override_returns_default() {
        let store = ConfigStore::new();
        store.configure(|c| {
            c.vcpu_count(16);
        });

        let config = store.for_model(&ModelKey::of::<AnimalsRecord>());
        assert_eq!(config.vcpu_count, Some(16));
    }

    #[test]
    fn test_for_model_inherits_at_read_time() {
        let shared = cache();
        let store = ConfigStore::new();
        store.configure(|c| {
            c.vcpu_count(16).cache(shared.clone());
        });
        store.configure_model(ModelKey::of::<AnimalsRecord>(), |db| {
            db.vcpu_count(8);
        });

        let animals = ModelKey::of::<AnimalsRecord>();
        assert_eq!(store.for_model(&animals).vcpu_count, Some(8));
        assert_eq!(store.for_model(&animals).threshold, 0.75);
        assert!(store.for_model(&animals).same_cache(&shared));

        store.configure(|c| {
            c.threshold(0.9);
        });
        assert_eq!(store.for_model(&animals).threshold, 0.9);
        assert_eq!(store.default_config().vcpu_count, Some(16));
    }

    #[test]
    fn test_validate_reports_missing_fields() {
        let store = ConfigStore::new();
        store.configure(|c| {
            c.cache(cache());
        });
        let err = store.validate().unwrap_err();
        assert!(err.to_string().contains("vcpu_count"));

        store.reset();
        store.configure(|c| {
            c.vcpu_count(16);
        });
        let err = store.validate().unwrap_err();
        assert!(err.to_string().contains("cache"));
    }

    #[test]
    fn test_validate_checks_overrides() {
        let store = ConfigStore::new();
        store.configure(|c| {
            c.vcpu_count(16).cache(cache());
        });
        store.configure_model("animals", |db| {
            db.threshold(0.0);
        });

        let err = store.validate().unwrap_err();
        assert_eq!(err.field(), Some("threshold"));
        assert!(err.to_string().contains("animals"));
    }

    #[test]
    fn test_reset_leaves_no_override() {
        let store = ConfigStore::new();
        store.configure(|c| {
            c.vcpu_count(16).cache(cache());
        });
        store.configure_model("animals", |db| {
            db.vcpu_count(8);
        });
        assert_eq!(store.overrides(), vec![ModelKey::new("animals")]);

        store.reset();

        assert!(store.overrides().is_empty());
        assert_eq!(store.for_model(&ModelKey::new("animals")).vcpu_count, None);
        assert!(store.default_config().cache.is_none());
    }

    #[test]
    fn test_max_healthy_sessions() {
        let store = ConfigStore::new();
        store.configure(|c| {
            c.vcpu_count(16).threshold(0.75).cache(cache());
        });
        assert_eq!(store.max_healthy_sessions(), Some(12));
    }
}
