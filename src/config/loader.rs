//! Configuration Loader
//!
//! Loads the scalar health settings (capacity, threshold, TTL) from an optional
//! TOML file and `DB_LOAD_HEALTH__*` environment variables, then writes them
//! into a [`ConfigStore`]. The cache handle is a live object and is always
//! supplied by the caller.
//!
//! ```toml
//! [default]
//! vcpu_count = 16
//! threshold = 0.75
//! cache_ttl_seconds = 60
//!
//! [models.animals]
//! vcpu_count = 8
//! threshold = 0.5
//! ```

use super::error::ConfigurationError;
use super::model_key::ModelKey;
use super::resolved::ConfigLayer;
use super::store::ConfigStore;
use crate::cache::CacheHandle;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

/// Environment variable prefix, e.g. `DB_LOAD_HEALTH__DEFAULT__VCPU_COUNT=32`
pub const ENV_PREFIX: &str = "DB_LOAD_HEALTH";

/// One layer of file/env settings; unset fields are left untouched on apply
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerSettings {
    pub vcpu_count: Option<u32>,
    pub threshold: Option<f64>,
    pub cache_ttl_seconds: Option<u64>,
}

impl LayerSettings {
    fn apply_to(&self, layer: &mut ConfigLayer) {
        if let Some(vcpu_count) = self.vcpu_count {
            layer.vcpu_count(vcpu_count);
        }
        if let Some(threshold) = self.threshold {
            layer.threshold(threshold);
        }
        if let Some(ttl) = self.cache_ttl_seconds {
            layer.cache_ttl(Duration::from_secs(ttl));
        }
    }
}

/// Health settings as read from file and environment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthSettings {
    #[serde(default)]
    pub default: LayerSettings,
    #[serde(default)]
    pub models: BTreeMap<String, LayerSettings>,
}

impl HealthSettings {
    /// Load settings from `path` (if given) overlaid with environment variables
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigurationError> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            debug!(path = %path.display(), "Loading health settings file");
            builder = builder.add_source(File::from(path).format(FileFormat::Toml).required(true));
        }

        let settings: HealthSettings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        info!(
            vcpu_count = settings.default.vcpu_count,
            threshold = settings.default.threshold,
            model_overrides = settings.models.len(),
            "Health settings loaded"
        );
        Ok(settings)
    }

    /// Parse settings from a TOML string, without consulting the environment
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigurationError> {
        Ok(Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()?
            .try_deserialize()?)
    }

    /// Write these settings into `store`
    ///
    /// `cache`, when given, becomes the default layer's cache handle. Fields
    /// absent from the settings keep whatever the store already holds.
    pub fn apply(&self, store: &ConfigStore, cache: Option<CacheHandle>) {
        store.configure(|layer| {
            self.default.apply_to(layer);
            if let Some(cache) = cache {
                layer.cache(cache);
            }
        });

        for (model, settings) in &self.models {
            store.configure_model(ModelKey::new(model.clone()), |layer| settings.apply_to(layer));
        }
    }
}
