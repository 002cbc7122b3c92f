//! Load sampling engine and load-shedding decisions

use super::model::HealthModel;
use crate::cache::{cache_key, CacheError};
use crate::config::{ConfigStore, EffectiveConfig};
use crate::constants::{FAIL_CLOSED_LOAD, FAIL_OPEN_LOAD, QUERY_TIMEOUT, QUERY_TIMEOUT_BACKSTOP};
use crate::database::DatabaseAdapter;
use crate::error::{HealthError, HealthResult};
use crate::events::{HealthEventPublisher, LoadSampled};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Computes, caches, and judges database load for models
///
/// Cheap to clone; clones share the configuration store and event publisher.
#[derive(Debug, Clone)]
pub struct HealthEngine {
    store: Arc<ConfigStore>,
    events: Option<HealthEventPublisher>,
}

impl HealthEngine {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self {
            store,
            events: None,
        }
    }

    /// Publish every fresh sample to `publisher`
    pub fn with_events(mut self, publisher: HealthEventPublisher) -> Self {
        self.events = Some(publisher);
        self
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    pub fn events(&self) -> Option<&HealthEventPublisher> {
        self.events.as_ref()
    }

    /// Active sessions divided by provisioned vCPUs for `model`'s database
    ///
    /// Served from cache when a sample is present. Never fails:
    /// - a cache read or write fault yields `0.0` for the whole call
    /// - a failed or timed out sample yields `1.0` (and that value is cached)
    ///
    /// A cache fault short-circuits before any query runs, so a broken cache
    /// hides a broken database.
    pub async fn load_pct(&self, model: &dyn HealthModel) -> f64 {
        let config = self.store.for_model(&model.model_key());
        let identity = model.database_identity();

        match self.cached_load_pct(model, &config, identity).await {
            Ok(load_pct) => load_pct,
            Err(err) if err.is_cache_fault() => {
                warn!(
                    database = identity,
                    error = %err,
                    "Load cache unavailable, reporting database as idle"
                );
                FAIL_OPEN_LOAD
            }
            Err(err) => {
                warn!(
                    database = identity,
                    error = %err,
                    "Load check failed, reporting database as saturated"
                );
                FAIL_CLOSED_LOAD
            }
        }
    }

    /// Whether `model`'s load is at or below its configured threshold
    pub async fn ok(&self, model: &dyn HealthModel) -> bool {
        let threshold = self.store.for_model(&model.model_key()).threshold;
        self.load_pct(model).await <= threshold
    }

    /// Run `work` only if `model`'s database is healthy
    ///
    /// Returns `false` without running `work` when overloaded, `true` after
    /// running it otherwise.
    pub async fn sheddable<F, Fut>(&self, model: &dyn HealthModel, work: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        if !self.ok(model).await {
            debug!(model = %model.model_key(), "Shedding work, database over threshold");
            return false;
        }
        work().await;
        true
    }

    /// Run `work` only if `model`'s load is at or below `pct`, ignoring the
    /// configured threshold
    pub async fn sheddable_pct<F, Fut>(&self, pct: f64, model: &dyn HealthModel, work: F) -> bool
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ()>,
    {
        if self.load_pct(model).await > pct {
            debug!(model = %model.model_key(), pct, "Shedding work, database over cutoff");
            return false;
        }
        work().await;
        true
    }

    /// [`sheddable`](Self::sheddable) for fallible work; the work's error is
    /// returned untouched
    pub async fn try_sheddable<F, Fut, E>(&self, model: &dyn HealthModel, work: F) -> Result<bool, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        if !self.ok(model).await {
            return Ok(false);
        }
        work().await?;
        Ok(true)
    }

    /// [`sheddable_pct`](Self::sheddable_pct) for fallible work
    pub async fn try_sheddable_pct<F, Fut, E>(
        &self,
        pct: f64,
        model: &dyn HealthModel,
        work: F,
    ) -> Result<bool, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), E>>,
    {
        if self.load_pct(model).await > pct {
            return Ok(false);
        }
        work().await?;
        Ok(true)
    }

    /// Check `model`'s effective configuration and resolve its adapter now
    ///
    /// Surfaces an invalid configuration or an unsupported engine as an error
    /// instead of the `0.0` or `1.0` a probe would report.
    pub async fn check_adapter(&self, model: &dyn HealthModel) -> HealthResult<DatabaseAdapter> {
        let key = model.model_key();
        let scope = if key.is_base() {
            "default".to_string()
        } else {
            format!("model {key}")
        };
        self.store.for_model(&key).validate(&scope)?;

        DatabaseAdapter::build(model.connection()).await
    }

    async fn cached_load_pct(
        &self,
        model: &dyn HealthModel,
        config: &EffectiveConfig,
        identity: &str,
    ) -> HealthResult<f64> {
        let cache = config
            .cache
            .as_ref()
            .ok_or_else(|| CacheError::BackendError("no cache configured".to_string()))?;
        let key = cache_key(identity);

        if let Some(load_pct) = cache.read(&key).await? {
            return Ok(load_pct);
        }

        let load_pct = self.sample_load_pct(model, config, identity).await;
        cache.write(&key, load_pct, config.cache_ttl).await?;
        Ok(load_pct)
    }

    async fn sample_load_pct(
        &self,
        model: &dyn HealthModel,
        config: &EffectiveConfig,
        identity: &str,
    ) -> f64 {
        let sample = tokio::time::timeout(QUERY_TIMEOUT_BACKSTOP, self.query_load_pct(model, config))
            .await
            .unwrap_or(Err(HealthError::QueryTimeout(QUERY_TIMEOUT_BACKSTOP)));

        match sample {
            Ok((load_pct, active_sessions)) => {
                if let Some(events) = &self.events {
                    events.publish(LoadSampled::new(identity, load_pct, active_sessions));
                }
                load_pct
            }
            Err(err @ HealthError::UnsupportedAdapter { .. }) => {
                error!(
                    database = identity,
                    error = %err,
                    "No adapter for database engine, reporting database as saturated"
                );
                FAIL_CLOSED_LOAD
            }
            Err(err) => {
                warn!(
                    database = identity,
                    error = %err,
                    "Load sample failed, reporting database as saturated"
                );
                FAIL_CLOSED_LOAD
            }
        }
    }

    async fn query_load_pct(
        &self,
        model: &dyn HealthModel,
        config: &EffectiveConfig,
    ) -> HealthResult<(f64, i64)> {
        let vcpu_count = config
            .vcpu_count
            .filter(|vcpus| *vcpus > 0)
            .ok_or(HealthError::MissingCapacity)?;

        let connection = model.connection();
        let adapter = DatabaseAdapter::build(connection).await?;
        let active_sessions = adapter
            .execute_with_timeout(connection, adapter.active_session_count_query(), QUERY_TIMEOUT)
            .await?;

        Ok((active_sessions as f64 / f64::from(vcpu_count), active_sessions))
    }
}
