//! Configuration layers and their resolution into an effective configuration
//!
//! A [`ConfigLayer`] records only what was explicitly set. Inheritance happens
//! in [`resolve`], at read time: an override that never set `threshold` picks
//! up whatever the default's threshold is *when resolved*, not when the
//! override was written.

use super::error::ConfigurationError;
use crate::cache::CacheHandle;
use crate::constants::{DEFAULT_CACHE_TTL, DEFAULT_THRESHOLD};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Partially specified configuration; every field is optional
#[derive(Clone, Default)]
pub struct ConfigLayer {
    vcpu_count: Option<u32>,
    threshold: Option<f64>,
    cache: Option<CacheHandle>,
    cache_ttl: Option<Duration>,
}

impl fmt::Debug for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLayer")
            .field("vcpu_count", &self.vcpu_count)
            .field("threshold", &self.threshold)
            .field("cache", &self.cache.as_ref().map(|c| c.provider_name()))
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl ConfigLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provisioned capacity; the denominator of the load ratio
    pub fn vcpu_count(&mut self, vcpu_count: u32) -> &mut Self {
        self.vcpu_count = Some(vcpu_count);
        self
    }

    /// Highest load still reported as healthy
    pub fn threshold(&mut self, threshold: f64) -> &mut Self {
        self.threshold = Some(threshold);
        self
    }

    pub fn cache(&mut self, cache: CacheHandle) -> &mut Self {
        self.cache = Some(cache);
        self
    }

    pub fn cache_ttl(&mut self, cache_ttl: Duration) -> &mut Self {
        self.cache_ttl = Some(cache_ttl);
        self
    }

    pub fn vcpu_count_value(&self) -> Option<u32> {
        self.vcpu_count
    }

    pub fn threshold_value(&self) -> Option<f64> {
        self.threshold
    }

    pub fn cache_value(&self) -> Option<&CacheHandle> {
        self.cache.as_ref()
    }

    pub fn cache_ttl_value(&self) -> Option<Duration> {
        self.cache_ttl
    }
}

/// Fully resolved configuration for one model
///
/// Required fields stay optional here so an incomplete configuration can
/// still be resolved and reported by [`EffectiveConfig::validate`].
#[derive(Clone)]
pub struct EffectiveConfig {
    pub vcpu_count: Option<u32>,
    pub threshold: f64,
    pub cache: Option<CacheHandle>,
    pub cache_ttl: Duration,
}

impl fmt::Debug for EffectiveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EffectiveConfig")
            .field("vcpu_count", &self.vcpu_count)
            .field("threshold", &self.threshold)
            .field("cache", &self.cache.as_ref().map(|c| c.provider_name()))
            .field("cache_ttl", &self.cache_ttl)
            .finish()
    }
}

impl EffectiveConfig {
    /// `floor(vcpu_count * threshold)`, for diagnostics
    pub fn max_healthy_sessions(&self) -> Option<u64> {
        self.vcpu_count
            .map(|vcpus| (f64::from(vcpus) * self.threshold).floor() as u64)
    }

    /// Whether both configurations share the same cache handle
    pub fn same_cache(&self, cache: &CacheHandle) -> bool {
        self.cache
            .as_ref()
            .is_some_and(|mine| Arc::ptr_eq(mine, cache))
    }

    /// Check that required fields are present and in range
    ///
    /// `scope` names the configuration in the error message ("default" or a
    /// model key).
    pub fn validate(&self, scope: &str) -> Result<(), ConfigurationError> {
        match self.vcpu_count {
            None => {
                return Err(ConfigurationError::MissingField {
                    field: "vcpu_count",
                    scope: scope.to_string(),
                })
            }
            Some(0) => {
                return Err(ConfigurationError::InvalidField {
                    field: "vcpu_count",
                    scope: scope.to_string(),
                    reason: "must be a positive integer".to_string(),
                })
            }
            Some(_) => {}
        }

        if self.cache.is_none() {
            return Err(ConfigurationError::MissingField {
                field: "cache",
                scope: scope.to_string(),
            });
        }

        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(ConfigurationError::InvalidField {
                field: "threshold",
                scope: scope.to_string(),
                reason: format!("{} is outside (0, 1]", self.threshold),
            });
        }

        Ok(())
    }
}

/// Resolve an override against the default, field by field
///
/// Pure: neither layer is modified, and nothing is copied into the override.
pub fn resolve(default: &ConfigLayer, overlay: Option<&ConfigLayer>) -> EffectiveConfig {
    EffectiveConfig {
        vcpu_count: overlay
            .and_then(|layer| layer.vcpu_count)
            .or(default.vcpu_count),
        threshold: overlay
            .and_then(|layer| layer.threshold)
            .or(default.threshold)
            .unwrap_or(DEFAULT_THRESHOLD),
        cache: overlay
            .and_then(|layer| layer.cache.clone())
            .or_else(|| default.cache.clone()),
        cache_ttl: overlay
            .and_then(|layer| layer.cache_ttl)
            .or(default.cache_ttl)
            .unwrap_or(DEFAULT_CACHE_TTL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;

    fn cache() -> CacheHandle {
        Arc::new(MemoryCache::new())
    }

    #[test]
    fn test_defaults_fill_threshold_and_ttl() {
        let resolved = resolve(&ConfigLayer::new(), None);
        assert_eq!(resolved.threshold, 0.75);
        assert_eq!(resolved.cache_ttl, Duration::from_secs(60));
        assert!(resolved.vcpu_count.is_none());
        assert!(resolved.cache.is_none());
    }

    #[test]
    fn test_override_wins_over_default() {
        let mut default = ConfigLayer::new();
        default.vcpu_count(16).threshold(0.75);
        let mut overlay = ConfigLayer::new();
        overlay.vcpu_count(8).threshold(0.5);

        let resolved = resolve(&default, Some(&overlay));
        assert_eq!(resolved.vcpu_count, Some(8));
        assert_eq!(resolved.threshold, 0.5);
    }

    #[test]
    fn test_override_inherits_unset_fields() {
        let shared = cache();
        let mut default = ConfigLayer::new();
        default
            .vcpu_count(16)
            .threshold(0.6)
            .cache(shared.clone())
            .cache_ttl(Duration::from_secs(120));
        let mut overlay = ConfigLayer::new();
        overlay.vcpu_count(8);

        let resolved = resolve(&default, Some(&overlay));
        assert_eq!(resolved.vcpu_count, Some(8));
        assert_eq!(resolved.threshold, 0.6);
        assert!(resolved.same_cache(&shared));
        assert_eq!(resolved.cache_ttl, Duration::from_secs(120));
    }

    #[test]
    fn test_max_healthy_sessions() {
        let mut default = ConfigLayer::new();
        default.vcpu_count(16).threshold(0.75);
        assert_eq!(resolve(&default, None).max_healthy_sessions(), Some(12));

        default.vcpu_count(10).threshold(0.33);
        assert_eq!(resolve(&default, None).max_healthy_sessions(), Some(3));

        assert_eq!(resolve(&ConfigLayer::new(), None).max_healthy_sessions(), None);
    }

    #[test]
    fn test_validate_requires_vcpu_count() {
        let mut default = ConfigLayer::new();
        default.cache(cache());
        let err = resolve(&default, None).validate("default").unwrap_err();
        assert_eq!(err.field(), Some("vcpu_count"));
    }

    #[test]
    fn test_validate_requires_cache() {
        let mut default = ConfigLayer::new();
        default.vcpu_count(16);
        let err = resolve(&default, None).validate("default").unwrap_err();
        assert_eq!(err.field(), Some("cache"));
        assert!(err.to_string().contains("cache"));
    }

    #[test]
    fn test_validate_rejects_zero_vcpus_and_bad_threshold() {
        let mut default = ConfigLayer::new();
        default.vcpu_count(0).cache(cache());
        assert!(matches!(
            resolve(&default, None).validate("default"),
            Err(ConfigurationError::InvalidField { field: "vcpu_count", .. })
        ));

        default.vcpu_count(4).threshold(1.5);
        assert!(matches!(
            resolve(&default, None).validate("default"),
            Err(ConfigurationError::InvalidField { field: "threshold", .. })
        ));

        default.threshold(1.0);
        assert!(resolve(&default, None).validate("default").is_ok());
    }
}
