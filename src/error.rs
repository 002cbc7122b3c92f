//! Error types for the load probe.
//!

use crate::cache::CacheError;
use crate::config::ConfigurationError;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum HealthError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("Unsupported database adapter: {engine}")]
    UnsupportedAdapter { engine: String },
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
    #[error("Query error: {0}")]
    Query(String),
    #[error("Query exceeded {0:?}")]
    QueryTimeout(Duration),
    #[error("vcpu_count is not configured")]
    MissingCapacity,
}

impl HealthError {
    /// Whether this error comes from the cache layer (reported as `0.0`)
    pub fn is_cache_fault(&self) -> bool {
        matches!(self, Self::Cache(_))
    }
}

impl From<sqlx::Error> for HealthError {
    fn from(err: sqlx::Error) -> Self {
        HealthError::Query(err.to_string())
    }
}

pub type HealthResult<T> = std::result::Result<T, HealthError>;
