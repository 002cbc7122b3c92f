//! Cache error types

use thiserror::Error;

/// Errors that can occur during cache operations
///
/// Any of these surfacing from a read or write during a load sample
/// makes the engine report the database as idle (`0.0`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CacheError {
    /// Failed to connect to cache backend
    #[error("Cache connection error: {0}")]
    ConnectionError(String),

    /// Cache operation timed out
    #[error("Cache operation timed out: {0}")]
    Timeout(String),

    /// Generic backend error
    #[error("Cache backend error: {0}")]
    BackendError(String),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;
