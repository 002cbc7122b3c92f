//! Configuration error types

use thiserror::Error;

/// Fatal configuration problems, surfaced by validation at process start
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// A required field is unset on the resolved configuration
    #[error("{field} must be configured ({scope})")]
    MissingField { field: &'static str, scope: String },

    /// A field is set to a value outside its domain
    #[error("{field} is invalid ({scope}): {reason}")]
    InvalidField {
        field: &'static str,
        scope: String,
        reason: String,
    },

    /// Settings could not be read from file or environment
    #[error("failed to load configuration: {0}")]
    Load(String),
}

impl ConfigurationError {
    /// Name of the offending field, if the error concerns a single field
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field, .. } | Self::InvalidField { field, .. } => Some(field),
            Self::Load(_) => None,
        }
    }
}

impl From<config::ConfigError> for ConfigurationError {
    fn from(err: config::ConfigError) -> Self {
        Self::Load(err.to_string())
    }
}
