//! Error types for the harness

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while waiting on a [`Gate`](crate::gate::Gate)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("Timed out waiting for: {description}")]
    TimedOut { description: String },
}

impl GateError {
    /// Description of the gate (or gates) that were still pending
    pub fn description(&self) -> &str {
        match self {
            GateError::TimedOut { description } => description,
        }
    }
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
