//! Core error types for pushup-core.
//!
//! The countdown itself has a single failure mode (a non-positive
//! duration). Configuration loading adds a few more; everything is
//! collected under [`CoreError`] for callers that don't care which.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pushup-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Countdown errors
    #[error("Countdown error: {0}")]
    Countdown(#[from] CountdownError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Countdown errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CountdownError {
    /// Duration must be strictly positive
    #[error("Invalid countdown duration: {total_seconds}s (must be greater than zero)")]
    InvalidArgument { total_seconds: i64 },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not name a configuration value
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
