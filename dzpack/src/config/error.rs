//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building or loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse the INI file.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// The config file does not exist.
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A value in the config file is invalid.
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// A setting failed validation.
    #[error("Invalid setting '{field}': {reason}")]
    InvalidSetting { field: &'static str, reason: String },
}
