//! Core error types for chronodeck-core.
//!
//! The clock, stopwatch and countdown engines never fail: invalid commands
//! are ignored and out-of-range values are clamped. Errors only surface at
//! the edges (configuration, user input parsing, alert delivery), and they
//! are collected here using thiserror.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for chronodeck-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Completion alert delivery errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors for user-supplied input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Duration string could not be parsed
    #[error("Invalid duration '{input}': {message}")]
    InvalidDuration { input: String, message: String },

    /// No preset with the given label
    #[error("Unknown timer preset: {0}")]
    UnknownPreset(String),

    /// No mode with the given name
    #[error("Unknown mode: {0} (expected clock, stopwatch or timer)")]
    UnknownMode(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors raised by completion notifiers.
///
/// These never reach the timer state machine; the alert dispatcher logs them
/// and falls back to a visual-only acknowledgment.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The notifier cannot deliver right now (muted, no interaction yet)
    #[error("{channel} notifier unavailable: {reason}")]
    Unavailable { channel: String, reason: String },

    /// Delivery was attempted and failed
    #[error("{channel} notification failed: {source}")]
    Delivery {
        channel: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_converts_into_core_error() {
        let err: CoreError = ValidationError::UnknownPreset("7m".into()).into();
        assert_eq!(
            err.to_string(),
            "Validation error: Unknown timer preset: 7m"
        );
    }

    #[test]
    fn notify_error_keeps_source() {
        use std::error::Error as _;
        let err = NotifyError::Delivery {
            channel: "bell".into(),
            source: std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("bell notification failed"));
    }
}
