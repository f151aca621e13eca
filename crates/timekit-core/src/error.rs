//! Error types for timekit-core.
//!
//! The engine itself never fails: invalid transitions are silent no-ops and
//! out-of-range durations are clamped. The only failable concern in the
//! library is configuration IO and parsing.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown dot-path key in get/set
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Value cannot be parsed into the key's type
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to (re)serialize the configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}
