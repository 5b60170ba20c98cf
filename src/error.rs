//! Error types for beefdeets
//!
//! This module defines the service-level error type. Player communication has
//! its own error type in [`crate::player::AdapterError`]; this one covers
//! configuration, startup and serving. We use `thiserror` for the definitions
//! and `anyhow` for propagation in the binary.

use crate::player::AdapterError;
use thiserror::Error;

/// Main error type for beefdeets operations
#[derive(Error, Debug)]
pub enum BeefdeetsError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Action registry misconfiguration, fatal at startup
    #[error("Action registry error: {0}")]
    Registry(String),

    /// Errors raised by the player adapter
    #[error(transparent)]
    Player(#[from] AdapterError),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias using BeefdeetsError
pub type Result<T> = std::result::Result<T, BeefdeetsError>;

impl From<serde_json::Error> for BeefdeetsError {
    fn from(err: serde_json::Error) -> Self {
        BeefdeetsError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for BeefdeetsError {
    fn from(err: toml::de::Error) -> Self {
        BeefdeetsError::Config(err.to_string())
    }
}
