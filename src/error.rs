// src/error.rs

//! Unified error handling for the announcer.

use std::fmt;

use thiserror::Error;

/// Result type alias for announcer operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// AWS S3 error
    #[error("S3 error: {0}")]
    S3(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// The catalog could not be retrieved or parsed. Nothing was written.
    #[error("Fetch failed for {location}: {message}")]
    Fetch { location: String, message: String },

    /// The webhook rejected the announcement or was unreachable.
    #[error("Send failed for {key}: {message}")]
    Send { key: String, message: String },

    /// The ledger could not be written after a successful send.
    #[error("Persist failed for {location}: {message}")]
    Persist { location: String, message: String },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a catalog fetch error.
    pub fn fetch(location: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Fetch {
            location: location.into(),
            message: message.to_string(),
        }
    }

    /// Create a webhook send error for the given catalog key.
    pub fn send(key: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Send {
            key: key.into(),
            message: message.to_string(),
        }
    }

    /// Create a ledger persistence error.
    pub fn persist(location: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Persist {
            location: location.into(),
            message: message.to_string(),
        }
    }
}
