//! Error types shared across SecHub crates

use thiserror::Error;

/// Result type alias for SecHub operations
pub type Result<T> = std::result::Result<T, SecchubError>;

/// Main error type for SecHub
#[derive(Error, Debug)]
pub enum SecchubError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl SecchubError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}
