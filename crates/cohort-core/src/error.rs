//! Error types for cohort.

use thiserror::Error;

/// Result type alias using cohort's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for cohort operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No progress record exists for the content item
    #[error("Progress not found: {0}")]
    ProgressNotFound(String),

    /// Storage provider rejected a read or write
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
