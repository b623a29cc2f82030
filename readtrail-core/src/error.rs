//! Error types for readtrail-core

use thiserror::Error;

/// Main error type for the readtrail-core library
#[derive(Error, Debug)]
pub enum Error {
    /// The embedded database could not open, execute, or return rows
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A stored timestamp could not be parsed
    #[error("invalid timestamp {value:?}: {message}")]
    Timestamp { value: String, message: String },
}

impl Error {
    /// Whether this error originated in the database layer.
    pub fn is_storage_fault(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}

/// Result type alias for readtrail-core
pub type Result<T> = std::result::Result<T, Error>;
