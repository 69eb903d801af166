//! Error types for StoryChain.

use thiserror::Error;

/// Result type for StoryChain operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in StoryChain operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Contribution rejected before anything is persisted
    #[error("Invalid contribution: {0}")]
    Validation(String),

    /// Unknown chain id on read
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generation service unusable because no credential is configured
    #[error("Generation service not configured: {0}")]
    Config(String),

    /// Generation call failed, timed out, or returned an unusable response
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rocksdb::Error> for Error {
    fn from(e: rocksdb::Error) -> Self {
        Error::Storage(e.to_string())
    }
}
