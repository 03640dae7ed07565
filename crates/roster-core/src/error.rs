//! Error types for roster-core

use thiserror::Error;

use crate::remote::RemoteError;

/// Result type alias using roster-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in roster-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local fallback storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Remote content API error
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),
}
