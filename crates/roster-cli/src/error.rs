use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] roster_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Row numbers start at 1 (got {0})")]
    InvalidRow(usize),
    #[error("Could not resolve a data directory. Pass --data-dir explicitly.")]
    DataDirUnavailable,
}
