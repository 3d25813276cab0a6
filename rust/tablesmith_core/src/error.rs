//! Error types for the import and file pipelines.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Neither the multi-table envelope nor the legacy single-table shape
    /// matched the input.
    #[error("invalid file format: {0}")]
    InvalidFormat(String),

    /// The raw file text could not be parsed as JSON.
    #[error("failed to read file: {0}")]
    FileReadFailure(String),
}

impl Error {
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, Error::InvalidFormat(_))
    }
}
