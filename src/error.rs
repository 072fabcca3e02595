//! Error types for the tablayout library

use std::io;

/// Library error type for tablayout operations
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    /// Grid constraint referencing columns the grid does not have
    #[error("invalid constraint: {0}")]
    InvalidConstraint(String),

    /// Parsing error when reading a score
    #[error("parsing error: {0}")]
    ParsingError(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<io::Error> for LayoutError {
    fn from(error: io::Error) -> Self {
        Self::IoError(error.to_string())
    }
}
