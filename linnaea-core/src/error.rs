//! Core error types for Linnaea

use thiserror::Error;

/// Main error type for Linnaea operations
#[derive(Error, Debug)]
pub enum LinnaeaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Ambiguous result: {0}")]
    AmbiguousResult(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Other error: {0}")]
    Other(String),
}

/// Result type alias for Linnaea operations
pub type LinnaeaResult<T> = Result<T, LinnaeaError>;
