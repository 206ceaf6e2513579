//! Error types for osteoview

use thiserror::Error;

/// Main error type for osteoview geometry and processing operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Algorithm error: {0}")]
    Algorithm(String),

    #[error("Image error: {0}")]
    Image(String),
}

/// Result type alias for osteoview operations
pub type Result<T> = std::result::Result<T, Error>;
