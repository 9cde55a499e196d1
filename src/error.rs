//! Error types for Filebay.

use thiserror::Error;

/// Common error type for Filebay operations.
#[derive(Error, Debug)]
pub enum FilebayError {
    /// The requested name is malformed, escapes the storage root, or does
    /// not refer to a regular file.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Rename target already exists.
    #[error("name already exists: {0}")]
    NameConflict(String),

    /// New name is empty or contains a path separator.
    #[error("invalid name: {0}")]
    InvalidName(String),

    /// Upload exceeds the configured size limit.
    #[error("payload too large: {size} bytes (limit {limit})")]
    PayloadTooLarge {
        /// Size of the rejected payload.
        size: u64,
        /// Configured maximum.
        limit: u64,
    },

    /// File content is not valid UTF-8 text.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for Filebay operations.
pub type Result<T> = std::result::Result<T, FilebayError>;
