//! Linepatch error types.
//!
//! All errors are typed and provide root cause information. "Not found"
//! conditions (absent signatures, anchors that match nothing) are never
//! errors; they surface as `Option` values or zero counts instead.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for linepatch operations.
#[derive(Error, Debug)]
pub enum PatchError {
    /// I/O error during file operations.
    #[error("I/O error for path {path}: {source}")]
    Io {
        /// The file path that caused the I/O error.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Input file is not valid UTF-8.
    #[error("File {path} is not valid UTF-8")]
    Utf8 {
        /// The file that failed UTF-8 decoding.
        path: PathBuf,
    },

    /// Invalid plan schema.
    #[error("Invalid plan schema: {message}")]
    InvalidPlanSchema {
        /// The schema validation error message.
        message: String,
    },

    /// Generic error with context.
    #[error("{0}")]
    Other(String),
}

impl From<std::io::Error> for PatchError {
    fn from(err: std::io::Error) -> Self {
        PatchError::Io {
            path: PathBuf::from("<unknown>"),
            source: err,
        }
    }
}

/// Result type alias for linepatch operations.
pub type Result<T> = std::result::Result<T, PatchError>;
