//! Error types for jsonlog core.

use std::io;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in jsonlog core operations.
///
/// Only the operations that propagate failures ever return these:
/// [`LogStore::open`](crate::LogStore::open), [`LogStore::try_add`](crate::LogStore::try_add),
/// [`LogStore::read_raw`](crate::LogStore::read_raw) and
/// [`LogStore::clear`](crate::LogStore::clear).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error.
    #[error("storage error: {0}")]
    Storage(#[from] jsonlog_storage::StorageError),

    /// JSON codec error.
    #[error("codec error: {0}")]
    Codec(#[from] jsonlog_codec::CodecError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The store path cannot name an active file.
    #[error("invalid log path: {message}")]
    InvalidPath {
        /// Description of the problem.
        message: String,
    },

    /// The configuration is inconsistent.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the problem.
        message: String,
    },

    /// The active file holds bytes that are not UTF-8.
    #[error("active file is not valid UTF-8")]
    InvalidUtf8,
}

impl CoreError {
    /// Creates an invalid path error.
    pub fn invalid_path(message: impl Into<String>) -> Self {
        Self::InvalidPath {
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
