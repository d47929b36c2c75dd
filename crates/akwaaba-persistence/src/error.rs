//! Storage errors.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the document stores.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// A document or directory could not be read.
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document could not be written or persisted.
    #[error("failed to write {path}: {source}")]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document could not be removed.
    #[error("failed to remove {path}: {source}")]
    RemoveError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON encoding or decoding failed.
    #[error("malformed document: {0}")]
    Json(#[from] serde_json::Error),

    /// A storage directory could not be created.
    #[error("failed to create directory {path}: {source}")]
    DirectoryError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No document exists under this id.
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// The caller passed something that cannot name a document.
    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl PersistenceError {
    /// Shorthand for a missing document.
    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }
}

/// Result alias for storage operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
