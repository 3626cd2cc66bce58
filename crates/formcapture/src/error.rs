//! Error types for formcapture.
//!
//! The storage variants mirror the failure modes callers are expected to
//! present to the user: the database could not be opened, a write or read
//! did not go through, or the store was used while closed.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for formcapture operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// The database file (or its directory) could not be opened or created.
    #[error("storage unavailable at {path}: {source}")]
    StorageUnavailable {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An insert or schema reset did not commit.
    #[error("write failed: {0}")]
    WriteFailed(#[source] rusqlite::Error),

    /// Scanning the submissions table failed.
    #[error("read failed: {0}")]
    ReadFailed(#[source] rusqlite::Error),

    /// The store was used before `initialize` or after `close`.
    #[error("submission store is not open")]
    NotOpen,

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for formcapture operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a storage-unavailable error for the given path.
    #[must_use]
    pub fn storage_unavailable(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::StorageUnavailable {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Check if this error means the store was not open.
    #[must_use]
    pub fn is_not_open(&self) -> bool {
        matches!(self, Self::NotOpen)
    }

    /// Check if this error means the database location is unusable.
    #[must_use]
    pub fn is_storage_unavailable(&self) -> bool {
        matches!(self, Self::StorageUnavailable { .. })
    }
}
