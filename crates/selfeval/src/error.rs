//! Error types for selfeval.
//!
//! This module defines all error types used throughout the selfeval crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

use crate::survey::SchemaViolation;

/// The main error type for selfeval operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// A stored document could not be parsed.
    #[error("stored document '{key}' is corrupt: {source}")]
    StoreCorrupt {
        /// Key of the document.
        key: String,
        /// The parse failure.
        #[source]
        source: serde_json::Error,
    },

    /// The storage backend ran out of space.
    #[error("storage quota of {limit} bytes exceeded while writing '{key}'")]
    QuotaExceeded {
        /// Key being written.
        key: String,
        /// Quota in bytes.
        limit: usize,
    },

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

    // === Survey Errors ===
    /// A sector name is not one of the known sectors.
    #[error("unknown sector: {value}")]
    UnknownSector {
        /// The rejected input.
        value: String,
    },

    /// A field key is not part of the survey.
    #[error("unknown survey field: {key}")]
    UnknownField {
        /// The rejected key.
        key: String,
    },

    /// An answers document has the wrong shape.
    #[error("invalid answers: {message}")]
    InvalidAnswers {
        /// Description of the problem.
        message: String,
    },

    /// A record failed validation at the submission boundary.
    #[error(transparent)]
    Schema(#[from] SchemaViolation),

    /// Writing a submission receipt failed.
    #[error("failed to write receipt {path}: {message}")]
    Receipt {
        /// Receipt path.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for selfeval operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a receipt error.
    #[must_use]
    pub fn receipt(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Receipt {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Check if this error means the backend is out of space.
    #[must_use]
    pub fn is_quota_exceeded(&self) -> bool {
        matches!(self, Self::QuotaExceeded { .. })
    }

    /// Check if this error means stored data could not be parsed.
    #[must_use]
    pub fn is_corrupt_store(&self) -> bool {
        matches!(self, Self::StoreCorrupt { .. })
    }
}
