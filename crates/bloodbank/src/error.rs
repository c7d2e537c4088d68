//! Error types for bloodbank.
//!
//! This module defines the error type shared by the storage collaborators,
//! configuration loading and the HTTP service. Form validation failures are
//! not errors; they are reported as [`crate::forms::Violations`].

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for bloodbank operations.
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

    // === Hosted Data API Errors ===
    /// The HTTP transport to the hosted data API failed.
    #[error("data API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The hosted data API answered with a non-success status.
    #[error("data API rejected insert into {table} with status {status}: {body}")]
    Rejected {
        /// Target table.
        table: &'static str,
        /// HTTP status code returned.
        status: u16,
        /// Response body, as returned.
        body: String,
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

    // === Form Errors ===
    /// A field name that the form does not declare.
    #[error("unknown field '{field}' on {form} form")]
    UnknownField {
        /// Name of the form.
        form: &'static str,
        /// The field name that was given.
        field: String,
    },

    // === Server Errors ===
    /// The HTTP listener could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: SocketAddr,
        /// The underlying error.
        #[source]
        source: std::io::Error,
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

/// A specialized Result type for bloodbank operations.
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

    /// Create an unknown field error.
    #[must_use]
    pub fn unknown_field(form: &'static str, field: impl Into<String>) -> Self {
        Self::UnknownField {
            form,
            field: field.into(),
        }
    }

    /// Check if this error came from the submission collaborator rather than
    /// from local setup.
    #[must_use]
    pub fn is_collaborator_error(&self) -> bool {
        matches!(
            self,
            Self::DatabaseQuery(_) | Self::Http(_) | Self::Rejected { .. } | Self::Internal(_)
        )
    }
}
