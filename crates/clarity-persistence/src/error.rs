//! Persistence error types.
//!
//! Backend failures are classified into the categories the ingest report
//! distinguishes: a destination table missing a column, a row referencing
//! an unknown subject, and everything else.

use clarity_model::ErrorKind;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Destination table lacks a column the data carries.
    #[error("table {table} is missing a column: {message}")]
    SchemaMismatch { table: String, message: String },

    /// A row references a subject that is not in the subject store.
    #[error("foreign key violation in {table}: {message}")]
    ReferentialIntegrity { table: String, message: String },

    /// Any other backend failure.
    #[error("database error in {table}: {source}")]
    Database {
        table: String,
        #[source]
        source: rusqlite::Error,
    },

    /// Opening or configuring the database failed.
    #[error("failed to open database: {0}")]
    Open(#[source] rusqlite::Error),
}

impl SinkError {
    /// Classifies a SQLite error raised while writing `table`.
    pub fn from_sqlite(table: &str, err: rusqlite::Error) -> Self {
        if is_foreign_key_violation(&err) {
            return Self::ReferentialIntegrity {
                table: table.to_string(),
                message: err.to_string(),
            };
        }
        if err.to_string().contains("has no column named") {
            return Self::SchemaMismatch {
                table: table.to_string(),
                message: err.to_string(),
            };
        }
        Self::Database {
            table: table.to_string(),
            source: err,
        }
    }

    /// Structured category for the ingest report.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SchemaMismatch { .. } => ErrorKind::SchemaMismatch,
            Self::ReferentialIntegrity { .. } => ErrorKind::ReferentialIntegrity,
            Self::Database { .. } | Self::Open(_) => ErrorKind::UnknownPersistence,
        }
    }
}

fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(code, message) => {
            code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
                || message
                    .as_deref()
                    .is_some_and(|m| m.contains("FOREIGN KEY constraint failed"))
        }
        _ => false,
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, SinkError>;
