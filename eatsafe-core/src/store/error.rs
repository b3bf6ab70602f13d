use camino::Utf8PathBuf;
use rusqlite::ErrorCode;
use thiserror::Error;

use crate::FieldError;

use super::schema::SchemaError;

/// Errors raised by [`SqliteFacilityStore`](super::SqliteFacilityStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Creating the directory that holds the database file failed.
    #[error("failed to create parent directory {path}")]
    CreateDirectory {
        /// Directory that could not be created.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {location}")]
    Open {
        /// Connection string of the database.
        location: String,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Preparing the connection (pragmas, SQL functions) failed.
    #[error("failed to configure SQLite connection: {step}")]
    Configure {
        /// Setup step that failed.
        step: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Creating or verifying the schema failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A record failed validation before it reached the database.
    #[error(transparent)]
    Invalid(#[from] FieldError),
    /// A filter named a column the table does not have.
    #[error("{table} has no column named {column}")]
    UnknownColumn {
        /// Table being filtered.
        table: &'static str,
        /// Rejected column name.
        column: String,
    },
    /// The row addressed by a key does not exist.
    #[error("no {table} row has key {key}")]
    NotFound {
        /// Table that was searched.
        table: &'static str,
        /// Key that was looked up.
        key: String,
    },
    /// SQLite rejected a write, e.g. a dangling foreign key or duplicate key.
    #[error("failed to {operation}: constraint violated")]
    Constraint {
        /// Operation being performed.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
    /// Any other SQLite failure.
    #[error("failed to {operation}")]
    Query {
        /// Operation being performed.
        operation: &'static str,
        /// Source error returned by `rusqlite`.
        #[source]
        source: rusqlite::Error,
    },
}

/// Wrap a `rusqlite` error, singling out constraint violations.
pub(crate) fn sqlite_failure(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> StoreError {
    move |source| {
        if source.sqlite_error_code() == Some(ErrorCode::ConstraintViolation) {
            StoreError::Constraint { operation, source }
        } else {
            StoreError::Query { operation, source }
        }
    }
}
