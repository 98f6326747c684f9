//! Error types for the migration engine

use std::time::Duration;
use thiserror::Error;
use tm_core::CoreError;
use tm_db::DbError;

/// Migration engine errors. Every variant is terminal for the current run.
#[derive(Error, Debug)]
pub enum MigrationError {
    /// History relation could not be created, queried, or written (M001)
    #[error("[M001] Migration history error: {context}: {source}")]
    Schema {
        context: String,
        #[source]
        source: DbError,
    },

    /// A non-`.sql` entry sits in the migrations directory (M002)
    #[error("[M002] Invalid file extension: {filename} (the migrations directory may only contain .sql files)")]
    InvalidExtension { filename: String },

    /// A migration recorded as successful is gone from disk (M003)
    #[error("[M003] Inconsistent migration state: executed migration file not found: {filename}")]
    MissingRecordedFile { filename: String },

    /// An unresolved failed migration blocks new work (M004)
    #[error(
        "[M004] Cannot proceed, there is at least one failed migration: {}. Fix it, then run `tidemark restore` to clear the failed record",
        .filenames.join(", ")
    )]
    Blocked { filenames: Vec<String> },

    /// A statement failed; the file was rolled back and the failure recorded (M005)
    #[error("[M005] Failed to execute {filename}, statement: {statement}, error: {message}")]
    Execution {
        filename: String,
        statement: String,
        message: String,
    },

    /// A statement failed and the failure record could not be written either (M006)
    #[error("[M006] Failed to execute {filename}, statement: {statement}, error: {message}; recording the failure also failed: {record_error}")]
    FailureNotRecorded {
        filename: String,
        statement: String,
        message: String,
        #[source]
        record_error: DbError,
    },

    /// The transaction around a file could not be opened or committed (M007)
    #[error("[M007] Transaction for {filename} failed: {source}")]
    Transaction {
        filename: String,
        #[source]
        source: DbError,
    },

    /// Migrations directory or file could not be read (M008)
    #[error("[M008] {0}")]
    Io(#[from] CoreError),

    /// Another process holds the migration lock (M009)
    #[error("[M009] Could not acquire the migration lock within {waited:.1?}: held by {owner} since {acquired_at}. If no migration is running, clear it with `tidemark unlock`")]
    LockTimeout {
        owner: String,
        acquired_at: String,
        waited: Duration,
    },

    /// Lock relation could not be created, queried, or written (M010)
    #[error("[M010] Migration lock error: {context}: {source}")]
    Lock {
        context: String,
        #[source]
        source: DbError,
    },

    /// History table name is not a plain identifier (M011)
    #[error("[M011] Invalid history table name '{name}': use letters, digits and underscores only")]
    InvalidTableName { name: String },
}

/// Result type alias for MigrationError
pub type MigrationResult<T> = Result<T, MigrationError>;

impl MigrationError {
    /// Name of the migration file this error is about, when there is one
    pub fn filename(&self) -> Option<&str> {
        match self {
            MigrationError::InvalidExtension { filename }
            | MigrationError::MissingRecordedFile { filename }
            | MigrationError::Execution { filename, .. }
            | MigrationError::FailureNotRecorded { filename, .. }
            | MigrationError::Transaction { filename, .. } => Some(filename),
            MigrationError::Blocked { filenames } => filenames.first().map(String::as_str),
            _ => None,
        }
    }
}

/// Wrap a history-store database error with context
pub(crate) fn schema_err(context: impl Into<String>) -> impl FnOnce(DbError) -> MigrationError {
    let context = context.into();
    move |source| MigrationError::Schema { context, source }
}

/// Wrap a lock-table database error with context
pub(crate) fn lock_err(context: impl Into<String>) -> impl FnOnce(DbError) -> MigrationError {
    let context = context.into();
    move |source| MigrationError::Lock { context, source }
}
