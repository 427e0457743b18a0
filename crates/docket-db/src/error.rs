//! Database error types for docket-db.

use thiserror::Error;

use crate::retry::is_transient_error;

/// Errors from document store operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Lookup or partition-scoped write matched no record.
    #[error("Not found: {entity_type} {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Duplicate identifier or duplicate unique field.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The backing store is temporarily unavailable. Retried internally with
    /// bounded exponential backoff before surfacing.
    #[error("Store unavailable: {0}")]
    Transient(String),

    /// Invalid state encountered (e.g., a disallowed status transition).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Classify a raw libSQL error into the domain taxonomy.
///
/// Unique-constraint violations become [`DatabaseError::Conflict`]; transient
/// backend errors become [`DatabaseError::Transient`]; everything else passes
/// through as [`DatabaseError::LibSql`].
pub(crate) fn classify(error: libsql::Error) -> DatabaseError {
    let message = error.to_string();
    if message.contains("UNIQUE constraint failed") {
        return DatabaseError::Conflict(message);
    }
    if is_transient_error(&error) {
        return DatabaseError::Transient(message);
    }
    DatabaseError::LibSql(error)
}
