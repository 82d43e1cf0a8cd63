//! SQL storage error mapping.
//!
//! `PostgreSQL` constraint violations are translated into the typed
//! `StorageError` variants so callers can distinguish "already exists"
//! and "still referenced" from transient faults.

use sqlx::Error as SqlxError;
use sts_storage::StorageError;

/// `PostgreSQL` unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";
/// `PostgreSQL` foreign key violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Converts a `SQLx` error to a storage error with no constraint context.
#[allow(clippy::needless_pass_by_value)]
pub fn from_sqlx_error(err: SqlxError) -> StorageError {
    match err {
        SqlxError::RowNotFound => StorageError::Internal("row not found".to_string()),
        SqlxError::Database(db_err) => StorageError::Query(db_err.to_string()),
        SqlxError::PoolTimedOut => StorageError::Connection("connection pool timeout".to_string()),
        SqlxError::PoolClosed => StorageError::Connection("connection pool closed".to_string()),
        _ => StorageError::Internal(err.to_string()),
    }
}

/// Converts a `SQLx` error from a write against a constrained table,
/// mapping unique violations to `Duplicate` for the given entity and
/// foreign-key violations to `ForeignKey`.
#[allow(clippy::needless_pass_by_value)]
pub fn map_constraint_error(
    err: SqlxError,
    entity_type: &'static str,
    field: &'static str,
    value: impl Into<String>,
) -> StorageError {
    if let SqlxError::Database(db_err) = &err {
        if db_err.code().is_some_and(|c| c == UNIQUE_VIOLATION) {
            return StorageError::duplicate(entity_type, field, value);
        }
        if db_err.code().is_some_and(|c| c == FOREIGN_KEY_VIOLATION) {
            return StorageError::ForeignKey(format!("{entity_type} is referenced by other rows"));
        }
    }

    from_sqlx_error(err)
}
