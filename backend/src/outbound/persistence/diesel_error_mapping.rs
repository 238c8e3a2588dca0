//! Shared Diesel error mapping for the PostgreSQL repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool errors through a repository's connection constructor.
pub(crate) fn map_pool_failure<E>(error: PoolError, connection: impl FnOnce(String) -> E) -> E {
    let message = match error {
        PoolError::Unavailable { message } | PoolError::Setup { message } => message,
    };
    connection(message)
}

/// Map common Diesel failures onto query and connection constructors.
pub(crate) fn map_diesel_failure<E>(
    error: DieselError,
    query: impl FnOnce(String) -> E,
    connection: impl FnOnce(String) -> E,
) -> E {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            connection(format!("database connection error: {}", info.message()))
        }
        DieselError::DatabaseError(_, info) => query(format!("database error: {}", info.message())),
        DieselError::NotFound => query("record not found".to_owned()),
        other => query(other.to_string()),
    }
}

/// Name of the unique constraint a Diesel error violated, if any.
pub(crate) fn unique_violation(error: &DieselError) -> Option<&str> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            Some(info.constraint_name().unwrap_or_default())
        }
        _ => None,
    }
}
