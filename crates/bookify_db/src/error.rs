//! Error types for the booking store

use bookify_common::BookifyError;
use thiserror::Error;

/// Errors that can occur when working with the booking store
#[derive(Debug, Error)]
pub enum DbError {
    /// Error from SQLx
    #[error("Database error: {0}")]
    SqlxError(#[from] sqlx::Error),

    /// Error with the database configuration
    #[error("Database configuration error: {0}")]
    ConfigError(String),

    /// Error with database URL parsing
    #[error("Database URL error: {0}")]
    UrlError(String),

    /// Error with database pool creation
    #[error("Database pool error: {0}")]
    PoolError(String),

    /// Error with database query
    #[error("Database query error: {0}")]
    QueryError(String),

    /// A stored value could not be turned back into a domain value
    #[error("Database decode error: {0}")]
    DecodeError(String),

    /// A uniqueness guard rejected the write
    #[error("Conflicting booking: {0}")]
    Conflict(String),

    /// Other errors
    #[error("Other database error: {0}")]
    Other(String),
}

impl DbError {
    /// Maps a write failure, turning unique violations into `Conflict`.
    pub fn from_write(err: sqlx::Error, what: &str) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::Conflict(what.to_string())
            }
            _ => DbError::QueryError(err.to_string()),
        }
    }
}

impl From<DbError> for BookifyError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Conflict(msg) => BookifyError::ConflictError(msg),
            DbError::ConfigError(_) | DbError::UrlError(_) => {
                BookifyError::ConfigError(err.to_string())
            }
            DbError::DecodeError(_) => BookifyError::InternalError(err.to_string()),
            other => BookifyError::ServiceUnavailable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookify_common::HttpStatusCode;

    #[test]
    fn store_failures_become_service_unavailable() {
        let err: BookifyError = DbError::PoolError("timed out".to_string()).into();
        assert_eq!(err.status_code(), 503);
    }

    #[test]
    fn conflicts_stay_conflicts() {
        let err: BookifyError = DbError::Conflict("slot taken".to_string()).into();
        assert_eq!(err.status_code(), 409);
    }
}
