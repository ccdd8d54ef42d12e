//! Error types for the database client

use consult_common::ConsultError;
use thiserror::Error;

/// Errors that can occur when working with the database client
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

    /// A unique constraint rejected the write
    #[error("Duplicate record: {0}")]
    Duplicate(String),

    /// A stored JSON column could not be encoded or decoded
    #[error("Stored data error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Concurrent writers kept changing the record between read and write
    #[error("Record {0} changed concurrently too many times")]
    Contention(String),
}

impl DbError {
    /// Maps a failed write, turning unique violations into [`DbError::Duplicate`].
    pub fn from_write(err: sqlx::Error, what: &str) -> Self {
        match err.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => DbError::Duplicate(what.to_string()),
            _ => DbError::QueryError(err.to_string()),
        }
    }
}

impl From<DbError> for ConsultError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Duplicate(what) => ConsultError::ConflictError(format!("{what} already exists")),
            DbError::Contention(_) => {
                ConsultError::ConflictError("Booking is busy, please try again".to_string())
            }
            DbError::ConfigError(msg) => ConsultError::ConfigError(msg),
            other => ConsultError::DatabaseError(other.to_string()),
        }
    }
}
