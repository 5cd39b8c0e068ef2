//! Error types for rf-db

use thiserror::Error;

/// Database boundary errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Metadata could not be fetched for a table (D001)
    #[error("[D001] Metadata unavailable for table '{table}': {detail}")]
    MetadataUnavailable { table: String, detail: String },

    /// Connection error (D002)
    #[error("[D002] Database connection failed: {0}")]
    ConnectionError(String),

    /// Query execution error (D003)
    #[error("[D003] Catalog query failed: {0}")]
    QueryError(String),

    /// Adapter returned a row that does not match the fixed tuple shape (D004)
    #[error("[D004] Malformed {capability} row: {detail}")]
    ShapeError { capability: String, detail: String },

    /// Mutex poisoned (D005)
    #[error("[D005] Database mutex poisoned: {0}")]
    MutexPoisoned(String),
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::QueryError(err.to_string())
    }
}
