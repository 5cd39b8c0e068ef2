//! Error types for rf-dataset

use rf_core::CoreError;
use rf_db::DbError;
use thiserror::Error;

/// Dataset generation errors
#[derive(Error, Debug)]
pub enum GenError {
    /// Graph, ordering, or merge failure
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Metadata fetch failure
    #[error(transparent)]
    Db(#[from] DbError),

    /// G001: Two-phase insertion needs a primary key to patch by
    #[error("[G001] Table '{table}' has a self-referencing foreign key but no primary key to patch by")]
    SelfReferenceWithoutKey { table: String },
}

/// Result type alias for GenError
pub type GenResult<T> = Result<T, GenError>;
