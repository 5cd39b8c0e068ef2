//! Error types for rf-core

use thiserror::Error;

/// Core error type for Rowforge
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Empty name supplied where a table or column name was required
    #[error("[E001] Empty name: {context}")]
    EmptyName { context: String },

    /// E002: Reference cycle between distinct tables, no insert order exists
    #[error("[E002] Cyclic dependency between tables: {tables}")]
    CyclicDependency { tables: String },

    /// E003: NOT NULL column left unset after merging
    #[error("[E003] Required column '{column}' of table '{table}' is unset for row {key}")]
    MissingRequiredColumn {
        table: String,
        key: String,
        column: String,
    },

    /// E004: Row references a column the table does not have
    #[error("[E004] Unknown column '{column}' for table '{table}'")]
    UnknownColumn { table: String, column: String },
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;
