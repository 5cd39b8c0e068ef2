//! rf-core - Core library for Rowforge
//!
//! This crate provides the pure data-shaping pieces of Rowforge: typed
//! table/column names, row values, referential metadata types, the table
//! dependency graph with deterministic ordering, and row merging.

pub mod column_name;
pub mod error;
pub mod graph;
pub mod merge;
pub mod metadata;
mod newtype_string;
pub mod row;
pub mod sql_utils;
pub mod table_name;

pub use column_name::ColumnName;
pub use error::{CoreError, CoreResult};
pub use graph::TableGraph;
pub use merge::merge_rows;
pub use metadata::{ColumnMapping, ColumnsMappingGroup, ReferencedTableSet, TableMetadata};
pub use row::{Row, RowKey};
pub use table_name::TableName;
