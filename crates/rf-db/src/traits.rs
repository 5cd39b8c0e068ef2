//! Capability trait definitions for the database boundary.

use crate::error::DbResult;
use async_trait::async_trait;
use rf_core::{ColumnName, ColumnsMappingGroup, ReferencedTableSet, TableMetadata, TableName};
use serde_json::Value;
use std::collections::BTreeSet;

/// Raw query capability implemented once per database engine.
///
/// The adapter owns connection and resource management; callers hand it
/// parametrized SQL (the dialect's catalog queries) and get back plain rows.
/// Implementations must be Send + Sync for async operation.
#[async_trait]
pub trait DialectAdapter: Send + Sync {
    /// Execute a parametrized query and return all result rows.
    async fn query_rows(&self, sql: &str, params: &[&str]) -> DbResult<Vec<Vec<Value>>>;

    /// Engine identifier for logging
    fn engine(&self) -> &'static str;
}

/// The per-engine catalog SQL, one method per required query shape.
///
/// Every query takes the table name as its single parameter. Result shapes
/// are fixed by contract; the dialect only decides where the data comes from:
///
/// - column order: one column, the column name, in ordinal order
/// - not-null columns: one column, the column name
/// - referenced tables: one column, the referenced table name, transitively
///   closed over foreign keys and ordered by decreasing dependency depth,
///   excluding the table itself
/// - columns mappings: four columns - table, column, referenced table,
///   referenced column - one row per foreign-key column
/// - primary key: one column, the column name, in key ordinal order
pub trait Dialect: Send + Sync {
    fn column_order_sql(&self) -> &str;
    fn not_null_columns_sql(&self) -> &str;
    fn referenced_tables_sql(&self) -> &str;
    fn columns_mappings_sql(&self) -> &str;
    fn primary_key_sql(&self) -> &str;
}

/// The five typed metadata capabilities, keyed by table name.
///
/// Implemented by [`MetadataFinder`](crate::finder::MetadataFinder) over any
/// adapter/dialect pair, and by [`MetadataCache`](crate::cache::MetadataCache)
/// as a caching decorator. All operations are pure reads; each fails with
/// [`DbError::MetadataUnavailable`](crate::error::DbError) when the table
/// does not exist or the underlying query errors.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Every column of the table, in catalog ordinal order.
    async fn column_order_of(&self, table: &TableName) -> DbResult<Vec<ColumnName>>;

    /// Columns carrying a NOT NULL constraint.
    async fn not_null_columns_of(&self, table: &TableName) -> DbResult<BTreeSet<ColumnName>>;

    /// Transitive closure of referenced tables, furthest ancestor first.
    /// Contains the table itself exactly when a self-referencing foreign key
    /// exists.
    async fn referenced_tables_of(&self, table: &TableName) -> DbResult<ReferencedTableSet>;

    /// Column-to-column foreign-key mappings out of the table.
    async fn columns_mappings_of(&self, table: &TableName) -> DbResult<ColumnsMappingGroup>;

    /// Primary-key columns, in key ordinal order; empty without a primary key.
    async fn primary_key_columns_of(&self, table: &TableName) -> DbResult<Vec<ColumnName>>;

    /// All five capabilities bundled into one snapshot.
    async fn table_metadata_of(&self, table: &TableName) -> DbResult<TableMetadata> {
        Ok(TableMetadata {
            column_order: self.column_order_of(table).await?,
            not_null: self.not_null_columns_of(table).await?,
            primary_key: self.primary_key_columns_of(table).await?,
            referenced: self.referenced_tables_of(table).await?,
            mappings: self.columns_mappings_of(table).await?,
        })
    }
}
