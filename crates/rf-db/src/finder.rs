//! Typed metadata facade over a dialect adapter.

use crate::error::{DbError, DbResult};
use crate::traits::{Dialect, DialectAdapter, MetadataSource};
use async_trait::async_trait;
use rf_core::{
    ColumnMapping, ColumnName, ColumnsMappingGroup, ReferencedTableSet, TableName,
};
use serde_json::Value;
use std::collections::BTreeSet;

/// Typed facade exposing the five metadata capabilities over any
/// adapter/dialect pair.
///
/// Pure reads, no caching: every call runs the dialect's catalog SQL through
/// the adapter and decodes the fixed tuple shape into `rf-core` types. Wrap
/// it in a [`MetadataCache`](crate::cache::MetadataCache) when metadata
/// should be fetched once per table per run.
pub struct MetadataFinder<A> {
    adapter: A,
    dialect: Box<dyn Dialect>,
}

impl<A: DialectAdapter> MetadataFinder<A> {
    pub fn new(adapter: A, dialect: Box<dyn Dialect>) -> Self {
        Self { adapter, dialect }
    }

    /// The wrapped adapter.
    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Run a catalog query for `table`, converting adapter failures into
    /// `MetadataUnavailable` with the table named.
    async fn query(
        &self,
        sql: &str,
        table: &TableName,
        capability: &str,
    ) -> DbResult<Vec<Vec<Value>>> {
        log::debug!(
            "fetching {} for table '{}' via {}",
            capability,
            table,
            self.adapter.engine()
        );
        self.adapter
            .query_rows(sql, &[table.as_str()])
            .await
            .map_err(|e| DbError::MetadataUnavailable {
                table: table.to_string(),
                detail: e.to_string(),
            })
    }

    /// Run a single-column catalog query and decode each row as a name.
    async fn query_names(
        &self,
        sql: &str,
        table: &TableName,
        capability: &str,
    ) -> DbResult<Vec<ColumnName>> {
        let rows = self.query(sql, table, capability).await?;
        rows.into_iter()
            .map(|row| {
                let name = decode_string(&row, 0, capability)?;
                ColumnName::try_new(name).ok_or_else(|| shape_error(capability, "empty name"))
            })
            .collect()
    }
}

#[async_trait]
impl<A: DialectAdapter> MetadataSource for MetadataFinder<A> {
    async fn column_order_of(&self, table: &TableName) -> DbResult<Vec<ColumnName>> {
        let columns = self
            .query_names(self.dialect.column_order_sql(), table, "column order")
            .await?;
        if columns.is_empty() {
            // Catalog queries return no rows for unknown tables instead of
            // failing, and a table always has at least one column.
            return Err(DbError::MetadataUnavailable {
                table: table.to_string(),
                detail: "table not found in catalog".to_string(),
            });
        }
        Ok(columns)
    }

    async fn not_null_columns_of(&self, table: &TableName) -> DbResult<BTreeSet<ColumnName>> {
        let columns = self
            .query_names(self.dialect.not_null_columns_sql(), table, "not-null columns")
            .await?;
        Ok(columns.into_iter().collect())
    }

    async fn referenced_tables_of(&self, table: &TableName) -> DbResult<ReferencedTableSet> {
        let rows = self
            .query(self.dialect.referenced_tables_sql(), table, "referenced tables")
            .await?;
        let mut tables = Vec::with_capacity(rows.len());
        for row in rows {
            let name = decode_string(&row, 0, "referenced tables")?;
            tables.push(
                TableName::try_new(name)
                    .ok_or_else(|| shape_error("referenced tables", "empty name"))?,
            );
        }

        // The closure query excludes self-edges; a self-referencing foreign
        // key is reported by including the table itself, at depth zero.
        let mappings = self.columns_mappings_of(table).await?;
        if !mappings.self_referencing_columns().is_empty() {
            tables.push(table.clone());
        }

        Ok(ReferencedTableSet::from_depth_ordered(tables))
    }

    async fn columns_mappings_of(&self, table: &TableName) -> DbResult<ColumnsMappingGroup> {
        let rows = self
            .query(self.dialect.columns_mappings_sql(), table, "columns mappings")
            .await?;
        let mut mappings = Vec::with_capacity(rows.len());
        for row in rows {
            if row.len() < 4 {
                return Err(shape_error(
                    "columns mappings",
                    &format!("expected 4 columns, got {}", row.len()),
                ));
            }
            mappings.push(ColumnMapping {
                table: decode_table_name(&row, 0, "columns mappings")?,
                column: decode_column_name(&row, 1, "columns mappings")?,
                ref_table: decode_table_name(&row, 2, "columns mappings")?,
                ref_column: decode_column_name(&row, 3, "columns mappings")?,
            });
        }
        Ok(ColumnsMappingGroup::new(table.clone(), mappings))
    }

    async fn primary_key_columns_of(&self, table: &TableName) -> DbResult<Vec<ColumnName>> {
        self.query_names(self.dialect.primary_key_sql(), table, "primary key")
            .await
    }
}

fn shape_error(capability: &str, detail: &str) -> DbError {
    DbError::ShapeError {
        capability: capability.to_string(),
        detail: detail.to_string(),
    }
}

fn decode_string(row: &[Value], index: usize, capability: &str) -> DbResult<String> {
    match row.get(index) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(shape_error(
            capability,
            &format!("column {} is not a string: {}", index, other),
        )),
        None => Err(shape_error(
            capability,
            &format!("column {} is missing", index),
        )),
    }
}

fn decode_table_name(row: &[Value], index: usize, capability: &str) -> DbResult<TableName> {
    let s = decode_string(row, index, capability)?;
    TableName::try_new(s).ok_or_else(|| shape_error(capability, "empty table name"))
}

fn decode_column_name(row: &[Value], index: usize, capability: &str) -> DbResult<ColumnName> {
    let s = decode_string(row, index, capability)?;
    ColumnName::try_new(s).ok_or_else(|| shape_error(capability, "empty column name"))
}

#[cfg(test)]
#[path = "finder_test.rs"]
mod tests;
