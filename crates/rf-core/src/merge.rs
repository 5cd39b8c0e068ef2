//! Merging of rows contributed by multiple dataset sources.

use crate::error::{CoreError, CoreResult};
use crate::metadata::TableMetadata;
use crate::row::{Row, RowKey};
use crate::table_name::TableName;
use serde_json::Value;
use std::collections::HashMap;

/// Merge independently authored rows for one table into a consistent
/// collection.
///
/// Rows are grouped by primary-key projection in first-seen order. Within a
/// group, later rows override earlier ones column-by-column, but only with
/// non-null values: a later explicit null never erases an earlier value,
/// which lets one fixture supply defaults and another override a subset of
/// columns for the same logical row.
///
/// Fails with [`CoreError::UnknownColumn`] when a row carries a column the
/// table does not have, and with [`CoreError::MissingRequiredColumn`] when a
/// NOT NULL column (primary-key columns included) is still unset or null
/// after merging. Tables without a primary key have no merge identity; their
/// rows pass through unmerged in registration order.
pub fn merge_rows(table: &TableName, rows: &[Row], meta: &TableMetadata) -> CoreResult<Vec<Row>> {
    for row in rows {
        for column in row.columns() {
            if !meta.is_known_column(column) {
                return Err(CoreError::UnknownColumn {
                    table: table.to_string(),
                    column: column.to_string(),
                });
            }
        }
    }

    let merged = if meta.has_primary_key() {
        merge_by_key(table, rows, meta)?
    } else {
        rows.to_vec()
    };

    for row in &merged {
        check_not_null(table, row, meta)?;
    }

    Ok(merged)
}

/// Group rows by primary-key identity and fold each group column-by-column.
fn merge_by_key(table: &TableName, rows: &[Row], meta: &TableMetadata) -> CoreResult<Vec<Row>> {
    let mut merged: Vec<Row> = Vec::new();
    let mut index_by_key: HashMap<RowKey, usize> = HashMap::new();

    for row in rows {
        let key = row_key(table, row, meta)?;
        match index_by_key.get(&key) {
            Some(&i) => {
                log::debug!("merging duplicate row {} for table '{}'", key, table);
                overlay(&mut merged[i], row);
            }
            None => {
                index_by_key.insert(key, merged.len());
                merged.push(row.clone());
            }
        }
    }

    Ok(merged)
}

/// Compute a row's primary-key projection, rejecting rows whose key columns
/// are unset or null (a null key value can never match its counterpart).
fn row_key(table: &TableName, row: &Row, meta: &TableMetadata) -> CoreResult<RowKey> {
    for column in &meta.primary_key {
        if !row.has_value(column) {
            return Err(CoreError::MissingRequiredColumn {
                table: table.to_string(),
                key: row.key_projection(&meta.primary_key).to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(row.key_projection(&meta.primary_key))
}

/// Apply `later` on top of `earlier`, column by column. Non-null values
/// override; explicit nulls only fill columns that were never set.
fn overlay(earlier: &mut Row, later: &Row) {
    for (column, value) in later.entries() {
        if value.is_null() {
            if !earlier.is_set(column) {
                earlier.set(column.clone(), Value::Null);
            }
        } else {
            earlier.set(column.clone(), value.clone());
        }
    }
}

/// Every NOT NULL column must hold a value once merging is done; silently
/// defaulting would push the failure to statement execution time.
fn check_not_null(table: &TableName, row: &Row, meta: &TableMetadata) -> CoreResult<()> {
    for column in &meta.not_null {
        if !row.has_value(column) {
            return Err(CoreError::MissingRequiredColumn {
                table: table.to_string(),
                key: row.key_projection(&meta.primary_key).to_string(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod tests;
