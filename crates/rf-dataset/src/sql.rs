//! Statement rendering for a finalized dataset.
//!
//! The dataset layer stops at statement text; executing the statements is the
//! caller's concern. Statements come out in a safe order: inserts follow the
//! insert order with self-reference patches appended last, deletes follow the
//! delete order.

use crate::generator::{Dataset, RowPatch, TableDataset};
use rf_core::sql_utils::{quote_ident, sql_literal};
use rf_core::{ColumnName, Row, TableName};

/// Render one INSERT statement for `row`, listing only its set columns in
/// the table's catalog column order.
pub fn insert_sql(table: &TableName, column_order: &[ColumnName], row: &Row) -> String {
    let set: Vec<&ColumnName> = column_order.iter().filter(|c| row.is_set(c)).collect();
    let columns = set
        .iter()
        .map(|c| quote_ident(c.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    let values = set
        .iter()
        .map(|c| sql_literal(row.get(c).unwrap_or(&serde_json::Value::Null)))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table.as_str()),
        columns,
        values
    )
}

/// Render the phase-two UPDATE for a self-reference patch, keyed by the
/// row's primary key.
pub fn update_sql(patch: &RowPatch) -> String {
    let assignments = patch
        .assignments
        .iter()
        .map(|(c, v)| format!("{} = {}", quote_ident(c.as_str()), sql_literal(v)))
        .collect::<Vec<_>>()
        .join(", ");
    let filter = patch
        .key
        .iter()
        .map(|(c, v)| format!("{} = {}", quote_ident(c.as_str()), sql_literal(v)))
        .collect::<Vec<_>>()
        .join(" AND ");
    format!(
        "UPDATE {} SET {} WHERE {}",
        quote_ident(patch.table.as_str()),
        assignments,
        filter
    )
}

/// Render a full-table DELETE.
pub fn delete_sql(table: &TableName) -> String {
    format!("DELETE FROM {}", quote_ident(table.as_str()))
}

/// All INSERT statements in dependency order, followed by the UPDATE patches
/// that close self-references once every row exists.
pub fn insert_statements(dataset: &Dataset) -> Vec<String> {
    let mut statements = Vec::new();
    for table in dataset.iter_insert() {
        for row in &table.rows {
            statements.push(insert_sql(&table.table, &table.column_order, row));
        }
    }
    for table in dataset.iter_insert() {
        for patch in &table.patches {
            statements.push(update_sql(patch));
        }
    }
    statements
}

/// One DELETE per table that carries rows, dependents first.
pub fn delete_statements(dataset: &Dataset) -> Vec<String> {
    dataset
        .iter_delete()
        .map(|t: &TableDataset| delete_sql(&t.table))
        .collect()
}

#[cfg(test)]
#[path = "sql_test.rs"]
mod tests;
