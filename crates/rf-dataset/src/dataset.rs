//! Fixture dataset definitions.

use rf_core::{Row, TableName};
use std::collections::BTreeMap;

/// One independently authored fixture: a sequence of rows, possibly for
/// several tables.
///
/// Registration order is significant. When several definitions contribute
/// rows for the same logical row (same table, same primary-key projection),
/// later-registered rows override earlier ones column by column during
/// merging.
#[derive(Debug, Clone, Default)]
pub struct DatasetDef {
    rows: Vec<Row>,
}

impl DatasetDef {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chainable row registration, for fixture-style construction.
    pub fn row(mut self, row: Row) -> Self {
        self.add_row(row);
        self
    }

    /// Register a row.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// The registered rows, in registration order.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Group the rows of several definitions by table, preserving registration
/// order within each table (definition order first, then row order).
pub fn rows_by_table(defs: &[DatasetDef]) -> BTreeMap<TableName, Vec<Row>> {
    let mut grouped: BTreeMap<TableName, Vec<Row>> = BTreeMap::new();
    for def in defs {
        for row in def.rows() {
            grouped
                .entry(row.table().clone())
                .or_default()
                .push(row.clone());
        }
    }
    grouped
}

#[cfg(test)]
#[path = "dataset_test.rs"]
mod tests;
