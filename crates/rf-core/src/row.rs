//! Row values and primary-key identity.

use crate::column_name::ColumnName;
use crate::table_name::TableName;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// One row of data for exactly one table: a column → value mapping.
///
/// Cell values are `serde_json::Value`, so fixtures can carry strings,
/// numbers, booleans, and explicit nulls without a bespoke value enum.
/// Column output ordering is not a property of the row; it is applied from
/// the table's column order when statements are rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    table: TableName,
    values: HashMap<ColumnName, Value>,
}

impl Row {
    /// Create an empty row for `table`.
    pub fn new(table: TableName) -> Self {
        Self {
            table,
            values: HashMap::new(),
        }
    }

    /// Chainable setter, for fixture-style row construction.
    pub fn with(mut self, column: impl AsRef<str>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Set a column value, replacing any previous value for that column.
    pub fn set(&mut self, column: impl AsRef<str>, value: impl Into<Value>) {
        self.values.insert(ColumnName::new(column), value.into());
    }

    /// Remove a column value, returning it if it was set.
    pub fn unset(&mut self, column: &ColumnName) -> Option<Value> {
        self.values.remove(column)
    }

    /// The table this row belongs to.
    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// The value of `column`, or `None` if the column was never set.
    ///
    /// An explicitly-set SQL NULL is `Some(Value::Null)`, which is distinct
    /// from an unset column.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.values.get(column)
    }

    /// Whether `column` was set, even to an explicit null.
    pub fn is_set(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Whether `column` holds a non-null value.
    pub fn has_value(&self, column: &str) -> bool {
        matches!(self.values.get(column), Some(v) if !v.is_null())
    }

    /// Iterate over the set columns (unordered).
    pub fn columns(&self) -> impl Iterator<Item = &ColumnName> {
        self.values.keys()
    }

    /// Iterate over set (column, value) pairs (unordered).
    pub fn entries(&self) -> impl Iterator<Item = (&ColumnName, &Value)> {
        self.values.iter()
    }

    /// Number of set columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no column is set.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Project this row onto `columns`, producing the row's merge identity.
    ///
    /// Unset columns project to SQL NULL; callers that require the full key
    /// (the merger does) must check for nulls themselves.
    pub fn key_projection(&self, columns: &[ColumnName]) -> RowKey {
        RowKey::from_values(
            columns
                .iter()
                .map(|c| self.values.get(c.as_str()).unwrap_or(&Value::Null)),
        )
    }
}

/// A row's primary-key projection, used to detect duplicate logical records
/// across dataset sources.
///
/// Stored as the canonical JSON rendering of each key value, which makes the
/// key hashable (raw `serde_json::Value` is not) and directly printable in
/// error messages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(Vec<String>);

impl RowKey {
    /// Build a key from the projected values, in primary-key column order.
    pub fn from_values<'a>(values: impl IntoIterator<Item = &'a Value>) -> Self {
        Self(values.into_iter().map(Value::to_string).collect())
    }

    /// Number of key parts.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key has no parts (table without a primary key).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0.join(", "))
    }
}

#[cfg(test)]
#[path = "row_test.rs"]
mod tests;
