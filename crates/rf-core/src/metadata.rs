//! Referential metadata types: foreign-key mappings, referenced-table
//! closures, and the per-table metadata snapshot.

use crate::column_name::ColumnName;
use crate::table_name::TableName;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// A single foreign-key edge at column granularity.
///
/// Composite keys produce several mappings between the same table pair, one
/// per column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    /// The table holding the foreign-key column.
    pub table: TableName,
    /// The foreign-key column itself.
    pub column: ColumnName,
    /// The table the key points at.
    pub ref_table: TableName,
    /// The referenced column (usually the target's primary key).
    pub ref_column: ColumnName,
}

/// All foreign-key mappings whose source is a single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnsMappingGroup {
    table: TableName,
    mappings: Vec<ColumnMapping>,
}

impl ColumnsMappingGroup {
    /// Group `mappings` under `table`. Mappings for other source tables are
    /// discarded with a warning; the catalog query is keyed by table, so any
    /// such row is a dialect bug.
    pub fn new(table: TableName, mappings: Vec<ColumnMapping>) -> Self {
        let (own, foreign): (Vec<_>, Vec<_>) =
            mappings.into_iter().partition(|m| m.table == table);
        for m in &foreign {
            log::warn!(
                "discarding mapping for table '{}' while grouping mappings of '{}'",
                m.table,
                table
            );
        }
        Self {
            table,
            mappings: own,
        }
    }

    /// The source table of every mapping in the group.
    pub fn table(&self) -> &TableName {
        &self.table
    }

    /// All mappings, in catalog order.
    pub fn mappings(&self) -> &[ColumnMapping] {
        &self.mappings
    }

    /// Whether the table has no outgoing foreign keys.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// The distinct tables this table references directly, in first-seen order.
    pub fn referenced_tables(&self) -> Vec<&TableName> {
        let mut seen = HashSet::new();
        self.mappings
            .iter()
            .map(|m| &m.ref_table)
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// Columns that reference the table itself (self-referencing foreign keys).
    pub fn self_referencing_columns(&self) -> BTreeSet<ColumnName> {
        self.mappings
            .iter()
            .filter(|m| m.ref_table == self.table)
            .map(|m| m.column.clone())
            .collect()
    }
}

/// The ordered, deduplicated transitive closure of tables a given table
/// references, furthest ancestor first.
///
/// Iterating the set yields an insert-safe prefix: every table appears after
/// everything it transitively depends on has already appeared. The set never
/// contains the owning table itself unless a genuine self-referencing foreign
/// key exists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReferencedTableSet {
    tables: Vec<TableName>,
}

impl ReferencedTableSet {
    /// An empty set, for tables without foreign keys.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from an already depth-ordered sequence (deepest ancestor first),
    /// dropping duplicates while keeping the first occurrence. This matches
    /// the closure query contract: rows ordered by depth descending, where
    /// the first occurrence of a table carries its greatest depth.
    pub fn from_depth_ordered(tables: impl IntoIterator<Item = TableName>) -> Self {
        let mut seen = HashSet::new();
        Self {
            tables: tables
                .into_iter()
                .filter(|t| seen.insert(t.clone()))
                .collect(),
        }
    }

    /// The tables in decreasing dependency depth.
    pub fn tables(&self) -> &[TableName] {
        &self.tables
    }

    /// Whether `table` is in the closure.
    pub fn contains(&self, table: &TableName) -> bool {
        self.tables.contains(table)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TableName> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl IntoIterator for ReferencedTableSet {
    type Item = TableName;
    type IntoIter = std::vec::IntoIter<TableName>;

    fn into_iter(self) -> Self::IntoIter {
        self.tables.into_iter()
    }
}

/// Read-only metadata snapshot for one table, fetched once per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableMetadata {
    /// Every column of the table, in catalog ordinal order. Total: drives
    /// statement serialization order and defines the set of legal columns.
    pub column_order: Vec<ColumnName>,
    /// Columns carrying a NOT NULL constraint.
    pub not_null: BTreeSet<ColumnName>,
    /// Primary-key columns, in key ordinal order. Empty when the table has
    /// no primary key.
    pub primary_key: Vec<ColumnName>,
    /// Transitive closure of referenced tables.
    pub referenced: ReferencedTableSet,
    /// Column-level foreign-key mappings out of this table.
    pub mappings: ColumnsMappingGroup,
}

impl TableMetadata {
    /// Whether `column` exists in the table at all.
    pub fn is_known_column(&self, column: &ColumnName) -> bool {
        self.column_order.contains(column)
    }

    /// Whether the table has a primary key.
    pub fn has_primary_key(&self) -> bool {
        !self.primary_key.is_empty()
    }
}

#[cfg(test)]
#[path = "metadata_test.rs"]
mod tests;
