//! The dataset generation pipeline.
//!
//! A linear, non-branching run with no retries:
//! metadata loaded → graph built → ordered → rows merged → finalized.
//! Any failure is terminal; no partial dataset is ever produced.

use crate::dataset::{rows_by_table, DatasetDef};
use crate::error::{GenError, GenResult};
use rf_core::{
    merge_rows, ColumnName, CoreError, Row, TableGraph, TableMetadata, TableName,
};
use rf_db::MetadataSource;
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};

/// A deferred assignment for one row of a self-referencing table.
///
/// Phase one inserts the row without its self-referencing column values;
/// phase two applies the patch once the referenced row exists.
#[derive(Debug, Clone, PartialEq)]
pub struct RowPatch {
    pub table: TableName,
    /// Primary-key (column, value) pairs identifying the row to patch.
    pub key: Vec<(ColumnName, Value)>,
    /// The deferred (column, value) assignments.
    pub assignments: Vec<(ColumnName, Value)>,
}

/// The finalized per-table output: merged rows plus deferred patches.
#[derive(Debug, Clone)]
pub struct TableDataset {
    pub table: TableName,
    /// Full catalog column order; drives statement serialization.
    pub column_order: Vec<ColumnName>,
    /// Merged rows, primary keys guaranteed collision-free.
    pub rows: Vec<Row>,
    /// Phase-two patches for self-referencing columns.
    pub patches: Vec<RowPatch>,
}

/// The finalized dataset handed to the statement-execution layer.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Safe table order for INSERT: dependencies first.
    pub insert_order: Vec<TableName>,
    /// Safe table order for DELETE: exact reverse of the insert order.
    pub delete_order: Vec<TableName>,
    pub(crate) tables: BTreeMap<TableName, TableDataset>,
}

impl Dataset {
    /// The merged rows for `table`, if any definition contributed rows.
    pub fn table(&self, table: &TableName) -> Option<&TableDataset> {
        self.tables.get(table)
    }

    /// Table datasets following the insert order, skipping row-less tables
    /// that are only present for ordering.
    pub fn iter_insert(&self) -> impl Iterator<Item = &TableDataset> {
        self.insert_order.iter().filter_map(|t| self.tables.get(t))
    }

    /// Table datasets following the delete order.
    pub fn iter_delete(&self) -> impl Iterator<Item = &TableDataset> {
        self.delete_order.iter().filter_map(|t| self.tables.get(t))
    }
}

/// Drives one dataset-generation run over a metadata source.
pub struct DatasetGenerator<'a> {
    metadata: &'a dyn MetadataSource,
}

impl<'a> DatasetGenerator<'a> {
    pub fn new(metadata: &'a dyn MetadataSource) -> Self {
        Self { metadata }
    }

    /// Run the pipeline over the given definitions.
    pub async fn generate(&self, defs: &[DatasetDef]) -> GenResult<Dataset> {
        let grouped = rows_by_table(defs);

        let metadata = self.load_metadata(grouped.keys()).await?;
        log::debug!("metadata loaded for {} tables", metadata.len());

        let graph = build_graph(&metadata)?;
        log::debug!(
            "graph built: {} tables, {} self-referencing",
            graph.len(),
            graph.self_referencing().len()
        );

        let insert_order = graph.insert_order()?;
        let delete_order = graph.delete_order()?;
        log::debug!("tables ordered: {:?}", insert_order);

        let mut tables = BTreeMap::new();
        for (table, rows) in &grouped {
            let meta = &metadata[table];
            let merged = merge_rows(table, rows, meta)?;
            let (rows, patches) = split_self_references(table, merged, meta)?;
            tables.insert(
                table.clone(),
                TableDataset {
                    table: table.clone(),
                    column_order: meta.column_order.clone(),
                    rows,
                    patches,
                },
            );
        }
        log::debug!("rows merged for {} tables", tables.len());

        Ok(Dataset {
            insert_order,
            delete_order,
            tables,
        })
    }

    /// Fetch metadata for every table with rows plus everything those tables
    /// transitively reference, so the graph sees the complete edge set. The
    /// fetches are sequential; ordering needs the full node set anyway, so
    /// nothing downstream could start earlier.
    async fn load_metadata(
        &self,
        seed: impl Iterator<Item = &TableName>,
    ) -> GenResult<BTreeMap<TableName, TableMetadata>> {
        let mut metadata = BTreeMap::new();
        let mut queue: VecDeque<TableName> = seed.cloned().collect();
        while let Some(table) = queue.pop_front() {
            if metadata.contains_key(&table) {
                continue;
            }
            let meta = self.metadata.table_metadata_of(&table).await?;
            for referenced in meta.referenced.iter() {
                if !metadata.contains_key(referenced) {
                    queue.push_back(referenced.clone());
                }
            }
            metadata.insert(table, meta);
        }
        Ok(metadata)
    }
}

/// Build the dependency graph and reject self-referencing columns that are
/// NOT NULL: those cannot be two-phased (phase one would insert a null), so
/// the reference is a genuine unbreakable cycle.
fn build_graph(metadata: &BTreeMap<TableName, TableMetadata>) -> GenResult<TableGraph> {
    let closures = metadata
        .iter()
        .map(|(t, m)| (t.clone(), m.referenced.clone()))
        .collect();
    let graph = TableGraph::build(&closures);

    for table in graph.self_referencing() {
        let meta = &metadata[table];
        for column in meta.mappings.self_referencing_columns() {
            if meta.not_null.contains(&column) {
                return Err(GenError::Core(CoreError::CyclicDependency {
                    tables: table.to_string(),
                }));
            }
        }
    }

    Ok(graph)
}

/// Strip self-referencing column values out of the merged rows and emit them
/// as phase-two patches keyed by primary key.
fn split_self_references(
    table: &TableName,
    mut rows: Vec<Row>,
    meta: &TableMetadata,
) -> GenResult<(Vec<Row>, Vec<RowPatch>)> {
    let self_columns = meta.mappings.self_referencing_columns();
    if self_columns.is_empty() {
        return Ok((rows, Vec::new()));
    }
    if !meta.has_primary_key() {
        return Err(GenError::SelfReferenceWithoutKey {
            table: table.to_string(),
        });
    }

    let mut patches = Vec::new();
    for row in &mut rows {
        let mut assignments = Vec::new();
        for column in &self_columns {
            if row.has_value(column) {
                if let Some(value) = row.unset(column) {
                    assignments.push((column.clone(), value));
                }
            }
        }
        if assignments.is_empty() {
            continue;
        }
        // Primary-key values are guaranteed present by the merge pass.
        let key = meta
            .primary_key
            .iter()
            .map(|c| {
                (
                    c.clone(),
                    row.get(c).cloned().unwrap_or(Value::Null),
                )
            })
            .collect();
        patches.push(RowPatch {
            table: table.clone(),
            key,
            assignments,
        });
    }

    Ok((rows, patches))
}

#[cfg(test)]
#[path = "generator_test.rs"]
mod tests;
