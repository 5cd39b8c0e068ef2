//! Caller-owned metadata cache.

use crate::error::{DbError, DbResult};
use crate::traits::MetadataSource;
use async_trait::async_trait;
use rf_core::{
    ColumnName, ColumnsMappingGroup, ReferencedTableSet, TableMetadata, TableName,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

/// Caching decorator over a [`MetadataSource`].
///
/// Metadata is a read-only snapshot per run, so the first request for a
/// table fetches the full [`TableMetadata`] bundle and every later request
/// (for any of the five capabilities) is served from the cache. The cache is
/// an explicit object the caller owns and invalidates; nothing is shared
/// process-wide, and schema changes are picked up by calling
/// [`invalidate`](Self::invalidate) or [`invalidate_all`](Self::invalidate_all).
pub struct MetadataCache<S> {
    source: S,
    entries: Mutex<HashMap<TableName, TableMetadata>>,
}

impl<S: MetadataSource> MetadataCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Drop the cached snapshot for one table. Returns whether an entry
    /// existed.
    pub fn invalidate(&self, table: &TableName) -> DbResult<bool> {
        let mut entries = self.lock()?;
        Ok(entries.remove(table).is_some())
    }

    /// Drop every cached snapshot.
    pub fn invalidate_all(&self) -> DbResult<()> {
        let mut entries = self.lock()?;
        entries.clear();
        Ok(())
    }

    /// Number of cached tables.
    pub fn len(&self) -> DbResult<usize> {
        Ok(self.lock()?.len())
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> DbResult<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> DbResult<std::sync::MutexGuard<'_, HashMap<TableName, TableMetadata>>> {
        self.entries
            .lock()
            .map_err(|e| DbError::MutexPoisoned(e.to_string()))
    }

    fn cached(&self, table: &TableName) -> DbResult<Option<TableMetadata>> {
        Ok(self.lock()?.get(table).cloned())
    }

    fn store(&self, table: TableName, meta: TableMetadata) -> DbResult<()> {
        self.lock()?.insert(table, meta);
        Ok(())
    }
}

#[async_trait]
impl<S: MetadataSource> MetadataSource for MetadataCache<S> {
    async fn column_order_of(&self, table: &TableName) -> DbResult<Vec<ColumnName>> {
        Ok(self.table_metadata_of(table).await?.column_order)
    }

    async fn not_null_columns_of(&self, table: &TableName) -> DbResult<BTreeSet<ColumnName>> {
        Ok(self.table_metadata_of(table).await?.not_null)
    }

    async fn referenced_tables_of(&self, table: &TableName) -> DbResult<ReferencedTableSet> {
        Ok(self.table_metadata_of(table).await?.referenced)
    }

    async fn columns_mappings_of(&self, table: &TableName) -> DbResult<ColumnsMappingGroup> {
        Ok(self.table_metadata_of(table).await?.mappings)
    }

    async fn primary_key_columns_of(&self, table: &TableName) -> DbResult<Vec<ColumnName>> {
        Ok(self.table_metadata_of(table).await?.primary_key)
    }

    async fn table_metadata_of(&self, table: &TableName) -> DbResult<TableMetadata> {
        if let Some(meta) = self.cached(table)? {
            return Ok(meta);
        }
        // The lock is not held across the fetch; a concurrent miss for the
        // same table fetches twice and the last insert wins, which is
        // harmless for read-only snapshots.
        let meta = self.source.table_metadata_of(table).await?;
        self.store(table.clone(), meta.clone())?;
        Ok(meta)
    }
}

#[cfg(test)]
#[path = "cache_test.rs"]
mod tests;
