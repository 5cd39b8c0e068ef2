use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts how many times each capability is actually fetched.
struct CountingSource {
    fetches: AtomicUsize,
}

impl CountingSource {
    fn new() -> Self {
        Self {
            fetches: AtomicUsize::new(0),
        }
    }

    fn meta(table: &TableName) -> TableMetadata {
        TableMetadata {
            column_order: vec![ColumnName::new("id")],
            not_null: BTreeSet::from([ColumnName::new("id")]),
            primary_key: vec![ColumnName::new("id")],
            referenced: ReferencedTableSet::empty(),
            mappings: ColumnsMappingGroup::new(table.clone(), vec![]),
        }
    }
}

#[async_trait]
impl MetadataSource for CountingSource {
    async fn column_order_of(&self, table: &TableName) -> DbResult<Vec<ColumnName>> {
        Ok(Self::meta(table).column_order)
    }

    async fn not_null_columns_of(&self, table: &TableName) -> DbResult<BTreeSet<ColumnName>> {
        Ok(Self::meta(table).not_null)
    }

    async fn referenced_tables_of(&self, table: &TableName) -> DbResult<ReferencedTableSet> {
        Ok(Self::meta(table).referenced)
    }

    async fn columns_mappings_of(&self, table: &TableName) -> DbResult<ColumnsMappingGroup> {
        Ok(Self::meta(table).mappings)
    }

    async fn primary_key_columns_of(&self, table: &TableName) -> DbResult<Vec<ColumnName>> {
        Ok(Self::meta(table).primary_key)
    }

    async fn table_metadata_of(&self, table: &TableName) -> DbResult<TableMetadata> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(Self::meta(table))
    }
}

#[tokio::test]
async fn test_second_lookup_served_from_cache() {
    let cache = MetadataCache::new(CountingSource::new());
    let table = TableName::new("customers");

    cache.table_metadata_of(&table).await.unwrap();
    cache.column_order_of(&table).await.unwrap();
    cache.primary_key_columns_of(&table).await.unwrap();

    assert_eq!(cache.source.fetches.load(Ordering::SeqCst), 1);
    assert_eq!(cache.len().unwrap(), 1);
}

#[tokio::test]
async fn test_distinct_tables_fetched_separately() {
    let cache = MetadataCache::new(CountingSource::new());
    cache
        .table_metadata_of(&TableName::new("a"))
        .await
        .unwrap();
    cache
        .table_metadata_of(&TableName::new("b"))
        .await
        .unwrap();
    assert_eq!(cache.source.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_invalidate_forces_refetch() {
    let cache = MetadataCache::new(CountingSource::new());
    let table = TableName::new("customers");

    cache.table_metadata_of(&table).await.unwrap();
    assert!(cache.invalidate(&table).unwrap());
    cache.table_metadata_of(&table).await.unwrap();

    assert_eq!(cache.source.fetches.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_invalidate_unknown_table_is_noop() {
    let cache = MetadataCache::new(CountingSource::new());
    assert!(!cache.invalidate(&TableName::new("missing")).unwrap());
}

#[tokio::test]
async fn test_invalidate_all_clears_everything() {
    let cache = MetadataCache::new(CountingSource::new());
    cache
        .table_metadata_of(&TableName::new("a"))
        .await
        .unwrap();
    cache
        .table_metadata_of(&TableName::new("b"))
        .await
        .unwrap();
    cache.invalidate_all().unwrap();
    assert!(cache.is_empty().unwrap());
}
