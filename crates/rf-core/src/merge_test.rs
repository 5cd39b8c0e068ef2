use super::*;
use crate::metadata::{ColumnsMappingGroup, ReferencedTableSet};
use crate::ColumnName;
use serde_json::json;
use std::collections::BTreeSet;

fn customers_meta() -> TableMetadata {
    TableMetadata {
        column_order: ["id", "name", "age"].map(ColumnName::new).to_vec(),
        not_null: BTreeSet::from([ColumnName::new("id"), ColumnName::new("name")]),
        primary_key: vec![ColumnName::new("id")],
        referenced: ReferencedTableSet::empty(),
        mappings: ColumnsMappingGroup::new(TableName::new("customers"), vec![]),
    }
}

fn customers() -> TableName {
    TableName::new("customers")
}

fn row() -> Row {
    Row::new(customers())
}

#[test]
fn test_disjoint_keys_union_without_loss() {
    let rows = vec![
        row().with("id", 1).with("name", "Alice"),
        row().with("id", 2).with("name", "Bob"),
    ];
    let merged = merge_rows(&customers(), &rows, &customers_meta()).unwrap();
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].get("name"), Some(&json!("Alice")));
    assert_eq!(merged[1].get("name"), Some(&json!("Bob")));
}

#[test]
fn test_overlapping_key_overrides_column_by_column() {
    // fixture1 supplies defaults, fixture2 overrides a subset.
    let rows = vec![
        row().with("id", 1).with("name", "Alice").with("age", Value::Null),
        row().with("id", 1).with("age", 30),
    ];
    let merged = merge_rows(&customers(), &rows, &customers_meta()).unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].get("name"), Some(&json!("Alice")));
    assert_eq!(merged[0].get("age"), Some(&json!(30)));
}

#[test]
fn test_later_null_does_not_erase_earlier_value() {
    let rows = vec![
        row().with("id", 1).with("name", "Alice").with("age", 30),
        row().with("id", 1).with("age", Value::Null),
    ];
    let merged = merge_rows(&customers(), &rows, &customers_meta()).unwrap();
    assert_eq!(merged[0].get("age"), Some(&json!(30)));
}

#[test]
fn test_later_non_null_wins_over_earlier_value() {
    let rows = vec![
        row().with("id", 1).with("name", "Alice"),
        row().with("id", 1).with("name", "Alicia"),
    ];
    let merged = merge_rows(&customers(), &rows, &customers_meta()).unwrap();
    assert_eq!(merged.len(), 1);
    assert_eq!(merged[0].get("name"), Some(&json!("Alicia")));
}

#[test]
fn test_merged_output_never_collides_on_key() {
    let rows = vec![
        row().with("id", 1).with("name", "a"),
        row().with("id", 2).with("name", "b"),
        row().with("id", 1).with("name", "c"),
        row().with("id", 2).with("name", "d"),
    ];
    let merged = merge_rows(&customers(), &rows, &customers_meta()).unwrap();
    let keys: Vec<RowKey> = merged
        .iter()
        .map(|r| r.key_projection(&[ColumnName::new("id")]))
        .collect();
    let mut deduped = keys.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(keys.len(), deduped.len());
}

#[test]
fn test_first_seen_key_order_preserved() {
    let rows = vec![
        row().with("id", 2).with("name", "Bob"),
        row().with("id", 1).with("name", "Alice"),
        row().with("id", 2).with("name", "Bobby"),
    ];
    let merged = merge_rows(&customers(), &rows, &customers_meta()).unwrap();
    assert_eq!(merged[0].get("id"), Some(&json!(2)));
    assert_eq!(merged[1].get("id"), Some(&json!(1)));
}

#[test]
fn test_unknown_column_rejected() {
    let rows = vec![row().with("id", 1).with("name", "Alice").with("nickname", "Al")];
    let err = merge_rows(&customers(), &rows, &customers_meta()).unwrap_err();
    match err {
        CoreError::UnknownColumn { table, column } => {
            assert_eq!(table, "customers");
            assert_eq!(column, "nickname");
        }
        other => panic!("expected UnknownColumn, got {:?}", other),
    }
}

#[test]
fn test_not_null_column_unset_is_fatal() {
    let rows = vec![row().with("id", 1)];
    let err = merge_rows(&customers(), &rows, &customers_meta()).unwrap_err();
    match err {
        CoreError::MissingRequiredColumn { table, key, column } => {
            assert_eq!(table, "customers");
            assert_eq!(key, "(1)");
            assert_eq!(column, "name");
        }
        other => panic!("expected MissingRequiredColumn, got {:?}", other),
    }
}

#[test]
fn test_not_null_column_explicit_null_is_fatal() {
    // An explicit null would still violate the constraint at execution time.
    let rows = vec![row().with("id", 1).with("name", Value::Null)];
    let err = merge_rows(&customers(), &rows, &customers_meta()).unwrap_err();
    assert!(matches!(err, CoreError::MissingRequiredColumn { .. }));
}

#[test]
fn test_missing_primary_key_value_is_fatal() {
    let rows = vec![row().with("name", "Alice")];
    let err = merge_rows(&customers(), &rows, &customers_meta()).unwrap_err();
    match err {
        CoreError::MissingRequiredColumn { column, .. } => assert_eq!(column, "id"),
        other => panic!("expected MissingRequiredColumn, got {:?}", other),
    }
}

#[test]
fn test_table_without_primary_key_passes_rows_through() {
    let meta = TableMetadata {
        column_order: ["event", "detail"].map(ColumnName::new).to_vec(),
        not_null: BTreeSet::new(),
        primary_key: vec![],
        referenced: ReferencedTableSet::empty(),
        mappings: ColumnsMappingGroup::new(TableName::new("audit_log"), vec![]),
    };
    let table = TableName::new("audit_log");
    let rows = vec![
        Row::new(table.clone()).with("event", "a"),
        Row::new(table.clone()).with("event", "a"),
    ];
    let merged = merge_rows(&table, &rows, &meta).unwrap();
    // No identity to merge on: duplicates survive.
    assert_eq!(merged.len(), 2);
}

#[test]
fn test_empty_input() {
    let merged = merge_rows(&customers(), &[], &customers_meta()).unwrap();
    assert!(merged.is_empty());
}
