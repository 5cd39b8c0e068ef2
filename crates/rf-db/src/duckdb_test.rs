use super::*;
use crate::finder::MetadataFinder;
use crate::traits::MetadataSource;
use rf_core::TableName;

fn shop_finder() -> MetadataFinder<DuckDbAdapter> {
    let adapter = DuckDbAdapter::in_memory().unwrap();
    adapter
        .execute_batch(
            "create table customers (
                 id integer primary key,
                 name varchar not null,
                 age integer
             );
             create table orders (
                 id integer primary key,
                 customer_id integer not null references customers(id)
             );
             create table invoices (
                 id integer primary key,
                 order_id integer references orders(id)
             );",
        )
        .unwrap();
    MetadataFinder::new(adapter, Box::new(DuckDbDialect))
}

#[tokio::test]
async fn test_column_order() {
    let finder = shop_finder();
    let columns = finder
        .column_order_of(&TableName::new("customers"))
        .await
        .unwrap();
    assert_eq!(columns, vec!["id", "name", "age"]);
}

#[tokio::test]
async fn test_not_null_columns() {
    let finder = shop_finder();
    let not_null = finder
        .not_null_columns_of(&TableName::new("customers"))
        .await
        .unwrap();
    assert!(not_null.contains("id"));
    assert!(not_null.contains("name"));
    assert!(!not_null.contains("age"));
}

#[tokio::test]
async fn test_primary_key_columns() {
    let finder = shop_finder();
    let pk = finder
        .primary_key_columns_of(&TableName::new("customers"))
        .await
        .unwrap();
    assert_eq!(pk, vec!["id"]);
}

#[tokio::test]
async fn test_columns_mappings() {
    let finder = shop_finder();
    let group = finder
        .columns_mappings_of(&TableName::new("orders"))
        .await
        .unwrap();
    assert_eq!(group.mappings().len(), 1);
    let mapping = &group.mappings()[0];
    assert_eq!(mapping.column, "customer_id");
    assert_eq!(mapping.ref_table, "customers");
    assert_eq!(mapping.ref_column, "id");
}

#[tokio::test]
async fn test_referenced_tables_transitive_and_depth_ordered() {
    let finder = shop_finder();
    let set = finder
        .referenced_tables_of(&TableName::new("invoices"))
        .await
        .unwrap();
    assert_eq!(
        set.tables(),
        &[TableName::new("customers"), TableName::new("orders")]
    );
}

#[tokio::test]
async fn test_referenced_tables_empty_for_root_table() {
    let finder = shop_finder();
    let set = finder
        .referenced_tables_of(&TableName::new("customers"))
        .await
        .unwrap();
    assert!(set.is_empty());
}

#[tokio::test]
async fn test_missing_table_is_metadata_unavailable() {
    let finder = shop_finder();
    let err = finder
        .column_order_of(&TableName::new("no_such_table"))
        .await
        .unwrap_err();
    assert!(matches!(err, DbError::MetadataUnavailable { .. }));
}

#[tokio::test]
async fn test_self_referencing_table_appears_in_own_closure() {
    let adapter = DuckDbAdapter::in_memory().unwrap();
    adapter
        .execute_batch(
            "create table employees (
                 id integer primary key,
                 manager_id integer references employees(id)
             );",
        )
        .unwrap();
    let finder = MetadataFinder::new(adapter, Box::new(DuckDbDialect));
    let table = TableName::new("employees");
    let set = finder.referenced_tables_of(&table).await.unwrap();
    assert!(set.contains(&table));
    let group = finder.columns_mappings_of(&table).await.unwrap();
    assert!(group.self_referencing_columns().contains("manager_id"));
}

#[tokio::test]
async fn test_composite_primary_key_in_order() {
    let adapter = DuckDbAdapter::in_memory().unwrap();
    adapter
        .execute_batch(
            "create table order_lines (
                 order_id integer,
                 line_no integer,
                 qty integer not null,
                 primary key (order_id, line_no)
             );",
        )
        .unwrap();
    let finder = MetadataFinder::new(adapter, Box::new(DuckDbDialect));
    let pk = finder
        .primary_key_columns_of(&TableName::new("order_lines"))
        .await
        .unwrap();
    assert_eq!(pk, vec!["order_id", "line_no"]);
}
