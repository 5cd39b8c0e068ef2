use super::*;

fn mapping(table: &str, column: &str, ref_table: &str, ref_column: &str) -> ColumnMapping {
    ColumnMapping {
        table: TableName::new(table),
        column: ColumnName::new(column),
        ref_table: TableName::new(ref_table),
        ref_column: ColumnName::new(ref_column),
    }
}

#[test]
fn test_group_keeps_only_own_mappings() {
    let group = ColumnsMappingGroup::new(
        TableName::new("orders"),
        vec![
            mapping("orders", "customer_id", "customers", "id"),
            mapping("invoices", "order_id", "orders", "id"),
        ],
    );
    assert_eq!(group.mappings().len(), 1);
    assert_eq!(group.mappings()[0].column, "customer_id");
}

#[test]
fn test_referenced_tables_deduplicated_in_order() {
    // Composite key: two mappings to the same table count once.
    let group = ColumnsMappingGroup::new(
        TableName::new("order_lines"),
        vec![
            mapping("order_lines", "order_id", "orders", "id"),
            mapping("order_lines", "order_org", "orders", "org"),
            mapping("order_lines", "product_id", "products", "id"),
        ],
    );
    let refs = group.referenced_tables();
    assert_eq!(refs, vec!["orders", "products"]);
}

#[test]
fn test_self_referencing_columns() {
    let group = ColumnsMappingGroup::new(
        TableName::new("employees"),
        vec![
            mapping("employees", "manager_id", "employees", "id"),
            mapping("employees", "dept_id", "departments", "id"),
        ],
    );
    let cols = group.self_referencing_columns();
    assert_eq!(cols.len(), 1);
    assert!(cols.contains("manager_id"));
}

#[test]
fn test_referenced_table_set_dedups_keeping_first() {
    // Depth-ordered input: the first occurrence carries the greatest depth.
    let set = ReferencedTableSet::from_depth_ordered(
        ["grandparent", "parent", "grandparent"]
            .into_iter()
            .map(TableName::new),
    );
    assert_eq!(
        set.tables(),
        &[TableName::new("grandparent"), TableName::new("parent")]
    );
    assert!(set.contains(&TableName::new("parent")));
    assert_eq!(set.len(), 2);
}

#[test]
fn test_referenced_table_set_empty() {
    let set = ReferencedTableSet::empty();
    assert!(set.is_empty());
    assert!(!set.contains(&TableName::new("anything")));
}

#[test]
fn test_table_metadata_known_columns() {
    let meta = TableMetadata {
        column_order: vec![ColumnName::new("id"), ColumnName::new("name")],
        not_null: BTreeSet::from([ColumnName::new("id")]),
        primary_key: vec![ColumnName::new("id")],
        referenced: ReferencedTableSet::empty(),
        mappings: ColumnsMappingGroup::new(TableName::new("customers"), vec![]),
    };
    assert!(meta.is_known_column(&ColumnName::new("NAME")));
    assert!(!meta.is_known_column(&ColumnName::new("age")));
    assert!(meta.has_primary_key());
}
