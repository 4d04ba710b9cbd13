//! Integration tests for the resolve entry points.

use std::sync::Arc;

use tablemeta::{
    resolve_for_schema, resolve_or_default, ColumnMetadata, DataType, ProviderKind,
    ProviderManager, Schema, TableStatistics,
};

fn wide_schema() -> Schema {
    (0..12)
        .map(|i| ColumnMetadata::new(format!("col_{i}"), DataType::Float64))
        .collect()
}

#[test]
fn test_resolve_for_schema_keeps_columns_in_order() {
    let schema = wide_schema();
    let provider = resolve_for_schema(schema.clone()).unwrap();

    assert_eq!(provider.kind(), ProviderKind::SchemaStatsOnly);
    assert_eq!(provider.schema().len(), 12);
    assert_eq!(provider.schema(), &schema);
    assert!(provider.layout().is_none());
    assert!(provider.statistics().is_none());
}

#[test]
fn test_resolve_for_empty_schema() {
    let provider = resolve_for_schema(Schema::empty()).unwrap();
    assert!(provider.schema().is_empty());
}

#[test]
fn test_resolve_without_manager_falls_back() {
    let provider = resolve_or_default(None).unwrap();

    assert_eq!(provider.kind(), ProviderKind::SchemaStatsOnly);
    assert!(provider.schema().is_empty());
    assert!(provider.statistics().is_none());
    assert!(provider.layout().is_none());
}

#[test]
fn test_resolve_with_manager_returns_resolved() {
    let mut manager = ProviderManager::new();
    manager.set_resolved_provider(resolve_for_schema(wide_schema()).unwrap());

    let provider = resolve_or_default(Some(&manager)).unwrap();
    assert!(Arc::ptr_eq(
        &provider,
        &manager.resolved_provider().unwrap()
    ));
}

#[test]
fn test_resolve_with_unresolved_manager_uses_its_sources() {
    let manager = ProviderManager::new()
        .with_schema_source(wide_schema())
        .with_stats_source(TableStatistics::with_row_count(8));

    let provider = resolve_or_default(Some(&manager)).unwrap();
    assert_eq!(provider.schema().len(), 12);
    assert_eq!(provider.row_count(), Some(8));
    // Resolution does not fill the manager's slot.
    assert!(manager.resolved_provider().is_none());
}
