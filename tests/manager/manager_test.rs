//! Integration tests for the provider manager's state.

use std::sync::Arc;
use std::thread;

use tablemeta::config::MetadataSettings;
use tablemeta::{
    ColumnMetadata, DataType, ProviderKind, ProviderManager, Schema, SchemaSource, StatsSource,
    TableStatistics,
};

fn schema() -> Schema {
    Schema::new(vec![ColumnMetadata::new("id", DataType::Int64)])
}

#[test]
fn test_new_manager_is_empty() {
    let manager = ProviderManager::new();
    assert!(manager.schema_source().is_none());
    assert!(manager.stats_source().is_none());
    assert!(manager.resolved_provider().is_none());
}

#[test]
fn test_sources_last_write_wins() {
    let mut manager = ProviderManager::new();
    manager.set_stats_source(TableStatistics::with_row_count(1));
    manager.set_stats_source(TableStatistics::with_row_count(2));

    let stats = manager.stats_source().unwrap().statistics().unwrap();
    assert_eq!(stats.unwrap().row_count, Some(2));

    manager.set_schema_source(Schema::empty());
    manager.set_schema_source(schema());
    let read = manager.schema_source().unwrap().schema().unwrap();
    assert_eq!(read, Some(schema()));
}

#[test]
fn test_resolved_provider_is_stored_not_rebuilt() {
    let mut manager = ProviderManager::new().with_stats_source(TableStatistics::with_row_count(3));
    let provider = manager
        .builder(ProviderKind::SchemaStatsOnly)
        .with_schema(schema())
        .build()
        .unwrap();
    manager.set_resolved_provider(provider.clone());

    let first = manager.resolved_provider().unwrap();
    let second = manager.resolved_provider().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*first, provider);
}

#[test]
fn test_resolved_provider_overwrite() {
    let mut manager = ProviderManager::new();
    manager.set_resolved_provider(
        manager
            .builder(ProviderKind::SchemaStatsOnly)
            .build()
            .unwrap(),
    );
    manager.set_resolved_provider(
        manager
            .builder(ProviderKind::SchemaStatsOnly)
            .with_schema(schema())
            .build()
            .unwrap(),
    );

    assert_eq!(manager.resolved_provider().unwrap().schema(), &schema());
}

#[test]
fn test_builder_reads_sources_at_build_time() {
    let mut manager = ProviderManager::new();
    let builder = manager.builder(ProviderKind::SchemaStatsOnly);
    // Seeding after the builder was created does not affect it.
    manager.set_stats_source(TableStatistics::with_row_count(10));

    assert_eq!(builder.build().unwrap().row_count(), None);
    assert_eq!(
        manager
            .builder(ProviderKind::SchemaStatsOnly)
            .build()
            .unwrap()
            .row_count(),
        Some(10)
    );
}

#[test]
fn test_resolved_provider_shared_across_threads() {
    let mut manager = ProviderManager::new();
    manager.set_resolved_provider(
        manager
            .builder(ProviderKind::SchemaStatsOnly)
            .with_schema(schema())
            .with_statistics(TableStatistics::with_row_count(100))
            .build()
            .unwrap(),
    );
    let provider = manager.resolved_provider().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let provider = Arc::clone(&provider);
            thread::spawn(move || provider.row_count())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(100));
    }
}

#[test]
fn test_default_builder_from_settings() {
    let manager = ProviderManager::new();

    let builder = manager.default_builder(&MetadataSettings::default()).unwrap();
    assert_eq!(builder.kind(), ProviderKind::SchemaStatsOnly);

    let settings = MetadataSettings {
        default_kind: "full_discovery".to_string(),
        ..Default::default()
    };
    let builder = manager.default_builder(&settings).unwrap();
    assert_eq!(builder.kind(), ProviderKind::FullDiscovery);

    let settings = MetadataSettings {
        default_kind: "hive".to_string(),
        ..Default::default()
    };
    assert!(manager.default_builder(&settings).is_err());
}
