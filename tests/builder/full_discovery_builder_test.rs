//! Integration tests for the full-discovery builder.

use std::collections::BTreeMap;
use std::sync::Arc;

use tablemeta::{
    ColumnMetadata, DataType, DiscoveredTable, DiscoveryError, DiscoveryErrorKind, DiscoveryStep,
    FileMetadata, MetadataError, MetadataDiscoveryBackend, PartitionMetadata, PhysicalLayout,
    ProviderKind, ProviderManager, RowGroupMetadata, Schema, StaticDiscovery, TableHandle,
    TableStatistics,
};

fn lineitem() -> TableHandle {
    TableHandle::new("dfs.lineitem", "/data/lineitem")
}

fn discovered_schema() -> Schema {
    Schema::new(vec![
        ColumnMetadata::new("l_orderkey", DataType::Int32),
        ColumnMetadata::new("l_quantity", DataType::Float64),
        ColumnMetadata::new("l_shipdate", DataType::Utf8),
    ])
}

fn row_group(rows: u64) -> RowGroupMetadata {
    RowGroupMetadata {
        row_count: rows,
        total_bytes: rows * 16,
        columns: BTreeMap::new(),
    }
}

fn discovered() -> DiscoveredTable {
    let layout = PhysicalLayout::new(vec![
        FileMetadata::new("/data/lineitem/year=1994/0.parquet", 2048)
            .with_row_group(row_group(60))
            .with_row_group(row_group(40)),
        FileMetadata::new("/data/lineitem/year=1995/0.parquet", 1024).with_row_group(row_group(50)),
    ])
    .with_partition(PartitionMetadata {
        location: "/data/lineitem/year=1994".to_string(),
        values: BTreeMap::from([("year".to_string(), "1994".to_string())]),
        files: vec!["/data/lineitem/year=1994/0.parquet".to_string()],
    })
    .with_partition(PartitionMetadata {
        location: "/data/lineitem/year=1995".to_string(),
        values: BTreeMap::from([("year".to_string(), "1995".to_string())]),
        files: vec!["/data/lineitem/year=1995/0.parquet".to_string()],
    });

    DiscoveredTable {
        schema: discovered_schema(),
        statistics: TableStatistics::default(),
        layout,
    }
}

fn backend() -> Arc<StaticDiscovery> {
    Arc::new(StaticDiscovery::new().with_table("dfs.lineitem", discovered()))
}

#[test]
fn test_layout_and_stats_come_from_backend() {
    let backend = backend();
    let provider = ProviderManager::new()
        .builder(ProviderKind::FullDiscovery)
        .with_table(lineitem())
        .with_discovery_backend(backend.clone())
        .build()
        .unwrap();

    assert_eq!(backend.calls(), 1);
    assert_eq!(provider.kind(), ProviderKind::FullDiscovery);
    assert_eq!(provider.schema(), &discovered_schema());

    let layout = provider.layout().unwrap();
    assert_eq!(layout.file_count(), 2);
    assert_eq!(layout.partitions.len(), 2);

    // Backend reported no row count, so it is derived from the row groups.
    assert_eq!(provider.row_count(), Some(150));
    assert_eq!(provider.statistics().unwrap().total_bytes, Some(3072));
}

#[test]
fn test_backend_row_count_kept() {
    let mut table = discovered();
    table.statistics = TableStatistics::with_row_count(999);
    let backend = Arc::new(StaticDiscovery::new().with_table("dfs.lineitem", table));

    let provider = ProviderManager::new()
        .builder(ProviderKind::FullDiscovery)
        .with_table(lineitem())
        .with_discovery_backend(backend)
        .build()
        .unwrap();
    assert_eq!(provider.row_count(), Some(999));
}

#[test]
fn test_empty_layout_derives_zero_rows_and_bytes() {
    let table = DiscoveredTable {
        schema: discovered_schema(),
        statistics: TableStatistics::default(),
        layout: PhysicalLayout::default(),
    };
    let backend = Arc::new(StaticDiscovery::new().with_table("dfs.lineitem", table));

    let provider = ProviderManager::new()
        .builder(ProviderKind::FullDiscovery)
        .with_table(lineitem())
        .with_discovery_backend(backend)
        .build()
        .unwrap();

    let stats = provider.statistics().unwrap();
    assert_eq!(stats.row_count, Some(0));
    assert_eq!(stats.total_bytes, Some(0));
}

#[test]
fn test_overflowing_footer_counts_leave_row_count_unknown() {
    let mut huge = FileMetadata::new("/data/lineitem/0.parquet", 10);
    huge.row_count = Some(u64::MAX);
    let mut one = FileMetadata::new("/data/lineitem/1.parquet", 10);
    one.row_count = Some(1);
    let table = DiscoveredTable {
        schema: discovered_schema(),
        statistics: TableStatistics::default(),
        layout: PhysicalLayout::new(vec![huge, one]),
    };
    let backend = Arc::new(StaticDiscovery::new().with_table("dfs.lineitem", table));

    let provider = ProviderManager::new()
        .builder(ProviderKind::FullDiscovery)
        .with_table(lineitem())
        .with_discovery_backend(backend)
        .build()
        .unwrap();

    assert_eq!(provider.row_count(), None);
    assert_eq!(provider.statistics().unwrap().total_bytes, Some(20));
}

#[test]
fn test_explicit_schema_takes_precedence() {
    let explicit = Schema::new(vec![
        ColumnMetadata::new("l_orderkey", DataType::Int64).not_null(),
        ColumnMetadata::new("l_shipdate", DataType::Date),
    ]);

    let provider = ProviderManager::new()
        .builder(ProviderKind::FullDiscovery)
        .with_schema(explicit.clone())
        .with_table(lineitem())
        .with_discovery_backend(backend())
        .build()
        .unwrap();

    assert_eq!(provider.schema(), &explicit);
    assert!(provider.has_layout());
}

#[test]
fn test_seeded_schema_takes_precedence() {
    let explicit = Schema::new(vec![ColumnMetadata::new("l_orderkey", DataType::Int64)]);
    let manager = ProviderManager::new().with_schema_source(explicit.clone());

    let provider = manager
        .builder(ProviderKind::FullDiscovery)
        .with_table(lineitem())
        .with_discovery_backend(backend())
        .build()
        .unwrap();
    assert_eq!(provider.schema(), &explicit);
}

#[test]
fn test_seeded_stats_do_not_replace_discovered() {
    let manager = ProviderManager::new().with_stats_source(TableStatistics::with_row_count(1));

    let provider = manager
        .builder(ProviderKind::FullDiscovery)
        .with_statistics(TableStatistics::with_row_count(2))
        .with_table(lineitem())
        .with_discovery_backend(backend())
        .build()
        .unwrap();
    assert_eq!(provider.row_count(), Some(150));
}

#[test]
fn test_lenient_schema_keeps_discovered_columns() {
    let explicit = Schema::new(vec![ColumnMetadata::new("l_shipdate", DataType::Date)]).lenient(true);

    let provider = ProviderManager::new()
        .builder(ProviderKind::FullDiscovery)
        .with_schema(explicit)
        .with_table(lineitem())
        .with_discovery_backend(backend())
        .build()
        .unwrap();

    let names: Vec<_> = provider.schema().column_names().collect();
    assert_eq!(names, vec!["l_shipdate", "l_orderkey", "l_quantity"]);
    assert_eq!(provider.column("l_shipdate").unwrap().data_type, DataType::Date);
}

#[test]
fn test_permission_error_keeps_classification() {
    let backend = Arc::new(StaticDiscovery::new().with_failure(
        "dfs.lineitem",
        DiscoveryError::permission_denied(
            DiscoveryStep::ReadFooter,
            "/data/lineitem/year=1994/0.parquet",
        ),
    ));

    let err = ProviderManager::new()
        .builder(ProviderKind::FullDiscovery)
        .with_table(lineitem())
        .with_discovery_backend(backend.clone())
        .build()
        .unwrap_err();

    assert_eq!(err.discovery_kind(), Some(DiscoveryErrorKind::PermissionDenied));
    assert_eq!(err.table(), Some("dfs.lineitem"));
    assert!(matches!(
        err,
        MetadataError::Discovery {
            step: DiscoveryStep::ReadFooter,
            ..
        }
    ));
    // No retries.
    assert_eq!(backend.calls(), 1);
}

#[test]
fn test_io_error_from_closure_backend() {
    let backend = |_: &TableHandle| -> Result<DiscoveredTable, DiscoveryError> {
        let err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "EACCES");
        Err(DiscoveryError::from(err).at(DiscoveryStep::ListFiles))
    };
    let backend: Arc<dyn MetadataDiscoveryBackend> = Arc::new(backend);

    let err = ProviderManager::new()
        .builder(ProviderKind::FullDiscovery)
        .with_table(lineitem())
        .with_discovery_backend(backend)
        .build()
        .unwrap_err();

    assert_eq!(err.discovery_kind(), Some(DiscoveryErrorKind::PermissionDenied));
    assert!(err.to_string().contains("during file listing"));
}

#[test]
fn test_missing_backend() {
    let err = ProviderManager::new()
        .builder(ProviderKind::FullDiscovery)
        .with_table(lineitem())
        .build()
        .unwrap_err();

    assert!(matches!(
        err,
        MetadataError::MissingInput {
            kind: ProviderKind::FullDiscovery,
            input: "discovery backend"
        }
    ));
    insta::assert_snapshot!(err.to_string(), @"full_discovery provider requires a discovery backend");
}

#[test]
fn test_missing_table() {
    let err = ProviderManager::new()
        .builder(ProviderKind::FullDiscovery)
        .with_discovery_backend(backend())
        .build()
        .unwrap_err();

    assert!(matches!(
        err,
        MetadataError::MissingInput {
            input: "table handle",
            ..
        }
    ));
}

#[test]
fn test_build_twice_from_clones_is_equal() {
    let backend = backend();
    let builder = ProviderManager::new()
        .builder(ProviderKind::FullDiscovery)
        .with_table(lineitem())
        .with_discovery_backend(backend.clone());

    let first = builder.clone().build().unwrap();
    let second = builder.build().unwrap();

    assert_eq!(first, second);
    assert_eq!(backend.calls(), 2);
}
