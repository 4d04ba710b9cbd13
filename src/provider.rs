//! Provider kinds and the resolved table metadata provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::discovery::TableHandle;
use crate::error::MetadataError;
use crate::layout::PhysicalLayout;
use crate::schema::{ColumnMetadata, Schema};
use crate::stats::TableStatistics;

/// Strategy used to obtain a metadata provider.
///
/// The set is closed: each kind maps to exactly one builder, matched
/// exhaustively in [`ProviderManager::builder`](crate::manager::ProviderManager::builder).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Physical scan of the table's files (e.g. Parquet footers).
    FullDiscovery,
    /// Derived purely from supplied schema/statistics; no physical scan.
    SchemaStatsOnly,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 2] = [ProviderKind::FullDiscovery, ProviderKind::SchemaStatsOnly];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FullDiscovery => "full_discovery",
            Self::SchemaStatsOnly => "schema_stats_only",
        }
    }

    /// Whether providers of this kind carry a physical layout.
    pub fn has_layout(&self) -> bool {
        matches!(self, Self::FullDiscovery)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = MetadataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "full_discovery" | "parquet" | "parquet_table" => Ok(Self::FullDiscovery),
            "schema_stats_only" | "schema_stats" => Ok(Self::SchemaStatsOnly),
            _ => Err(MetadataError::UnsupportedKind(s.to_string())),
        }
    }
}

/// Resolved metadata for exactly one table at one point in planning.
///
/// Immutable once built: there are no setters, and re-resolution produces a
/// new instance. Shared read-only as `Arc<TableMetadataProvider>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableMetadataProvider {
    kind: ProviderKind,
    table: Option<TableHandle>,
    schema: Schema,
    statistics: Option<TableStatistics>,
    layout: Option<PhysicalLayout>,
}

impl TableMetadataProvider {
    pub(crate) fn new(
        kind: ProviderKind,
        table: Option<TableHandle>,
        schema: Schema,
        statistics: Option<TableStatistics>,
        layout: Option<PhysicalLayout>,
    ) -> Self {
        Self {
            kind,
            table,
            schema,
            statistics,
            layout,
        }
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    /// The table this provider describes, when one was named at build time.
    pub fn table(&self) -> Option<&TableHandle> {
        self.table.as_ref()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.schema.column(name)
    }

    /// Table statistics. `None` means unknown, not empty.
    pub fn statistics(&self) -> Option<&TableStatistics> {
        self.statistics.as_ref()
    }

    pub fn row_count(&self) -> Option<u64> {
        self.statistics.as_ref().and_then(|s| s.row_count)
    }

    /// Files, partitions and row groups. Present iff the kind is full discovery.
    pub fn layout(&self) -> Option<&PhysicalLayout> {
        self.layout.as_ref()
    }

    pub fn has_layout(&self) -> bool {
        self.layout.is_some()
    }
}
