//! Provider builders.
//!
//! A builder is obtained from [`ProviderManager::builder`](crate::manager::ProviderManager::builder),
//! already seeded with the manager's schema and statistics sources. It
//! accumulates inputs through chained `with_*` calls and assembles a
//! [`TableMetadataProvider`] on `build()`.
//!
//! # Lifecycle
//!
//! ```text
//! Unconfigured ──with_*──► Configured ──with_*──► Configured ──build()──► Built
//! ```
//!
//! `build` takes the builder by value, so no configuration call can follow it.
//! Builders are `Clone`: building two clones of the same configured builder
//! yields equal providers as long as the sources and backend are stable.

mod full_discovery;
mod schema_stats;

pub use full_discovery::FullDiscoveryBuilder;
pub use schema_stats::SchemaStatsBuilder;

use std::fmt;
use std::sync::Arc;

use crate::discovery::{MetadataDiscoveryBackend, TableHandle};
use crate::error::MetadataResult;
use crate::manager::PlanningUnitId;
use crate::provider::{ProviderKind, TableMetadataProvider};
use crate::schema::Schema;
use crate::source::{SchemaSource, StatsSource};
use crate::stats::TableStatistics;

/// Sources handed from a manager to the builders it creates.
#[derive(Clone)]
pub(crate) struct BuilderSeed {
    pub(crate) planning_unit: PlanningUnitId,
    pub(crate) schema_source: Option<Arc<dyn SchemaSource>>,
    pub(crate) stats_source: Option<Arc<dyn StatsSource>>,
}

impl BuilderSeed {
    /// Read the seeded schema source. Failures name `table` when the source
    /// did not.
    pub(crate) fn read_schema(&self, table: Option<&TableHandle>) -> MetadataResult<Option<Schema>> {
        match &self.schema_source {
            Some(source) => source.schema().map_err(|e| e.for_table(table_label(table))),
            None => Ok(None),
        }
    }

    pub(crate) fn read_statistics(
        &self,
        table: Option<&TableHandle>,
    ) -> MetadataResult<Option<TableStatistics>> {
        match &self.stats_source {
            Some(source) => source.statistics().map_err(|e| e.for_table(table_label(table))),
            None => Ok(None),
        }
    }
}

impl fmt::Debug for BuilderSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderSeed")
            .field("planning_unit", &self.planning_unit)
            .field("schema_source", &self.schema_source.is_some())
            .field("stats_source", &self.stats_source.is_some())
            .finish()
    }
}

pub(crate) fn table_label(table: Option<&TableHandle>) -> &str {
    table.map(|t| t.name.as_str()).unwrap_or("<unnamed>")
}

/// Builder for one [`ProviderKind`].
///
/// Common configuration goes through the enum; variant-specific inputs that
/// the other variant has no use for are accepted and ignored with a warning.
#[derive(Debug, Clone)]
pub enum ProviderBuilder {
    FullDiscovery(FullDiscoveryBuilder),
    SchemaStatsOnly(SchemaStatsBuilder),
}

impl ProviderBuilder {
    pub(crate) fn for_kind(kind: ProviderKind, seed: BuilderSeed) -> Self {
        match kind {
            ProviderKind::FullDiscovery => Self::FullDiscovery(FullDiscoveryBuilder::new(seed)),
            ProviderKind::SchemaStatsOnly => Self::SchemaStatsOnly(SchemaStatsBuilder::new(seed)),
        }
    }

    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::FullDiscovery(_) => ProviderKind::FullDiscovery,
            Self::SchemaStatsOnly(_) => ProviderKind::SchemaStatsOnly,
        }
    }

    /// Explicit schema. Takes precedence over seeded and discovered schemas.
    pub fn with_schema(self, schema: Schema) -> Self {
        match self {
            Self::FullDiscovery(b) => Self::FullDiscovery(b.with_schema(schema)),
            Self::SchemaStatsOnly(b) => Self::SchemaStatsOnly(b.with_schema(schema)),
        }
    }

    pub fn with_table(self, table: TableHandle) -> Self {
        match self {
            Self::FullDiscovery(b) => Self::FullDiscovery(b.with_table(table)),
            Self::SchemaStatsOnly(b) => Self::SchemaStatsOnly(b.with_table(table)),
        }
    }

    /// Explicit statistics. Full discovery takes its statistics from the
    /// backend, so they are ignored there.
    pub fn with_statistics(self, statistics: TableStatistics) -> Self {
        match self {
            Self::FullDiscovery(b) => {
                tracing::warn!(
                    planning_unit = %b.planning_unit(),
                    table = b.table_label(),
                    "explicit statistics ignored by full discovery builder"
                );
                Self::FullDiscovery(b)
            }
            Self::SchemaStatsOnly(b) => Self::SchemaStatsOnly(b.with_statistics(statistics)),
        }
    }

    /// Discovery backend. A schema/stats-only builder never scans, so it is
    /// ignored there.
    pub fn with_discovery_backend(self, backend: Arc<dyn MetadataDiscoveryBackend>) -> Self {
        match self {
            Self::FullDiscovery(b) => Self::FullDiscovery(b.with_discovery_backend(backend)),
            Self::SchemaStatsOnly(b) => {
                tracing::warn!(
                    planning_unit = %b.planning_unit(),
                    table = b.table_label(),
                    "discovery backend ignored by schema/stats-only builder"
                );
                Self::SchemaStatsOnly(b)
            }
        }
    }

    /// Assemble the provider. Consumes the builder.
    ///
    /// # Errors
    /// Full discovery fails with [`MetadataError::MissingInput`](crate::error::MetadataError::MissingInput)
    /// when no backend or table is configured, and with
    /// [`MetadataError::Discovery`](crate::error::MetadataError::Discovery) when
    /// the backend fails. Either variant fails if a seeded source cannot be read.
    pub fn build(self) -> MetadataResult<TableMetadataProvider> {
        match self {
            Self::FullDiscovery(b) => b.build(),
            Self::SchemaStatsOnly(b) => b.build(),
        }
    }

    pub fn as_full_discovery(&self) -> Option<&FullDiscoveryBuilder> {
        match self {
            Self::FullDiscovery(b) => Some(b),
            Self::SchemaStatsOnly(_) => None,
        }
    }

    pub fn as_schema_stats(&self) -> Option<&SchemaStatsBuilder> {
        match self {
            Self::SchemaStatsOnly(b) => Some(b),
            Self::FullDiscovery(_) => None,
        }
    }
}
