//! Provider manager: the entry point for metadata resolution.
//!
//! One [`ProviderManager`] belongs to one planning unit. It holds the
//! optional schema and statistics sources used to seed builders, plus a
//! cache slot for the provider once resolved. It is not meant for
//! concurrent mutation; the providers it hands out are immutable and may be
//! shared freely.
//!
//! # Example
//!
//! ```ignore
//! use tablemeta::{ProviderKind, ProviderManager, TableStatistics};
//!
//! let mut manager = ProviderManager::new();
//! manager.set_stats_source(TableStatistics::with_row_count(1000));
//!
//! let provider = manager.builder(ProviderKind::SchemaStatsOnly).build()?;
//! assert_eq!(provider.row_count(), Some(1000));
//!
//! manager.set_resolved_provider(provider);
//! ```

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::builder::{BuilderSeed, ProviderBuilder};
use crate::config::MetadataSettings;
use crate::error::MetadataResult;
use crate::provider::{ProviderKind, TableMetadataProvider};
use crate::schema::Schema;
use crate::source::{SchemaSource, StatsSource};

/// Identifier of a planning unit, attached to every log event a manager
/// and its builders emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlanningUnitId(Uuid);

impl PlanningUnitId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PlanningUnitId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlanningUnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Decides how metadata for a table is obtained within one planning unit.
#[derive(Default)]
pub struct ProviderManager {
    planning_unit: PlanningUnitId,
    schema_source: Option<Arc<dyn SchemaSource>>,
    stats_source: Option<Arc<dyn StatsSource>>,
    resolved: Option<Arc<TableMetadataProvider>>,
}

impl ProviderManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn planning_unit(&self) -> PlanningUnitId {
        self.planning_unit
    }

    /// Store a schema source. Last write wins.
    pub fn set_schema_source<S: SchemaSource + 'static>(&mut self, source: S) {
        tracing::debug!(planning_unit = %self.planning_unit, "schema source seeded");
        self.schema_source = Some(Arc::new(source));
    }

    pub fn schema_source(&self) -> Option<&Arc<dyn SchemaSource>> {
        self.schema_source.as_ref()
    }

    /// Store a statistics source. Last write wins.
    pub fn set_stats_source<S: StatsSource + 'static>(&mut self, source: S) {
        tracing::debug!(planning_unit = %self.planning_unit, "stats source seeded");
        self.stats_source = Some(Arc::new(source));
    }

    pub fn stats_source(&self) -> Option<&Arc<dyn StatsSource>> {
        self.stats_source.as_ref()
    }

    pub fn with_schema_source<S: SchemaSource + 'static>(mut self, source: S) -> Self {
        self.set_schema_source(source);
        self
    }

    pub fn with_stats_source<S: StatsSource + 'static>(mut self, source: S) -> Self {
        self.set_stats_source(source);
        self
    }

    /// Cache a built provider for reuse within this planning unit.
    ///
    /// The manager only stores it: [`builder`](Self::builder) never consults
    /// this slot, so reusing it is the caller's decision.
    pub fn set_resolved_provider(&mut self, provider: impl Into<Arc<TableMetadataProvider>>) {
        let provider = provider.into();
        if self.resolved.is_some() {
            tracing::warn!(
                planning_unit = %self.planning_unit,
                kind = %provider.kind(),
                "replacing previously resolved metadata provider"
            );
        } else {
            tracing::debug!(
                planning_unit = %self.planning_unit,
                kind = %provider.kind(),
                "metadata provider resolved"
            );
        }
        self.resolved = Some(provider);
    }

    pub fn resolved_provider(&self) -> Option<Arc<TableMetadataProvider>> {
        self.resolved.clone()
    }

    /// A fresh builder for `kind`, seeded with this manager's sources.
    pub fn builder(&self, kind: ProviderKind) -> ProviderBuilder {
        tracing::debug!(
            planning_unit = %self.planning_unit,
            kind = %kind,
            schema_source = self.schema_source.is_some(),
            stats_source = self.stats_source.is_some(),
            "creating metadata provider builder"
        );
        ProviderBuilder::for_kind(kind, self.seed())
    }

    /// Like [`builder`](Self::builder), for a kind named in configuration.
    ///
    /// # Errors
    /// [`MetadataError::UnsupportedKind`](crate::error::MetadataError::UnsupportedKind)
    /// if `name` maps to no provider kind.
    pub fn builder_named(&self, name: &str) -> MetadataResult<ProviderBuilder> {
        Ok(self.builder(name.parse()?))
    }

    /// A builder for the configured default kind.
    pub fn default_builder(&self, settings: &MetadataSettings) -> MetadataResult<ProviderBuilder> {
        Ok(self.builder(settings.default_kind()?))
    }

    fn seed(&self) -> BuilderSeed {
        BuilderSeed {
            planning_unit: self.planning_unit,
            schema_source: self.schema_source.clone(),
            stats_source: self.stats_source.clone(),
        }
    }
}

impl fmt::Debug for ProviderManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderManager")
            .field("planning_unit", &self.planning_unit)
            .field("schema_source", &self.schema_source.is_some())
            .field("stats_source", &self.stats_source.is_some())
            .field("resolved", &self.resolved)
            .finish()
    }
}

/// A schema/stats-only provider for a schema the caller already has.
///
/// Uses no manager state and performs no discovery.
pub fn resolve_for_schema(schema: Schema) -> MetadataResult<TableMetadataProvider> {
    ProviderManager::new()
        .builder(ProviderKind::SchemaStatsOnly)
        .with_schema(schema)
        .build()
}

/// The provider for a table access, whether or not a manager exists.
///
/// With a manager, its resolved provider is returned; if it has none yet, a
/// schema/stats-only provider is built from its seeded sources. Without a
/// manager, an empty schema/stats-only provider is built. Never yields "no
/// provider".
pub fn resolve_or_default(
    manager: Option<&ProviderManager>,
) -> MetadataResult<Arc<TableMetadataProvider>> {
    match manager {
        Some(manager) => match manager.resolved_provider() {
            Some(provider) => Ok(provider),
            None => manager
                .builder(ProviderKind::SchemaStatsOnly)
                .build()
                .map(Arc::new),
        },
        None => ProviderManager::new()
            .builder(ProviderKind::SchemaStatsOnly)
            .build()
            .map(Arc::new),
    }
}
