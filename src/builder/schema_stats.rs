//! Schema/statistics-only builder: no physical discovery.

use crate::discovery::TableHandle;
use crate::error::MetadataResult;
use crate::manager::PlanningUnitId;
use crate::provider::{ProviderKind, TableMetadataProvider};
use crate::schema::Schema;
use crate::stats::TableStatistics;

use super::{table_label, BuilderSeed};

/// Builds a provider from supplied schema and statistics alone.
///
/// The cheap path for views and for planning that needs only column types
/// and cardinality estimates. The resulting provider has no layout.
#[derive(Debug, Clone)]
pub struct SchemaStatsBuilder {
    seed: BuilderSeed,
    table: Option<TableHandle>,
    schema: Option<Schema>,
    statistics: Option<TableStatistics>,
}

impl SchemaStatsBuilder {
    pub(crate) fn new(seed: BuilderSeed) -> Self {
        Self {
            seed,
            table: None,
            schema: None,
            statistics: None,
        }
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_statistics(mut self, statistics: TableStatistics) -> Self {
        self.statistics = Some(statistics);
        self
    }

    pub fn with_table(mut self, table: TableHandle) -> Self {
        self.table = Some(table);
        self
    }

    pub fn planning_unit(&self) -> PlanningUnitId {
        self.seed.planning_unit
    }

    pub fn table_label(&self) -> &str {
        table_label(self.table.as_ref())
    }

    pub fn build(self) -> MetadataResult<TableMetadataProvider> {
        // Explicit inputs win; seeded sources are only read when needed.
        let schema = match self.schema {
            Some(schema) => schema,
            None => self.seed.read_schema(self.table.as_ref())?.unwrap_or_default(),
        };
        let statistics = match self.statistics {
            Some(statistics) => Some(statistics),
            None => self.seed.read_statistics(self.table.as_ref())?,
        };

        tracing::debug!(
            planning_unit = %self.seed.planning_unit,
            table = table_label(self.table.as_ref()),
            columns = schema.len(),
            has_statistics = statistics.is_some(),
            "built schema/stats-only metadata provider"
        );

        Ok(TableMetadataProvider::new(
            ProviderKind::SchemaStatsOnly,
            self.table,
            schema,
            statistics,
            None,
        ))
    }
}
