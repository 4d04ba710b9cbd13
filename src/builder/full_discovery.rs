//! Full-discovery builder: physical scan through a discovery backend.

use std::fmt;
use std::sync::Arc;

use crate::discovery::{MetadataDiscoveryBackend, TableHandle};
use crate::error::{MetadataError, MetadataResult};
use crate::manager::PlanningUnitId;
use crate::provider::{ProviderKind, TableMetadataProvider};
use crate::schema::Schema;

use super::{table_label, BuilderSeed};

/// Builds a provider by discovering the table's files.
///
/// Layout and statistics always come from the backend. The schema is the
/// discovered one unless an explicit schema was supplied (directly, or via
/// the manager's schema source), in which case the explicit schema takes
/// precedence; see [`Schema::overlay`].
///
/// Expensive: one backend call costing O(files + partitions) I/O. Select it
/// only when the planner needs row-group or partition pruning.
#[derive(Clone)]
pub struct FullDiscoveryBuilder {
    seed: BuilderSeed,
    table: Option<TableHandle>,
    schema: Option<Schema>,
    backend: Option<Arc<dyn MetadataDiscoveryBackend>>,
}

impl FullDiscoveryBuilder {
    pub(crate) fn new(seed: BuilderSeed) -> Self {
        Self {
            seed,
            table: None,
            schema: None,
            backend: None,
        }
    }

    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn with_table(mut self, table: TableHandle) -> Self {
        self.table = Some(table);
        self
    }

    pub fn with_discovery_backend(mut self, backend: Arc<dyn MetadataDiscoveryBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn planning_unit(&self) -> PlanningUnitId {
        self.seed.planning_unit
    }

    pub fn table_label(&self) -> &str {
        table_label(self.table.as_ref())
    }

    pub fn build(self) -> MetadataResult<TableMetadataProvider> {
        let backend = self.backend.ok_or(MetadataError::MissingInput {
            kind: ProviderKind::FullDiscovery,
            input: "discovery backend",
        })?;
        let table = self.table.ok_or(MetadataError::MissingInput {
            kind: ProviderKind::FullDiscovery,
            input: "table handle",
        })?;

        let explicit = match self.schema {
            Some(schema) => Some(schema),
            None => self.seed.read_schema(Some(&table))?,
        };

        tracing::debug!(
            planning_unit = %self.seed.planning_unit,
            table = %table.name,
            location = %table.location,
            "discovering table metadata"
        );

        let discovered = backend
            .discover(&table)
            .map_err(|e| MetadataError::discovery(table.name.clone(), e))?;

        let schema = match &explicit {
            Some(explicit) => Schema::overlay(explicit, &discovered.schema),
            None => discovered.schema,
        };

        let layout = discovered.layout;
        let mut statistics = discovered.statistics;
        if statistics.row_count.is_none() {
            statistics.row_count = layout.total_rows();
        }
        if statistics.total_bytes.is_none() {
            statistics.total_bytes = layout.total_bytes();
        }

        tracing::info!(
            planning_unit = %self.seed.planning_unit,
            table = %table.name,
            files = layout.file_count(),
            partitions = layout.partitions.len(),
            row_groups = layout.row_group_count(),
            explicit_schema = explicit.is_some(),
            "full discovery complete"
        );

        Ok(TableMetadataProvider::new(
            ProviderKind::FullDiscovery,
            Some(table),
            schema,
            Some(statistics),
            Some(layout),
        ))
    }
}

impl fmt::Debug for FullDiscoveryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FullDiscoveryBuilder")
            .field("seed", &self.seed)
            .field("table", &self.table)
            .field("schema", &self.schema)
            .field("backend", &self.backend.is_some())
            .finish()
    }
}
