//! Schema and statistics sources backed by the metadata cache.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::discovery::TableHandle;
use crate::error::{MetadataError, MetadataResult};
use crate::schema::Schema;
use crate::source::{SchemaSource, StatsSource};
use crate::stats::TableStatistics;

use super::MetadataCache;

/// A cache shared between the sources of several managers.
///
/// `rusqlite::Connection` is not `Sync`, so access is serialized.
pub type SharedCache = Arc<Mutex<MetadataCache>>;

fn lock<'a>(
    cache: &'a SharedCache,
    source_kind: &'static str,
    table: &TableHandle,
) -> MetadataResult<MutexGuard<'a, MetadataCache>> {
    cache.lock().map_err(|_| {
        MetadataError::source_failed(source_kind, "metadata cache lock poisoned")
            .for_table(&table.name)
    })
}

/// Reads a table's persisted schema from the metadata cache.
#[derive(Clone)]
pub struct CachedSchemaSource {
    cache: SharedCache,
    table: TableHandle,
}

impl CachedSchemaSource {
    pub fn new(cache: SharedCache, table: TableHandle) -> Self {
        Self { cache, table }
    }
}

impl SchemaSource for CachedSchemaSource {
    fn schema(&self) -> MetadataResult<Option<Schema>> {
        let schema = lock(&self.cache, "schema", &self.table)?
            .schema(&self.table)
            .map_err(|e| MetadataError::source_failed("schema", e).for_table(&self.table.name))?;
        tracing::debug!(table = %self.table.name, hit = schema.is_some(), "schema cache lookup");
        Ok(schema)
    }
}

/// Reads a table's persisted statistics from the metadata cache.
#[derive(Clone)]
pub struct CachedStatsSource {
    cache: SharedCache,
    table: TableHandle,
}

impl CachedStatsSource {
    pub fn new(cache: SharedCache, table: TableHandle) -> Self {
        Self { cache, table }
    }
}

impl StatsSource for CachedStatsSource {
    fn statistics(&self) -> MetadataResult<Option<TableStatistics>> {
        let stats = lock(&self.cache, "statistics", &self.table)?
            .statistics(&self.table)
            .map_err(|e| {
                MetadataError::source_failed("statistics", e).for_table(&self.table.name)
            })?;
        tracing::debug!(table = %self.table.name, hit = stats.is_some(), "statistics cache lookup");
        Ok(stats)
    }
}
