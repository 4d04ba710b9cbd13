//! Schema and statistics sources.
//!
//! A source supplies already-known metadata on demand: a schema persisted
//! next to the table, statistics computed by an earlier `ANALYZE`, or simply a
//! value the caller has in hand. Reading a source may hit a cache but has no
//! other side effects. `Ok(None)` means the source has nothing to offer,
//! which is never an error.

use std::sync::Arc;

use crate::error::MetadataResult;
use crate::schema::Schema;
use crate::stats::TableStatistics;

/// Supplies a persisted or inferred table schema.
pub trait SchemaSource: Send + Sync {
    fn schema(&self) -> MetadataResult<Option<Schema>>;
}

/// Supplies table and column statistics.
pub trait StatsSource: Send + Sync {
    fn statistics(&self) -> MetadataResult<Option<TableStatistics>>;
}

/// A schema value is its own source.
impl SchemaSource for Schema {
    fn schema(&self) -> MetadataResult<Option<Schema>> {
        Ok(Some(self.clone()))
    }
}

impl StatsSource for TableStatistics {
    fn statistics(&self) -> MetadataResult<Option<TableStatistics>> {
        Ok(Some(self.clone()))
    }
}

impl<T: SchemaSource + ?Sized> SchemaSource for Arc<T> {
    fn schema(&self) -> MetadataResult<Option<Schema>> {
        (**self).schema()
    }
}

impl<T: StatsSource + ?Sized> StatsSource for Arc<T> {
    fn statistics(&self) -> MetadataResult<Option<TableStatistics>> {
        (**self).statistics()
    }
}
