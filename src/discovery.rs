//! Physical metadata discovery.
//!
//! A [`MetadataDiscoveryBackend`] inspects a table's stored files (listing,
//! footer reads) and reports what it found. This is the expensive path:
//! O(files + partitions) I/O per call. Retries, caching of footers and
//! cancellation are the backend's business; this crate calls it at most once
//! per full-discovery build and never retries.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{DiscoveryError, DiscoveryErrorKind, DiscoveryStep};
use crate::layout::PhysicalLayout;
use crate::schema::Schema;
use crate::stats::TableStatistics;

/// Identifies the table being planned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableHandle {
    /// Qualified table name as written in the query, e.g. `dfs.sales`.
    pub name: String,
    /// Root location of the table's files.
    pub location: String,
}

impl TableHandle {
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }
}

impl fmt::Display for TableHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Everything a backend learned about a table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DiscoveredTable {
    /// Column types read from file metadata.
    pub schema: Schema,
    pub statistics: TableStatistics,
    pub layout: PhysicalLayout,
}

/// Performs physical scanning to build full table metadata.
pub trait MetadataDiscoveryBackend: Send + Sync {
    /// Discover schema, statistics and layout for `table`.
    ///
    /// # Errors
    /// Returns a classified [`DiscoveryError`] for I/O, permission or
    /// malformed-metadata failures.
    fn discover(&self, table: &TableHandle) -> Result<DiscoveredTable, DiscoveryError>;
}

impl<F> MetadataDiscoveryBackend for F
where
    F: Fn(&TableHandle) -> Result<DiscoveredTable, DiscoveryError> + Send + Sync,
{
    fn discover(&self, table: &TableHandle) -> Result<DiscoveredTable, DiscoveryError> {
        self(table)
    }
}

/// In-memory backend with pre-registered outcomes per table name.
///
/// Useful for views and tables whose layout is already known to the catalog,
/// and for exercising planners without touching storage. Counts calls so that
/// callers can verify discovery did or did not happen.
#[derive(Debug, Default)]
pub struct StaticDiscovery {
    tables: HashMap<String, Result<DiscoveredTable, DiscoveryError>>,
    calls: AtomicUsize,
}

impl StaticDiscovery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, name: impl Into<String>, table: DiscoveredTable) -> Self {
        self.tables.insert(name.into(), Ok(table));
        self
    }

    /// Register a failure for `name`; every discovery of it returns `error`.
    pub fn with_failure(mut self, name: impl Into<String>, error: DiscoveryError) -> Self {
        self.tables.insert(name.into(), Err(error));
        self
    }

    /// Number of `discover` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl MetadataDiscoveryBackend for StaticDiscovery {
    fn discover(&self, table: &TableHandle) -> Result<DiscoveredTable, DiscoveryError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        match self.tables.get(&table.name) {
            Some(outcome) => outcome.clone(),
            None => Err(DiscoveryError::new(
                DiscoveryErrorKind::NotFound,
                DiscoveryStep::ListFiles,
                format!("no files found under {}", table.location),
            )),
        }
    }
}
