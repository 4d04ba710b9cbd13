//! SQLite-based metadata cache.
//!
//! Persists table schemas and statistics so that a later planning unit can
//! seed its manager without discovering the table again. Stored at
//! `~/.tablemeta/cache.db` unless configured otherwise.
//!
//! # Design
//!
//! - Simple key-value store with JSON values
//! - No TTL - entries persist until invalidated or cleared
//! - Versioned - auto-clears on version mismatch
//!
//! # Key Format
//!
//! ```text
//! {table_hash}:schema   -> Schema
//! {table_hash}:stats    -> TableStatistics
//! ```
//!
//! `table_hash` is the SHA-256 of the JSON-encoded [`TableHandle`], so a table
//! moved to a new location gets fresh entries.

mod hash;
mod sources;

pub use hash::compute_hash;
pub use sources::{CachedSchemaSource, CachedStatsSource, SharedCache};

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::CacheSettings;
use crate::discovery::TableHandle;
use crate::error::MetadataResult;
use crate::provider::TableMetadataProvider;
use crate::schema::Schema;
use crate::stats::TableStatistics;

/// Current cache schema version. Bump this when the cache format changes.
const CACHE_VERSION: i32 = 1;

/// Errors that can occur during cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// SQLite-based metadata cache.
pub struct MetadataCache {
    conn: Connection,
}

impl MetadataCache {
    /// Open or create the cache database at `path`.
    ///
    /// If the cache version doesn't match, it's automatically cleared.
    pub fn open_at(path: &Path) -> CacheResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        let cache = Self { conn };
        cache.init()?;

        Ok(cache)
    }

    /// Open an in-memory cache (for testing).
    pub fn open_in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        let cache = Self { conn };
        cache.init()?;
        Ok(cache)
    }

    /// Open the cache described by `settings`, or `None` when disabled.
    pub fn from_settings(settings: &CacheSettings) -> MetadataResult<Option<Self>> {
        if !settings.enabled {
            return Ok(None);
        }
        let path = settings.resolved_path()?;
        tracing::debug!(path = %path.display(), "opening metadata cache");
        Ok(Some(Self::open_at(&path)?))
    }

    /// Initialize the cache schema and check version.
    fn init(&self) -> CacheResult<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS cache (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )?;

        let stored_version: Option<String> = self
            .conn
            .query_row("SELECT value FROM meta WHERE key = 'version'", [], |row| {
                row.get(0)
            })
            .optional()?;

        // An unparseable version counts as a mismatch.
        match stored_version.map(|v| v.parse::<i32>().unwrap_or(0)) {
            Some(v) if v == CACHE_VERSION => {}
            Some(v) => {
                tracing::info!(
                    found = v,
                    expected = CACHE_VERSION,
                    "metadata cache version mismatch, clearing"
                );
                self.clear_all()?;
                self.set_version()?;
            }
            None => self.set_version()?,
        }

        Ok(())
    }

    fn set_version(&self) -> CacheResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO meta (key, value) VALUES ('version', ?)",
            params![CACHE_VERSION.to_string()],
        )?;
        Ok(())
    }

    /// Get a value from the cache.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> CacheResult<Option<T>> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM cache WHERE key = ?",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(s) => Ok(Some(serde_json::from_str(&s)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the cache.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> CacheResult<()> {
        let json = serde_json::to_string(value)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO cache (key, value) VALUES (?, ?)",
            params![key, json],
        )?;
        Ok(())
    }

    /// Delete all entries matching a key prefix.
    pub fn delete_prefix(&self, prefix: &str) -> CacheResult<usize> {
        let pattern = format!("{}%", prefix);
        let rows = self
            .conn
            .execute("DELETE FROM cache WHERE key LIKE ?", params![pattern])?;
        Ok(rows)
    }

    /// Clear all cache entries (but keep metadata).
    pub fn clear_all(&self) -> CacheResult<()> {
        self.conn.execute("DELETE FROM cache", [])?;
        Ok(())
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheResult<CacheStats> {
        let entry_count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM cache", [], |row| row.get(0))?;

        let total_size: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(value)), 0) FROM cache",
            [],
            |row| row.get(0),
        )?;

        Ok(CacheStats {
            entry_count: entry_count as usize,
            total_size_bytes: total_size as usize,
        })
    }

    // ===== Table metadata =====

    pub fn schema(&self, table: &TableHandle) -> CacheResult<Option<Schema>> {
        self.get(&CacheKey::schema(table)?)
    }

    pub fn put_schema(&self, table: &TableHandle, schema: &Schema) -> CacheResult<()> {
        self.set(&CacheKey::schema(table)?, schema)
    }

    pub fn statistics(&self, table: &TableHandle) -> CacheResult<Option<TableStatistics>> {
        self.get(&CacheKey::statistics(table)?)
    }

    pub fn put_statistics(&self, table: &TableHandle, stats: &TableStatistics) -> CacheResult<()> {
        self.set(&CacheKey::statistics(table)?, stats)
    }

    /// Persist a provider's schema and statistics under its table.
    ///
    /// Returns false (and stores nothing) for a provider built without a
    /// table handle. Unknown statistics are not written, so they never
    /// overwrite previously persisted ones.
    pub fn store_provider(&self, provider: &TableMetadataProvider) -> CacheResult<bool> {
        let Some(table) = provider.table() else {
            return Ok(false);
        };

        self.put_schema(table, provider.schema())?;
        if let Some(stats) = provider.statistics() {
            self.put_statistics(table, stats)?;
        }

        tracing::debug!(table = %table.name, kind = %provider.kind(), "persisted table metadata");
        Ok(true)
    }

    /// Drop everything cached for a table.
    pub fn invalidate(&self, table: &TableHandle) -> CacheResult<usize> {
        self.delete_prefix(&format!("{}:", CacheKey::table_hash(table)?))
    }
}

/// Cache statistics.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of entries in the cache.
    pub entry_count: usize,
    /// Total size of all values in bytes.
    pub total_size_bytes: usize,
}

/// Helper for generating cache keys.
pub struct CacheKey;

impl CacheKey {
    /// SHA-256 of the JSON-encoded table handle, as 64 lowercase hex chars.
    pub fn table_hash(table: &TableHandle) -> CacheResult<String> {
        Ok(compute_hash(table)?)
    }

    /// Key for a table's schema.
    pub fn schema(table: &TableHandle) -> CacheResult<String> {
        Ok(format!("{}:schema", Self::table_hash(table)?))
    }

    /// Key for a table's statistics.
    pub fn statistics(table: &TableHandle) -> CacheResult<String> {
        Ok(format!("{}:stats", Self::table_hash(table)?))
    }
}
