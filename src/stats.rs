//! Table- and column-level statistics.
//!
//! Every count is optional. An absent value means "unknown" and must never be
//! read as zero.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Statistics for a single column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ColumnStatistics {
    pub null_count: Option<u64>,
    pub distinct_count: Option<u64>,
}

/// Statistics for a whole table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableStatistics {
    /// Estimated row count, if known.
    pub row_count: Option<u64>,
    /// Total data size in bytes, if known.
    pub total_bytes: Option<u64>,
    /// Per-column statistics, keyed by column name.
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnStatistics>,
}

impl TableStatistics {
    pub fn with_row_count(row_count: u64) -> Self {
        Self {
            row_count: Some(row_count),
            ..Self::default()
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnStatistics> {
        self.columns.get(name)
    }

    pub fn with_column(mut self, name: impl Into<String>, stats: ColumnStatistics) -> Self {
        self.columns.insert(name.into(), stats);
        self
    }

    /// True when nothing at all is known.
    pub fn is_unknown(&self) -> bool {
        self.row_count.is_none() && self.total_bytes.is_none() && self.columns.is_empty()
    }
}
