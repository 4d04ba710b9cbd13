//! Physical layout of a table: files, partitions and row groups.
//!
//! Only a full-discovery provider carries a layout. Row-group statistics feed
//! row-group pruning and partition values feed partition pruning.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::stats::ColumnStatistics;

/// One row group inside a data file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RowGroupMetadata {
    pub row_count: u64,
    pub total_bytes: u64,
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnStatistics>,
}

/// One data file of a table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileMetadata {
    pub path: String,
    pub size_bytes: u64,
    /// Row count from the file footer. `None` when the footer has not been read.
    pub row_count: Option<u64>,
    #[serde(default)]
    pub row_groups: Vec<RowGroupMetadata>,
}

impl FileMetadata {
    pub fn new(path: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            path: path.into(),
            size_bytes,
            row_count: None,
            row_groups: Vec::new(),
        }
    }

    pub fn with_row_group(mut self, row_group: RowGroupMetadata) -> Self {
        self.row_groups.push(row_group);
        self
    }

    /// Rows in this file: the footer count if present, else the sum of its
    /// row groups, else unknown. A row-group sum that overflows is unknown.
    pub fn rows(&self) -> Option<u64> {
        self.row_count.or_else(|| {
            if self.row_groups.is_empty() {
                None
            } else {
                self.row_groups
                    .iter()
                    .try_fold(0u64, |acc, rg| acc.checked_add(rg.row_count))
            }
        })
    }
}

/// A partition directory and the partition key values it represents.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PartitionMetadata {
    pub location: String,
    /// Partition column -> value, e.g. `year -> 2024`.
    pub values: BTreeMap<String, String>,
    /// Paths of the files under this partition.
    #[serde(default)]
    pub files: Vec<String>,
}

/// Files and partitions backing a table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhysicalLayout {
    pub files: Vec<FileMetadata>,
    #[serde(default)]
    pub partitions: Vec<PartitionMetadata>,
}

impl PhysicalLayout {
    pub fn new(files: Vec<FileMetadata>) -> Self {
        Self {
            files,
            partitions: Vec::new(),
        }
    }

    pub fn with_partition(mut self, partition: PartitionMetadata) -> Self {
        self.partitions.push(partition);
        self
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn row_group_count(&self) -> usize {
        self.files.iter().map(|f| f.row_groups.len()).sum()
    }

    /// Total size of all files. `None` if the sum overflows.
    pub fn total_bytes(&self) -> Option<u64> {
        self.files
            .iter()
            .try_fold(0u64, |acc, f| acc.checked_add(f.size_bytes))
    }

    /// Total rows across all files. Unknown if any file's count is unknown
    /// or the sum overflows.
    pub fn total_rows(&self) -> Option<u64> {
        self.files
            .iter()
            .map(FileMetadata::rows)
            .try_fold(0u64, |acc, rows| acc.checked_add(rows?))
    }

    pub fn is_partitioned(&self) -> bool {
        !self.partitions.is_empty()
    }
}
