//! Error types for metadata provider resolution.
//!
//! Three kinds of failure reach callers:
//! - configuration errors: a provider kind name that maps to no builder, or a
//!   full-discovery build missing its backend/table
//! - discovery errors: I/O or format failures reported by the discovery
//!   backend, wrapped with the table and step that failed
//! - source errors: a schema or statistics source could not be read
//!
//! Absent schema or statistics is not an error at any layer.

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::CacheError;
use crate::config::SettingsError;
use crate::provider::ProviderKind;

/// Result type for provider resolution.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Errors raised while selecting, building or exposing a metadata provider.
#[derive(Error, Debug)]
pub enum MetadataError {
    /// A provider kind name with no registered builder.
    #[error("unsupported metadata provider kind: {0}")]
    UnsupportedKind(String),

    /// A builder was asked to build without a required input.
    #[error("{kind} provider requires a {input}")]
    MissingInput {
        kind: ProviderKind,
        input: &'static str,
    },

    /// The discovery backend failed for a table.
    #[error("metadata discovery failed for table `{table}` during {step}: {source}")]
    Discovery {
        table: String,
        step: DiscoveryStep,
        #[source]
        source: DiscoveryError,
    },

    /// A schema or statistics source could not be read.
    #[error("failed to read {source_kind} source{}: {message}", table_suffix(.table))]
    Source {
        source_kind: &'static str,
        table: Option<String>,
        message: String,
    },

    #[error("metadata cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),
}

impl MetadataError {
    /// Wrap a backend failure with the table it was discovering.
    pub fn discovery(table: impl Into<String>, source: DiscoveryError) -> Self {
        Self::Discovery {
            table: table.into(),
            step: source.step,
            source,
        }
    }

    /// A schema or statistics source failed to read.
    pub fn source_failed(source_kind: &'static str, message: impl fmt::Display) -> Self {
        Self::Source {
            source_kind,
            table: None,
            message: message.to_string(),
        }
    }

    /// Name the table a source error belongs to, unless it already names one.
    pub fn for_table(self, name: &str) -> Self {
        match self {
            Self::Source {
                source_kind,
                table: None,
                message,
            } => Self::Source {
                source_kind,
                table: Some(name.to_string()),
                message,
            },
            other => other,
        }
    }

    /// Classification of the underlying discovery failure, if this is one.
    pub fn discovery_kind(&self) -> Option<DiscoveryErrorKind> {
        match self {
            Self::Discovery { source, .. } => Some(source.kind),
            _ => None,
        }
    }

    /// Name of the table a discovery or source failure belongs to.
    pub fn table(&self) -> Option<&str> {
        match self {
            Self::Discovery { table, .. } => Some(table),
            Self::Source { table, .. } => table.as_deref(),
            _ => None,
        }
    }
}

fn table_suffix(table: &Option<String>) -> String {
    match table {
        Some(name) => format!(" for table `{name}`"),
        None => String::new(),
    }
}

/// Classification of a discovery backend failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryErrorKind {
    /// Generic I/O failure (read error, interrupted transfer).
    Io,
    /// The caller may not read the table's files.
    PermissionDenied,
    /// The table location or one of its files does not exist.
    NotFound,
    /// File metadata could not be decoded.
    MalformedMetadata,
}

impl fmt::Display for DiscoveryErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Io => "i/o error",
            Self::PermissionDenied => "permission denied",
            Self::NotFound => "not found",
            Self::MalformedMetadata => "malformed metadata",
        };
        f.write_str(s)
    }
}

/// The discovery step that was running when a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryStep {
    ListFiles,
    ReadFooter,
    InferSchema,
    CollectStatistics,
    #[default]
    Other,
}

impl fmt::Display for DiscoveryStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ListFiles => "file listing",
            Self::ReadFooter => "footer read",
            Self::InferSchema => "schema inference",
            Self::CollectStatistics => "statistics collection",
            Self::Other => "discovery",
        };
        f.write_str(s)
    }
}

/// Failure reported by a [`MetadataDiscoveryBackend`](crate::discovery::MetadataDiscoveryBackend).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct DiscoveryError {
    pub kind: DiscoveryErrorKind,
    pub step: DiscoveryStep,
    pub message: String,
}

impl DiscoveryError {
    pub fn new(kind: DiscoveryErrorKind, step: DiscoveryStep, message: impl Into<String>) -> Self {
        Self {
            kind,
            step,
            message: message.into(),
        }
    }

    pub fn permission_denied(step: DiscoveryStep, message: impl Into<String>) -> Self {
        Self::new(DiscoveryErrorKind::PermissionDenied, step, message)
    }

    pub fn malformed(step: DiscoveryStep, message: impl Into<String>) -> Self {
        Self::new(DiscoveryErrorKind::MalformedMetadata, step, message)
    }

    /// Attach the step that was running, keeping the classification.
    pub fn at(mut self, step: DiscoveryStep) -> Self {
        self.step = step;
        self
    }

    /// Whether a caller could reasonably retry. Nothing in this crate retries.
    pub fn is_retriable(&self) -> bool {
        matches!(self.kind, DiscoveryErrorKind::Io)
    }
}

impl From<io::Error> for DiscoveryError {
    fn from(err: io::Error) -> Self {
        let kind = match err.kind() {
            io::ErrorKind::PermissionDenied => DiscoveryErrorKind::PermissionDenied,
            io::ErrorKind::NotFound => DiscoveryErrorKind::NotFound,
            io::ErrorKind::InvalidData => DiscoveryErrorKind::MalformedMetadata,
            _ => DiscoveryErrorKind::Io,
        };
        Self::new(kind, DiscoveryStep::Other, err.to_string())
    }
}
