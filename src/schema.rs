//! Table schema: an ordered, typed column list.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical column type as seen by the planner.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Decimal { precision: u8, scale: i8 },
    Utf8,
    Binary,
    Date,
    Timestamp,
    /// Type could not be determined (e.g. an all-null column).
    Unknown,
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean => f.write_str("BOOLEAN"),
            Self::Int32 => f.write_str("INT"),
            Self::Int64 => f.write_str("BIGINT"),
            Self::Float32 => f.write_str("FLOAT"),
            Self::Float64 => f.write_str("DOUBLE"),
            Self::Decimal { precision, scale } => write!(f, "DECIMAL({precision}, {scale})"),
            Self::Utf8 => f.write_str("VARCHAR"),
            Self::Binary => f.write_str("VARBINARY"),
            Self::Date => f.write_str("DATE"),
            Self::Timestamp => f.write_str("TIMESTAMP"),
            Self::Unknown => f.write_str("UNKNOWN"),
        }
    }
}

/// A single column of a table schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMetadata {
    pub name: String,
    pub data_type: DataType,
    #[serde(default = "default_nullable")]
    pub nullable: bool,
}

fn default_nullable() -> bool {
    true
}

impl ColumnMetadata {
    pub fn new(name: impl Into<String>, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }
}

/// Ordered column list for one table.
///
/// A *lenient* schema states the types of the columns it names but does not
/// restrict the table to them: when laid over a discovered schema, columns
/// only the discovery found are kept after the explicit ones. A strict schema
/// (the default) is the table's schema, full stop.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Schema {
    columns: Vec<ColumnMetadata>,
    #[serde(default)]
    lenient: bool,
}

impl Schema {
    pub fn new(columns: Vec<ColumnMetadata>) -> Self {
        Self {
            columns,
            lenient: false,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    pub fn columns(&self) -> &[ColumnMetadata] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Case-insensitive column lookup.
    pub fn column(&self, name: &str) -> Option<&ColumnMetadata> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Lay an explicit schema over a discovered one.
    ///
    /// Explicit columns always win, in their own order and with their own
    /// types. Discovered columns are appended only when `explicit` is lenient
    /// and they are not already named by it.
    pub fn overlay(explicit: &Schema, discovered: &Schema) -> Schema {
        if !explicit.lenient {
            return explicit.clone();
        }

        let mut columns = explicit.columns.clone();
        columns.extend(
            discovered
                .columns
                .iter()
                .filter(|c| explicit.column(&c.name).is_none())
                .cloned(),
        );

        Schema {
            columns,
            lenient: true,
        }
    }
}

impl FromIterator<ColumnMetadata> for Schema {
    fn from_iter<I: IntoIterator<Item = ColumnMetadata>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
