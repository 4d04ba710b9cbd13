//! # Tablemeta
//!
//! Table metadata provider resolution for query planning.
//!
//! ## Architecture
//!
//! A planner asks "how do I get metadata for this table right now" and the
//! answer is either a cheap provider assembled from already-known schema and
//! statistics, or an expensive one backed by physical discovery of the
//! table's files:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                   ProviderManager                        │
//! │   schema source? · stats source? · resolved provider?    │
//! └─────────────────────────────────────────────────────────┘
//!                          │ builder(kind)
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │                   ProviderBuilder                        │
//! │   FullDiscovery  ──► MetadataDiscoveryBackend (I/O)      │
//! │   SchemaStatsOnly ─► seeded sources only                 │
//! └─────────────────────────────────────────────────────────┘
//!                          │ build()
//!                          ▼
//! ┌─────────────────────────────────────────────────────────┐
//! │        TableMetadataProvider (immutable, shareable)      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! One manager belongs to one planning unit (a query or a table access). It
//! is never shared across planning units because metadata can go stale
//! between queries.

pub mod builder;
pub mod cache;
pub mod config;
pub mod discovery;
pub mod error;
pub mod layout;
pub mod manager;
pub mod provider;
pub mod schema;
pub mod source;
pub mod stats;

pub use builder::{FullDiscoveryBuilder, ProviderBuilder, SchemaStatsBuilder};
pub use discovery::{DiscoveredTable, MetadataDiscoveryBackend, StaticDiscovery, TableHandle};
pub use error::{
    DiscoveryError, DiscoveryErrorKind, DiscoveryStep, MetadataError, MetadataResult,
};
pub use layout::{FileMetadata, PartitionMetadata, PhysicalLayout, RowGroupMetadata};
pub use manager::{resolve_for_schema, resolve_or_default, PlanningUnitId, ProviderManager};
pub use provider::{ProviderKind, TableMetadataProvider};
pub use schema::{ColumnMetadata, DataType, Schema};
pub use source::{SchemaSource, StatsSource};
pub use stats::{ColumnStatistics, TableStatistics};
