//! Lineage Graph - application / upstream / table relationships
//!
//! This crate builds an in-memory index of which applications depend on
//! which upstream systems, and which tables each app pulls through each
//! upstream. It answers the queries interactive lineage views need:
//! one-hop neighborhoods, tables two apps share under one upstream,
//! upstreams shared between apps, and label search.
//!
//! # Architecture
//!
//! The graph uses petgraph internally with additional indexes for:
//! - Id-based lookups
//! - Orientation-free edge identity (duplicate suppression)
//! - Per-upstream app → tables lists
//! - Label search
//!
//! An index is built once per input batch and is read-only afterwards,
//! so it can be shared between readers without locking.
//!
//! # Example
//!
//! ```
//! use lineage_graph::{BuildOptions, GraphIndexBuilder};
//!
//! let rows = vec![
//!     vec![("appName", "A1"), ("upstreamName", "U1"), ("tableName", "t1")],
//!     vec![("appName", "A2"), ("upstreamName", "U1"), ("tableName", "t1")],
//! ];
//! let report = GraphIndexBuilder::build(rows, BuildOptions::default()).unwrap();
//! let query = report.index.query();
//!
//! assert!(query.is_shared_upstream("U1"));
//! assert_eq!(query.common_tables("U1", "A1", "A2"), vec!["t1"]);
//! ```

mod builder;
mod edge;
mod export;
mod graph;
mod query;
mod search_index;
mod table_map;

pub use builder::{
    BuildError, BuildOptions, BuildReport, GraphIndexBuilder, RecordErrorPolicy, SkippedRow,
};
pub use edge::{Edge, EdgeKey, EdgeKind};
pub use export::{EdgeData, EdgeElement, GraphExport, NodeData, NodeElement};
pub use graph::{GraphIndex, GraphStats, NodeId};
pub use query::{FocusView, RelationshipQuery, SharedTable};
pub use search_index::SearchIndex;
pub use table_map::UpstreamTableMap;

pub use lineage_core::{Node, NodeKind, Record, RecordError, Triple};
