//! Lineage Core - records and nodes for the lineage graph
//!
//! This crate owns the input side of the lineage graph: turning decoded
//! tabular rows into canonical `(app, upstream, table)` triples, and the
//! node types the graph is made of. It performs no I/O; rows are handed
//! over already decoded.
//!
//! # Example
//!
//! ```
//! use lineage_core::{normalize, Triple};
//!
//! let row = vec![("appName", "Billing"), ("upstreamName", "OrdersDB"), ("tables", "orders")];
//! let triple = normalize(&row).unwrap();
//! assert_eq!(triple, Triple::new("Billing", "OrdersDB", "orders"));
//! ```

pub mod error;
pub mod node;
pub mod record;

pub use error::{RecordError, Result};
pub use node::{Node, NodeKind};
pub use record::{normalize, Field, Record, Triple};
