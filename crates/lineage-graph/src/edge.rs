//! Edge types for the lineage graph.
//!
//! Edges are unweighted "is connected to" links. Identity is the unordered
//! pair of endpoint ids, so `(a, b)` and `(b, a)` are the same edge; the
//! stored orientation is only what the builder chose when it first saw
//! the pair.

use serde::{Deserialize, Serialize};

/// The type of relationship an edge records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// Upstream feeds an application.
    Feeds,

    /// Upstream holds a table.
    Contains,
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Feeds => "feeds",
            Self::Contains => "contains",
        };
        write!(f, "{}", s)
    }
}

/// An edge in the lineage graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Id of the node the edge was anchored on (the upstream).
    pub source: String,

    /// Id of the other endpoint.
    pub target: String,

    /// The kind of relationship.
    pub kind: EdgeKind,
}

impl Edge {
    /// Creates a new edge.
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: EdgeKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
        }
    }

    /// The canonical identity of this edge.
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(&self.source, &self.target)
    }
}

/// Orientation-free identity of an edge: the endpoint ids in
/// lexicographic order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    low: String,
    high: String,
}

impl EdgeKey {
    pub fn new(a: &str, b: &str) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self {
            low: low.to_string(),
            high: high.to_string(),
        }
    }
}
