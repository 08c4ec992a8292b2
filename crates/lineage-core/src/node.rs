//! Node types for the lineage graph.
//!
//! Every entity pulled out of a lineage record becomes a node: the
//! application that reads data, the upstream system it reads from, and
//! the table the data lands in.

use serde::{Deserialize, Serialize};

/// The tier a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// An application consuming upstream data.
    App,

    /// An upstream system feeding one or more applications.
    Upstream,

    /// A table contributed by an app through an upstream.
    Table,
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::App => "app",
            Self::Upstream => "upstream",
            Self::Table => "table",
        };
        write!(f, "{}", s)
    }
}

/// A single entity in the lineage graph.
///
/// The `id` is unique across the whole graph, regardless of kind. Callers
/// that expect an app and a table to share a name must qualify the ids
/// before building.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Graph-wide identity key.
    pub id: String,

    /// Which tier this node sits in.
    pub kind: NodeKind,

    /// Display name. Defaults to the id.
    pub label: String,
}

impl Node {
    /// Creates a node whose label is its id.
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            kind,
        }
    }

    /// Overrides the display label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}
