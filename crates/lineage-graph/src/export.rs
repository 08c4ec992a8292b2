//! Neutral graph export for rendering collaborators.
//!
//! The shape follows the element lists graph renderers consume: every
//! node and edge is wrapped in a `data` object. Presentation (colour,
//! shape, layout) is left entirely to the renderer; the export only
//! carries facts such as whether an upstream is shared.

use crate::edge::EdgeKind;
use crate::graph::{GraphIndex, GraphStats};
use lineage_core::NodeKind;
use serde::{Deserialize, Serialize};

/// A node element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeElement {
    pub data: NodeData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    /// Set on upstreams used by more than one app.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub shared: bool,
}

/// An edge element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeElement {
    pub data: EdgeData,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeData {
    pub source: String,
    pub target: String,
    pub kind: EdgeKind,
}

/// The whole graph as renderer elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphExport {
    pub version: String,
    pub stats: GraphStats,
    pub nodes: Vec<NodeElement>,
    pub edges: Vec<EdgeElement>,
}

impl GraphExport {
    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl GraphIndex {
    /// Exports nodes and edges in insertion order.
    pub fn export(&self) -> GraphExport {
        let nodes = self
            .nodes()
            .map(|node| NodeElement {
                data: NodeData {
                    id: node.id.clone(),
                    label: node.label.clone(),
                    kind: node.kind,
                    shared: self.is_shared_upstream(&node.id),
                },
            })
            .collect();

        let edges = self
            .edges()
            .map(|edge| EdgeElement {
                data: EdgeData {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    kind: edge.kind,
                },
            })
            .collect();

        GraphExport {
            version: env!("CARGO_PKG_VERSION").to_string(),
            stats: self.stats(),
            nodes,
            edges,
        }
    }
}
