//! Core index data structure.
//!
//! The GraphIndex wraps an undirected petgraph graph and adds the id,
//! edge-identity, table and search indexes the queries need. It is only
//! mutated by [`GraphIndexBuilder`](crate::GraphIndexBuilder); once handed
//! out it is read-only.

use crate::edge::{Edge, EdgeKey, EdgeKind};
use crate::query::RelationshipQuery;
use crate::search_index::SearchIndex;
use crate::table_map::UpstreamTableMap;
use lineage_core::{Node, NodeKind};
use petgraph::graph::{NodeIndex, UnGraph};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Unique identifier for a node in the graph.
pub type NodeId = NodeIndex;

/// The app / upstream / table lineage graph.
///
/// Nodes and edges keep their insertion order, so iteration is
/// reproducible for a given input batch.
#[derive(Debug, Clone)]
pub struct GraphIndex {
    /// The underlying petgraph graph.
    pub(crate) graph: UnGraph<Node, Edge>,

    /// Maps string IDs to graph node indexes.
    id_index: HashMap<String, NodeId>,

    /// Orientation-free keys of every stored edge.
    edge_keys: HashSet<EdgeKey>,

    /// upstream → app → tables, filled alongside the edges.
    pub(crate) table_map: UpstreamTableMap,

    /// Distinct apps per upstream, computed once at finish.
    fan_out: HashMap<NodeId, usize>,

    /// Label search.
    pub(crate) search: SearchIndex,
}

impl GraphIndex {
    pub(crate) fn new() -> Self {
        Self {
            graph: UnGraph::default(),
            id_index: HashMap::new(),
            edge_keys: HashSet::new(),
            table_map: UpstreamTableMap::default(),
            fan_out: HashMap::new(),
            search: SearchIndex::new(),
        }
    }

    /// Adds a node unless one with the same id exists.
    ///
    /// Returns the index of whichever node owns the id; the first-seen
    /// node keeps its kind and label.
    pub(crate) fn add_node(&mut self, node: Node) -> NodeId {
        if let Some(&existing) = self.id_index.get(&node.id) {
            return existing;
        }

        let id = node.id.clone();
        let label = node.label.clone();
        let index = self.graph.add_node(node);

        self.id_index.insert(id, index);
        self.search.insert(&label, index);

        index
    }

    /// Adds an edge unless the unordered pair is already connected.
    ///
    /// Returns true if a new edge was stored.
    pub(crate) fn add_edge(&mut self, from: NodeId, to: NodeId, kind: EdgeKind) -> bool {
        let (Some(source), Some(target)) = (self.graph.node_weight(from), self.graph.node_weight(to))
        else {
            return false;
        };

        let edge = Edge::new(source.id.as_str(), target.id.as_str(), kind);
        if !self.edge_keys.insert(edge.key()) {
            return false;
        }

        self.graph.add_edge(from, to, edge);
        true
    }

    /// Caches the fan-out of every upstream from the table map.
    ///
    /// Ids whose first-seen node is not an upstream get no entry, even when
    /// later rows used them in the upstream column.
    pub(crate) fn compute_fan_out(&mut self) {
        self.fan_out.clear();
        for upstream in self.table_map.upstreams() {
            let Some(&index) = self.id_index.get(upstream) else {
                continue;
            };
            if self.graph[index].kind != NodeKind::Upstream {
                debug!("{} is not an upstream node, no fan-out recorded", upstream);
                continue;
            }
            let apps = self.table_map.app_count(upstream);
            debug!("upstream {} fans out to {} apps", upstream, apps);
            self.fan_out.insert(index, apps);
        }
    }

    /// Gets a node by its string ID.
    pub fn node(&self, id: &str) -> Option<&Node> {
        let index = self.id_index.get(id)?;
        self.graph.node_weight(*index)
    }

    /// Gets a node by its graph index.
    pub fn get(&self, index: NodeId) -> Option<&Node> {
        self.graph.node_weight(index)
    }

    /// Gets the node index for a string ID.
    pub fn get_index(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    /// Returns true if an edge joins `a` and `b`, in either orientation.
    pub fn has_edge(&self, a: &str, b: &str) -> bool {
        self.edge_keys.contains(&EdgeKey::new(a, b))
    }

    /// Number of distinct apps connected to `upstream`.
    ///
    /// Zero for unknown ids and for nodes that are not upstreams.
    pub fn fan_out(&self, upstream: &str) -> usize {
        self.get_index(upstream)
            .and_then(|index| self.fan_out.get(&index))
            .copied()
            .unwrap_or(0)
    }

    /// True when at least two distinct apps depend on `upstream`.
    pub fn is_shared_upstream(&self, upstream: &str) -> bool {
        self.fan_out(upstream) >= 2
    }

    /// The per-upstream app → tables mapping.
    pub fn table_map(&self) -> &UpstreamTableMap {
        &self.table_map
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterates over all nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// Iterates over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_weights()
    }

    /// Read-only relationship queries over this index.
    pub fn query(&self) -> RelationshipQuery<'_> {
        RelationshipQuery::new(self)
    }
}

/// Graph statistics for summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub apps: usize,
    pub upstreams: usize,
    pub tables: usize,
    pub shared_upstreams: usize,
}

impl GraphIndex {
    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        let count = |kind: NodeKind| self.nodes().filter(|node| node.kind == kind).count();

        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
            apps: count(NodeKind::App),
            upstreams: count(NodeKind::Upstream),
            tables: count(NodeKind::Table),
            shared_upstreams: self.fan_out.values().filter(|&&apps| apps >= 2).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_node_first_seen_wins() {
        let mut index = GraphIndex::new();
        let first = index.add_node(Node::new("orders", NodeKind::Upstream).with_label("Orders"));
        let second = index.add_node(Node::new("orders", NodeKind::Table).with_label("orders tbl"));

        assert_eq!(first, second);
        assert_eq!(index.node_count(), 1);

        let node = index.node("orders").unwrap();
        assert_eq!(node.kind, NodeKind::Upstream);
        assert_eq!(node.label, "Orders");
    }

    #[test]
    fn test_add_edge_is_idempotent_across_orientation() {
        let mut index = GraphIndex::new();
        let u = index.add_node(Node::new("u1", NodeKind::Upstream));
        let a = index.add_node(Node::new("a1", NodeKind::App));

        assert!(index.add_edge(u, a, EdgeKind::Feeds));
        assert!(!index.add_edge(u, a, EdgeKind::Feeds));
        assert!(!index.add_edge(a, u, EdgeKind::Feeds));

        assert_eq!(index.edge_count(), 1);
        assert!(index.has_edge("a1", "u1"));

        let edge = index.edges().next().unwrap();
        assert_eq!(edge.source, "u1");
        assert_eq!(edge.target, "a1");
    }

    #[test]
    fn test_add_edge_with_unknown_index() {
        let mut index = GraphIndex::new();
        let u = index.add_node(Node::new("u1", NodeKind::Upstream));

        assert!(!index.add_edge(u, NodeId::new(7), EdgeKind::Feeds));
        assert_eq!(index.edge_count(), 0);
    }

    #[test]
    fn test_fan_out_defaults_to_zero() {
        let index = GraphIndex::new();
        assert_eq!(index.fan_out("missing"), 0);
        assert!(!index.is_shared_upstream("missing"));
    }

    #[test]
    fn test_empty_stats() {
        let index = GraphIndex::new();
        let stats = index.stats();
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.shared_upstreams, 0);
    }
}
