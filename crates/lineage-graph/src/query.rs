//! Relationship queries over a built index.
//!
//! Everything here is read-only and answers interactive filtering: what
//! is next to a selected node, which tables two apps pull through the
//! same upstream, which labels match a search box. Unknown ids are an
//! ordinary outcome of that kind of filtering, so they yield empty
//! results instead of errors.
//!
//! Node-set results come back deduplicated and in node insertion order.

use crate::graph::{GraphIndex, NodeId};
use indexmap::IndexMap;
use lineage_core::Node;
use serde::Serialize;
use std::collections::HashSet;

/// A node selection plus its one-hop neighborhood.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FocusView<'g> {
    /// Selected nodes that exist in the index.
    pub selected: Vec<&'g Node>,
    /// Direct neighbors of the selection that are not selected themselves.
    pub connected: Vec<&'g Node>,
}

impl<'g> FocusView<'g> {
    /// Returns true if `id` is selected or connected.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes().any(|node| node.id == id)
    }

    /// All nodes in the view, selected first.
    pub fn nodes(&self) -> impl Iterator<Item = &'g Node> + '_ {
        self.selected.iter().chain(self.connected.iter()).copied()
    }

    pub fn len(&self) -> usize {
        self.selected.len() + self.connected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty() && self.connected.is_empty()
    }
}

/// A table referenced by more than one app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedTable {
    pub table: String,
    /// Apps using the table, in first-seen order.
    pub apps: Vec<String>,
}

/// Read-only queries over a [`GraphIndex`].
#[derive(Debug, Clone, Copy)]
pub struct RelationshipQuery<'g> {
    index: &'g GraphIndex,
}

impl<'g> RelationshipQuery<'g> {
    pub fn new(index: &'g GraphIndex) -> Self {
        Self { index }
    }

    /// Nodes joined to `id` by any edge.
    pub fn neighbors(&self, id: &str) -> Vec<&'g Node> {
        let Some(index) = self.index.get_index(id) else {
            return Vec::new();
        };
        self.resolve(self.neighbor_indexes(index))
    }

    /// The node itself plus its direct neighbors.
    ///
    /// One hop only: selecting an app reveals its upstreams, not the
    /// tables behind them.
    pub fn expand_selection(&self, id: &str) -> Vec<&'g Node> {
        let Some(index) = self.index.get_index(id) else {
            return Vec::new();
        };
        let mut indexes = self.neighbor_indexes(index);
        indexes.push(index);
        self.resolve(indexes)
    }

    /// Focus view for several selected nodes at once.
    ///
    /// Unknown ids are ignored.
    pub fn focus<I, S>(&self, ids: I) -> FocusView<'g>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let selected: HashSet<NodeId> = ids
            .into_iter()
            .filter_map(|id| self.index.get_index(id.as_ref()))
            .collect();

        let connected: Vec<NodeId> = selected
            .iter()
            .flat_map(|&index| self.neighbor_indexes(index))
            .filter(|index| !selected.contains(index))
            .collect();

        FocusView {
            selected: self.resolve(selected.into_iter().collect()),
            connected: self.resolve(connected),
        }
    }

    /// Tables that both apps pull through `upstream`.
    ///
    /// Presence is what counts: a table listed twice for either app
    /// appears once. Results follow `app_a`'s order.
    pub fn common_tables(&self, upstream: &str, app_a: &str, app_b: &str) -> Vec<&'g str> {
        let map = self.index.table_map();
        let other: HashSet<&str> = map
            .tables(upstream, app_b)
            .iter()
            .map(String::as_str)
            .collect();

        let mut seen = HashSet::new();
        map.tables(upstream, app_a)
            .iter()
            .map(String::as_str)
            .filter(|table| other.contains(table) && seen.insert(*table))
            .collect()
    }

    /// Nodes whose label contains `text`, ignoring case.
    ///
    /// A blank query matches every node. Otherwise the text is matched
    /// as given, surrounding whitespace included.
    pub fn filter_by_query(&self, text: &str) -> Vec<&'g Node> {
        if text.trim().is_empty() {
            return self.index.nodes().collect();
        }
        self.resolve(self.index.search.search(text))
    }

    /// True when at least two distinct apps depend on `upstream`.
    pub fn is_shared_upstream(&self, upstream: &str) -> bool {
        self.index.is_shared_upstream(upstream)
    }

    /// Number of distinct apps depending on `upstream`.
    pub fn fan_out(&self, upstream: &str) -> usize {
        self.index.fan_out(upstream)
    }

    /// Upstream nodes used by more than one app.
    pub fn shared_upstreams(&self) -> Vec<&'g Node> {
        self.index
            .nodes()
            .filter(|node| self.is_shared_upstream(&node.id))
            .collect()
    }

    /// Apps depending on `upstream`, in first-seen order.
    pub fn apps_for_upstream(&self, upstream: &str) -> Vec<&'g str> {
        self.index.table_map().apps(upstream).collect()
    }

    /// Tables `app` pulls through `upstream`, duplicates included.
    pub fn tables_for(&self, upstream: &str, app: &str) -> &'g [String] {
        self.index.table_map().tables(upstream, app)
    }

    /// Tables referenced by two or more distinct apps, across every
    /// upstream.
    pub fn shared_tables(&self) -> Vec<SharedTable> {
        let mut usage: IndexMap<&str, Vec<&str>> = IndexMap::new();

        for (_, app, tables) in self.index.table_map().iter() {
            for table in tables {
                let apps = usage.entry(table.as_str()).or_default();
                if !apps.contains(&app) {
                    apps.push(app);
                }
            }
        }

        usage
            .into_iter()
            .filter(|(_, apps)| apps.len() > 1)
            .map(|(table, apps)| SharedTable {
                table: table.to_string(),
                apps: apps.into_iter().map(str::to_string).collect(),
            })
            .collect()
    }

    fn neighbor_indexes(&self, index: NodeId) -> Vec<NodeId> {
        self.index
            .graph
            .neighbors(index)
            .filter(|&neighbor| neighbor != index)
            .collect()
    }

    /// Sorts, dedups, and looks up node indexes.
    fn resolve(&self, mut indexes: Vec<NodeId>) -> Vec<&'g Node> {
        indexes.sort();
        indexes.dedup();
        indexes
            .into_iter()
            .filter_map(|index| self.index.get(index))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{BuildOptions, GraphIndexBuilder};
    use lineage_core::Triple;

    fn build(triples: &[(&str, &str, &str)]) -> GraphIndex {
        GraphIndexBuilder::from_triples(
            triples
                .iter()
                .map(|(app, upstream, table)| Triple::new(*app, *upstream, *table)),
            BuildOptions::default(),
        )
    }

    fn ids<'a>(nodes: &[&'a Node]) -> Vec<&'a str> {
        nodes.iter().map(|node| node.id.as_str()).collect()
    }

    fn fixture() -> GraphIndex {
        build(&[
            ("A1", "U1", "t1"),
            ("A1", "U1", "t2"),
            ("A1", "U1", "t3"),
            ("A2", "U1", "t2"),
            ("A2", "U1", "t3"),
            ("A2", "U1", "t4"),
            ("A3", "U2", "t5"),
        ])
    }

    #[test]
    fn test_neighbors_of_upstream() {
        let graph = fixture();
        let query = graph.query();
        assert_eq!(ids(&query.neighbors("U1")), vec!["A1", "A2"]);
    }

    #[test]
    fn test_neighbors_unknown_or_isolated() {
        let graph = fixture();
        let query = graph.query();
        assert!(query.neighbors("nonexistent").is_empty());
        // tables have no edges unless link_tables is set
        assert!(query.neighbors("t1").is_empty());
    }

    #[test]
    fn test_expand_selection_is_one_hop() {
        let graph = build(&[("A1", "U1", "T1")]);
        let query = graph.query();

        assert_eq!(ids(&query.expand_selection("A1")), vec!["A1", "U1"]);
        assert!(query.expand_selection("missing").is_empty());
    }

    #[test]
    fn test_expand_selection_does_not_follow_two_hops() {
        let options = BuildOptions {
            link_tables: true,
            ..BuildOptions::default()
        };
        let graph = GraphIndexBuilder::from_triples(vec![Triple::new("A1", "U1", "T1")], options);
        let query = graph.query();

        assert_eq!(ids(&query.expand_selection("A1")), vec!["A1", "U1"]);
        assert_eq!(ids(&query.expand_selection("U1")), vec!["A1", "U1", "T1"]);
    }

    #[test]
    fn test_focus_splits_selected_and_connected() {
        let graph = fixture();
        let view = graph.query().focus(["A1", "U2", "missing"]);

        assert_eq!(ids(&view.selected), vec!["A1", "U2"]);
        assert_eq!(ids(&view.connected), vec!["U1", "A3"]);
        assert!(view.contains("A3"));
        assert!(!view.contains("A2"));
        assert_eq!(view.len(), 4);
    }

    #[test]
    fn test_focus_excludes_selected_from_connected() {
        let graph = fixture();
        let view = graph.query().focus(vec!["A1".to_string(), "U1".to_string()]);

        assert_eq!(ids(&view.selected), vec!["A1", "U1"]);
        assert_eq!(ids(&view.connected), vec!["A2"]);
    }

    #[test]
    fn test_common_tables_in_first_app_order() {
        let graph = fixture();
        let query = graph.query();

        assert_eq!(query.common_tables("U1", "A1", "A2"), vec!["t2", "t3"]);
        assert_eq!(query.common_tables("U1", "A2", "A1"), vec!["t2", "t3"]);
    }

    #[test]
    fn test_common_tables_set_semantics() {
        let graph = build(&[
            ("A1", "U1", "t3"),
            ("A1", "U1", "t2"),
            ("A1", "U1", "t3"),
            ("A2", "U1", "t3"),
            ("A2", "U1", "t2"),
            ("A2", "U1", "t2"),
        ]);
        let query = graph.query();

        assert_eq!(query.common_tables("U1", "A1", "A2"), vec!["t3", "t2"]);
    }

    #[test]
    fn test_common_tables_unknown_ids() {
        let graph = fixture();
        let query = graph.query();

        assert!(query.common_tables("nonexistent", "a", "b").is_empty());
        assert!(query.common_tables("U1", "A1", "A3").is_empty());
        assert!(query.common_tables("U2", "A1", "A2").is_empty());
    }

    #[test]
    fn test_filter_by_query_substring() {
        let graph = build(&[
            ("BillingApp", "OrdersDB", "orders"),
            ("ShippingApp", "OrdersDB", "shipments"),
        ]);
        let query = graph.query();

        assert_eq!(
            ids(&query.filter_by_query("ORDERS")),
            vec!["OrdersDB", "orders"]
        );
        assert_eq!(
            ids(&query.filter_by_query("app")),
            vec!["BillingApp", "ShippingApp"]
        );
        assert_eq!(ids(&query.filter_by_query("orders")).len(), 2);
        assert!(query.filter_by_query("inventory").is_empty());
    }

    #[test]
    fn test_filter_by_blank_query_returns_everything() {
        let graph = fixture();
        let query = graph.query();

        assert_eq!(query.filter_by_query("").len(), graph.node_count());
        assert_eq!(query.filter_by_query("   ").len(), graph.node_count());
    }

    #[test]
    fn test_filter_by_query_keeps_surrounding_whitespace() {
        let graph = build(&[("BillingApp", "big orders", "ordersx")]);
        let query = graph.query();

        assert_eq!(ids(&query.filter_by_query(" orders")), vec!["big orders"]);
        assert_eq!(
            ids(&query.filter_by_query("orders")),
            vec!["big orders", "ordersx"]
        );
        assert!(query.filter_by_query("ordersx ").is_empty());
        assert_eq!(query.filter_by_query(" \t").len(), graph.node_count());
    }

    #[test]
    fn test_shared_upstreams() {
        let graph = fixture();
        let query = graph.query();

        assert!(query.is_shared_upstream("U1"));
        assert!(!query.is_shared_upstream("U2"));
        assert_eq!(query.fan_out("U1"), 2);
        assert_eq!(ids(&query.shared_upstreams()), vec!["U1"]);
    }

    #[test]
    fn test_apps_and_tables_for_upstream() {
        let graph = fixture();
        let query = graph.query();

        assert_eq!(query.apps_for_upstream("U1"), vec!["A1", "A2"]);
        assert_eq!(query.tables_for("U1", "A2"), ["t2", "t3", "t4"]);
        assert!(query.apps_for_upstream("A1").is_empty());
    }

    #[test]
    fn test_shared_tables_across_upstreams() {
        let graph = build(&[
            ("A1", "U1", "orders"),
            ("A2", "U2", "orders"),
            ("A1", "U2", "orders"),
            ("A3", "U1", "customers"),
        ]);
        let shared = graph.query().shared_tables();

        assert_eq!(
            shared,
            vec![SharedTable {
                table: "orders".to_string(),
                apps: vec!["A1".to_string(), "A2".to_string()],
            }]
        );
    }
}
