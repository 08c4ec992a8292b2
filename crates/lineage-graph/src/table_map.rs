//! Per-upstream record of which tables each app pulls.
//!
//! Filled by the builder in the same pass that adds the upstream → app
//! edges, so every (upstream, app) entry here has a matching edge.

use indexmap::IndexMap;
use serde::Serialize;

/// `upstream → (app → tables)`, all levels in first-seen order.
///
/// Table lists are multisets: a table seen twice for the same app and
/// upstream is stored twice.
#[derive(Debug, Default, Clone, Serialize)]
#[serde(transparent)]
pub struct UpstreamTableMap {
    inner: IndexMap<String, IndexMap<String, Vec<String>>>,
}

impl UpstreamTableMap {
    pub(crate) fn push(&mut self, upstream: &str, app: &str, table: String) {
        self.inner
            .entry(upstream.to_string())
            .or_default()
            .entry(app.to_string())
            .or_default()
            .push(table);
    }

    /// Tables `app` contributed through `upstream`, in insertion order.
    ///
    /// Empty when either id is unknown.
    pub fn tables(&self, upstream: &str, app: &str) -> &[String] {
        self.inner
            .get(upstream)
            .and_then(|apps| apps.get(app))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Apps connected through `upstream`, in first-seen order.
    pub fn apps(&self, upstream: &str) -> impl Iterator<Item = &str> {
        self.inner
            .get(upstream)
            .into_iter()
            .flat_map(|apps| apps.keys().map(String::as_str))
    }

    /// Number of distinct apps under `upstream`.
    pub fn app_count(&self, upstream: &str) -> usize {
        self.inner.get(upstream).map_or(0, IndexMap::len)
    }

    /// Upstreams that have at least one app.
    pub fn upstreams(&self) -> impl Iterator<Item = &str> {
        self.inner.keys().map(String::as_str)
    }

    /// Flattened `(upstream, app, tables)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &[String])> {
        self.inner.iter().flat_map(|(upstream, apps)| {
            apps.iter()
                .map(move |(app, tables)| (upstream.as_str(), app.as_str(), tables.as_slice()))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_duplicates_in_order() {
        let mut map = UpstreamTableMap::default();
        map.push("u1", "a1", "t2".to_string());
        map.push("u1", "a1", "t1".to_string());
        map.push("u1", "a1", "t2".to_string());

        assert_eq!(map.tables("u1", "a1"), ["t2", "t1", "t2"]);
    }

    #[test]
    fn test_apps_in_first_seen_order() {
        let mut map = UpstreamTableMap::default();
        map.push("u1", "b", "t1".to_string());
        map.push("u1", "a", "t1".to_string());
        map.push("u1", "b", "t2".to_string());

        let apps: Vec<&str> = map.apps("u1").collect();
        assert_eq!(apps, vec!["b", "a"]);
        assert_eq!(map.app_count("u1"), 2);
    }

    #[test]
    fn test_unknown_ids_are_empty() {
        let map = UpstreamTableMap::default();
        assert!(map.tables("nope", "a1").is_empty());
        assert_eq!(map.apps("nope").count(), 0);
        assert_eq!(map.app_count("nope"), 0);
        assert!(map.is_empty());
    }

    #[test]
    fn test_iter_flattens() {
        let mut map = UpstreamTableMap::default();
        map.push("u1", "a1", "t1".to_string());
        map.push("u2", "a1", "t9".to_string());

        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].0, "u2");
        assert_eq!(entries[1].2, ["t9".to_string()]);
    }
}
