//! Search index for case-insensitive label filtering.
//!
//! Backs the search box of the lineage view. Labels are broken into
//! overlapping n-grams so a substring query only has to verify the nodes
//! that share all of its n-grams, instead of scanning every label.

use crate::graph::NodeId;
use std::collections::{HashMap, HashSet};

/// Minimum n-gram length for indexing.
const MIN_NGRAM_LEN: usize = 2;

/// Maximum n-gram length for indexing.
const MAX_NGRAM_LEN: usize = 4;

/// An n-gram index over node labels.
#[derive(Debug, Default, Clone)]
pub struct SearchIndex {
    /// Lowercased label per node, used to confirm candidates.
    labels: HashMap<NodeId, String>,
    /// Maps lowercased n-grams to the nodes whose label contains them.
    ngram_index: HashMap<String, HashSet<NodeId>>,
}

impl SearchIndex {
    /// Creates a new empty search index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Indexes a node's label.
    pub fn insert(&mut self, label: &str, id: NodeId) {
        let lower = label.to_lowercase();

        for ngram in generate_ngrams(&lower) {
            self.ngram_index.entry(ngram).or_default().insert(id);
        }

        self.labels.insert(id, lower);
    }

    /// Finds nodes whose label contains `query`, ignoring case.
    ///
    /// Returns matching ids sorted, which is node insertion order. An
    /// empty query matches nothing here; callers decide what "no filter"
    /// means.
    pub fn search(&self, query: &str) -> Vec<NodeId> {
        let query_lower = query.to_lowercase();
        if query_lower.is_empty() {
            return Vec::new();
        }

        // Too short to have n-grams: verify every label.
        if query_lower.chars().count() < MIN_NGRAM_LEN {
            let mut results: Vec<NodeId> = self
                .labels
                .iter()
                .filter(|(_, label)| label.contains(&query_lower))
                .map(|(id, _)| *id)
                .collect();
            results.sort();
            return results;
        }

        // Queries longer than MAX_NGRAM_LEN are covered by their windows.
        let mut candidates: Option<HashSet<NodeId>> = None;

        for ngram in generate_ngrams(&query_lower) {
            let Some(ids) = self.ngram_index.get(&ngram) else {
                return Vec::new();
            };
            match &mut candidates {
                None => candidates = Some(ids.clone()),
                Some(c) => c.retain(|id| ids.contains(id)),
            }
        }

        // n-gram intersection can have false positives
        let mut results: Vec<NodeId> = candidates
            .unwrap_or_default()
            .into_iter()
            .filter(|id| {
                self.labels
                    .get(id)
                    .is_some_and(|label| label.contains(&query_lower))
            })
            .collect();

        results.sort();
        results
    }
}

/// Generates n-grams for a lowercased string.
fn generate_ngrams(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut ngrams = Vec::new();

    for n in MIN_NGRAM_LEN..=MAX_NGRAM_LEN {
        if chars.len() >= n {
            for i in 0..=(chars.len() - n) {
                ngrams.push(chars[i..i + n].iter().collect());
            }
        }
    }

    ngrams
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::graph::NodeIndex;

    fn node_id(n: u32) -> NodeId {
        NodeIndex::new(n as usize)
    }

    #[test]
    fn test_search_exact_label() {
        let mut index = SearchIndex::new();
        index.insert("orders_db", node_id(0));
        index.insert("orders_archive", node_id(1));
        index.insert("billing", node_id(2));

        assert_eq!(index.search("orders_db"), vec![node_id(0)]);
    }

    #[test]
    fn test_search_substring() {
        let mut index = SearchIndex::new();
        index.insert("orders_db", node_id(0));
        index.insert("orders_archive", node_id(1));
        index.insert("billing", node_id(2));

        assert_eq!(index.search("orders"), vec![node_id(0), node_id(1)]);
    }

    #[test]
    fn test_search_case_insensitive() {
        let mut index = SearchIndex::new();
        index.insert("BillingService", node_id(0));

        assert_eq!(index.search("billingservice"), vec![node_id(0)]);
        assert_eq!(index.search("SERVICE"), vec![node_id(0)]);
    }

    #[test]
    fn test_single_char_is_substring_not_prefix() {
        let mut index = SearchIndex::new();
        index.insert("ab", node_id(0));
        index.insert("cab", node_id(1));
        index.insert("xyz", node_id(2));

        assert_eq!(index.search("b"), vec![node_id(0), node_id(1)]);
    }

    #[test]
    fn test_long_query_verified_against_label() {
        let mut index = SearchIndex::new();
        // shares every 2-4 gram of "abcab" but not the substring
        index.insert("abca_bcab", node_id(0));
        index.insert("xabcabx", node_id(1));

        assert_eq!(index.search("abcab"), vec![node_id(1)]);
    }

    #[test]
    fn test_search_no_match() {
        let mut index = SearchIndex::new();
        index.insert("hello", node_id(0));

        assert!(index.search("world").is_empty());
        assert!(index.search("").is_empty());
    }
}
