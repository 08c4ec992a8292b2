//! Graph builder for constructing the lineage index from records.
//!
//! The builder walks the input once, in order. Each triple contributes
//! its three nodes, one upstream → app edge, and one entry in the
//! upstream table map. Fan-out counts are derived when the builder
//! finishes, so the returned index never has to rescan its rows.

use crate::edge::EdgeKind;
use crate::graph::GraphIndex;
use lineage_core::{normalize, Node, NodeKind, Record, RecordError, Triple};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// What to do with a row that fails normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordErrorPolicy {
    /// Reject the whole batch on the first bad row.
    #[default]
    Abort,

    /// Drop bad rows and report them alongside the index.
    Skip,
}

/// Options for a single build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildOptions {
    /// Handling of rows that fail normalization.
    pub on_record_error: RecordErrorPolicy,

    /// Also connect each upstream to the tables it holds.
    pub link_tables: bool,
}

impl BuildOptions {
    /// Options that drop bad rows instead of aborting.
    pub fn skip_invalid() -> Self {
        Self {
            on_record_error: RecordErrorPolicy::Skip,
            ..Self::default()
        }
    }
}

/// A batch build aborted on a malformed row.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("row {row}: {source}")]
pub struct BuildError {
    /// Zero-based position of the row in the input.
    pub row: usize,
    #[source]
    pub source: RecordError,
}

/// A row dropped under [`RecordErrorPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// Zero-based position of the row in the input.
    pub row: usize,
    pub error: RecordError,
}

/// The outcome of a successful batch build.
#[derive(Debug)]
pub struct BuildReport {
    pub index: GraphIndex,
    /// Rows omitted under the skip policy, in input order.
    pub skipped: Vec<SkippedRow>,
}

/// Builds a [`GraphIndex`] from lineage triples.
///
/// Triples can be fed one at a time with [`insert`](Self::insert) and the
/// index taken with [`finish`](Self::finish). The builder is the only
/// writer; the finished index is never mutated again.
pub struct GraphIndexBuilder {
    index: GraphIndex,
    options: BuildOptions,
    inserted: usize,
}

impl Default for GraphIndexBuilder {
    fn default() -> Self {
        Self::new(BuildOptions::default())
    }
}

impl GraphIndexBuilder {
    /// Creates a new builder.
    pub fn new(options: BuildOptions) -> Self {
        Self {
            index: GraphIndex::new(),
            options,
            inserted: 0,
        }
    }

    /// Adds one triple to the graph.
    pub fn insert(&mut self, triple: Triple) {
        let Triple {
            app,
            upstream,
            table,
        } = triple;

        let app_idx = self.index.add_node(Node::new(app.as_str(), NodeKind::App));
        let upstream_idx = self
            .index
            .add_node(Node::new(upstream.as_str(), NodeKind::Upstream));
        let table_idx = self
            .index
            .add_node(Node::new(table.as_str(), NodeKind::Table));

        self.inserted += 1;

        if app_idx == upstream_idx {
            debug!("skipping self edge on {}", app);
            return;
        }

        self.index.add_edge(upstream_idx, app_idx, EdgeKind::Feeds);

        if self.options.link_tables && upstream_idx != table_idx {
            self.index
                .add_edge(upstream_idx, table_idx, EdgeKind::Contains);
        }

        self.index.table_map.push(&upstream, &app, table);
    }

    /// Finishes building and returns the index.
    pub fn finish(mut self) -> GraphIndex {
        self.index.compute_fan_out();

        info!(
            "Built lineage index from {} records: {} nodes, {} edges",
            self.inserted,
            self.index.node_count(),
            self.index.edge_count()
        );

        self.index
    }

    /// Builds an index from already-normalized triples.
    pub fn from_triples<I>(triples: I, options: BuildOptions) -> GraphIndex
    where
        I: IntoIterator<Item = Triple>,
    {
        let mut builder = Self::new(options);
        for triple in triples {
            builder.insert(triple);
        }
        builder.finish()
    }

    /// Normalizes raw rows and builds an index from them.
    ///
    /// Under [`RecordErrorPolicy::Abort`] the first bad row fails the
    /// whole batch and no index is produced. Under
    /// [`RecordErrorPolicy::Skip`] bad rows are left out and listed in the
    /// report.
    pub fn build<I, R>(rows: I, options: BuildOptions) -> Result<BuildReport, BuildError>
    where
        I: IntoIterator<Item = R>,
        R: Record,
    {
        let policy = options.on_record_error;
        let mut builder = Self::new(options);
        let mut skipped = Vec::new();

        for (row, record) in rows.into_iter().enumerate() {
            match normalize(&record) {
                Ok(triple) => builder.insert(triple),
                Err(source) => match policy {
                    RecordErrorPolicy::Abort => return Err(BuildError { row, source }),
                    RecordErrorPolicy::Skip => {
                        warn!("Skipping row {}: {}", row, source);
                        skipped.push(SkippedRow { row, error: source });
                    }
                },
            }
        }

        Ok(BuildReport {
            index: builder.finish(),
            skipped,
        })
    }
}
