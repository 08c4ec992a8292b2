//! CLI command implementations.

use colored::Colorize;
use lineage_graph::{
    BuildOptions, GraphIndex, GraphIndexBuilder, Node, NodeKind, RecordErrorPolicy,
};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use tracing::debug;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Maps command-line flags onto build options.
pub fn build_options(skip_invalid: bool, link_tables: bool) -> BuildOptions {
    BuildOptions {
        on_record_error: if skip_invalid {
            RecordErrorPolicy::Skip
        } else {
            RecordErrorPolicy::Abort
        },
        link_tables,
    }
}

/// Reads a JSON array of row objects.
pub fn load_rows(path: &Path) -> Result<Vec<Map<String, Value>>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let rows: Vec<Map<String, Value>> = serde_json::from_str(&text)
        .map_err(|e| format!("{} is not a JSON array of objects: {}", path.display(), e))?;
    Ok(rows)
}

/// Loads rows and builds the index, reporting skipped rows.
fn load_index(path: &Path, options: BuildOptions) -> Result<GraphIndex> {
    let rows = load_rows(path)?;
    debug!("Loaded {} rows from {}", rows.len(), path.display());
    let report = GraphIndexBuilder::build(rows, options)?;

    if !report.skipped.is_empty() {
        println!("{} {} rows skipped:", "⚠".yellow(), report.skipped.len());
        for skipped in report.skipped.iter().take(5) {
            println!("  row {} - {}", skipped.row.to_string().red(), skipped.error);
        }
        if report.skipped.len() > 5 {
            println!("  ... and {} more", report.skipped.len() - 5);
        }
    }

    Ok(report.index)
}

fn kind_tag(kind: NodeKind) -> colored::ColoredString {
    match kind {
        NodeKind::App => kind.to_string().green(),
        NodeKind::Upstream => kind.to_string().blue(),
        NodeKind::Table => kind.to_string().yellow(),
    }
}

fn print_node(graph: &GraphIndex, node: &Node) {
    let shared = if graph.is_shared_upstream(&node.id) {
        format!(" (shared by {} apps)", graph.fan_out(&node.id))
            .dimmed()
            .to_string()
    } else {
        String::new()
    };
    println!("  {} {}{}", kind_tag(node.kind), node.label.cyan(), shared);
}

/// Build the index and print statistics.
pub fn build(path: &Path, options: BuildOptions, output: Option<&Path>) -> Result<()> {
    let graph = load_index(path, options)?;
    let stats = graph.stats();

    println!(
        "{} Built {} nodes ({} apps, {} upstreams, {} tables) and {} edges",
        "✓".green(),
        stats.node_count.to_string().cyan(),
        stats.apps,
        stats.upstreams,
        stats.tables,
        stats.edge_count.to_string().cyan()
    );
    println!("  {} upstreams shared by multiple apps", stats.shared_upstreams);

    if let Some(out_path) = output {
        fs::write(out_path, graph.export().to_json_pretty()?)?;
        println!("{} Exported to {}", "✓".green(), out_path.display());
    }

    Ok(())
}

/// Show a node and its direct neighbors.
pub fn neighbors(path: &Path, options: BuildOptions, id: &str) -> Result<()> {
    let graph = load_index(path, options)?;
    let query = graph.query();

    let Some(node) = graph.node(id) else {
        println!("No node with id \"{}\"", id);
        return Ok(());
    };

    println!("Selected:");
    print_node(&graph, node);

    let neighbors = query.neighbors(id);
    println!("\n{} direct neighbors:", neighbors.len());
    for neighbor in neighbors {
        print_node(&graph, neighbor);
    }

    Ok(())
}

/// Print tables both apps pull through one upstream.
pub fn common(
    path: &Path,
    options: BuildOptions,
    upstream: &str,
    app_a: &str,
    app_b: &str,
) -> Result<()> {
    let graph = load_index(path, options)?;
    let tables = graph.query().common_tables(upstream, app_a, app_b);

    if tables.is_empty() {
        println!(
            "No common tables for {} and {} through {}",
            app_a, app_b, upstream
        );
        return Ok(());
    }

    println!(
        "{} and {} share {} tables through {}:\n",
        app_a.cyan(),
        app_b.cyan(),
        tables.len(),
        upstream.blue()
    );
    for table in tables {
        println!("  {}", table);
    }

    Ok(())
}

/// Search node labels.
pub fn search(path: &Path, options: BuildOptions, query: &str, limit: usize) -> Result<()> {
    let graph = load_index(path, options)?;
    let matches = graph.query().filter_by_query(query);

    if matches.is_empty() {
        println!("No matches found for \"{}\"", query);
        return Ok(());
    }

    println!("Found {} matches:\n", matches.len());
    for node in matches.into_iter().take(limit) {
        print_node(&graph, node);
    }

    Ok(())
}

/// List shared upstreams and shared tables.
pub fn shared(path: &Path, options: BuildOptions) -> Result<()> {
    let graph = load_index(path, options)?;
    let query = graph.query();

    let upstreams = query.shared_upstreams();
    println!("{} shared upstreams:", upstreams.len());
    for upstream in upstreams {
        println!(
            "  {} {}",
            upstream.label.blue(),
            query.apps_for_upstream(&upstream.id).join(", ").dimmed()
        );
    }

    let tables = query.shared_tables();
    println!("\n{} tables used by multiple apps:", tables.len());
    for entry in tables {
        println!("  {} {}", entry.table.yellow(), entry.apps.join(", ").dimmed());
    }

    Ok(())
}
