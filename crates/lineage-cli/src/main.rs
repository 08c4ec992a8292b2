//! Lineage CLI - Command-line interface for the lineage graph
//!
//! Reads already-decoded lineage rows (a JSON array of objects), builds
//! the index, and prints query results.

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "lineage")]
#[command(author = "Lineage Contributors")]
#[command(version)]
#[command(about = "App / upstream / table lineage queries", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Drop malformed rows instead of failing the whole batch
    #[arg(long, global = true)]
    skip_invalid: bool,

    /// Also connect upstreams to their tables
    #[arg(long, global = true)]
    link_tables: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index and print statistics
    Build {
        /// JSON file holding an array of row objects
        rows: PathBuf,

        /// Write the graph export to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show a node and its direct neighbors
    Neighbors {
        /// JSON file holding an array of row objects
        rows: PathBuf,

        /// Node id
        id: String,
    },

    /// Tables two apps both pull through one upstream
    Common {
        /// JSON file holding an array of row objects
        rows: PathBuf,

        upstream: String,
        app_a: String,
        app_b: String,
    },

    /// Search node labels
    Search {
        /// JSON file holding an array of row objects
        rows: PathBuf,

        /// Case-insensitive substring
        query: String,

        /// Maximum results to return
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// List upstreams and tables used by more than one app
    Shared {
        /// JSON file holding an array of row objects
        rows: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let options = commands::build_options(cli.skip_invalid, cli.link_tables);

    let result = match cli.command {
        Commands::Build { rows, output } => commands::build(&rows, options, output.as_deref()),
        Commands::Neighbors { rows, id } => commands::neighbors(&rows, options, &id),
        Commands::Common {
            rows,
            upstream,
            app_a,
            app_b,
        } => commands::common(&rows, options, &upstream, &app_a, &app_b),
        Commands::Search { rows, query, limit } => commands::search(&rows, options, &query, limit),
        Commands::Shared { rows } => commands::shared(&rows, options),
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
