//! # pixnet
//!
//! Export a PixPlot layout as a nearest-neighbor network for Gephi.
//!
//! ## Usage
//!
//! ```bash
//! # Default: 10 neighbors on the UMAP layout
//! pixnet export --data-dir output/
//!
//! # Richer nodes table, written next to network.csv as network_nodes.csv
//! pixnet export --data-dir output/ -k 15 -o network.csv --include-thumbs --include-metadata
//!
//! # Check what a data directory resolves to
//! pixnet inspect --data-dir output/ --layout tsne
//! ```

use clap::Parser;
use pixnet::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // PIXNET_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("PIXNET_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose {
        "pixnet=debug,pixnet_core=debug"
    } else {
        "pixnet=info,pixnet_core=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
