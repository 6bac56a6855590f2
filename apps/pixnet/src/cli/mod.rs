//! # pixnet CLI Module
//!
//! ## Available Commands
//!
//! - `export` - Write the edges and nodes CSV files of a plot
//! - `inspect` - Resolve and load a plot without computing neighbors

mod commands;

use crate::config::ExportSection;
use clap::{Args, Parser, Subcommand};
use pixnet_core::PixnetError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// pixnet - PixPlot network exporter
///
/// Turns a PixPlot layout into a k-nearest-neighbor network
/// that Gephi can import.
#[derive(Parser, Debug)]
#[command(name = "pixnet")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress the summary and import hints
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Export the nearest-neighbor network as edges and nodes CSV files
    Export(ExportArgs),

    /// Show what a data directory resolves to
    Inspect {
        /// PixPlot output directory
        #[arg(long, visible_alias = "data_dir")]
        data_dir: PathBuf,

        /// Layout to resolve
        #[arg(short, long, default_value = pixnet_core::primitives::DEFAULT_LAYOUT)]
        layout: String,
    },
}

/// Flags of the `export` command.
///
/// Everything but the data directory is optional here so that unset flags
/// fall through to the configuration file.
#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    /// PixPlot output directory
    #[arg(long, visible_alias = "data_dir")]
    pub data_dir: PathBuf,

    /// Nearest neighbors per image [default: 10]
    #[arg(
        short = 'k',
        long,
        visible_alias = "n_neighbors",
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub neighbors: Option<u32>,

    /// Edges CSV path [default: pixplot_network.csv]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Layout to use [default: umap]
    #[arg(short, long)]
    pub layout: Option<String>,

    /// Include thumbnail and original image paths
    #[arg(long, visible_alias = "include_thumbs")]
    pub include_thumbs: bool,

    /// Include per-image metadata
    #[arg(long, visible_alias = "include_metadata")]
    pub include_metadata: bool,
}

impl ExportArgs {
    /// The settings these flags set explicitly.
    #[must_use]
    pub fn section(&self) -> ExportSection {
        ExportSection {
            neighbors: self.neighbors.map(|n| n as usize),
            layout: self.layout.clone(),
            output: self.output.clone(),
            include_thumbs: self.include_thumbs.then_some(true),
            include_metadata: self.include_metadata.then_some(true),
        }
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), PixnetError> {
    let output = OutputMode {
        json: cli.json_mode,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Export(args) => cmd_export(&args, cli.config.as_deref(), output),
        Commands::Inspect { data_dir, layout } => cmd_inspect(&data_dir, &layout, output),
    }
}
