//! CLI command implementations.

use super::ExportArgs;
use crate::config::{ExportSettings, FileConfig};
use crate::loader::{self, SourceFiles};
use crate::resolver::FsAssetResolver;
use pixnet_core::export::{file_digest, nodes_path_for, write_edges, write_nodes};
use pixnet_core::{PixnetError, build_network};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// How results are reported on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputMode {
    /// Print a JSON document instead of text.
    pub json: bool,
    /// Print nothing on success.
    pub quiet: bool,
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Validate an output path: its parent must be an existing directory.
///
/// Returns the path with a canonical parent.
fn validate_output_path(path: &Path) -> Result<PathBuf, PixnetError> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));

    let canonical_parent = parent.canonicalize().map_err(|e| {
        PixnetError::Io(format!(
            "Invalid output directory '{}': {}",
            parent.display(),
            e
        ))
    })?;

    if !canonical_parent.is_dir() {
        return Err(PixnetError::Io(format!(
            "Output directory '{}' is not a valid directory",
            parent.display()
        )));
    }

    let filename = path
        .file_name()
        .ok_or_else(|| PixnetError::Io("Output path has no filename".to_string()))?;

    Ok(canonical_parent.join(filename))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_json<T: Serialize>(value: &T) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

// =============================================================================
// EXPORT COMMAND
// =============================================================================

/// Outcome of an export run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportReport {
    /// No images, or no edges: nothing was written.
    NothingToExport {
        /// Why.
        reason: String,
    },
    /// The edges file was written; the nodes file too unless `nodes_file` is absent.
    Written {
        /// Plot id from the manifest.
        plot_id: Option<String>,
        /// Images that took part.
        images: usize,
        /// Edge rows written.
        edges: usize,
        /// Node rows in the network.
        nodes: usize,
        /// Edges CSV path.
        edges_file: PathBuf,
        /// BLAKE3 digest of the edges file.
        edges_digest: String,
        /// Nodes CSV path, absent when writing it failed.
        nodes_file: Option<PathBuf>,
        /// BLAKE3 digest of the nodes file.
        nodes_digest: Option<String>,
    },
}

/// Load a plot, build its network and write both CSV files.
///
/// A failed edges write fails the run. A failed nodes write is logged and
/// reported through `nodes_file: None`.
pub fn run_export(data_dir: &Path, settings: &ExportSettings) -> Result<ExportReport, PixnetError> {
    tracing::info!(
        "Extracting network data for {} nearest neighbors using {} layout",
        settings.options.neighbors,
        settings.layout
    );

    let edges_path = validate_output_path(&settings.output)?;
    let plot = loader::load_plot(data_dir, &settings.layout, settings.options.include_metadata)?;

    if plot.dataset.is_empty() {
        return Ok(ExportReport::NothingToExport {
            reason: "no images in the image list".to_string(),
        });
    }

    let resolver = FsAssetResolver::new(loader::DataRoot::new(data_dir));
    let network = build_network(&plot.dataset, &settings.options, &resolver)?;
    if network.is_empty() {
        return Ok(ExportReport::NothingToExport {
            reason: "no network data was generated".to_string(),
        });
    }

    let mut edges_csv = Vec::new();
    let edges = write_edges(&mut edges_csv, &network.edges)?;
    std::fs::write(&edges_path, &edges_csv).map_err(|e| {
        PixnetError::Io(format!("Error writing {}: {}", edges_path.display(), e))
    })?;
    tracing::info!("Wrote {} relationships to {}", edges, edges_path.display());

    let nodes_path = nodes_path_for(&edges_path);
    let nodes_written = write_nodes_file(&nodes_path, &network.nodes);
    if let Err(e) = &nodes_written {
        tracing::error!("Error writing nodes CSV {}: {}", nodes_path.display(), e);
    }
    let nodes_digest = nodes_written.ok();

    Ok(ExportReport::Written {
        plot_id: plot.manifest.plot_id,
        images: plot.dataset.len(),
        edges,
        nodes: network.node_count(),
        edges_file: edges_path,
        edges_digest: file_digest(&edges_csv),
        nodes_file: nodes_digest.as_ref().map(|_| nodes_path),
        nodes_digest,
    })
}

fn write_nodes_file(path: &Path, nodes: &pixnet_core::NodeTable) -> Result<String, PixnetError> {
    let mut nodes_csv = Vec::new();
    let count = write_nodes(&mut nodes_csv, nodes)?;
    std::fs::write(path, &nodes_csv)?;
    tracing::info!("Wrote {} nodes to {}", count, path.display());
    Ok(file_digest(&nodes_csv))
}

/// Export the network of a plot.
pub fn cmd_export(
    args: &ExportArgs,
    config: Option<&Path>,
    output: OutputMode,
) -> Result<(), PixnetError> {
    let file = match config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = ExportSettings::resolve(args.section().or(file.export))?;

    let report = run_export(&args.data_dir, &settings)?;

    if output.json {
        print_json(&report);
        return Ok(());
    }
    if output.quiet {
        return Ok(());
    }

    match &report {
        ExportReport::NothingToExport { reason } => {
            println!("Nothing to export: {}", reason);
        }
        ExportReport::Written {
            plot_id,
            images,
            edges,
            nodes,
            edges_file,
            edges_digest,
            nodes_file,
            nodes_digest,
        } => {
            println!("pixnet Export");
            println!("=============");
            println!("Plot ID:  {}", plot_id.as_deref().unwrap_or("<none>"));
            println!("Images:   {}", images);
            println!("Edges:    {} -> {:?}", edges, edges_file);
            println!("Checksum: {}", edges_digest);
            if let (Some(nodes_file), Some(nodes_digest)) = (nodes_file, nodes_digest) {
                println!("Nodes:    {} -> {:?}", nodes, nodes_file);
                println!("Checksum: {}", nodes_digest);
                println!();
                println!("You can now import these files into Gephi for network analysis.");
                println!("  1. Import {} as nodes table", display_name(nodes_file));
                println!("  2. Import {} as edges table", display_name(edges_file));
                println!("  3. Use the 'weight' column for edge weight");
            } else {
                println!("Nodes:    not written (see log)");
            }
        }
    }

    Ok(())
}

// =============================================================================
// INSPECT COMMAND
// =============================================================================

/// What a data directory resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    /// Plot id from the manifest.
    pub plot_id: Option<String>,
    /// Manifest `gzipped` flag.
    pub gzipped: bool,
    /// Resolved files.
    pub sources: SourceFiles,
    /// Images kept after alignment.
    pub images: usize,
    /// Coordinate dimensions of the first point.
    pub dimensions: usize,
    /// Image list entries dropped by truncation.
    pub dropped_images: usize,
    /// Layout positions dropped by truncation.
    pub dropped_positions: usize,
}

/// Resolve and load a plot without computing neighbors.
pub fn run_inspect(data_dir: &Path, layout: &str) -> Result<InspectReport, PixnetError> {
    let plot = loader::load_plot(data_dir, layout, false)?;
    let (dropped_images, dropped_positions) = plot
        .dataset
        .truncation()
        .map(|t| (t.images - t.kept(), t.positions - t.kept()))
        .unwrap_or((0, 0));

    Ok(InspectReport {
        plot_id: plot.manifest.plot_id,
        gzipped: plot.manifest.gzipped,
        sources: plot.sources,
        images: plot.dataset.len(),
        dimensions: plot.dataset.points().first().map_or(0, |p| p.dims()),
        dropped_images,
        dropped_positions,
    })
}

/// Print what a data directory resolves to.
pub fn cmd_inspect(data_dir: &Path, layout: &str, output: OutputMode) -> Result<(), PixnetError> {
    let report = run_inspect(data_dir, layout)?;

    if output.json {
        print_json(&report);
        return Ok(());
    }
    if output.quiet {
        return Ok(());
    }

    println!("pixnet Inspect");
    println!("==============");
    println!("Plot ID:    {}", report.plot_id.as_deref().unwrap_or("<none>"));
    println!("Gzipped:    {}", report.gzipped);
    println!("Manifest:   {:?}", report.sources.manifest);
    println!("Image list: {:?}", report.sources.imagelist);
    match &report.sources.layout {
        Some(path) => println!("Layout:     {:?}", path),
        None => println!("Layout:     <not resolved>"),
    }
    println!();
    println!("Images:     {}", report.images);
    println!("Dimensions: {}", report.dimensions);
    if report.dropped_images > 0 || report.dropped_positions > 0 {
        println!(
            "Truncated:  {} images, {} positions dropped",
            report.dropped_images, report.dropped_positions
        );
    }

    Ok(())
}
