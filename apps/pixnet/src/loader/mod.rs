//! # Data Loader
//!
//! Resolves a plot's artifacts inside a data directory and produces the
//! in-memory [`Dataset`] the core works on.
//!
//! ## Resolution Order
//!
//! Every artifact is looked up in `<root>/...` first and `<root>/data/...`
//! second. See [`layout::resolve_layout_path`] and
//! [`layout::resolve_imagelist_path`] for the per-artifact fallbacks.

pub mod json;
pub mod layout;
pub mod manifest;
pub mod metadata;
pub mod paths;

pub use manifest::Manifest;
pub use paths::DataRoot;

use pixnet_core::{Dataset, PixnetError};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Files a dataset was loaded from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceFiles {
    /// The manifest.
    pub manifest: PathBuf,
    /// The image list.
    pub imagelist: PathBuf,
    /// The layout; absent when the image list was empty.
    pub layout: Option<PathBuf>,
}

/// Result of loading a data directory.
#[derive(Debug, Clone)]
pub struct LoadedPlot {
    /// Parsed manifest.
    pub manifest: Manifest,
    /// Where everything came from.
    pub sources: SourceFiles,
    /// Aligned ids, points and (optionally) metadata.
    pub dataset: Dataset,
}

/// Check that `data_dir` is an existing directory.
pub fn ensure_data_dir(data_dir: &Path) -> Result<DataRoot, PixnetError> {
    if !data_dir.is_dir() {
        return Err(PixnetError::NotFound {
            artifact: "data directory",
            detail: format!("directory {} does not exist", data_dir.display()),
        });
    }
    Ok(DataRoot::new(data_dir))
}

/// Load manifest, image list, layout and, if requested, metadata.
///
/// An empty image list is returned as an empty dataset without resolving a
/// layout; callers treat it as "nothing to export".
pub fn load_plot(
    data_dir: &Path,
    layout: &str,
    include_metadata: bool,
) -> Result<LoadedPlot, PixnetError> {
    let root = ensure_data_dir(data_dir)?;
    tracing::info!("Looking for PixPlot data in: {}", root.path().display());

    let (manifest, manifest_path) = Manifest::load(&root)?;

    let imagelist_path = layout::resolve_imagelist_path(&root, &manifest)?;
    let images = layout::load_images(&imagelist_path, manifest.gzipped)?;

    let mut sources = SourceFiles {
        manifest: manifest_path,
        imagelist: imagelist_path,
        layout: None,
    };

    if images.is_empty() {
        tracing::warn!("No images found in image list");
        return Ok(LoadedPlot {
            manifest,
            sources,
            dataset: Dataset::default(),
        });
    }
    tracing::info!("Found {} images in the image list", images.len());

    let layout_path = layout::resolve_layout_path(&root, &manifest, layout)?;
    let points = layout::load_points(&layout_path, manifest.gzipped)?;
    sources.layout = Some(layout_path);

    let mut dataset = Dataset::new(images, points);
    if include_metadata {
        let loaded = metadata::load_metadata(&root, dataset.image_ids());
        dataset = dataset.with_metadata(loaded);
    }

    Ok(LoadedPlot {
        manifest,
        sources,
        dataset,
    })
}
