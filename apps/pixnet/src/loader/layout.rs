//! Image list and layout resolution.

use super::manifest::Manifest;
use super::paths::{DataRoot, glob_files};
use glob::Pattern;
use pixnet_core::{PixnetError, Point, base_filename};
use serde::Deserialize;
use std::path::{Path, PathBuf};

// =============================================================================
// PAYLOADS
// =============================================================================

/// The image list payload: `{ "images": [...] }`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ImageList {
    /// Image filenames, index-aligned with layout positions.
    #[serde(default)]
    pub images: Vec<String>,
}

/// A layout file: either a bare list of coordinates or an object holding
/// them under `"positions"`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LayoutPayload {
    /// `[[x, y], ...]`
    Bare(Vec<Point>),
    /// `{ "positions": [[x, y], ...], ... }`
    Wrapped {
        /// The coordinates.
        positions: Vec<Point>,
    },
}

impl LayoutPayload {
    /// Collapse either shape into points.
    #[must_use]
    pub fn into_points(self) -> Vec<Point> {
        let (LayoutPayload::Bare(points) | LayoutPayload::Wrapped { positions: points }) = self;
        points
    }
}

// =============================================================================
// IMAGE LIST
// =============================================================================

/// Locate the image list of a plot.
///
/// A path recorded in the manifest is tried as given, then by base name under
/// the `imagelists` directories. Without a recorded path the first
/// `imagelist*.json*` file in those directories is used.
pub fn resolve_imagelist_path(root: &DataRoot, manifest: &Manifest) -> Result<PathBuf, PixnetError> {
    if let Some(recorded) = manifest.imagelist.as_deref() {
        let as_given = Path::new(recorded);
        if as_given.is_file() {
            return Ok(as_given.to_path_buf());
        }
        return root
            .find_file(&["imagelists", base_filename(recorded)])
            .ok_or_else(|| PixnetError::NotFound {
                artifact: "image list",
                detail: format!("could not find imagelist file {}", base_filename(recorded)),
            });
    }

    tracing::warn!("Image list path not found in manifest, searching imagelists directories");
    let found = root
        .locations(&["imagelists"])
        .iter()
        .find_map(|dir| glob_files(dir, "imagelist*.json*").into_iter().next())
        .ok_or_else(|| PixnetError::NotFound {
            artifact: "image list",
            detail: "no imagelist*.json* file in any imagelists directory".to_string(),
        })?;
    tracing::info!("Found alternative imagelist at: {}", found.display());
    Ok(found)
}

// =============================================================================
// LAYOUT
// =============================================================================

/// Locate the layout file for `layout`.
///
/// Order: the path the manifest records for the layout (its first variant,
/// or its direct `layout` entry), then `<layout>-<plot_id>.json[.gz]` and
/// `umap-n_neighbors_*-min_dist_*-<plot_id>.json[.gz]` in the layouts
/// directory, then any `umap*.json*` file as a last resort.
pub fn resolve_layout_path(
    root: &DataRoot,
    manifest: &Manifest,
    layout: &str,
) -> Result<PathBuf, PixnetError> {
    let recorded = manifest
        .first_variant_path(layout)
        .or_else(|| manifest.layout_path(layout));
    if let Some(recorded) = recorded {
        if let Some(path) = recorded_layout(root, recorded) {
            tracing::info!("Found {} layout path in manifest: {}", layout, path.display());
            return Ok(path);
        }
        tracing::debug!("Manifest layout {} does not exist on disk", recorded);
    }

    if let Some(path) = named_layout(root, manifest.plot_id.as_deref(), layout) {
        return Ok(path);
    }

    tracing::warn!("Layout file for {} not found, looking for any UMAP layout", layout);
    let found = root
        .locations(&["layouts"])
        .iter()
        .find_map(|dir| glob_files(dir, "umap*.json*").into_iter().next())
        .ok_or_else(|| PixnetError::NotFound {
            artifact: "layout",
            detail: format!("no file for layout '{layout}' and no umap*.json* fallback"),
        })?;
    tracing::info!("Found alternative layout file: {}", found.display());
    Ok(found)
}

fn recorded_layout(root: &DataRoot, recorded: &str) -> Option<PathBuf> {
    let as_given = Path::new(recorded);
    if as_given.is_file() {
        return Some(as_given.to_path_buf());
    }
    let base = base_filename(recorded);
    let beside = root.path().join(base);
    if beside.is_file() {
        return Some(beside);
    }
    root.find_file(&["layouts", base])
}

fn named_layout(root: &DataRoot, plot_id: Option<&str>, layout: &str) -> Option<PathBuf> {
    let Some(dir) = root.find_dir(&["layouts"]) else {
        tracing::warn!(
            "Layout directory not found under {}",
            root.path().display()
        );
        return None;
    };
    let plot_id = plot_id?;

    let exact = [
        dir.join(format!("{layout}-{plot_id}.json.gz")),
        dir.join(format!("{layout}-{plot_id}.json")),
    ];
    if let Some(path) = exact.into_iter().find(|p| p.is_file()) {
        return Some(path);
    }

    [".json.gz", ".json"].iter().find_map(|ext| {
        glob_files(
            &dir,
            &format!(
                "umap-n_neighbors_*-min_dist_*-{}{ext}",
                Pattern::escape(plot_id)
            ),
        )
        .into_iter()
        .next()
    })
}

/// Read a layout file into points.
pub fn load_points(path: &Path, gzipped: bool) -> Result<Vec<Point>, PixnetError> {
    tracing::info!("Loading positions from {}", path.display());
    let payload: LayoutPayload = super::json::read_json(path, gzipped)?;
    Ok(payload.into_points())
}

/// Read an image list file.
pub fn load_images(path: &Path, gzipped: bool) -> Result<Vec<String>, PixnetError> {
    tracing::info!("Loading imagelist from {}", path.display());
    let list: ImageList = super::json::read_json(path, gzipped)?;
    Ok(list.images)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_layout_payload() {
        let payload: LayoutPayload = serde_json::from_str("[[0, 1], [2.5, -3]]").expect("parse");
        assert_eq!(
            payload.into_points(),
            vec![Point::xy(0.0, 1.0), Point::xy(2.5, -3.0)]
        );
    }

    #[test]
    fn wrapped_layout_payload() {
        let payload: LayoutPayload =
            serde_json::from_str(r#"{"positions": [[1, 1]], "labels": ["x"]}"#).expect("parse");
        assert_eq!(payload.into_points(), vec![Point::xy(1.0, 1.0)]);
    }

    #[test]
    fn image_list_payload() {
        let list: ImageList =
            serde_json::from_str(r#"{"images": ["a.jpg", "b.jpg"], "cell_sizes": []}"#)
                .expect("parse");
        assert_eq!(list.images, vec!["a.jpg", "b.jpg"]);
    }
}
