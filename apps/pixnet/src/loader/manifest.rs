//! Plot manifest: plot id, compression flag and references to the image
//! list and layout files.

use super::json::read_json;
use super::paths::DataRoot;
use pixnet_core::PixnetError;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;

/// The fields of `manifest.json` the exporter relies on.
///
/// `layouts` is kept as raw JSON: its entries differ per layout kind and some
/// are `null`, so it is read through accessors instead of a fixed shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// Identifier embedded in layout file names.
    #[serde(default)]
    pub plot_id: Option<String>,
    /// Whether payload files are gzip-compressed.
    #[serde(default)]
    pub gzipped: bool,
    /// Path of the image list, as recorded at plot time.
    #[serde(default)]
    pub imagelist: Option<String>,
    /// Layout name to layout description.
    #[serde(default)]
    pub layouts: serde_json::Map<String, Value>,
}

impl Manifest {
    /// Locate and read the manifest of a data root.
    pub fn load(root: &DataRoot) -> Result<(Self, PathBuf), PixnetError> {
        let path = root
            .find_file(&["manifest.json"])
            .ok_or_else(|| PixnetError::NotFound {
                artifact: "manifest",
                detail: format!(
                    "no manifest.json in {} or its data/ subdirectory",
                    root.path().display()
                ),
            })?;

        tracing::info!("Found manifest at {}", path.display());
        let manifest: Self = read_json(&path, false)?;
        tracing::info!(
            "Plot ID: {}, Gzipped: {}",
            manifest.plot_id.as_deref().unwrap_or("<none>"),
            manifest.gzipped
        );
        Ok((manifest, path))
    }

    /// Path of the first recorded variant of a layout, e.g. the first UMAP run.
    #[must_use]
    pub fn first_variant_path(&self, layout: &str) -> Option<&str> {
        self.layouts
            .get(layout)?
            .get("variants")?
            .as_array()?
            .first()?
            .get("layout")?
            .as_str()
    }

    /// Path recorded directly on a layout entry.
    #[must_use]
    pub fn layout_path(&self, layout: &str) -> Option<&str> {
        self.layouts.get(layout)?.get("layout")?.as_str()
    }
}
