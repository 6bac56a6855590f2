//! # Configuration
//!
//! Export settings come from three layers, highest precedence first:
//! explicit command line flags, an optional TOML file, built-in defaults.
//!
//! ```toml
//! [export]
//! neighbors = 15
//! layout = "umap"
//! output = "network.csv"
//! include_thumbs = true
//! include_metadata = false
//! ```

use pixnet_core::primitives::{DEFAULT_EDGES_FILE, DEFAULT_LAYOUT, DEFAULT_NEIGHBORS};
use pixnet_core::{ExportOptions, PixnetError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Contents of a configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// `[export]` section.
    #[serde(default)]
    pub export: ExportSection,
}

/// Partially specified export settings, as given by one layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExportSection {
    /// Neighbors per image.
    pub neighbors: Option<usize>,
    /// Layout variant name.
    pub layout: Option<String>,
    /// Edges output path.
    pub output: Option<PathBuf>,
    /// Attach thumbnail and original paths.
    pub include_thumbs: Option<bool>,
    /// Merge per-image metadata.
    pub include_metadata: Option<bool>,
}

impl FileConfig {
    /// Read a configuration file.
    pub fn load(path: &Path) -> Result<Self, PixnetError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PixnetError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
            .map_err(|e| PixnetError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration text.
    pub fn from_toml(text: &str) -> Result<Self, PixnetError> {
        toml::from_str(text).map_err(|e| PixnetError::Config(e.to_string()))
    }
}

impl ExportSection {
    /// Fill unset fields from a lower-precedence layer.
    #[must_use]
    pub fn or(self, lower: ExportSection) -> ExportSection {
        ExportSection {
            neighbors: self.neighbors.or(lower.neighbors),
            layout: self.layout.or(lower.layout),
            output: self.output.or(lower.output),
            include_thumbs: self.include_thumbs.or(lower.include_thumbs),
            include_metadata: self.include_metadata.or(lower.include_metadata),
        }
    }
}

/// Fully resolved export settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSettings {
    /// Layout variant name.
    pub layout: String,
    /// Edges output path.
    pub output: PathBuf,
    /// Core options.
    pub options: ExportOptions,
}

impl ExportSettings {
    /// Apply built-in defaults to whatever the layers left unset.
    pub fn resolve(section: ExportSection) -> Result<Self, PixnetError> {
        let neighbors = section.neighbors.unwrap_or(DEFAULT_NEIGHBORS);
        if neighbors == 0 {
            return Err(PixnetError::Config(
                "neighbors must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            layout: section.layout.unwrap_or_else(|| DEFAULT_LAYOUT.to_string()),
            output: section
                .output
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EDGES_FILE)),
            options: ExportOptions {
                neighbors,
                include_thumbs: section.include_thumbs.unwrap_or(false),
                include_metadata: section.include_metadata.unwrap_or(false),
            },
        })
    }
}
