//! Per-image metadata files: `metadata/file/<image_id>.json`.
//!
//! Metadata never aborts a run. A missing directory or file yields an empty
//! attribute set; an unreadable file does too, with a warning.

use super::json::read_json;
use super::paths::DataRoot;
use pixnet_core::Metadata;
use serde_json::Map;
use std::path::Path;

/// Load the attribute set of every image id.
///
/// Every id gets an entry, empty when nothing could be read.
pub fn load_metadata(root: &DataRoot, image_ids: &[String]) -> Metadata {
    let Some(dir) = root.find_dir(&["metadata", "file"]) else {
        tracing::warn!("Metadata directory not found in any expected location");
        return Metadata::new();
    };
    tracing::info!("Loading metadata from {}", dir.display());

    image_ids
        .iter()
        .map(|id| (id.clone(), load_one(&dir, id)))
        .collect()
}

fn load_one(dir: &Path, image_id: &str) -> Map<String, serde_json::Value> {
    let path = dir.join(format!("{image_id}.json"));
    if !path.is_file() {
        return Map::new();
    }
    match read_json(&path, false) {
        Ok(attributes) => attributes,
        Err(e) => {
            tracing::warn!("Error reading metadata for {}: {}", image_id, e);
            Map::new()
        }
    }
}
