//! # Dataset
//!
//! The in-memory input of a run: image ids, their embedding positions and
//! optional per-image metadata, index-aligned.
//!
//! Misaligned inputs are not an error. Both sequences are cut to their
//! common prefix and a warning is logged, because a partial graph is still
//! useful for exploration.

use crate::Point;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Per-image attribute sets keyed by image id.
pub type Metadata = BTreeMap<String, Map<String, Value>>;

/// Record of a length mismatch that was resolved by truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncation {
    /// Number of image ids supplied.
    pub images: usize,
    /// Number of positions supplied.
    pub positions: usize,
}

impl Truncation {
    /// Length both sequences were cut to.
    #[must_use]
    pub fn kept(&self) -> usize {
        self.images.min(self.positions)
    }
}

/// Common length of an id sequence and a position sequence.
///
/// Logs a warning and reports the mismatch when the lengths differ.
pub(crate) fn common_len(images: usize, positions: usize) -> (usize, Option<Truncation>) {
    if images == positions {
        return (images, None);
    }
    tracing::warn!(
        "Number of positions ({}) doesn't match number of images ({}); using the first {}",
        positions,
        images,
        images.min(positions)
    );
    let truncation = Truncation { images, positions };
    (truncation.kept(), Some(truncation))
}

/// Base filename of an image list entry, used as the image id.
///
/// Entries without a file name component (e.g. `".."`) are kept verbatim.
#[must_use]
pub fn base_filename(name: &str) -> &str {
    std::path::Path::new(name)
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or(name)
}

/// Aligned image ids, positions and metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    image_ids: Vec<String>,
    points: Vec<Point>,
    metadata: Metadata,
    truncation: Option<Truncation>,
}

impl Dataset {
    /// Build a dataset from image list entries and layout positions.
    ///
    /// Entries are reduced to base filenames. If the counts differ both
    /// sequences are truncated to the shorter one.
    #[must_use]
    pub fn new(filenames: Vec<String>, mut points: Vec<Point>) -> Self {
        let (n, truncation) = common_len(filenames.len(), points.len());

        let image_ids = filenames
            .into_iter()
            .take(n)
            .map(|f| base_filename(&f).to_string())
            .collect();
        points.truncate(n);

        Self {
            image_ids,
            points,
            metadata: Metadata::new(),
            truncation,
        }
    }

    /// Attach per-image metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Image ids in input order.
    #[must_use]
    pub fn image_ids(&self) -> &[String] {
        &self.image_ids
    }

    /// Positions in input order.
    #[must_use]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Metadata keyed by image id.
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// The mismatch resolved at construction, if any.
    #[must_use]
    pub fn truncation(&self) -> Option<Truncation> {
        self.truncation
    }

    /// Number of aligned images.
    #[must_use]
    pub fn len(&self) -> usize {
        self.image_ids.len()
    }

    /// True when there are no images.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.image_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("images/img_{i}.jpg")).collect()
    }

    #[test]
    fn filenames_reduced_to_base_names() {
        let dataset = Dataset::new(names(2), vec![Point::xy(0.0, 0.0), Point::xy(1.0, 1.0)]);
        assert_eq!(dataset.image_ids(), &["img_0.jpg", "img_1.jpg"]);
        assert!(dataset.truncation().is_none());
    }

    #[test]
    fn more_images_than_positions_truncates() {
        let points = vec![Point::xy(0.0, 0.0), Point::xy(1.0, 0.0), Point::xy(2.0, 0.0)];
        let dataset = Dataset::new(names(5), points);

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.points().len(), 3);
        assert_eq!(
            dataset.truncation(),
            Some(Truncation {
                images: 5,
                positions: 3
            })
        );
    }

    #[test]
    fn more_positions_than_images_truncates() {
        let points = vec![Point::xy(0.0, 0.0); 4];
        let dataset = Dataset::new(names(2), points);

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.points().len(), 2);
    }

    #[test]
    fn base_filename_edge_cases() {
        assert_eq!(base_filename("a/b/c.png"), "c.png");
        assert_eq!(base_filename("c.png"), "c.png");
        assert_eq!(base_filename(".."), "..");
    }
}
