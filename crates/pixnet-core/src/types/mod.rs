//! # Core Type Definitions
//!
//! This module contains all core types for the pixnet neighbor graph:
//! - Embedding coordinates (`Point`)
//! - Graph records (`NeighborEdge`, `NodeRecord`, `NodeTable`, `Network`)
//! - Asset kinds resolved for nodes (`AssetKind`)
//! - Error types (`PixnetError`)
//!
//! ## Determinism Guarantees
//!
//! - `NodeTable` keeps nodes in first-seen order and indexes them with a `BTreeMap`
//! - Node attributes live in `BTreeMap`s so iteration order never depends on hashing

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

// =============================================================================
// POINT
// =============================================================================

/// A position in embedding space.
///
/// Index-aligned with the image identifier sequence of its dataset.
/// Deserializes from a bare coordinate array such as `[0.5, -1.0]`.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct Point(pub Vec<f64>);

impl Point {
    /// Create a point from its coordinates.
    #[must_use]
    pub fn new(coords: Vec<f64>) -> Self {
        Self(coords)
    }

    /// Create a 2D point.
    #[must_use]
    pub fn xy(x: f64, y: f64) -> Self {
        Self(vec![x, y])
    }

    /// Number of dimensions.
    #[must_use]
    pub fn dims(&self) -> usize {
        self.0.len()
    }

    /// Coordinates as a slice.
    #[must_use]
    pub fn coords(&self) -> &[f64] {
        &self.0
    }

    /// True when every coordinate is finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|c| c.is_finite())
    }
}

impl From<Vec<f64>> for Point {
    fn from(coords: Vec<f64>) -> Self {
        Self(coords)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::xy(x, y)
    }
}

// =============================================================================
// EDGE
// =============================================================================

/// A directed nearest-neighbor relation `source -> target`.
///
/// Both endpoint positions are copied onto the edge so the edge table can be
/// rendered without a join against the node table.
#[derive(Debug, Clone, PartialEq)]
pub struct NeighborEdge {
    /// Image id of the point whose neighbor this is.
    pub source: String,
    /// Image id of the neighbor.
    pub target: String,
    /// Euclidean distance between the endpoints.
    pub distance: f64,
    /// 1-based position in the source's ascending-distance ordering.
    pub rank: usize,
    /// `1 / (distance + WEIGHT_EPSILON)`.
    pub weight: f64,
    /// Source position.
    pub source_pos: Point,
    /// Target position.
    pub target_pos: Point,
}

// =============================================================================
// NODE
// =============================================================================

/// File assets that can be attached to a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AssetKind {
    /// Thumbnail image.
    Thumbnail,
    /// Full-resolution original.
    Original,
}

impl AssetKind {
    /// All kinds, in the order they are resolved.
    pub const ALL: [AssetKind; 2] = [AssetKind::Thumbnail, AssetKind::Original];

    /// Column name used in the node table.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            AssetKind::Thumbnail => "thumb",
            AssetKind::Original => "original",
        }
    }

    /// Directory name the asset lives under in a data root.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            AssetKind::Thumbnail => "thumbs",
            AssetKind::Original => "originals",
        }
    }
}

/// One unique image in the node table.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeRecord {
    /// Image id (base filename), the identity key.
    pub id: String,
    /// Position taken from the first edge the node appeared in.
    pub position: Point,
    /// Resolved asset paths, present only when assets were requested.
    pub assets: BTreeMap<AssetKind, PathBuf>,
    /// Merged metadata attributes.
    pub metadata: BTreeMap<String, serde_json::Value>,
}

impl NodeRecord {
    /// Create a node with a position and no attributes.
    #[must_use]
    pub fn new(id: impl Into<String>, position: Point) -> Self {
        Self {
            id: id.into(),
            position,
            assets: BTreeMap::new(),
            metadata: BTreeMap::new(),
        }
    }
}

/// Deduplicated node records in first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeTable {
    records: Vec<NodeRecord>,
    index: BTreeMap<String, usize>,
}

impl NodeTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record unless its id is already present.
    ///
    /// Returns `true` when the record was inserted. An existing record is
    /// never replaced: first occurrence wins.
    pub fn insert_if_absent(&mut self, record: NodeRecord) -> bool {
        if self.index.contains_key(&record.id) {
            return false;
        }
        self.index.insert(record.id.clone(), self.records.len());
        self.records.push(record);
        true
    }

    /// Look up a node by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&NodeRecord> {
        self.index.get(id).and_then(|&i| self.records.get(i))
    }

    /// Check whether a node id is present.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// Iterate in first-occurrence order.
    pub fn iter(&self) -> impl Iterator<Item = &NodeRecord> {
        self.records.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut NodeRecord> {
        self.records.iter_mut()
    }

    /// Number of unique nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no node has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// NETWORK
// =============================================================================

/// The assembled neighbor graph: edges in emission order plus their nodes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Network {
    /// Edges ordered by (source index, rank).
    pub edges: Vec<NeighborEdge>,
    /// One record per image id appearing in any edge.
    pub nodes: NodeTable,
}

impl Network {
    /// True when there is nothing to export.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while loading, building or exporting a network.
///
/// - Shape mismatches between ids and positions are NOT errors (truncation)
/// - Missing per-image metadata is NOT an error (empty attribute set)
#[derive(Debug, Error)]
pub enum PixnetError {
    /// A required input artifact could not be located.
    #[error("{artifact} not found: {detail}")]
    NotFound {
        /// What was being looked for (manifest, image list, layout, ...).
        artifact: &'static str,
        /// Where it was looked for.
        detail: String,
    },

    /// An input file exists but could not be decoded.
    #[error("Failed to parse {path}: {reason}")]
    Parse {
        /// The offending file.
        path: String,
        /// Decoder message.
        reason: String,
    },

    /// A point has a different dimensionality than the first point.
    #[error("Point {index} has {found} dimensions, expected {expected}")]
    DimensionMismatch {
        /// Index of the offending point.
        index: usize,
        /// Dimensionality of point 0.
        expected: usize,
        /// Dimensionality found.
        found: usize,
    },

    /// A point has a NaN or infinite coordinate.
    #[error("Point {index} has a non-finite coordinate")]
    NonFiniteCoordinate {
        /// Index of the offending point.
        index: usize,
    },

    /// A neighbor list refers to a point that does not exist.
    #[error("Point {point} lists neighbor {neighbor}, but only {len} points exist")]
    NeighborOutOfRange {
        /// Source point index.
        point: usize,
        /// Offending neighbor index.
        neighbor: usize,
        /// Number of points.
        len: usize,
    },

    /// A neighbor list contains its own point.
    #[error("Point {point} lists itself as a neighbor")]
    SelfNeighbor {
        /// Offending point index.
        point: usize,
    },

    /// The neighbor search was cancelled between points.
    #[error("Neighbor search cancelled after {completed} points")]
    Cancelled {
        /// Points finished before cancellation was observed.
        completed: usize,
    },

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(String),

    /// Writing a CSV table failed.
    #[error("CSV error: {0}")]
    Csv(String),

    /// The configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<std::io::Error> for PixnetError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<csv::Error> for PixnetError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_reads_coordinate_array() {
        let points: Vec<Point> = serde_json::from_str("[[0, 1.5], [2, 3, 4]]").expect("parse");
        assert_eq!(points, vec![Point::xy(0.0, 1.5), Point::new(vec![2.0, 3.0, 4.0])]);
        assert!(serde_json::from_str::<Point>(r#"{"x": 1}"#).is_err());
    }

    #[test]
    fn node_table_first_occurrence_wins() {
        let mut table = NodeTable::new();
        assert!(table.insert_if_absent(NodeRecord::new("a.jpg", Point::xy(0.0, 0.0))));
        assert!(!table.insert_if_absent(NodeRecord::new("a.jpg", Point::xy(9.0, 9.0))));

        assert_eq!(table.len(), 1);
        let node = table.get("a.jpg").expect("present");
        assert_eq!(node.position, Point::xy(0.0, 0.0));
    }

    #[test]
    fn node_table_preserves_insertion_order() {
        let mut table = NodeTable::new();
        for id in ["c.jpg", "a.jpg", "b.jpg"] {
            table.insert_if_absent(NodeRecord::new(id, Point::xy(0.0, 0.0)));
        }

        let ids: Vec<_> = table.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["c.jpg", "a.jpg", "b.jpg"]);
    }

    #[test]
    fn point_finiteness() {
        assert!(Point::xy(1.0, -2.5).is_finite());
        assert!(!Point::xy(f64::NAN, 0.0).is_finite());
        assert!(!Point::new(vec![0.0, f64::INFINITY]).is_finite());
    }

    #[test]
    fn asset_columns() {
        assert_eq!(AssetKind::Thumbnail.column(), "thumb");
        assert_eq!(AssetKind::Original.column(), "original");
        assert_eq!(AssetKind::Original.dir_name(), "originals");
    }

    #[test]
    fn empty_network() {
        let network = Network::default();
        assert!(network.is_empty());
        assert_eq!(network.node_count(), 0);
    }
}
