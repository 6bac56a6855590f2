//! # Fixed Primitives
//!
//! Hardcoded constants shared by the neighbor finder, the assembler and the
//! exporter. These are compiled in and immutable at runtime.

use std::borrow::Cow;

/// Additive constant in `weight = 1 / (distance + WEIGHT_EPSILON)`.
///
/// Keeps the weight finite when two points coincide. The constant does not
/// scale with the layout's coordinate range.
pub const WEIGHT_EPSILON: f64 = 1e-5;

/// Default number of neighbors per point.
pub const DEFAULT_NEIGHBORS: usize = 10;

/// Default layout variant.
pub const DEFAULT_LAYOUT: &str = "umap";

/// Default edges output file.
pub const DEFAULT_EDGES_FILE: &str = "pixplot_network.csv";

/// Suffix appended to the edges file stem to name the nodes file.
pub const NODES_FILE_SUFFIX: &str = "_nodes.csv";

/// Columns that always lead the edge table, in this order.
pub const EDGE_LEADING_COLUMNS: [&str; 5] = ["source", "target", "weight", "distance", "rank"];

/// Column that always leads the node table.
pub const NODE_ID_COLUMN: &str = "id";

/// Metadata keys never merged into a node.
///
/// `filename` duplicates the identity key; `id` would overwrite it.
pub const EXCLUDED_METADATA_KEYS: [&str; 2] = ["filename", NODE_ID_COLUMN];

/// Name of the coordinate column for axis `i`: `x`, `y`, `z`, then `d3`, `d4`, ...
#[must_use]
pub fn axis_name(i: usize) -> Cow<'static, str> {
    match i {
        0 => Cow::Borrowed("x"),
        1 => Cow::Borrowed("y"),
        2 => Cow::Borrowed("z"),
        _ => Cow::Owned(format!("d{i}")),
    }
}
