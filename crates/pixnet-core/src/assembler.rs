//! # Graph Assembler
//!
//! Turns ranked neighbor lists into edge records and deduplicated node records.
//!
//! ## Ordering
//!
//! Edges are emitted by (point index ascending, rank ascending). Nodes are
//! seeded while walking that sequence, source before target, so "first
//! occurrence wins" always refers to the same edge for the same input.
//!
//! ## Assets
//!
//! The assembler never touches the filesystem. Thumbnail and original paths
//! come from an injected [`AssetResolver`]; when it finds nothing the
//! resolver's best-guess default is used, so a node always gets a path.

use crate::dataset::{Metadata, common_len};
use crate::neighbors::{euclidean, validate_points};
use crate::primitives::{EXCLUDED_METADATA_KEYS, WEIGHT_EPSILON};
use crate::{AssetKind, NeighborEdge, Network, NodeRecord, NodeTable, PixnetError, Point};
use std::path::PathBuf;

// =============================================================================
// ASSET RESOLUTION
// =============================================================================

/// Locates file assets for an image id.
pub trait AssetResolver {
    /// The first existing location of the asset, if any.
    fn resolve(&self, kind: AssetKind, image_id: &str) -> Option<PathBuf>;

    /// Path reported when `resolve` finds nothing.
    fn default_path(&self, kind: AssetKind, image_id: &str) -> PathBuf;

    /// `resolve`, falling back to `default_path`.
    fn locate(&self, kind: AssetKind, image_id: &str) -> PathBuf {
        self.resolve(kind, image_id)
            .unwrap_or_else(|| self.default_path(kind, image_id))
    }
}

/// Resolver that never probes and always answers `<root>/<kind dir>/<id>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultAssetLayout {
    root: PathBuf,
}

impl DefaultAssetLayout {
    /// Lay assets out under `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetResolver for DefaultAssetLayout {
    fn resolve(&self, _kind: AssetKind, _image_id: &str) -> Option<PathBuf> {
        None
    }

    fn default_path(&self, kind: AssetKind, image_id: &str) -> PathBuf {
        self.root.join(kind.dir_name()).join(image_id)
    }
}

// =============================================================================
// OPTIONS
// =============================================================================

/// How per-image metadata reaches the node table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetadataPolicy {
    /// Nodes carry no metadata columns.
    #[default]
    Omit,
    /// Each node receives its image's attributes, minus excluded keys.
    Merge,
}

/// Switches for node enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssemblyOptions {
    /// Attach thumbnail and original paths.
    pub include_assets: bool,
    /// Metadata handling.
    pub metadata: MetadataPolicy,
}

// =============================================================================
// ASSEMBLY
// =============================================================================

/// Build the network from aligned ids, positions and neighbor lists.
///
/// `image_ids` and `positions` are truncated to their common length with a
/// warning when they differ. Neighbor lists beyond that length are ignored.
pub fn assemble(
    image_ids: &[String],
    positions: &[Point],
    neighbor_lists: &[Vec<usize>],
    metadata: &Metadata,
    options: &AssemblyOptions,
    resolver: &dyn AssetResolver,
) -> Result<Network, PixnetError> {
    let (n, _) = common_len(image_ids.len(), positions.len());
    let image_ids = &image_ids[..n];
    let positions = &positions[..n];
    validate_points(positions)?;

    let edges = build_edges(image_ids, positions, neighbor_lists)?;
    let mut nodes = seed_nodes(&edges, options.include_assets, resolver);

    if options.metadata == MetadataPolicy::Merge {
        merge_metadata(&mut nodes, metadata);
    }

    tracing::debug!(
        "Assembled {} edges over {} nodes",
        edges.len(),
        nodes.len()
    );

    Ok(Network { edges, nodes })
}

/// Weight of an edge of the given length.
#[must_use]
pub fn distance_weight(distance: f64) -> f64 {
    1.0 / (distance + WEIGHT_EPSILON)
}

fn build_edges(
    image_ids: &[String],
    positions: &[Point],
    neighbor_lists: &[Vec<usize>],
) -> Result<Vec<NeighborEdge>, PixnetError> {
    let n = image_ids.len();
    let mut edges = Vec::with_capacity(neighbor_lists.iter().take(n).map(Vec::len).sum());

    for (i, neighbors) in neighbor_lists.iter().take(n).enumerate() {
        let source_pos = &positions[i];

        for (r, &j) in neighbors.iter().enumerate() {
            if j >= n {
                return Err(PixnetError::NeighborOutOfRange {
                    point: i,
                    neighbor: j,
                    len: n,
                });
            }
            if j == i {
                return Err(PixnetError::SelfNeighbor { point: i });
            }

            let target_pos = &positions[j];
            let distance = euclidean(source_pos.coords(), target_pos.coords());

            edges.push(NeighborEdge {
                source: image_ids[i].clone(),
                target: image_ids[j].clone(),
                distance,
                rank: r + 1,
                weight: distance_weight(distance),
                source_pos: source_pos.clone(),
                target_pos: target_pos.clone(),
            });
        }
    }

    Ok(edges)
}

fn seed_nodes(
    edges: &[NeighborEdge],
    include_assets: bool,
    resolver: &dyn AssetResolver,
) -> NodeTable {
    let mut nodes = NodeTable::new();

    for edge in edges {
        for (id, position) in [
            (&edge.source, &edge.source_pos),
            (&edge.target, &edge.target_pos),
        ] {
            if nodes.contains(id) {
                continue;
            }
            let mut record = NodeRecord::new(id.clone(), position.clone());
            if include_assets {
                for kind in AssetKind::ALL {
                    record.assets.insert(kind, resolver.locate(kind, id));
                }
            }
            nodes.insert_if_absent(record);
        }
    }

    nodes
}

/// Copy each node's attributes onto it, skipping [`EXCLUDED_METADATA_KEYS`].
///
/// Besides `filename`, an `id` attribute is skipped too, so metadata can
/// never overwrite the node id. PixPlot's own exporter only skips `filename`
/// and lets an `id` attribute replace the identity column.
fn merge_metadata(nodes: &mut NodeTable, metadata: &Metadata) {
    for node in nodes.iter_mut() {
        let Some(attributes) = metadata.get(&node.id) else {
            continue;
        };
        for (key, value) in attributes {
            if EXCLUDED_METADATA_KEYS.contains(&key.as_str()) {
                continue;
            }
            node.metadata.insert(key.clone(), value.clone());
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
