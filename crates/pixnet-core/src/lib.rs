//! # pixnet-core
//!
//! The neighbor graph engine for pixnet - THE LOGIC.
//!
//! Given the points of an image embedding and their image ids, this crate
//! finds every point's k nearest neighbors and assembles the two tables a
//! network-analysis tool needs: a weighted directed edge list and a
//! deduplicated node list.
//!
//! ## Pipeline
//!
//! ```text
//! Dataset ──► neighbors::find_neighbors ──► assembler::assemble ──► export::write_*
//! ```
//!
//! ## Architectural Constraints
//!
//! - No filesystem probing: asset paths come from an [`AssetResolver`]
//! - Edge order is (point index, rank); node order is first occurrence
//! - Ties in distance are broken by lower point index

// =============================================================================
// MODULES
// =============================================================================

pub mod assembler;
pub mod dataset;
pub mod export;
pub mod neighbors;
pub mod pipeline;
pub mod primitives;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{AssetKind, NeighborEdge, Network, NodeRecord, NodeTable, PixnetError, Point};

// =============================================================================
// RE-EXPORTS: Graph Construction
// =============================================================================

pub use assembler::{AssemblyOptions, AssetResolver, DefaultAssetLayout, MetadataPolicy, assemble};
pub use dataset::{Dataset, Metadata, Truncation, base_filename};
pub use neighbors::{CancelToken, euclidean, find_neighbors, find_neighbors_with_cancel};
pub use pipeline::{ExportOptions, build_network, build_network_with_cancel};

// =============================================================================
// RE-EXPORTS: Export
// =============================================================================

pub use export::{nodes_path_for, write_edges, write_nodes};
