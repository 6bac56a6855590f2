//! # Pipeline
//!
//! Neighbor Finder → Graph Assembler over a loaded [`Dataset`].
//!
//! Data flows strictly forward; the dataset is only read.

use crate::assembler::{AssemblyOptions, AssetResolver, MetadataPolicy, assemble};
use crate::dataset::Dataset;
use crate::neighbors::{CancelToken, find_neighbors_with_cancel};
use crate::primitives::DEFAULT_NEIGHBORS;
use crate::{Network, PixnetError};
use std::time::Instant;

/// Parameters of one network build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    /// Neighbors per point.
    pub neighbors: usize,
    /// Attach thumbnail and original paths to nodes.
    pub include_thumbs: bool,
    /// Merge per-image metadata into nodes.
    pub include_metadata: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            neighbors: DEFAULT_NEIGHBORS,
            include_thumbs: false,
            include_metadata: false,
        }
    }
}

impl ExportOptions {
    /// Assembler switches implied by these options.
    #[must_use]
    pub fn assembly(&self) -> AssemblyOptions {
        AssemblyOptions {
            include_assets: self.include_thumbs,
            metadata: if self.include_metadata {
                MetadataPolicy::Merge
            } else {
                MetadataPolicy::Omit
            },
        }
    }
}

/// Build the neighbor network of a dataset.
pub fn build_network(
    dataset: &Dataset,
    options: &ExportOptions,
    resolver: &dyn AssetResolver,
) -> Result<Network, PixnetError> {
    build_network_with_cancel(dataset, options, resolver, &CancelToken::new())
}

/// [`build_network`] with cooperative cancellation of the neighbor search.
pub fn build_network_with_cancel(
    dataset: &Dataset,
    options: &ExportOptions,
    resolver: &dyn AssetResolver,
    cancel: &CancelToken,
) -> Result<Network, PixnetError> {
    tracing::info!(
        "Finding {} nearest neighbors for each of {} images",
        options.neighbors,
        dataset.len()
    );
    let started = Instant::now();
    let neighbor_lists = find_neighbors_with_cancel(dataset.points(), options.neighbors, cancel)?;
    tracing::debug!("Neighbor search took {:?}", started.elapsed());

    let network = assemble(
        dataset.image_ids(),
        dataset.points(),
        &neighbor_lists,
        dataset.metadata(),
        &options.assembly(),
        resolver,
    )?;

    tracing::info!(
        "Created network data with {} connections over {} nodes",
        network.edge_count(),
        network.node_count()
    );
    Ok(network)
}
