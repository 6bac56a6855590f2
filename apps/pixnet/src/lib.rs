//! # pixnet
//!
//! The filesystem side of the exporter: locating a plot's artifacts,
//! resolving image assets, reading configuration and running the CLI
//! commands. All graph logic lives in `pixnet-core`.

pub mod cli;
pub mod config;
pub mod loader;
pub mod resolver;
