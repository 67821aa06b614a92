//! # Strata Kernel
//!
//! The world kernel: voxel region data, the authoritative region store,
//! and the pure spatial windowing math that drives streaming.
//!
//! This crate provides:
//! - Block and region data types with per-region mutation pins
//! - The region store: data map + rendered map, coordinator-owned
//! - Spatial window calculation and create/evict planning
//! - Biome-center calculation for macro-scale terrain features
//! - Collaborator seams for terrain synthesis and mesh construction
//!
//! ## Architecture
//!
//! Everything here is synchronous and single-owner. The store's two maps
//! are mutated only by the streaming coordinator; pipeline workers write
//! to scratch maps that the coordinator merges, so the authoritative
//! maps need no locking.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod biome;
pub mod block;
pub mod mesh;
pub mod region;
pub mod store;
pub mod terrain;
pub mod window;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::biome::*;
    pub use crate::block::*;
    pub use crate::mesh::*;
    pub use crate::region::*;
    pub use crate::store::*;
    pub use crate::terrain::*;
    pub use crate::window::*;
}

pub use prelude::*;
