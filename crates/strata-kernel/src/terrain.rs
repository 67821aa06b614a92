//! Terrain synthesis collaborator seam.

use strata_common::{BlockPos, RegionCoord, RegionDims, StreamResult};

use crate::region::RegionData;

/// Procedural terrain-content collaborator.
///
/// Opaque to the core: given its seed and a region coordinate it must
/// deterministically produce that region's voxel content, including any
/// decoration targets (tree canopies) recorded on the region for the
/// post-merge decoration pass.
///
/// `synthesize` is called from worker threads; `prepare_biomes` is
/// called by the coordinator before each cycle's windowing, so
/// implementations needing mutable macro state use interior mutability.
pub trait TerrainSource: Send + Sync {
    /// Installs macro-scale biome cell centers ahead of synthesis.
    fn prepare_biomes(&self, centers: &[BlockPos]);

    /// Synthesizes voxel content for one region.
    fn synthesize(&self, coord: RegionCoord, dims: RegionDims) -> StreamResult<RegionData>;
}
