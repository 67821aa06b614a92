//! Voxel region data: the unit of generation, eviction, and meshing.

use std::sync::Arc;

use strata_common::{BlockPos, Direction, LocalPos, RegionCoord, RegionDims};

use crate::block::BlockType;

/// Voxel data for one region.
///
/// Owns a flat `edge² × height` block array. Created whole by the
/// data-synthesis stage; mutated in place only by the decoration pass
/// and by direct block edits. A player edit sets [`RegionData::player_modified`],
/// which pins the region: pinned data is never evicted, although its
/// renderable may be and can later be re-derived from the retained data.
#[derive(Debug, Clone)]
pub struct RegionData {
    coord: RegionCoord,
    dims: RegionDims,
    blocks: Vec<BlockType>,
    /// Pin flag: set by gameplay edits, never cleared.
    pub player_modified: bool,
    /// World-space canopy positions recorded during synthesis, applied
    /// by the decoration pass. May spill into neighboring regions.
    canopy: Vec<BlockPos>,
}

impl RegionData {
    /// Creates an empty (all-air) region at the given coordinate.
    #[must_use]
    pub fn new(coord: RegionCoord, dims: RegionDims) -> Self {
        Self {
            coord,
            dims,
            blocks: vec![BlockType::Air; dims.block_count()],
            player_modified: false,
            canopy: Vec::new(),
        }
    }

    /// The region's coordinate (its minimum block corner).
    #[must_use]
    pub const fn coord(&self) -> RegionCoord {
        self.coord
    }

    /// The region's dimensions.
    #[must_use]
    pub const fn dims(&self) -> RegionDims {
        self.dims
    }

    /// Whether a world position falls inside this region.
    #[must_use]
    pub fn contains(&self, pos: BlockPos) -> bool {
        self.dims.snap(pos) == self.coord
    }

    /// Block at a local coordinate.
    #[must_use]
    pub fn block_at_local(&self, local: LocalPos) -> BlockType {
        self.blocks[local.to_index(self.dims)]
    }

    /// Sets the block at a local coordinate.
    pub fn set_block_local(&mut self, local: LocalPos, block: BlockType) {
        let index = local.to_index(self.dims);
        self.blocks[index] = block;
    }

    /// Block at a world position, or `None` when the position lies
    /// outside this region (the caller falls back to the store).
    #[must_use]
    pub fn block_at(&self, pos: BlockPos) -> Option<BlockType> {
        if self.contains(pos) {
            Some(self.block_at_local(self.dims.local(pos)))
        } else {
            None
        }
    }

    /// Records a canopy position for the decoration pass.
    pub fn record_canopy(&mut self, pos: BlockPos) {
        self.canopy.push(pos);
    }

    /// Drains the recorded canopy positions.
    pub fn take_canopy(&mut self) -> Vec<BlockPos> {
        std::mem::take(&mut self.canopy)
    }

    /// Recorded canopy positions not yet applied.
    #[must_use]
    pub fn canopy(&self) -> &[BlockPos] {
        &self.canopy
    }

    /// Whether the world position lies on one of this region's six faces.
    #[must_use]
    pub fn is_on_boundary(&self, pos: BlockPos) -> bool {
        !self.boundary_faces(pos).is_empty()
    }

    /// The face directions on which the given world position lies.
    ///
    /// A corner block reports several faces; an interior block reports
    /// none. Positions outside the region report none.
    #[must_use]
    pub fn boundary_faces(&self, pos: BlockPos) -> Vec<Direction> {
        if !self.contains(pos) {
            return Vec::new();
        }
        let local = self.dims.local(pos);
        let mut faces = Vec::new();
        if local.x == 0 {
            faces.push(Direction::Left);
        }
        if local.x == self.dims.edge - 1 {
            faces.push(Direction::Right);
        }
        if local.z == 0 {
            faces.push(Direction::Back);
        }
        if local.z == self.dims.edge - 1 {
            faces.push(Direction::Forward);
        }
        if local.y == 0 {
            faces.push(Direction::Down);
        }
        if local.y == self.dims.height - 1 {
            faces.push(Direction::Up);
        }
        faces
    }

    /// Region coordinates adjacent across each face the position lies on.
    #[must_use]
    pub fn boundary_neighbors(&self, pos: BlockPos) -> Vec<RegionCoord> {
        self.boundary_faces(pos)
            .into_iter()
            .map(|face| self.coord.neighbor(face, self.dims))
            .collect()
    }

    /// An immutable snapshot of the block array for mesh construction.
    #[must_use]
    pub fn snapshot(&self) -> RegionSnapshot {
        RegionSnapshot {
            coord: self.coord,
            dims: self.dims,
            blocks: Arc::from(self.blocks.as_slice()),
        }
    }
}

/// Immutable snapshot of a region's blocks, handed to mesh workers.
///
/// Mesh data is derived wholly from a snapshot, so later edits to the
/// live region never race with an in-flight mesh build.
#[derive(Debug, Clone)]
pub struct RegionSnapshot {
    coord: RegionCoord,
    dims: RegionDims,
    blocks: Arc<[BlockType]>,
}

impl RegionSnapshot {
    /// The snapshot's region coordinate.
    #[must_use]
    pub const fn coord(&self) -> RegionCoord {
        self.coord
    }

    /// The snapshot's region dimensions.
    #[must_use]
    pub const fn dims(&self) -> RegionDims {
        self.dims
    }

    /// Block at a local coordinate.
    #[must_use]
    pub fn block_at_local(&self, local: LocalPos) -> BlockType {
        self.blocks[local.to_index(self.dims)]
    }

    /// The raw block array.
    #[must_use]
    pub fn blocks(&self) -> &[BlockType] {
        &self.blocks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DIMS: RegionDims = RegionDims::new(16, 100);

    #[test]
    fn test_contains_and_local_access() {
        let mut region = RegionData::new(RegionCoord::new(16, 0, -16), DIMS);
        assert!(region.contains(BlockPos::new(16, 0, -16)));
        assert!(region.contains(BlockPos::new(31, 99, -1)));
        assert!(!region.contains(BlockPos::new(32, 0, -1)));

        region.set_block_local(LocalPos::new(3, 4, 5), BlockType::Stone);
        assert_eq!(
            region.block_at(BlockPos::new(19, 4, -11)),
            Some(BlockType::Stone)
        );
        assert_eq!(region.block_at(BlockPos::new(0, 0, 0)), None);
    }

    #[test]
    fn test_boundary_faces_exact() {
        let region = RegionData::new(RegionCoord::new(0, 0, 0), DIMS);

        // Interior block touches no face.
        assert!(region.boundary_faces(BlockPos::new(8, 50, 8)).is_empty());

        // Single-face block.
        assert_eq!(
            region.boundary_faces(BlockPos::new(0, 50, 8)),
            vec![Direction::Left]
        );

        // Corner block touches three faces.
        let faces = region.boundary_faces(BlockPos::new(15, 0, 0));
        assert_eq!(faces.len(), 3);
        assert!(faces.contains(&Direction::Right));
        assert!(faces.contains(&Direction::Back));
        assert!(faces.contains(&Direction::Down));
    }

    #[test]
    fn test_boundary_neighbors_step_by_region_size() {
        let region = RegionData::new(RegionCoord::new(0, 0, 0), DIMS);
        let neighbors = region.boundary_neighbors(BlockPos::new(15, 50, 8));
        assert_eq!(neighbors, vec![RegionCoord::new(16, 0, 0)]);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut region = RegionData::new(RegionCoord::new(0, 0, 0), DIMS);
        region.set_block_local(LocalPos::new(1, 1, 1), BlockType::Dirt);
        let snapshot = region.snapshot();
        region.set_block_local(LocalPos::new(1, 1, 1), BlockType::Stone);

        assert_eq!(
            snapshot.block_at_local(LocalPos::new(1, 1, 1)),
            BlockType::Dirt
        );
    }
}
