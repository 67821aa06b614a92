//! Coordinate types for block, region, and local positions.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::direction::Direction;

/// World-space block position (global voxel coordinate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct BlockPos {
    /// X coordinate in world space
    pub x: i32,
    /// Y coordinate in world space (vertical)
    pub y: i32,
    /// Z coordinate in world space
    pub z: i32,
}

impl BlockPos {
    /// World origin.
    pub const ZERO: Self = Self { x: 0, y: 0, z: 0 };

    /// Creates a new block position.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the position one block away in the given direction.
    #[must_use]
    pub const fn stepped(self, direction: Direction) -> Self {
        let o = direction.offset();
        Self {
            x: self.x + o.x,
            y: self.y + o.y,
            z: self.z + o.z,
        }
    }

    /// Squared Euclidean distance to another position, exact in `i64`.
    #[must_use]
    pub const fn distance_squared(self, other: Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        let dz = (self.z - other.z) as i64;
        dx * dx + dy * dy + dz * dz
    }
}

/// Region identity: the minimum block corner of a region.
///
/// Always a multiple of the region edge length on X/Z and of the region
/// height on Y. Produced by [`RegionDims::snap`]; equality and hashing
/// are structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Pod, Zeroable)]
#[repr(C)]
pub struct RegionCoord {
    /// X coordinate of the region's minimum corner
    pub x: i32,
    /// Y coordinate of the region's minimum corner
    pub y: i32,
    /// Z coordinate of the region's minimum corner
    pub z: i32,
}

impl RegionCoord {
    /// Creates a new region coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The region's minimum block corner as a block position.
    #[must_use]
    pub const fn min_corner(self) -> BlockPos {
        BlockPos::new(self.x, self.y, self.z)
    }

    /// The adjacent region coordinate in the given direction.
    #[must_use]
    pub const fn neighbor(self, direction: Direction, dims: RegionDims) -> Self {
        let o = direction.offset();
        Self {
            x: self.x + o.x * dims.edge as i32,
            y: self.y + o.y * dims.height as i32,
            z: self.z + o.z * dims.edge as i32,
        }
    }
}

/// Fixed dimensions of every region: horizontal edge length and height,
/// both in blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionDims {
    /// Horizontal edge length in blocks (X and Z)
    pub edge: u32,
    /// Vertical extent in blocks (Y)
    pub height: u32,
}

impl RegionDims {
    /// Creates new region dimensions.
    #[must_use]
    pub const fn new(edge: u32, height: u32) -> Self {
        Self { edge, height }
    }

    /// Total block count of one region (`edge² × height`).
    #[must_use]
    pub const fn block_count(self) -> usize {
        (self.edge as usize) * (self.edge as usize) * (self.height as usize)
    }

    /// Snaps a world block position to its enclosing region coordinate.
    ///
    /// Uses floor division per axis, so fractional/negative positions map
    /// deterministically to one region. Snapping an already-snapped
    /// coordinate is a no-op.
    #[must_use]
    pub const fn snap(self, pos: BlockPos) -> RegionCoord {
        let edge = self.edge as i32;
        let height = self.height as i32;
        RegionCoord {
            x: pos.x.div_euclid(edge) * edge,
            y: pos.y.div_euclid(height) * height,
            z: pos.z.div_euclid(edge) * edge,
        }
    }

    /// Local coordinate of a world block position within its region.
    #[must_use]
    pub const fn local(self, pos: BlockPos) -> LocalPos {
        let edge = self.edge as i32;
        let height = self.height as i32;
        LocalPos {
            x: pos.x.rem_euclid(edge) as u32,
            y: pos.y.rem_euclid(height) as u32,
            z: pos.z.rem_euclid(edge) as u32,
        }
    }
}

/// Local coordinate within a region (`0..edge` on X/Z, `0..height` on Y).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalPos {
    /// X coordinate within the region
    pub x: u32,
    /// Y coordinate within the region
    pub y: u32,
    /// Z coordinate within the region
    pub z: u32,
}

impl LocalPos {
    /// Creates a new local position.
    #[must_use]
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    /// Converts to a linear index into a region's flat block array.
    ///
    /// Layout is X-major within a Z row, Y-major across layers:
    /// `x + z·edge + y·edge²`.
    #[must_use]
    pub const fn to_index(self, dims: RegionDims) -> usize {
        let edge = dims.edge as usize;
        (self.x as usize) + (self.z as usize) * edge + (self.y as usize) * edge * edge
    }

    /// Creates a local position from a linear index.
    #[must_use]
    pub const fn from_index(index: usize, dims: RegionDims) -> Self {
        let edge = dims.edge as usize;
        Self {
            x: (index % edge) as u32,
            z: ((index / edge) % edge) as u32,
            y: (index / (edge * edge)) as u32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const DIMS: RegionDims = RegionDims::new(16, 100);

    #[test]
    fn test_snap_floor_on_negatives() {
        assert_eq!(
            DIMS.snap(BlockPos::new(-1, -1, -1)),
            RegionCoord::new(-16, -100, -16)
        );
        assert_eq!(
            DIMS.snap(BlockPos::new(-16, -100, -16)),
            RegionCoord::new(-16, -100, -16)
        );
        assert_eq!(DIMS.snap(BlockPos::new(0, 0, 0)), RegionCoord::new(0, 0, 0));
        assert_eq!(
            DIMS.snap(BlockPos::new(15, 99, 15)),
            RegionCoord::new(0, 0, 0)
        );
    }

    #[test]
    fn test_local_index_round_trip() {
        let local = LocalPos::new(3, 42, 15);
        let index = local.to_index(DIMS);
        assert_eq!(LocalPos::from_index(index, DIMS), local);
        assert!(index < DIMS.block_count());
    }

    proptest! {
        #[test]
        fn prop_snap_is_idempotent(x in -100_000i32..100_000, y in -10_000i32..10_000, z in -100_000i32..100_000) {
            let snapped = DIMS.snap(BlockPos::new(x, y, z));
            let again = DIMS.snap(snapped.min_corner());
            prop_assert_eq!(snapped, again);
        }

        #[test]
        fn prop_local_is_in_bounds(x in -100_000i32..100_000, y in -10_000i32..10_000, z in -100_000i32..100_000) {
            let local = DIMS.local(BlockPos::new(x, y, z));
            prop_assert!(local.x < DIMS.edge);
            prop_assert!(local.y < DIMS.height);
            prop_assert!(local.z < DIMS.edge);
        }
    }
}
