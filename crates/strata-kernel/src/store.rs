//! The authoritative region store: voxel data and renderable state.

use ahash::{AHashMap, AHashSet};
use tracing::trace;

use strata_common::{BlockPos, Direction, RegionCoord, RegionDims, RenderableId};

use crate::block::BlockType;
use crate::region::RegionData;

/// Two independent mappings keyed by region coordinate: one for voxel
/// data, one for live renderable handles.
///
/// Both maps are mutated only by the streaming coordinator. Pipeline
/// workers never touch the store; they fill scratch maps that the
/// coordinator merges, so no locking is needed here.
///
/// Invariant: every rendered coordinate refers to a live renderable
/// handle, and entered the rendered set only after its voxel data
/// existed.
#[derive(Debug)]
pub struct RegionStore {
    dims: RegionDims,
    data: AHashMap<RegionCoord, RegionData>,
    rendered: AHashMap<RegionCoord, RenderableId>,
    /// Decoration targets whose owning region does not exist yet.
    pending_decorations: Vec<BlockPos>,
}

impl RegionStore {
    /// Creates an empty store for regions of the given dimensions.
    #[must_use]
    pub fn new(dims: RegionDims) -> Self {
        Self {
            dims,
            data: AHashMap::new(),
            rendered: AHashMap::new(),
            pending_decorations: Vec::new(),
        }
    }

    /// The fixed region dimensions.
    #[must_use]
    pub const fn dims(&self) -> RegionDims {
        self.dims
    }

    // --- data set ---

    /// Inserts freshly synthesized region data.
    pub fn insert_data(&mut self, region: RegionData) {
        self.data.insert(region.coord(), region);
    }

    /// Removes a region's voxel data. Pinned regions are the caller's
    /// responsibility to exclude; this method removes unconditionally.
    pub fn remove_data(&mut self, coord: RegionCoord) -> Option<RegionData> {
        self.data.remove(&coord)
    }

    /// Region data at a coordinate.
    #[must_use]
    pub fn data(&self, coord: RegionCoord) -> Option<&RegionData> {
        self.data.get(&coord)
    }

    /// Mutable region data at a coordinate.
    pub fn data_mut(&mut self, coord: RegionCoord) -> Option<&mut RegionData> {
        self.data.get_mut(&coord)
    }

    /// Whether voxel data exists for a coordinate.
    #[must_use]
    pub fn contains_data(&self, coord: RegionCoord) -> bool {
        self.data.contains_key(&coord)
    }

    /// Number of regions with voxel data.
    #[must_use]
    pub fn data_len(&self) -> usize {
        self.data.len()
    }

    /// Snapshot of all data coordinates, for off-thread windowing.
    #[must_use]
    pub fn data_coords(&self) -> AHashSet<RegionCoord> {
        self.data.keys().copied().collect()
    }

    /// Snapshot of all pinned (player-modified) coordinates.
    #[must_use]
    pub fn pinned_coords(&self) -> AHashSet<RegionCoord> {
        self.data
            .iter()
            .filter(|(_, region)| region.player_modified)
            .map(|(coord, _)| *coord)
            .collect()
    }

    /// Iterates mutably over all stored regions.
    pub fn iter_data_mut(&mut self) -> impl Iterator<Item = &mut RegionData> {
        self.data.values_mut()
    }

    // --- rendered set ---

    /// Records a live renderable handle for a coordinate.
    pub fn insert_rendered(&mut self, coord: RegionCoord, id: RenderableId) {
        self.rendered.insert(coord, id);
    }

    /// Removes the renderable entry for a coordinate, returning the
    /// handle so the caller can release it back to the pool.
    pub fn remove_rendered(&mut self, coord: RegionCoord) -> Option<RenderableId> {
        self.rendered.remove(&coord)
    }

    /// The renderable handle at a coordinate, if rendered.
    #[must_use]
    pub fn rendered_id(&self, coord: RegionCoord) -> Option<RenderableId> {
        self.rendered.get(&coord).copied()
    }

    /// Whether a coordinate currently has a live renderable.
    #[must_use]
    pub fn is_rendered(&self, coord: RegionCoord) -> bool {
        self.rendered.contains_key(&coord)
    }

    /// Number of rendered regions.
    #[must_use]
    pub fn rendered_len(&self) -> usize {
        self.rendered.len()
    }

    /// Snapshot of all rendered coordinates, for off-thread windowing.
    #[must_use]
    pub fn rendered_coords(&self) -> AHashSet<RegionCoord> {
        self.rendered.keys().copied().collect()
    }

    // --- world-space block access ---

    /// Block at a world position.
    ///
    /// Absence of data is a valid steady state: positions outside any
    /// stored region resolve to [`BlockType::Nothing`].
    #[must_use]
    pub fn block_at(&self, pos: BlockPos) -> BlockType {
        let coord = self.dims.snap(pos);
        match self.data.get(&coord) {
            Some(region) => region.block_at_local(self.dims.local(pos)),
            None => BlockType::Nothing,
        }
    }

    /// Writes a block from a gameplay edit, pinning the owning region.
    ///
    /// Returns `false` when no voxel data covers the position.
    pub fn set_block(&mut self, pos: BlockPos, block: BlockType) -> bool {
        let coord = self.dims.snap(pos);
        let local = self.dims.local(pos);
        match self.data.get_mut(&coord) {
            Some(region) => {
                region.set_block_local(local, block);
                region.player_modified = true;
                true
            }
            None => false,
        }
    }

    /// Writes a block from the decoration pass.
    ///
    /// Unlike [`RegionStore::set_block`] this never pins, and silently
    /// skips positions outside any stored region.
    pub fn apply_decoration(&mut self, pos: BlockPos, block: BlockType) -> bool {
        let coord = self.dims.snap(pos);
        let local = self.dims.local(pos);
        match self.data.get_mut(&coord) {
            Some(region) => {
                region.set_block_local(local, block);
                true
            }
            None => false,
        }
    }

    /// Applies every pending canopy decoration recorded during synthesis.
    ///
    /// Walks the full data set (not just the last batch) because a tree
    /// trunk in one region may drop leaves into a neighbor generated in
    /// an earlier cycle. Targets whose region does not exist yet stay
    /// pending until a later pass finds it generated. Returns the number
    /// of blocks written.
    pub fn apply_pending_decorations(&mut self) -> usize {
        let mut targets = std::mem::take(&mut self.pending_decorations);
        for region in self.data.values_mut() {
            targets.append(&mut region.take_canopy());
        }

        let mut applied = 0;
        for pos in targets {
            if self.apply_decoration(pos, BlockType::TreeLeaves) {
                applied += 1;
            } else {
                self.pending_decorations.push(pos);
            }
        }
        trace!(
            applied,
            pending = self.pending_decorations.len(),
            "applied pending canopy decorations"
        );
        applied
    }

    /// Downward probe from `(x, from_y, z)` for the first solid block.
    ///
    /// Returns the Y of the block directly above the hit surface, or
    /// `None` when nothing solid lies within `max_depth` blocks.
    #[must_use]
    pub fn ground_height(&self, x: i32, z: i32, from_y: i32, max_depth: u32) -> Option<i32> {
        let floor = from_y - max_depth as i32;
        let mut probe = BlockPos::new(x, from_y, z);
        while probe.y >= floor {
            if self.block_at(probe).is_solid() {
                return Some(probe.y + 1);
            }
            probe = probe.stepped(Direction::Down);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_common::LocalPos;

    const DIMS: RegionDims = RegionDims::new(16, 100);

    fn store_with_region(coord: RegionCoord) -> RegionStore {
        let mut store = RegionStore::new(DIMS);
        store.insert_data(RegionData::new(coord, DIMS));
        store
    }

    #[test]
    fn test_block_at_miss_is_nothing() {
        let store = RegionStore::new(DIMS);
        assert_eq!(store.block_at(BlockPos::new(5, 5, 5)), BlockType::Nothing);
    }

    #[test]
    fn test_set_block_pins_region() {
        let mut store = store_with_region(RegionCoord::new(0, 0, 0));
        assert!(store.pinned_coords().is_empty());

        assert!(store.set_block(BlockPos::new(3, 10, 3), BlockType::Stone));
        assert_eq!(store.block_at(BlockPos::new(3, 10, 3)), BlockType::Stone);
        assert!(store.pinned_coords().contains(&RegionCoord::new(0, 0, 0)));

        // Outside any stored region: no write, no pin.
        assert!(!store.set_block(BlockPos::new(100, 10, 3), BlockType::Stone));
    }

    #[test]
    fn test_decoration_does_not_pin_and_crosses_regions() {
        let mut store = store_with_region(RegionCoord::new(0, 0, 0));
        store.insert_data(RegionData::new(RegionCoord::new(16, 0, 0), DIMS));

        // Canopy recorded in one region, landing in its neighbor.
        if let Some(region) = store.data_mut(RegionCoord::new(0, 0, 0)) {
            region.record_canopy(BlockPos::new(16, 40, 2));
            region.record_canopy(BlockPos::new(-1, 40, 2)); // no region there
        }

        assert_eq!(store.apply_pending_decorations(), 1);
        assert_eq!(
            store.block_at(BlockPos::new(16, 40, 2)),
            BlockType::TreeLeaves
        );
        assert!(store.pinned_coords().is_empty());

        // The miss stays pending; without new data nothing is applied.
        assert_eq!(store.apply_pending_decorations(), 0);
    }

    #[test]
    fn test_decoration_applies_once_late_neighbor_arrives() {
        let mut store = store_with_region(RegionCoord::new(0, 0, 0));
        if let Some(region) = store.data_mut(RegionCoord::new(0, 0, 0)) {
            region.record_canopy(BlockPos::new(16, 40, 2));
        }

        // Neighbor not generated yet: the target stays pending.
        assert_eq!(store.apply_pending_decorations(), 0);
        assert_eq!(store.block_at(BlockPos::new(16, 40, 2)), BlockType::Nothing);

        // A later cycle generates the neighbor; the pass catches up.
        store.insert_data(RegionData::new(RegionCoord::new(16, 0, 0), DIMS));
        assert_eq!(store.apply_pending_decorations(), 1);
        assert_eq!(
            store.block_at(BlockPos::new(16, 40, 2)),
            BlockType::TreeLeaves
        );
    }

    #[test]
    fn test_ground_height_probe() {
        let mut store = store_with_region(RegionCoord::new(0, 0, 0));
        if let Some(region) = store.data_mut(RegionCoord::new(0, 0, 0)) {
            region.set_block_local(LocalPos::new(8, 42, 8), BlockType::GrassDirt);
        }

        assert_eq!(store.ground_height(8, 8, 99, 120), Some(43));
        assert_eq!(store.ground_height(9, 8, 99, 120), None);
    }
}
