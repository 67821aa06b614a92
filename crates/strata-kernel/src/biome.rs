//! Biome-cell center calculation for macro-scale terrain features.
//!
//! Biome cells are squares of `render_distance × edge` blocks. The
//! terrain source receives the centers of the observer's cell and a
//! two-ring compass neighborhood before synthesis, so macro features
//! (biome blending, large structures) stay coherent across regions.

use ahash::AHashSet;

use strata_common::BlockPos;

/// The eight compass directions on the horizontal plane.
pub const COMPASS_8: [(i32, i32); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

/// Ring-depth multipliers applied per compass direction.
const RING_OFFSETS: [(i32, i32); 4] = [(1, 1), (1, 2), (2, 1), (2, 2)];

/// Centers of the biome cell containing the observer plus its two-ring
/// compass neighborhood.
///
/// Diagonal rings overlap at depth 2, so the result is de-duplicated;
/// insertion order is deterministic. All centers sit at `y = 0`. A
/// degenerate zero-length cell (render distance 0) collapses to
/// unit-length cells instead of dividing by zero.
#[must_use]
pub fn biome_centers(observer: BlockPos, render_distance: u32, edge: u32) -> Vec<BlockPos> {
    let length = ((render_distance * edge) as i32).max(1);
    let origin = BlockPos::new(
        round_to_multiple(observer.x, length),
        0,
        round_to_multiple(observer.z, length),
    );

    let mut seen = AHashSet::new();
    let mut centers = Vec::new();
    seen.insert(origin);
    centers.push(origin);

    for (dx, dz) in COMPASS_8 {
        for (mx, mz) in RING_OFFSETS {
            let center = BlockPos::new(origin.x + dx * mx * length, 0, origin.z + dz * mz * length);
            if seen.insert(center) {
                centers.push(center);
            }
        }
    }
    centers
}

/// Rounds to the nearest multiple of `length`.
const fn round_to_multiple(value: i32, length: i32) -> i32 {
    (value + length / 2).div_euclid(length) * length
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observer_cell_center_comes_first() {
        // render distance 8, edge 16 -> biome length 128
        let centers = biome_centers(BlockPos::ZERO, 8, 16);
        assert_eq!(centers[0], BlockPos::ZERO);

        // Observer past the cell midpoint rounds to the next center.
        let centers = biome_centers(BlockPos::new(70, 0, -70), 8, 16);
        assert_eq!(centers[0], BlockPos::new(128, 0, -128));
    }

    #[test]
    fn test_two_ring_neighborhood_is_deduplicated() {
        let centers = biome_centers(BlockPos::ZERO, 8, 16);
        let len = 128;

        // 1 origin + 2 unique per axis direction + 4 unique per diagonal.
        assert_eq!(centers.len(), 1 + 4 * 2 + 4 * 4);

        let set: AHashSet<BlockPos> = centers.iter().copied().collect();
        assert_eq!(set.len(), centers.len());

        // Exact expected set from the 8-direction x {1,2}-ring formula.
        let mut expected = AHashSet::new();
        expected.insert(BlockPos::ZERO);
        for (dx, dz) in COMPASS_8 {
            for (mx, mz) in [(1, 1), (1, 2), (2, 1), (2, 2)] {
                expected.insert(BlockPos::new(dx * mx * len, 0, dz * mz * len));
            }
        }
        assert_eq!(set, expected);
    }

    #[test]
    fn test_zero_render_distance_collapses_to_unit_cells() {
        let centers = biome_centers(BlockPos::new(5, 0, -3), 0, 16);
        assert_eq!(centers[0], BlockPos::new(5, 0, -3));
        assert_eq!(centers.len(), 1 + 4 * 2 + 4 * 4);
    }
}
