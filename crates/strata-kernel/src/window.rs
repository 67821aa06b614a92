//! Spatial window calculation: which regions need data, which need
//! rendering, and the create/evict diff against current store state.
//!
//! Everything in this module is pure. The streaming controller runs
//! [`plan_cycle`] off the main flow with cloned key snapshots, since it
//! allocates proportional to the squared render distance.

use ahash::AHashSet;

use strata_common::{BlockPos, RegionCoord, RegionDims};

/// Inputs that shape the spatial window.
#[derive(Debug, Clone, Copy)]
pub struct WindowParams {
    /// Horizontal half-width of the render window, in regions.
    pub render_distance: u32,
    /// Region dimensions.
    pub dims: RegionDims,
}

/// The create/evict lists for one streaming cycle.
///
/// Create lists are ordered nearest-first so visible terrain appears
/// before distant terrain; evict lists are sorted by coordinate for
/// reproducible iteration.
#[derive(Debug, Clone, Default)]
pub struct StreamingPlan {
    /// Regions that need voxel data synthesized, nearest first.
    pub data_to_create: Vec<RegionCoord>,
    /// Regions that need a renderable, nearest first.
    pub render_to_create: Vec<RegionCoord>,
    /// Stored, unpinned regions that left the data window.
    pub data_to_evict: Vec<RegionCoord>,
    /// Rendered regions that left the render window.
    pub render_to_evict: Vec<RegionCoord>,
}

/// Candidate region coordinates that must be rendered around the observer.
///
/// A square horizontal window of half-width `render_distance` regions,
/// with a narrow vertical band: every column gets the observer's layer;
/// columns within one region edge of the observer's column on both
/// horizontal axes also get one layer below and one above. Vertical
/// extent needed is far smaller than horizontal, hence the asymmetry.
#[must_use]
pub fn render_positions(observer: BlockPos, params: WindowParams) -> Vec<RegionCoord> {
    window_positions(observer, params.render_distance as i32, params.dims)
}

/// Candidate region coordinates that must have voxel data.
///
/// One region wider than the render window on the horizontal axes, so
/// neighbor data exists for boundary decoration (tree canopies spilling
/// over a region edge) before that neighbor is itself rendered.
#[must_use]
pub fn data_positions(observer: BlockPos, params: WindowParams) -> Vec<RegionCoord> {
    window_positions(observer, params.render_distance as i32 + 1, params.dims)
}

fn window_positions(observer: BlockPos, radius: i32, dims: RegionDims) -> Vec<RegionCoord> {
    let edge = dims.edge as i32;
    let height = dims.height as i32;
    let center = dims.snap(observer);

    let mut positions = Vec::new();
    for dx in -radius..=radius {
        for dz in -radius..=radius {
            let x = center.x + dx * edge;
            let z = center.z + dz * edge;
            positions.push(RegionCoord::new(x, center.y, z));

            // Extra vertical band only near the observer's own column.
            if dx.abs() <= 1 && dz.abs() <= 1 {
                positions.push(RegionCoord::new(x, center.y - height, z));
                positions.push(RegionCoord::new(x, center.y + height, z));
            }
        }
    }
    positions
}

/// Diffs the candidate windows against current store state.
///
/// `data_coords`/`rendered_coords` are snapshots of the store's key
/// sets; `pinned` holds the player-modified coordinates that must never
/// be evicted from the data set regardless of distance.
#[must_use]
pub fn plan_cycle(
    observer: BlockPos,
    params: WindowParams,
    data_coords: &AHashSet<RegionCoord>,
    rendered_coords: &AHashSet<RegionCoord>,
    pinned: &AHashSet<RegionCoord>,
) -> StreamingPlan {
    let render_window = render_positions(observer, params);
    let data_window = data_positions(observer, params);

    let render_set: AHashSet<RegionCoord> = render_window.iter().copied().collect();
    let data_set: AHashSet<RegionCoord> = data_window.iter().copied().collect();

    let data_to_create = select_to_create(&data_window, data_coords, observer);
    let render_to_create = select_to_create(&render_window, rendered_coords, observer);

    let mut data_to_evict: Vec<RegionCoord> = data_coords
        .iter()
        .filter(|coord| !data_set.contains(coord) && !pinned.contains(coord))
        .copied()
        .collect();
    let mut render_to_evict: Vec<RegionCoord> = rendered_coords
        .iter()
        .filter(|coord| !render_set.contains(coord))
        .copied()
        .collect();
    data_to_evict.sort_unstable_by_key(|c| (c.x, c.y, c.z));
    render_to_evict.sort_unstable_by_key(|c| (c.x, c.y, c.z));

    StreamingPlan {
        data_to_create,
        render_to_create,
        data_to_evict,
        render_to_evict,
    }
}

/// Missing candidates ordered nearest-first.
///
/// Exact `i64` squared distance keeps the ordering deterministic; the
/// sort is stable so ties keep window iteration order.
fn select_to_create(
    window: &[RegionCoord],
    existing: &AHashSet<RegionCoord>,
    observer: BlockPos,
) -> Vec<RegionCoord> {
    let mut missing: Vec<RegionCoord> = window
        .iter()
        .filter(|coord| !existing.contains(coord))
        .copied()
        .collect();
    missing.sort_by_key(|coord| observer.distance_squared(coord.min_corner()));
    missing
}
