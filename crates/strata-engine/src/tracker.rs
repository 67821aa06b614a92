//! Observer movement detection and spawn placement.

use std::time::Duration;

use strata_common::{BlockPos, RegionDims};
use strata_kernel::RegionStore;

/// Downward ground probe, used once at spawn placement.
pub trait GroundProbe {
    /// Probes straight down from `(x, from_y, z)` and returns the Y of
    /// the first position above solid ground, if any lies within
    /// `max_depth` blocks.
    fn probe_ground(&self, x: i32, z: i32, from_y: i32, max_depth: u32) -> Option<i32>;
}

impl GroundProbe for RegionStore {
    fn probe_ground(&self, x: i32, z: i32, from_y: i32, max_depth: u32) -> Option<i32> {
        self.ground_height(x, z, from_y, max_depth)
    }
}

/// Finds the observer spawn position by probing the center column of
/// the origin region, or `None` when no ground was generated there.
#[must_use]
pub fn find_spawn_position(probe: &dyn GroundProbe, dims: RegionDims) -> Option<BlockPos> {
    let x = dims.edge as i32 / 2;
    let z = dims.edge as i32 / 2;
    let from_y = dims.height as i32;
    probe
        .probe_ground(x, z, from_y, dims.height + 20)
        .map(|y| BlockPos::new(x, y, z))
}

/// Host-ticked movement sentinel.
///
/// Replaces per-frame polling with an explicit timer the host loop
/// drives: every `interval`, the sentinel compares the observer against
/// the center of the last-seen region and reports when the observer has
/// moved more than one region edge horizontally or one region height
/// vertically. A report means a new streaming cycle should start; the
/// host rebases after the cycle is issued.
#[derive(Debug)]
pub struct MovementSentinel {
    dims: RegionDims,
    interval: Duration,
    elapsed: Duration,
    center: BlockPos,
}

impl MovementSentinel {
    /// Creates a sentinel centered on the observer's starting region.
    #[must_use]
    pub fn new(dims: RegionDims, interval: Duration, observer: BlockPos) -> Self {
        let mut sentinel = Self {
            dims,
            interval,
            elapsed: Duration::ZERO,
            center: BlockPos::ZERO,
        };
        sentinel.rebase(observer);
        sentinel
    }

    /// Re-centers on the observer's current region, after a cycle ran.
    pub fn rebase(&mut self, observer: BlockPos) {
        let region = self.dims.snap(observer);
        self.center = BlockPos::new(
            region.x + self.dims.edge as i32 / 2,
            region.y + self.dims.height as i32 / 2,
            region.z + self.dims.edge as i32 / 2,
        );
    }

    /// The center the sentinel is currently anchored to.
    #[must_use]
    pub const fn center(&self) -> BlockPos {
        self.center
    }

    /// Advances the timer; returns `true` when the check interval
    /// elapsed and the observer has crossed the movement threshold.
    pub fn tick(&mut self, observer: BlockPos, dt: Duration) -> bool {
        self.elapsed += dt;
        if self.elapsed < self.interval {
            return false;
        }
        self.elapsed = Duration::ZERO;
        self.threshold_crossed(observer)
    }

    fn threshold_crossed(&self, observer: BlockPos) -> bool {
        (self.center.x - observer.x).abs() > self.dims.edge as i32
            || (self.center.z - observer.z).abs() > self.dims.edge as i32
            || (self.center.y - observer.y).abs() > self.dims.height as i32
    }
}
