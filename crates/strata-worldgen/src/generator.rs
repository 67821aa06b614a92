//! Layered-noise terrain generator.

use noise::{Fbm, NoiseFn, Perlin};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::debug;

use strata_common::{BlockPos, RegionCoord, RegionDims, StreamResult};
use strata_kernel::{BlockType, RegionData, TerrainSource};

/// Parameters controlling terrain synthesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Water fills empty space up to this world Y.
    pub sea_level: i32,
    /// Mean terrain surface height in world Y.
    pub base_height: i32,
    /// Maximum surface deviation from the base height, in blocks.
    pub height_amplitude: i32,
    /// Horizontal noise scale (larger = smoother terrain).
    pub terrain_scale: f64,
    /// Tree-noise threshold in `[-1, 1]`; lower means denser forests.
    pub tree_threshold: f64,
    /// Whether to place trees at all.
    pub trees: bool,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            sea_level: 26,
            base_height: 30,
            height_amplitude: 12,
            terrain_scale: 0.01,
            tree_threshold: 0.72,
            trees: true,
        }
    }
}

/// Noise-based terrain source.
///
/// Deterministic for a given seed: the same region coordinate always
/// yields the same voxel content and the same recorded canopy targets.
pub struct NoiseTerrain {
    seed: u64,
    params: GenerationParams,
    terrain_noise: Fbm<Perlin>,
    tree_noise: Perlin,
    biome_noise: Perlin,
    /// Macro biome cell centers installed before each cycle.
    biome_centers: RwLock<Vec<BlockPos>>,
}

impl NoiseTerrain {
    /// Creates a generator with default parameters.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_params(seed, GenerationParams::default())
    }

    /// Creates a generator with explicit parameters.
    #[must_use]
    pub fn with_params(seed: u64, params: GenerationParams) -> Self {
        let noise_seed = seed as u32;
        Self {
            seed,
            params,
            terrain_noise: Fbm::new(noise_seed),
            tree_noise: Perlin::new(noise_seed.wrapping_add(1)),
            biome_noise: Perlin::new(noise_seed.wrapping_add(2)),
            biome_centers: RwLock::new(Vec::new()),
        }
    }

    /// The generator's seed.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Surface height at a world column.
    fn surface_height(&self, wx: i32, wz: i32) -> i32 {
        let sample = self.terrain_noise.get([
            f64::from(wx) * self.params.terrain_scale,
            f64::from(wz) * self.params.terrain_scale,
        ]);
        let amplitude = f64::from(self.params.height_amplitude) * self.biome_amplitude(wx, wz);
        self.params.base_height + (sample * amplitude) as i32
    }

    /// Height modulation from the nearest biome cell center.
    ///
    /// Each center carries a temperature sampled from its own position;
    /// warm cells flatten terrain, cold cells exaggerate it. Without
    /// installed centers the factor is neutral.
    fn biome_amplitude(&self, wx: i32, wz: i32) -> f64 {
        let centers = self.biome_centers.read();
        let nearest = centers.iter().min_by_key(|center| {
            let dx = i64::from(center.x - wx);
            let dz = i64::from(center.z - wz);
            dx * dx + dz * dz
        });
        match nearest {
            Some(center) => {
                let temperature = self
                    .biome_noise
                    .get([f64::from(center.x) * 0.001, f64::from(center.z) * 0.001]);
                1.0 + temperature * 0.4
            }
            None => 1.0,
        }
    }

    /// Deterministic per-column RNG for tree shape jitter.
    fn column_rng(&self, wx: i32, wz: i32) -> fastrand::Rng {
        let mix = (wx as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
            ^ (wz as u64).wrapping_mul(0xC2B2_AE3D_27D4_EB4F);
        fastrand::Rng::with_seed(self.seed ^ mix)
    }

    /// Whether a tree stands at this column.
    fn has_tree(&self, wx: i32, wz: i32) -> bool {
        self.params.trees
            && self
                .tree_noise
                .get([f64::from(wx) * 0.8, f64::from(wz) * 0.8])
                > self.params.tree_threshold
    }

    /// Places a trunk inside the region and records the canopy.
    ///
    /// Trunk blocks falling outside this region's vertical span are
    /// skipped; canopy positions are recorded world-space and may land
    /// in neighboring regions, to be written by the decoration pass.
    fn place_tree(&self, region: &mut RegionData, wx: i32, surface: i32, wz: i32) {
        let dims = region.dims();
        let mut rng = self.column_rng(wx, wz);
        let trunk_height = rng.i32(4..=6);
        let top = surface + trunk_height;

        for wy in (surface + 1)..=top {
            let pos = BlockPos::new(wx, wy, wz);
            if region.contains(pos) {
                region.set_block_local(dims.local(pos), BlockType::TreeTrunk);
            }
        }

        // Two canopy layers around the top, plus a cap.
        for dy in 0..2 {
            for dx in -1..=1 {
                for dz in -1..=1 {
                    if dx == 0 && dz == 0 && dy == 0 {
                        continue; // trunk top occupies this cell
                    }
                    region.record_canopy(BlockPos::new(wx + dx, top + dy, wz + dz));
                }
            }
        }
        region.record_canopy(BlockPos::new(wx, top + 2, wz));
    }
}

impl TerrainSource for NoiseTerrain {
    fn prepare_biomes(&self, centers: &[BlockPos]) {
        debug!(count = centers.len(), "installing biome centers");
        *self.biome_centers.write() = centers.to_vec();
    }

    fn synthesize(&self, coord: RegionCoord, dims: RegionDims) -> StreamResult<RegionData> {
        let mut region = RegionData::new(coord, dims);

        for x in 0..dims.edge as i32 {
            for z in 0..dims.edge as i32 {
                let wx = coord.x + x;
                let wz = coord.z + z;
                let surface = self.surface_height(wx, wz);

                for y in 0..dims.height as i32 {
                    let wy = coord.y + y;
                    let block = if wy < surface - 3 {
                        BlockType::Stone
                    } else if wy < surface {
                        BlockType::Dirt
                    } else if wy == surface {
                        if wy <= self.params.sea_level {
                            BlockType::Sand
                        } else {
                            BlockType::GrassDirt
                        }
                    } else if wy <= self.params.sea_level {
                        BlockType::Water
                    } else {
                        BlockType::Air
                    };
                    let pos = BlockPos::new(wx, wy, wz);
                    region.set_block_local(dims.local(pos), block);
                }

                let surface_in_region =
                    surface >= coord.y && surface < coord.y + dims.height as i32;
                if surface_in_region
                    && surface > self.params.sea_level
                    && self.has_tree(wx, wz)
                {
                    self.place_tree(&mut region, wx, surface, wz);
                }
            }
        }

        Ok(region)
    }
}
