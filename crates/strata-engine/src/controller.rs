//! Streaming controller: drives one full world-update cycle.
//!
//! Cycle state machine: Windowing → Evicting → Generating → Decorating
//! → Meshing → Presenting → Completing. The controller is the only
//! writer of the region store and the renderable pool; pipeline stages
//! hand it merged batch results at hard barriers.

use std::sync::Arc;

use tracing::{debug, info, warn};

use strata_common::{BlockPos, RegionCoord, StreamError, StreamResult};
use strata_kernel::{
    biome_centers, plan_cycle, BlockType, Mesher, RegionData, RegionStore, StreamingPlan,
    TerrainSource,
};

use crate::cancel::CancelScope;
use crate::config::WorldConfig;
use crate::events::{WorldEvent, WorldEventBus};
use crate::pipeline::GenerationPipeline;
use crate::presenter::{RenderBackend, RenderablePool};

/// How one streaming cycle ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The cycle ran to completion.
    Completed {
        /// Regions whose voxel data was created
        created: usize,
        /// Regions presented this cycle
        presented: usize,
        /// Data entries evicted
        evicted_data: usize,
        /// Renderables released to the pool
        evicted_render: usize,
    },
    /// Cancellation was observed; already-merged work is kept, the
    /// remainder of the cycle was skipped.
    Cancelled,
}

/// Orchestrates streaming cycles around a moving observer.
pub struct StreamingController {
    config: WorldConfig,
    store: RegionStore,
    pipeline: GenerationPipeline,
    pool: RenderablePool,
    events: WorldEventBus,
    cancel: CancelScope,
    terrain: Arc<dyn TerrainSource>,
    mesher: Arc<dyn Mesher>,
    world_ever_ready: bool,
}

impl StreamingController {
    /// Creates a controller over the given collaborators.
    #[must_use]
    pub fn new(
        config: WorldConfig,
        terrain: Arc<dyn TerrainSource>,
        mesher: Arc<dyn Mesher>,
        backend: Box<dyn RenderBackend>,
    ) -> Self {
        let store = RegionStore::new(config.dims());
        let pipeline = GenerationPipeline::new(Arc::clone(&terrain), Arc::clone(&mesher));
        let events = WorldEventBus::new(config.event_capacity);
        Self {
            config,
            store,
            pipeline,
            pool: RenderablePool::new(backend),
            events,
            cancel: CancelScope::new(),
            terrain,
            mesher,
            world_ever_ready: false,
        }
    }

    /// The authoritative region store.
    #[must_use]
    pub const fn store(&self) -> &RegionStore {
        &self.store
    }

    /// The outbound event bus.
    #[must_use]
    pub const fn events(&self) -> &WorldEventBus {
        &self.events
    }

    /// The renderable pool.
    #[must_use]
    pub fn pool(&self) -> &RenderablePool {
        &self.pool
    }

    /// Whether the first cycle has ever completed.
    #[must_use]
    pub const fn is_world_ready(&self) -> bool {
        self.world_ever_ready
    }

    /// A handle to this controller's cancellation scope.
    #[must_use]
    pub fn cancel_scope(&self) -> CancelScope {
        self.cancel.clone()
    }

    /// Requests teardown: the in-flight cycle (if any) unwinds as
    /// [`CycleOutcome::Cancelled`], keeping already-merged state.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Runs one full streaming cycle around the observer position.
    ///
    /// Pipeline failures abort the cycle where they occur; store
    /// mutations from completed sub-steps are retained and the next
    /// trigger recomputes the plan against current state, naturally
    /// retrying whatever is still missing.
    pub async fn stream_around(&mut self, observer: BlockPos) -> StreamResult<CycleOutcome> {
        if self.cancel.is_cancelled() {
            return Ok(CycleOutcome::Cancelled);
        }

        // Macro biome hints must land before any synthesis.
        let centers = biome_centers(observer, self.config.render_distance, self.config.region_edge);
        self.terrain.prepare_biomes(&centers);

        // Windowing allocates proportional to render_distance², so it
        // runs off the coordinating flow against key snapshots.
        let plan = self.compute_plan(observer).await?;
        debug!(
            data_create = plan.data_to_create.len(),
            render_create = plan.render_to_create.len(),
            data_evict = plan.data_to_evict.len(),
            render_evict = plan.render_to_evict.len(),
            "windowing complete"
        );

        // Evicting.
        let evicted_render = plan.render_to_evict.len();
        for coord in &plan.render_to_evict {
            if let Some(id) = self.store.remove_rendered(*coord) {
                self.pool.release(id);
            }
        }
        let evicted_data = plan.data_to_evict.len();
        for coord in &plan.data_to_evict {
            self.store.remove_data(*coord);
        }

        // Generating: stage 1 over the data window.
        let outcome = self
            .pipeline
            .synthesize_batch(plan.data_to_create.clone(), self.config.dims(), &self.cancel)
            .await?;
        let cancelled = outcome.is_cancelled();
        let synthesized = outcome.into_results();
        let created = synthesized.len();
        for (_, region) in synthesized {
            self.store.insert_data(region);
        }
        if cancelled {
            debug!(created, "cycle cancelled during synthesis");
            return Ok(CycleOutcome::Cancelled);
        }

        // Decorating: against the full merged store, since canopies may
        // land in regions created by earlier cycles.
        let decorated = self.store.apply_pending_decorations();
        debug!(decorated, "decoration pass complete");

        // Meshing: regions the render window needs that have data. This
        // also re-derives renderables for pinned regions whose previous
        // renderable was evicted.
        let snapshots: Vec<_> = plan
            .render_to_create
            .iter()
            .filter_map(|coord| self.store.data(*coord).map(RegionData::snapshot))
            .collect();
        let outcome = self.pipeline.mesh_batch(snapshots, &self.cancel).await?;
        if outcome.is_cancelled() {
            debug!("cycle cancelled during meshing");
            return Ok(CycleOutcome::Cancelled);
        }
        let meshes = outcome.into_results();

        // Presenting: one region per iteration, yielding to the host
        // frame loop between regions so a large batch never blocks a
        // frame.
        let presented = meshes.len();
        for (coord, mesh) in meshes {
            let id = self.pool.present(coord, &mesh);
            self.store.insert_rendered(coord, id);
            tokio::task::yield_now().await;
        }

        // Completing.
        if !self.world_ever_ready {
            self.world_ever_ready = true;
            self.events.publish(WorldEvent::WorldCreated);
            info!("world created");
        }
        self.events.publish(WorldEvent::RegionBatchReady { created });
        info!(
            created,
            presented, evicted_data, evicted_render, "streaming cycle complete"
        );

        Ok(CycleOutcome::Completed {
            created,
            presented,
            evicted_data,
            evicted_render,
        })
    }

    async fn compute_plan(&self, observer: BlockPos) -> StreamResult<StreamingPlan> {
        let params = self.config.window_params();
        let data_coords = self.store.data_coords();
        let rendered_coords = self.store.rendered_coords();
        let pinned = self.store.pinned_coords();
        tokio::task::spawn_blocking(move || {
            plan_cycle(observer, params, &data_coords, &rendered_coords, &pinned)
        })
        .await
        .map_err(|err| StreamError::TaskJoin(err.to_string()))
    }

    /// Applies a gameplay block edit.
    ///
    /// Fails (returns `false`) when no renderable region covers the
    /// position. On success the owning region is pinned and re-rendered;
    /// if the block lies on a region boundary face, each rendered
    /// neighbor sharing that face is re-rendered too, since seam
    /// visibility depends on the neighbor's exposed faces.
    pub fn set_block(&mut self, pos: BlockPos, block: BlockType) -> bool {
        let coord = self.config.dims().snap(pos);
        if !self.store.is_rendered(coord) {
            return false;
        }
        if !self.store.set_block(pos, block) {
            return false;
        }

        let mut to_refresh = vec![coord];
        if let Some(region) = self.store.data(coord) {
            for neighbor in region.boundary_neighbors(pos) {
                if self.store.is_rendered(neighbor) {
                    to_refresh.push(neighbor);
                }
            }
        }
        for refresh_coord in to_refresh {
            self.refresh_renderable(refresh_coord);
        }
        true
    }

    /// Rebuilds and re-uploads the mesh of an already-rendered region.
    fn refresh_renderable(&mut self, coord: RegionCoord) {
        let Some(snapshot) = self.store.data(coord).map(RegionData::snapshot) else {
            return;
        };
        let Some(id) = self.store.rendered_id(coord) else {
            return;
        };
        match self.mesher.build_mesh(&snapshot) {
            Ok(mesh) => self.pool.refresh(id, &mesh),
            Err(err) => warn!(?coord, %err, "re-render after edit failed"),
        }
    }
}
