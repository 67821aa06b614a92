//! Two-stage background generation pipeline.
//!
//! Stage 1 turns region coordinates into voxel data; stage 2 turns
//! region snapshots into mesh data. Each stage processes one batch on a
//! pool of blocking workers pulling from a shared queue, with the
//! cancellation scope checked before every element. A stage's results
//! are handed back only once the whole batch has finished: the stage
//! boundary is a hard synchronization point, because decoration must
//! run against fully populated neighbor data before anything is meshed.

use std::collections::VecDeque;
use std::sync::Arc;

use ahash::AHashMap;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::task::JoinSet;
use tracing::debug;

use strata_common::{RegionCoord, RegionDims, StreamError, StreamResult};
use strata_kernel::{MeshData, Mesher, RegionData, RegionSnapshot, TerrainSource};

use crate::cancel::CancelScope;

/// Result of one pipeline stage batch.
///
/// On cancellation the completed elements are still returned: each is
/// independently valid and safe to merge. Only the unprocessed
/// remainder is discarded; there are never partial entries.
#[derive(Debug)]
pub enum BatchOutcome<T> {
    /// Every element of the batch was processed.
    Complete(AHashMap<RegionCoord, T>),
    /// Cancellation was observed; only the completed elements remain.
    Cancelled(AHashMap<RegionCoord, T>),
}

impl<T> BatchOutcome<T> {
    /// Whether the batch was cut short by cancellation.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled(_))
    }

    /// The merged per-coordinate results.
    #[must_use]
    pub fn into_results(self) -> AHashMap<RegionCoord, T> {
        match self {
            Self::Complete(map) | Self::Cancelled(map) => map,
        }
    }
}

/// The cancellable two-stage generation pipeline.
pub struct GenerationPipeline {
    terrain: Arc<dyn TerrainSource>,
    mesher: Arc<dyn Mesher>,
    workers: usize,
}

impl GenerationPipeline {
    /// Creates a pipeline sized to the machine's available parallelism.
    #[must_use]
    pub fn new(terrain: Arc<dyn TerrainSource>, mesher: Arc<dyn Mesher>) -> Self {
        let workers = std::thread::available_parallelism()
            .map(std::num::NonZeroUsize::get)
            .unwrap_or(4);
        Self::with_workers(terrain, mesher, workers)
    }

    /// Creates a pipeline with an explicit worker count.
    #[must_use]
    pub fn with_workers(
        terrain: Arc<dyn TerrainSource>,
        mesher: Arc<dyn Mesher>,
        workers: usize,
    ) -> Self {
        Self {
            terrain,
            mesher,
            workers: workers.max(1),
        }
    }

    /// Stage 1: synthesizes voxel data for each coordinate of the batch.
    ///
    /// Elements complete in no particular order; results are keyed by
    /// coordinate, so workers never write the same key. A terrain
    /// failure fails the whole batch.
    pub async fn synthesize_batch(
        &self,
        positions: Vec<RegionCoord>,
        dims: RegionDims,
        cancel: &CancelScope,
    ) -> StreamResult<BatchOutcome<RegionData>> {
        debug!(batch = positions.len(), "synthesizing voxel data batch");
        let terrain = Arc::clone(&self.terrain);
        run_batch(positions, self.workers, cancel, move |coord| {
            let region = terrain.synthesize(coord, dims)?;
            Ok((coord, region))
        })
        .await
    }

    /// Stage 2: builds mesh data for each snapshot of the batch.
    ///
    /// Callers must only pass snapshots taken after the stage-1 merge
    /// and decoration pass, so meshes never observe pre-decoration data.
    pub async fn mesh_batch(
        &self,
        snapshots: Vec<RegionSnapshot>,
        cancel: &CancelScope,
    ) -> StreamResult<BatchOutcome<MeshData>> {
        debug!(batch = snapshots.len(), "building mesh data batch");
        let mesher = Arc::clone(&self.mesher);
        run_batch(snapshots, self.workers, cancel, move |snapshot| {
            let coord = snapshot.coord();
            let mesh = mesher.build_mesh(&snapshot)?;
            Ok((coord, mesh))
        })
        .await
    }
}

/// Runs one batch on blocking workers pulling from a shared queue.
///
/// The cancellation scope is checked before each element is taken; a
/// worker that observes cancellation stops pulling, leaving the rest of
/// the queue unprocessed. Results land in a scratch concurrent map with
/// disjoint keys that the coordinator receives after every worker has
/// joined.
async fn run_batch<I, T, F>(
    items: Vec<I>,
    workers: usize,
    cancel: &CancelScope,
    work: F,
) -> StreamResult<BatchOutcome<T>>
where
    I: Send + 'static,
    T: Clone + Send + Sync + 'static,
    F: Fn(I) -> StreamResult<(RegionCoord, T)> + Send + Sync + 'static,
{
    if items.is_empty() {
        return Ok(BatchOutcome::Complete(AHashMap::new()));
    }

    let worker_count = workers.min(items.len());
    let queue = Arc::new(Mutex::new(VecDeque::from(items)));
    let results: Arc<DashMap<RegionCoord, T>> = Arc::new(DashMap::new());
    let work = Arc::new(work);

    let mut tasks: JoinSet<StreamResult<()>> = JoinSet::new();
    for _ in 0..worker_count {
        let queue = Arc::clone(&queue);
        let results = Arc::clone(&results);
        let work = Arc::clone(&work);
        let cancel = cancel.clone();
        tasks.spawn_blocking(move || loop {
            if cancel.is_cancelled() {
                return Ok(());
            }
            let item = queue.lock().pop_front();
            let Some(item) = item else {
                return Ok(());
            };
            let (coord, value) = work(item)?;
            results.insert(coord, value);
        });
    }

    // Drain every worker before reporting, so no task outlives the batch.
    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(err)) => {
                if first_error.is_none() {
                    first_error = Some(err);
                }
            }
            Err(join_err) => {
                if first_error.is_none() {
                    first_error = Some(StreamError::TaskJoin(join_err.to_string()));
                }
            }
        }
    }
    if let Some(err) = first_error {
        return Err(err);
    }

    let merged: AHashMap<RegionCoord, T> = match Arc::try_unwrap(results) {
        Ok(map) => map.into_iter().collect(),
        Err(shared) => shared
            .iter()
            .map(|entry| (*entry.key(), entry.value().clone()))
            .collect(),
    };

    if cancel.is_cancelled() {
        Ok(BatchOutcome::Cancelled(merged))
    } else {
        Ok(BatchOutcome::Complete(merged))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use strata_common::BlockPos;
    use strata_kernel::BlockType;

    const DIMS: RegionDims = RegionDims::new(16, 100);

    /// Terrain stub: flat stone floor, optional failure, optional
    /// cancellation after a fixed number of syntheses.
    struct StubTerrain {
        calls: AtomicUsize,
        fail_at: Option<RegionCoord>,
        cancel_after: Option<(usize, CancelScope)>,
    }

    impl StubTerrain {
        fn flat() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_at: None,
                cancel_after: None,
            }
        }
    }

    impl TerrainSource for StubTerrain {
        fn prepare_biomes(&self, _centers: &[BlockPos]) {}

        fn synthesize(&self, coord: RegionCoord, dims: RegionDims) -> StreamResult<RegionData> {
            if self.fail_at == Some(coord) {
                return Err(StreamError::Generation {
                    coord,
                    reason: "stub failure".into(),
                });
            }
            let region = RegionData::new(coord, dims);
            let done = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if let Some((after, scope)) = &self.cancel_after {
                if done == *after {
                    scope.cancel();
                }
            }
            Ok(region)
        }
    }

    /// Mesher emitting one vertex per opaque block.
    struct CountingMesher;

    impl Mesher for CountingMesher {
        fn build_mesh(&self, region: &RegionSnapshot) -> StreamResult<MeshData> {
            let opaque = region
                .blocks()
                .iter()
                .filter(|block| !block.is_transparent())
                .count();
            Ok(MeshData {
                positions: vec![[0.0; 3]; opaque],
                normals: vec![[0.0; 3]; opaque],
                uvs: vec![[0.0; 2]; opaque],
                indices: (0..opaque as u32).collect(),
            })
        }
    }

    fn coords(n: i32) -> Vec<RegionCoord> {
        (0..n).map(|i| RegionCoord::new(i * 16, 0, 0)).collect()
    }

    #[tokio::test]
    async fn test_synthesize_batch_completes() {
        let pipeline = GenerationPipeline::with_workers(
            Arc::new(StubTerrain::flat()),
            Arc::new(CountingMesher),
            4,
        );
        let cancel = CancelScope::new();

        let outcome = pipeline
            .synthesize_batch(coords(5), DIMS, &cancel)
            .await
            .expect("batch should succeed");

        assert!(!outcome.is_cancelled());
        let results = outcome.into_results();
        assert_eq!(results.len(), 5);
        for coord in coords(5) {
            assert!(results.contains_key(&coord));
        }
    }

    #[tokio::test]
    async fn test_cancellation_keeps_exactly_completed_elements() {
        let cancel = CancelScope::new();
        let terrain = StubTerrain {
            calls: AtomicUsize::new(0),
            fail_at: None,
            cancel_after: Some((2, cancel.clone())),
        };
        // One worker: elements complete strictly in queue order.
        let pipeline =
            GenerationPipeline::with_workers(Arc::new(terrain), Arc::new(CountingMesher), 1);

        let outcome = pipeline
            .synthesize_batch(coords(5), DIMS, &cancel)
            .await
            .expect("cancellation is not a batch failure");

        assert!(outcome.is_cancelled());
        let results = outcome.into_results();
        assert_eq!(results.len(), 2);
        assert!(results.contains_key(&RegionCoord::new(0, 0, 0)));
        assert!(results.contains_key(&RegionCoord::new(16, 0, 0)));
    }

    #[tokio::test]
    async fn test_worker_failure_fails_whole_batch() {
        let terrain = StubTerrain {
            calls: AtomicUsize::new(0),
            fail_at: Some(RegionCoord::new(32, 0, 0)),
            cancel_after: None,
        };
        let pipeline =
            GenerationPipeline::with_workers(Arc::new(terrain), Arc::new(CountingMesher), 2);
        let cancel = CancelScope::new();

        let result = pipeline.synthesize_batch(coords(5), DIMS, &cancel).await;
        assert!(matches!(result, Err(StreamError::Generation { .. })));
    }

    #[tokio::test]
    async fn test_mesh_batch_keys_match_snapshots() {
        let pipeline = GenerationPipeline::with_workers(
            Arc::new(StubTerrain::flat()),
            Arc::new(CountingMesher),
            2,
        );
        let cancel = CancelScope::new();

        let mut region = RegionData::new(RegionCoord::new(0, 0, 0), DIMS);
        region.set_block_local(strata_common::LocalPos::new(0, 0, 0), BlockType::Stone);
        let snapshots = vec![
            region.snapshot(),
            RegionData::new(RegionCoord::new(16, 0, 0), DIMS).snapshot(),
        ];

        let outcome = pipeline
            .mesh_batch(snapshots, &cancel)
            .await
            .expect("mesh batch should succeed");
        let results = outcome.into_results();

        assert_eq!(results.len(), 2);
        assert_eq!(results[&RegionCoord::new(0, 0, 0)].vertex_count(), 1);
        assert!(results[&RegionCoord::new(16, 0, 0)].is_empty());
    }

    #[tokio::test]
    async fn test_empty_batch_is_complete() {
        let pipeline = GenerationPipeline::new(Arc::new(StubTerrain::flat()), Arc::new(CountingMesher));
        let cancel = CancelScope::new();
        cancel.cancel();

        // Even under cancellation an empty batch reports complete.
        let outcome = pipeline
            .synthesize_batch(Vec::new(), DIMS, &cancel)
            .await
            .expect("empty batch");
        assert!(!outcome.is_cancelled());
        assert!(outcome.into_results().is_empty());
    }
}
