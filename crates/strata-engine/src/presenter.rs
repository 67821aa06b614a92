//! Pooled presentation adapter.
//!
//! The core does not own rendering resources; it drives an external
//! backend through this seam and pools the opaque handles so eviction
//! recycles renderables instead of destroying them.

use std::collections::VecDeque;

use tracing::trace;

use strata_common::{RegionCoord, RenderableId};
use strata_kernel::MeshData;

/// External rendering collaborator.
///
/// Called only from the coordinating flow, never from workers.
pub trait RenderBackend: Send {
    /// Creates a fresh renderable positioned at the region coordinate.
    fn create_renderable(&mut self, coord: RegionCoord, mesh: &MeshData) -> RenderableId;

    /// Moves an existing renderable to a new region coordinate.
    fn reposition(&mut self, id: RenderableId, coord: RegionCoord);

    /// Replaces the geometry of an existing renderable.
    fn upload_mesh(&mut self, id: RenderableId, mesh: &MeshData);

    /// Activates or deactivates a renderable without destroying it.
    fn set_active(&mut self, id: RenderableId, active: bool);
}

/// Pool of reusable renderables over a [`RenderBackend`].
///
/// Releasing deactivates the renderable and queues its handle; the next
/// presentation at any coordinate reuses it by repositioning, so a
/// steady-state observer walk allocates no new rendering resources.
pub struct RenderablePool {
    backend: Box<dyn RenderBackend>,
    free: VecDeque<RenderableId>,
}

impl RenderablePool {
    /// Creates an empty pool over the given backend.
    #[must_use]
    pub fn new(backend: Box<dyn RenderBackend>) -> Self {
        Self {
            backend,
            free: VecDeque::new(),
        }
    }

    /// Presents a mesh at a coordinate, reusing a pooled renderable when
    /// one is available.
    pub fn present(&mut self, coord: RegionCoord, mesh: &MeshData) -> RenderableId {
        if let Some(id) = self.free.pop_front() {
            trace!(?coord, "reusing pooled renderable");
            self.backend.set_active(id, true);
            self.backend.reposition(id, coord);
            self.backend.upload_mesh(id, mesh);
            id
        } else {
            self.backend.create_renderable(coord, mesh)
        }
    }

    /// Replaces the geometry of a live renderable in place.
    pub fn refresh(&mut self, id: RenderableId, mesh: &MeshData) {
        self.backend.upload_mesh(id, mesh);
    }

    /// Releases a renderable back into the pool.
    pub fn release(&mut self, id: RenderableId) {
        self.backend.set_active(id, false);
        self.free.push_back(id);
    }

    /// Number of pooled (inactive) renderables.
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingBackend {
        created: usize,
        repositions: Vec<(RenderableId, RegionCoord)>,
        uploads: Vec<RenderableId>,
        active: Vec<(RenderableId, bool)>,
    }

    impl RenderBackend for RecordingBackend {
        fn create_renderable(&mut self, _coord: RegionCoord, _mesh: &MeshData) -> RenderableId {
            self.created += 1;
            RenderableId::new()
        }

        fn reposition(&mut self, id: RenderableId, coord: RegionCoord) {
            self.repositions.push((id, coord));
        }

        fn upload_mesh(&mut self, id: RenderableId, _mesh: &MeshData) {
            self.uploads.push(id);
        }

        fn set_active(&mut self, id: RenderableId, active: bool) {
            self.active.push((id, active));
        }
    }

    #[test]
    fn test_release_then_present_reuses_handle() {
        let mut pool = RenderablePool::new(Box::<RecordingBackend>::default());
        let mesh = MeshData::default();

        let first = pool.present(RegionCoord::new(0, 0, 0), &mesh);
        pool.release(first);
        assert_eq!(pool.free_count(), 1);

        let second = pool.present(RegionCoord::new(16, 0, 0), &mesh);
        assert_eq!(first, second);
        assert_eq!(pool.free_count(), 0);
    }

    #[test]
    fn test_fresh_present_creates() {
        let mut pool = RenderablePool::new(Box::<RecordingBackend>::default());
        let mesh = MeshData::default();

        let a = pool.present(RegionCoord::new(0, 0, 0), &mesh);
        let b = pool.present(RegionCoord::new(16, 0, 0), &mesh);
        assert_ne!(a, b);
    }
}
