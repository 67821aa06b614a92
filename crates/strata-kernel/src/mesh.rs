//! Mesh data and the mesh-construction collaborator seam.

use strata_common::StreamResult;

use crate::region::RegionSnapshot;

/// Renderable geometry for one region.
///
/// Transient: derived wholly and deterministically from a region
/// snapshot, consumed by the presentation adapter, never retained or
/// mutated by the core. A changed region gets a wholesale rebuild.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions, local to the region's minimum corner.
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals.
    pub normals: Vec<[f32; 3]>,
    /// Per-vertex texture coordinates.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle indices into the vertex arrays.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Whether the mesh contains no geometry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Mesh construction collaborator.
///
/// Opaque to the core: given the same snapshot it must produce the same
/// mesh. Implementations are called from worker threads.
pub trait Mesher: Send + Sync {
    /// Builds renderable geometry from a region snapshot.
    fn build_mesh(&self, region: &RegionSnapshot) -> StreamResult<MeshData>;
}
