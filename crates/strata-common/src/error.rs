//! Error types for the streaming pipeline.

use thiserror::Error;

use crate::coords::RegionCoord;

/// Errors surfaced by the generation pipeline and streaming controller.
///
/// Store lookups against absent coordinates are *not* errors: they
/// resolve to an explicit empty value at the call site. Cancellation is
/// not represented here either; it is the expected teardown path and
/// surfaces through the pipeline and controller outcome types.
#[derive(Debug, Error)]
pub enum StreamError {
    /// A worker failed while synthesizing voxel data for one region.
    #[error("terrain synthesis failed at ({}, {}, {}): {reason}", coord.x, coord.y, coord.z)]
    Generation {
        /// Region that was being synthesized
        coord: RegionCoord,
        /// Failure description from the terrain source
        reason: String,
    },

    /// A worker failed while building mesh data for one region.
    #[error("mesh build failed at ({}, {}, {}): {reason}", coord.x, coord.y, coord.z)]
    Meshing {
        /// Region that was being meshed
        coord: RegionCoord,
        /// Failure description from the mesher
        reason: String,
    },

    /// A background task panicked or was aborted by the runtime.
    #[error("background task failed: {0}")]
    TaskJoin(String),
}

/// Result type alias for streaming operations.
pub type StreamResult<T> = Result<T, StreamError>;
