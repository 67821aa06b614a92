//! # Strata Engine
//!
//! The streaming layer: turns observer movement into generated,
//! decorated, meshed, and presented terrain regions.
//!
//! This crate provides:
//! - A structured cancellation scope observed at element boundaries
//! - The two-stage generation pipeline (voxel data, then mesh data)
//! - The streaming controller driving one full world-update cycle
//! - The pooled presentation adapter seam
//! - Observer movement detection and spawn placement
//! - World configuration with TOML persistence
//!
//! ## Cycle shape
//!
//! One cycle: window → evict → generate → decorate → mesh → present →
//! complete. The coordinating flow owns the store and the renderable
//! pool; pipeline stages fan work out to blocking workers and hand back
//! merged batch results at hard stage barriers.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod cancel;
pub mod config;
pub mod controller;
pub mod events;
pub mod pipeline;
pub mod presenter;
pub mod tracker;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cancel::*;
    pub use crate::config::*;
    pub use crate::controller::*;
    pub use crate::events::*;
    pub use crate::pipeline::*;
    pub use crate::presenter::*;
    pub use crate::tracker::*;
}

pub use prelude::*;
