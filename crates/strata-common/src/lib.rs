//! # Strata Common
//!
//! Common types, utilities, and shared abstractions for Strata.
//!
//! This crate provides foundational types used across all Strata subsystems:
//! - Coordinate types (block, region, local)
//! - Face directions for boundary queries
//! - Opaque resource handles
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod direction;
pub mod error;
pub mod ids;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::direction::*;
    pub use crate::error::*;
    pub use crate::ids::*;
}

pub use prelude::*;
