//! # Strata Worldgen
//!
//! Noise-based terrain synthesis for Strata.
//!
//! Implements the kernel's `TerrainSource` seam with layered noise
//! terrain, water and sand bands, biome-center height modulation, and
//! deterministic tree placement whose canopies may spill across region
//! boundaries (applied later by the core's decoration pass).

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod generator;

pub use generator::{GenerationParams, NoiseTerrain};
