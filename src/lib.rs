//! Tectonic plate core for procedural world generation.
//!
//! This crate models a single lithospheric plate on a wrap-around world:
//! its crust, its continents, how it reacts to collisions with other
//! plates, how it erodes and how it drifts. An orchestrator owning many
//! plates drives them step by step.

pub mod erosion;
pub mod export;
pub mod geometry;
pub mod noise;
pub mod tectonics;

pub use erosion::ErosionConfig;
pub use geometry::{Grid, PlateRect, WorldDimension};
pub use noise::FractalNoiseConfig;
pub use tectonics::{Plate, PlateConfig, PlateError};
