//! Single tectonic plate simulation.
//!
//! A [`Plate`] owns a growable crust grid positioned on a toroidal world and
//! implements everything one plate does during a simulation step:
//! - crust reads and writes through world coordinates, growing on demand
//! - lazy continent segmentation
//! - collision response and continent aggregation onto another plate
//! - subduction of sediment under the plate
//! - erosion of its own crust
//! - drift with pending impulses
//!
//! Deciding which plates touch, and calling these in order, is up to the
//! caller.

mod collision;
mod config;
mod crust;
mod error;
mod growth;
mod motion;
mod plate;
mod segment;
mod subduction;

pub use config::PlateConfig;
pub use error::{Operation, PlateError};
pub use plate::Plate;
pub use segment::{ContinentId, ContinentSegment, SegmentBounds, Segmentation};
