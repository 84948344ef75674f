//! Toroidal world geometry.
//!
//! Provides the world extents, wrap-aware plate rectangles and the dense
//! grids plates store their cells in.

mod grid;
mod world;

pub use grid::Grid;
pub use world::{EdgeWrap, PlateRect, WorldDimension, WorldError};
