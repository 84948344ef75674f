//! Noise generation for initial plate heightmaps.
//!
//! Uses simdnoise for high-performance SIMD-accelerated noise generation.

mod fractal;

pub use fractal::{crust_heightmap, fractal_heightmap, FractalNoiseConfig};
