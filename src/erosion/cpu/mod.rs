//! CPU implementations of the erosion pass.

pub mod diffusion;
pub mod flow;

use rand::Rng;

use crate::erosion::ErosionConfig;
use crate::geometry::{EdgeWrap, Grid};

pub use diffusion::{apply_noise, diffuse};
pub use flow::route_flow;

/// Row-major indices of the west, east, north and south neighbours of a
/// cell that have crust and are strictly lower than it.
pub fn lower_neighbours(heights: &Grid<f32>, index: usize, wrap: EdgeWrap) -> [Option<usize>; 4] {
    let width = heights.width();
    let height = heights.height();
    let (x, y) = heights.coords_of(index);
    let here = heights[index];

    let candidates = [
        wrap.west(x, width).map(|nx| y * width + nx),
        wrap.east(x, width).map(|nx| y * width + nx),
        wrap.north(y, height).map(|ny| ny * width + x),
        wrap.south(y, height).map(|ny| ny * width + x),
    ];
    candidates.map(|n| n.filter(|&i| heights[i] > 0.0 && heights[i] < here))
}

/// Runs a full erosion pass and returns the new heights.
///
/// Only cells at or above `lower_bound` erode. The result never has
/// negative cells.
pub fn erode_crust<R: Rng>(
    heights: &Grid<f32>,
    lower_bound: f32,
    wrap: EdgeWrap,
    config: &ErosionConfig,
    rng: &mut R,
) -> Grid<f32> {
    let mut carved = route_flow(heights, lower_bound, wrap, config.flow_strength);
    apply_noise(&mut carved, config.noise_amplitude, rng);
    let mut eroded = diffuse(&carved, lower_bound, wrap);
    for h in eroded.as_mut_slice() {
        *h = h.max(0.0);
    }
    eroded
}
