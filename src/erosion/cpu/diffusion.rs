//! Height noise and slope diffusion.

use rand::Rng;

use crate::geometry::{EdgeWrap, Grid};

use super::lower_neighbours;

/// Scales every cell by a random factor in `1 ± amplitude`.
///
/// Empty cells stay empty.
pub fn apply_noise<R: Rng>(heights: &mut Grid<f32>, amplitude: f32, rng: &mut R) {
    if amplitude <= 0.0 {
        return;
    }
    for h in heights.as_mut_slice() {
        let u: f32 = rng.random();
        *h += amplitude * *h - 2.0 * amplitude * u * *h;
    }
}

/// Moves height from every cell at or above `lower_bound` onto its lower
/// neighbours with crust. Total height is conserved.
///
/// With `d` the height difference to each lower neighbour and `m` the
/// smallest of them, the cell gives away `m`: each neighbour first gets
/// `d - m`, and when that does not use up `m` the rest is shared evenly
/// between the cell and its lower neighbours. Otherwise the `m` is split in
/// proportion to `d - m`.
pub fn diffuse(heights: &Grid<f32>, lower_bound: f32, wrap: EdgeWrap) -> Grid<f32> {
    let mut out = heights.clone();

    for index in 0..heights.len() {
        let here = heights[index];
        if here < lower_bound {
            continue;
        }

        let lower = lower_neighbours(heights, index, wrap);
        let diffs: Vec<(usize, f32)> = lower.iter().flatten().map(|&i| (i, here - heights[i])).collect();
        if diffs.is_empty() {
            continue;
        }

        let min_diff = diffs.iter().map(|&(_, d)| d).fold(f32::INFINITY, f32::min);
        let diff_sum: f32 = diffs.iter().map(|&(_, d)| d - min_diff).sum();

        out[index] -= min_diff;
        if diff_sum < min_diff {
            let share = (min_diff - diff_sum) / (1 + diffs.len()) as f32;
            out[index] += share;
            for &(i, d) in &diffs {
                out[i] += d - min_diff + share;
            }
        } else {
            let unit = min_diff / diff_sum;
            for &(i, d) in &diffs {
                out[i] += unit * (d - min_diff);
            }
        }
    }

    out
}
