//! River routing: water flows from peaks to the lowest neighbour and
//! carves every cell it leaves.

use crate::geometry::{EdgeWrap, Grid};

use super::lower_neighbours;

/// Carves river paths and returns the eroded heights.
///
/// Sources are cells at or above `lower_bound` whose four neighbours are all
/// lower. From each source water moves to the lowest neighbour (first in
/// west, east, north, south order on ties) and keeps going while it can.
/// Every cell water leaves loses `strength` of its height above
/// `lower_bound`. Neighbour tests use the uneroded heights.
pub fn route_flow(heights: &Grid<f32>, lower_bound: f32, wrap: EdgeWrap, strength: f32) -> Grid<f32> {
    let mut eroded = heights.clone();
    let mut visited = vec![false; heights.len()];

    let mut sources: Vec<usize> = (0..heights.len())
        .filter(|&i| heights[i] >= lower_bound)
        .filter(|&i| lower_neighbours(heights, i, wrap).iter().all(Option::is_some))
        .collect();
    let mut sinks = Vec::new();

    while !sources.is_empty() {
        while let Some(index) = sources.pop() {
            if heights[index] < lower_bound {
                continue;
            }
            let Some(dest) = lowest(heights, &lower_neighbours(heights, index, wrap)) else {
                continue;
            };

            if !visited[dest] {
                visited[dest] = true;
                sinks.push(dest);
            }
            eroded[index] -= (eroded[index] - lower_bound) * strength;
        }
        std::mem::swap(&mut sources, &mut sinks);
    }

    eroded
}

/// Lowest of the candidate cells; the earliest one wins ties.
fn lowest(heights: &Grid<f32>, candidates: &[Option<usize>; 4]) -> Option<usize> {
    candidates.iter().flatten().copied().fold(None, |best, i| match best {
        Some(b) if heights[b] <= heights[i] => Some(b),
        _ => Some(i),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_WRAP: EdgeWrap = EdgeWrap {
        horizontal: false,
        vertical: false,
    };

    #[test]
    fn test_lowest_prefers_first_on_tie() {
        let heights = Grid::from_vec(4, 1, vec![1.0, 0.5, 0.5, 0.7]).unwrap();
        assert_eq!(lowest(&heights, &[Some(0), Some(1), Some(2), Some(3)]), Some(1));
        assert_eq!(lowest(&heights, &[None, Some(3), None, Some(2)]), Some(2));
        assert_eq!(lowest(&heights, &[None; 4]), None);
    }

    #[test]
    fn test_river_runs_downhill() {
        // A ridge falling to the east; only the peak is a source.
        let heights = Grid::from_vec(5, 3, vec![
            1.0, 4.8, 3.5, 2.5, 0.5,
            4.8, 5.0, 3.0, 2.0, 1.0,
            1.0, 4.8, 3.5, 2.5, 0.5,
        ]).unwrap();

        let eroded = route_flow(&heights, 1.0, NO_WRAP, 0.2);

        // Peak, then (2,1) and (3,1) along the ridge.
        assert!((eroded[6] - (5.0 - 4.0 * 0.2)).abs() < 1e-6);
        assert!((eroded[7] - (3.0 - 2.0 * 0.2)).abs() < 1e-6);
        assert!((eroded[8] - (2.0 - 1.0 * 0.2)).abs() < 1e-6);
        // (4,1) sits at the lower bound; leaving it removes nothing.
        assert_eq!(eroded[9], 1.0);
        assert_eq!(eroded[2], 3.5);
        assert_eq!(eroded[0], 1.0);
    }

    #[test]
    fn test_flat_ground_does_not_erode() {
        let heights = Grid::new(4, 4, 2.0f32);
        assert_eq!(route_flow(&heights, 0.0, NO_WRAP, 0.2), heights);
    }

    #[test]
    fn test_below_lower_bound_untouched() {
        let heights = Grid::from_vec(3, 3, vec![
            0.1, 0.1, 0.1,
            0.1, 0.4, 0.1,
            0.1, 0.1, 0.1,
        ]).unwrap();
        assert_eq!(route_flow(&heights, 0.5, NO_WRAP, 0.2), heights);
    }
}
