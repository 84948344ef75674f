//! Growing a plate's grid so it covers a world point.

use glam::Vec2;
use log::debug;

use super::error::PlateError;
use super::plate::Plate;

impl Plate {
    /// Enlarges the plate toward the nearer side of `(x, y)` and returns the
    /// point's new local coordinates.
    ///
    /// Growth happens in whole multiples of the configured granularity and
    /// never makes the plate larger than the world. Existing content keeps
    /// its world position.
    pub(super) fn grow_to_contain(&mut self, x: usize, y: usize) -> Result<(usize, usize), PlateError> {
        let bounds = self.bounds();
        let (x, y) = self.world.normalize(x, y);
        let world_width = self.world.width();
        let world_height = self.world.height();
        let granularity = self.config.growth_granularity.max(1);

        let (mut d_left, mut d_right) = pick_side(
            bounds.left,
            bounds.right(),
            x,
            world_width,
        );
        let (mut d_top, mut d_bottom) = pick_side(
            bounds.top,
            bounds.bottom(),
            y,
            world_height,
        );

        if d_left + d_right + d_top + d_bottom == 0 {
            return Err(PlateError::GrowthExhausted { x, y, bounds });
        }

        d_left = round_up(d_left, granularity);
        d_right = round_up(d_right, granularity);
        d_top = round_up(d_top, granularity);
        d_bottom = round_up(d_bottom, granularity);

        if bounds.width + d_left + d_right > world_width {
            d_left = 0;
            d_right = world_width - bounds.width;
        }
        if bounds.height + d_top + d_bottom > world_height {
            d_top = 0;
            d_bottom = world_height - bounds.height;
        }

        let width = bounds.width + d_left + d_right;
        let height = bounds.height + d_top + d_bottom;

        self.crust = self.crust.expanded(width, height, d_left, d_top, 0.0);
        self.age = self.age.expanded(width, height, d_left, d_top, 0);
        self.segmentation.grow(width, height, d_left, d_top);
        self.center += Vec2::new(d_left as f32, d_top as f32);
        self.left = self.world.wrap_position_x(self.left - d_left as f32);
        self.top = self.world.wrap_position_y(self.top - d_top as f32);

        debug!(
            "plate {} grew to {} to contain ({}, {})",
            bounds,
            self.bounds(),
            x,
            y
        );

        self.local_or_err(x, y)
    }
}

/// Distances to grow toward the low and high side of one axis.
///
/// At most one of the two is non-zero: the plate grows toward the nearer
/// side, preferring the high side on a tie. A coordinate the plate already
/// covers, including across the seam, needs no growth.
fn pick_side(low: usize, high: usize, coord: usize, period: usize) -> (usize, usize) {
    let unwrapped = if coord < low { coord + period } else { coord };
    if unwrapped <= high {
        return (0, 0);
    }
    let to_low = low.checked_sub(coord).unwrap_or(usize::MAX);
    let to_high = unwrapped.checked_sub(high).unwrap_or(usize::MAX);

    let d_low = if to_low < to_high && to_low < period { to_low } else { 0 };
    let d_high = if to_high <= to_low && to_high < period { to_high } else { 0 };
    (d_low, d_high)
}

/// Rounds a positive distance up to the next multiple of `granularity`.
fn round_up(distance: usize, granularity: usize) -> usize {
    if distance > 0 {
        (distance / granularity + 1) * granularity
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::super::plate::tests::{flat_plate, world};
    use super::*;
    use crate::geometry::PlateRect;

    #[test]
    fn test_pick_side() {
        // Inside.
        assert_eq!(pick_side(4, 7, 5, 16), (0, 0));
        assert_eq!(pick_side(4, 7, 4, 16), (0, 0));
        // Nearer to the right.
        assert_eq!(pick_side(4, 7, 9, 16), (0, 2));
        // Nearer to the left.
        assert_eq!(pick_side(4, 7, 2, 16), (2, 0));
        // Plate spanning the seam: columns 14, 15, 0, 1.
        assert_eq!(pick_side(14, 17, 0, 16), (0, 0));
        assert_eq!(pick_side(14, 17, 1, 16), (0, 0));
        assert_eq!(pick_side(14, 17, 5, 16), (0, 4));
        assert_eq!(pick_side(14, 17, 12, 16), (2, 0));
    }

    #[test]
    fn test_round_up() {
        assert_eq!(round_up(0, 8), 0);
        assert_eq!(round_up(1, 8), 8);
        assert_eq!(round_up(7, 8), 8);
        assert_eq!(round_up(8, 8), 16);
    }

    #[test]
    fn test_growth_preserves_content() {
        let mut plate = flat_plate(4, 4, 8, 8, 0.0, world(64));
        plate.set_crust(9, 10, 3.0, 1).unwrap();
        plate.set_crust(11, 8, 2.0, 1).unwrap();

        plate.set_crust(4, 12, 5.0, 2).unwrap();

        assert_eq!(plate.bounds(), PlateRect::new(0, 8, 12, 12));
        assert_eq!(plate.crust(9, 10), 3.0);
        assert_eq!(plate.crust(11, 8), 2.0);
        assert_eq!(plate.crust(4, 12), 5.0);
        assert_eq!(plate.mass(), 10.0);
    }

    #[test]
    fn test_growth_wraps_anchor() {
        let mut plate = flat_plate(4, 4, 2, 2, 1.0, world(32));
        plate.set_crust(0, 3, 1.0, 0).unwrap();

        let bounds = plate.bounds();
        assert_eq!(bounds.left, 26);
        assert_eq!(bounds.width, 12);
        assert!(plate.contains(0, 3));
        assert!(plate.contains(30, 3));
        assert!(plate.contains(5, 5));
        assert_eq!(plate.crust(5, 5), 1.0);
    }

    #[test]
    fn test_growth_across_seam_stays_vertical() {
        // Columns 62, 63, 0 and 1 are covered; only the row is missing.
        let mut plate = flat_plate(4, 4, 62, 8, 1.0, world(64));
        plate.set_crust(0, 13, 2.0, 0).unwrap();

        assert_eq!(plate.bounds(), PlateRect::new(62, 8, 4, 12));
        assert!(!plate.edge_wrap().horizontal);
        assert_eq!(plate.crust(0, 13), 2.0);
        assert_eq!(plate.crust(63, 9), 1.0);
        assert_eq!(plate.mass(), 18.0);
    }

    #[test]
    fn test_growth_capped_at_world_size() {
        let mut plate = flat_plate(4, 4, 0, 0, 1.0, world(16));
        plate.set_crust(6, 0, 1.0, 0).unwrap();
        assert_eq!(plate.width(), 12);
        plate.set_crust(14, 0, 1.0, 0).unwrap();
        assert_eq!(plate.width(), 16);
        for x in 0..16 {
            assert!(plate.contains(x, 0));
        }
    }

    #[test]
    fn test_growth_shifts_segments_and_center() {
        let mut plate = flat_plate(4, 4, 8, 8, 2.0, world(64));
        plate.continent_at(9, 9).unwrap();
        let center = plate.center();

        plate.set_crust(5, 9, 1.0, 0).unwrap();

        assert_eq!(plate.center(), center + Vec2::new(8.0, 0.0));
        let segment = &plate.segments()[0];
        assert_eq!(segment.bounds.left, 8);
        assert_eq!(segment.bounds.right, 11);
        assert_eq!(plate.continent_at(9, 9).unwrap(), 0);
    }
}
