//! Reading and writing crust cells through world coordinates.

use super::error::{Operation, PlateError};
use super::plate::Plate;

impl Plate {
    /// Crust thickness at a world point, 0 outside the plate.
    pub fn crust(&self, x: usize, y: usize) -> f32 {
        self.local(x, y)
            .map(|(lx, ly)| self.crust[self.crust.index_of(lx, ly)])
            .unwrap_or(0.0)
    }

    /// Age of the crust at a world point, 0 outside the plate.
    pub fn crust_timestamp(&self, x: usize, y: usize) -> u32 {
        self.local(x, y)
            .map(|(lx, ly)| self.age[self.age.index_of(lx, ly)])
            .unwrap_or(0)
    }

    /// Sets the crust thickness at a world point.
    ///
    /// Negative thicknesses are stored as 0. Positive crust outside the plate
    /// grows the plate first; writing 0 outside it does nothing. The cell's
    /// age becomes the thickness-weighted mean of the old and new crust.
    pub fn set_crust(&mut self, x: usize, y: usize, z: f32, t: u32) -> Result<(), PlateError> {
        self.write_crust(x, y, z, t)
            .map(|_| ())
            .map_err(|e| e.during(Operation::SetCrust, x, y))
    }

    /// Writes a cell and returns its local coordinates, or `None` if the
    /// write was a no-op outside the plate.
    pub(super) fn write_crust(
        &mut self,
        x: usize,
        y: usize,
        z: f32,
        t: u32,
    ) -> Result<Option<(usize, usize)>, PlateError> {
        let z = if z > 0.0 { z } else { 0.0 };

        let (lx, ly) = match self.local(x, y) {
            Some(local) => local,
            None if z > 0.0 => self.grow_to_contain(x, y)?,
            None => return Ok(None),
        };

        let index = self.crust.index_of(lx, ly);
        let old = self.crust[index];
        if z > 0.0 {
            self.age[index] = if old > 0.0 {
                blend_age(old, self.age[index], z, t)
            } else {
                t
            };
        }
        self.mass += z - old;
        self.crust[index] = z;

        Ok(Some((lx, ly)))
    }
}

/// Thickness-weighted mean of two crust ages, rounded to the nearest step.
pub(super) fn blend_age(old_thickness: f32, old_age: u32, thickness: f32, age: u32) -> u32 {
    let (a, b) = (old_thickness as f64, thickness as f64);
    ((a * old_age as f64 + b * age as f64) / (a + b)).round() as u32
}

#[cfg(test)]
mod tests {
    use super::super::plate::tests::{crust_sum, flat_plate, world};
    use super::*;
    use crate::tectonics::PlateConfig;
    use proptest::prelude::*;

    #[test]
    fn test_read_write_inside() {
        let mut plate = flat_plate(4, 4, 2, 2, 1.0, world(16));
        plate.set_crust(3, 3, 4.0, 9).unwrap();

        assert_eq!(plate.crust(3, 3), 4.0);
        assert_eq!(plate.mass(), 19.0);
        // (1 * 3 + 4 * 9) / 5 = 7.8
        assert_eq!(plate.crust_timestamp(3, 3), 8);
        assert_eq!(plate.crust(10, 10), 0.0);
        assert_eq!(plate.crust_timestamp(10, 10), 0);
    }

    #[test]
    fn test_negative_write_stores_zero() {
        let mut plate = flat_plate(4, 4, 0, 0, 1.0, world(16));
        plate.set_crust(1, 1, -3.0, 5).unwrap();

        assert_eq!(plate.crust(1, 1), 0.0);
        assert_eq!(plate.mass(), 15.0);
        // Removing crust keeps the old age.
        assert_eq!(plate.crust_timestamp(1, 1), 3);
    }

    #[test]
    fn test_zero_outside_is_noop() {
        let mut plate = flat_plate(4, 4, 0, 0, 1.0, world(16));
        plate.set_crust(10, 10, 0.0, 5).unwrap();
        plate.set_crust(10, 10, -1.0, 5).unwrap();
        assert_eq!(plate.width(), 4);
        assert_eq!(plate.height(), 4);
        assert_eq!(plate.mass(), 16.0);
    }

    #[test]
    fn test_write_on_empty_cell_takes_new_age() {
        let map = [0.0, 1.0, 1.0, 1.0];
        let mut plate = Plate::new(1, &map, 2, 2, 0, 0, 2, world(8), PlateConfig::default()).unwrap();
        plate.set_crust(0, 0, 0.5, 40).unwrap();
        assert_eq!(plate.crust_timestamp(0, 0), 40);
    }

    #[test]
    fn test_blend_age() {
        assert_eq!(blend_age(1.0, 0, 1.0, 10), 5);
        assert_eq!(blend_age(3.0, 10, 1.0, 20), 13);
        assert_eq!(blend_age(1.0, u32::MAX, 1.0, u32::MAX), u32::MAX);
    }

    proptest! {
        #[test]
        fn prop_mass_tracks_crust_sum(
            writes in prop::collection::vec((0usize..32, 0usize..32, -2.0f32..6.0, 0u32..100), 1..40)
        ) {
            let mut plate = flat_plate(6, 5, 3, 4, 1.0, world(32));
            for (x, y, z, t) in writes {
                plate.set_crust(x, y, z, t).unwrap();
                if z > 0.0 {
                    prop_assert!(plate.contains(x, y));
                    prop_assert_eq!(plate.crust(x, y), z);
                }
            }
            let sum = crust_sum(&plate);
            prop_assert!((plate.mass() - sum).abs() <= 1e-3 * sum.max(1.0));
            prop_assert!(plate.crust_map().iter().all(|&h| h >= 0.0));
        }
    }
}
