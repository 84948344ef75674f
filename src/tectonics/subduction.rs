//! Sediment carried under a plate at a convergent boundary.

use glam::Vec2;
use log::trace;
use rand::Rng;

use super::crust::blend_age;
use super::error::{Operation, PlateError};
use super::plate::Plate;

impl Plate {
    /// Deposits subducted crust somewhere inland of `(x, y)`.
    ///
    /// `dx`/`dy` is the subducting plate's velocity. The landing cell is
    /// pushed along the relative drift with a small random jitter; crust that
    /// would land outside the plate or on a cell without crust is lost.
    pub fn subduct(&mut self, x: usize, y: usize, z: f32, t: u32, dx: f32, dy: f32) -> Result<(), PlateError> {
        self.deposit_subducted(x, y, z, t, Vec2::new(dx, dy))
            .map_err(|e| e.during(Operation::Subduct, x, y))
    }

    fn deposit_subducted(&mut self, x: usize, y: usize, z: f32, t: u32, drift: Vec2) -> Result<(), PlateError> {
        let (lx, ly) = self.local_or_err(x, y)?;
        if z.is_nan() || z <= 0.0 {
            return Ok(());
        }

        // Plates moving the same way push the sediment along their difference.
        let mut drift = drift;
        if self.heading.dot(drift) > 0.0 {
            drift -= self.heading;
        }

        let u: f32 = self.rng.random();
        let sign = if self.rng.random::<bool>() { 1.0 } else { -1.0 };
        let jitter = u * u * u * sign * self.config.subduction_jitter;
        let shift = drift * self.config.subduction_inland_bias + Vec2::splat(jitter);

        let wrap = self.edge_wrap();
        let target = displaced(lx, shift.x, self.crust.width(), wrap.horizontal)
            .zip(displaced(ly, shift.y, self.crust.height(), wrap.vertical));
        let Some((tx, ty)) = target else {
            trace!("subducted crust {z:.3} from ({x}, {y}) left plate {}", self.bounds());
            return Ok(());
        };

        let index = self.crust.index_of(tx, ty);
        let old = self.crust[index];
        if old <= 0.0 {
            trace!("subducted crust {z:.3} from ({x}, {y}) hit an empty cell");
            return Ok(());
        }

        self.age[index] = blend_age(old, self.age[index], z, t);
        self.crust[index] = old + z;
        self.mass += z;
        Ok(())
    }
}

/// Moves a local coordinate by `shift`, wrapping only along spanning axes.
fn displaced(origin: usize, shift: f32, extent: usize, wraps: bool) -> Option<usize> {
    let target = (origin as f32 + shift).trunc();
    if !target.is_finite() {
        return None;
    }
    let target = target as i64;
    let extent = extent as i64;
    if wraps {
        Some(target.rem_euclid(extent) as usize)
    } else if (0..extent).contains(&target) {
        Some(target as usize)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::super::plate::tests::{crust_sum, flat_plate, world};
    use super::*;
    use crate::tectonics::PlateConfig;

    #[test]
    fn test_displaced() {
        assert_eq!(displaced(3, 2.7, 8, false), Some(5));
        assert_eq!(displaced(3, -3.5, 8, false), Some(0));
        assert_eq!(displaced(3, -4.5, 8, false), None);
        assert_eq!(displaced(3, 6.0, 8, false), None);
        assert_eq!(displaced(3, 6.0, 8, true), Some(1));
        assert_eq!(displaced(0, -2.0, 8, true), Some(6));
        assert_eq!(displaced(0, f32::NAN, 8, true), None);
    }

    #[test]
    fn test_subduct_adds_mass_inland() {
        let mut plate = flat_plate(32, 32, 0, 0, 1.0, world(64));
        plate.heading = Vec2::X;
        let before = plate.mass();

        // Opposing drift: no heading correction, lands ~10 cells west.
        plate.subduct(20, 16, 0.5, 9, -1.0, 0.0).unwrap();

        assert!((plate.mass() - before - 0.5).abs() < 1e-5);
        assert!((plate.mass() - crust_sum(&plate)).abs() < 1e-4);
        // Jitter is at most 3 cells on each axis.
        let landed = plate
            .crust_map()
            .iter()
            .position(|&h| h > 1.0)
            .map(|i| plate.crust_map().coords_of(i))
            .unwrap();
        assert!((7..=13).contains(&landed.0), "{landed:?}");
        assert!((13..=19).contains(&landed.1), "{landed:?}");
    }

    #[test]
    fn test_subduct_off_plate_is_lost() {
        let mut plate = flat_plate(8, 8, 0, 0, 1.0, world(64));
        plate.heading = Vec2::Y;
        let before = plate.mass();

        // Pushed 20 cells west of a plate 8 cells wide.
        plate.subduct(1, 4, 2.0, 0, -2.0, 0.0).unwrap();
        assert_eq!(plate.mass(), before);
    }

    #[test]
    fn test_subduct_onto_empty_cell_is_lost() {
        let mut plate = flat_plate(16, 16, 0, 0, 0.0, world(64));
        plate.set_crust(8, 8, 1.0, 0).unwrap();
        plate.heading = Vec2::Y;

        plate.subduct(8, 8, 1.0, 0, 0.0, 0.0).unwrap();
        assert!(plate.mass() >= 1.0 && plate.mass() <= 2.0);
        assert!((plate.mass() - crust_sum(&plate)).abs() < 1e-5);
    }

    #[test]
    fn test_subduct_ignores_non_positive_crust() {
        let mut plate = flat_plate(8, 8, 0, 0, 1.0, world(16));
        plate.subduct(2, 2, 0.0, 0, 0.0, 0.0).unwrap();
        plate.subduct(2, 2, -1.0, 0, 0.0, 0.0).unwrap();
        assert_eq!(plate.mass(), 64.0);
    }

    #[test]
    fn test_subduct_outside_plate_fails() {
        let mut plate = Plate::new(1, &[1.0; 4], 2, 2, 0, 0, 0, world(16), PlateConfig::default()).unwrap();
        let err = plate.subduct(9, 9, 1.0, 0, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, PlateError::Failed { op: Operation::Subduct, .. }));
    }
}
