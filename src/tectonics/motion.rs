//! Per-step drift of a plate across the world.

use glam::Vec2;
use log::trace;

use super::error::{Operation, PlateError};
use super::plate::Plate;

impl Plate {
    /// Advances the plate by one step.
    ///
    /// Pending collision impulses are folded into the heading, which is then
    /// renormalized. The change in the heading's length before normalization
    /// becomes a change in speed. The heading is rotated a little so the
    /// plate drifts along a circle, and the anchor moves and wraps around the
    /// world.
    pub fn move_plate(&mut self) -> Result<(), PlateError> {
        let (x, y) = (self.left as usize, self.top as usize);
        self.integrate_motion()
            .map_err(|e| e.during(Operation::Move, x, y))
    }

    fn integrate_motion(&mut self) -> Result<(), PlateError> {
        self.check_anchor()?;

        let previous = self.heading;
        let combined = self.heading + self.impulse;
        self.impulse = Vec2::ZERO;

        let length = combined.length();
        self.heading = if length > 0.0 && length.is_finite() {
            combined / length
        } else {
            previous
        };
        self.velocity = (self.velocity + length - 1.0).max(0.0);
        if !self.velocity.is_finite() {
            self.velocity = 0.0;
        }

        let radius = self.world.average_side() as f32 * self.config.curvature_factor;
        let alpha = self.rot_dir * self.velocity / radius;
        self.heading = Vec2::from_angle(alpha * self.velocity).rotate(self.heading);

        let step = self.heading * self.velocity;
        self.left = self.world.wrap_position_x(self.left + step.x);
        self.top = self.world.wrap_position_y(self.top + step.y);
        trace!(
            "plate moved to ({:.2}, {:.2}), speed {:.3}",
            self.left,
            self.top,
            self.velocity
        );

        self.check_anchor()
    }

    fn check_anchor(&self) -> Result<(), PlateError> {
        if self.world.contains(self.left, self.top) {
            Ok(())
        } else {
            Err(PlateError::OutsideWorld {
                left: self.left,
                top: self.top,
            })
        }
    }
}
