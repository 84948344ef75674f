//! Continent lookup, collision bookkeeping and crust hand-over between plates.

use glam::Vec2;
use log::{debug, warn};

use super::error::{Operation, PlateError};
use super::plate::Plate;
use super::segment::ContinentId;

/// Plates pass through each other without bouncing.
const RESTITUTION: f32 = 0.0;

impl Plate {
    /// Continent id of the cell at a world point, segmenting lazily.
    pub fn continent_at(&mut self, x: usize, y: usize) -> Result<ContinentId, PlateError> {
        self.resolve_continent(x, y)
            .map_err(|e| e.during(Operation::ContinentAt, x, y))
    }

    pub(super) fn resolve_continent(&mut self, x: usize, y: usize) -> Result<ContinentId, PlateError> {
        let (lx, ly) = self.local_or_err(x, y)?;
        let wrap = self.edge_wrap();
        let id = self.segmentation.resolve(
            &self.crust,
            lx,
            ly,
            wrap,
            self.config.continental_base,
        );
        if self.segmentation.segment(id).is_none() {
            return Err(PlateError::UnresolvedContinent { x, y });
        }
        Ok(id)
    }

    /// Records a collision against the continent under `(x, y)` and returns
    /// that continent's area.
    pub fn add_collision(&mut self, x: usize, y: usize) -> Result<usize, PlateError> {
        self.record_collision(x, y)
            .map_err(|e| e.during(Operation::AddCollision, x, y))
    }

    fn record_collision(&mut self, x: usize, y: usize) -> Result<usize, PlateError> {
        let id = self.resolve_continent(x, y)?;
        let segment = self
            .segmentation
            .segment_mut(id)
            .ok_or(PlateError::UnresolvedContinent { x, y })?;
        segment.coll_count += 1;
        Ok(segment.area)
    }

    /// Collision count of the continent under `(x, y)` and that count
    /// relative to the continent's area.
    pub fn collision_info(&mut self, x: usize, y: usize) -> Result<(usize, f32), PlateError> {
        let id = self
            .resolve_continent(x, y)
            .map_err(|e| e.during(Operation::CollisionInfo, x, y))?;
        let segment = self
            .segmentation
            .segment(id)
            .ok_or(PlateError::UnresolvedContinent { x, y })?;
        let ratio = segment.coll_count as f32 / (1 + segment.area) as f32;
        Ok((segment.coll_count, ratio))
    }

    /// Area of the continent under `(x, y)`.
    pub fn continent_area(&mut self, x: usize, y: usize) -> Result<usize, PlateError> {
        let id = self
            .resolve_continent(x, y)
            .map_err(|e| e.during(Operation::ContinentArea, x, y))?;
        Ok(self.segmentation.segment(id).map_or(0, |s| s.area))
    }

    /// Applies the collision response between this plate and `other` at a
    /// shared world point.
    ///
    /// `coll_mass` is the mass this plate takes part in the collision with.
    /// Both plates receive an impulse along the normal between their
    /// centroids; nothing happens if they are already separating. The
    /// response is one-sided; resolving from both plates makes it symmetric.
    pub fn collide(&mut self, other: &mut Plate, x: usize, y: usize, coll_mass: f32) -> Result<(), PlateError> {
        self.exchange_impulse(other, x, y, coll_mass)
            .map_err(|e| e.during(Operation::Collide, x, y))
    }

    fn exchange_impulse(&mut self, other: &mut Plate, x: usize, y: usize, coll_mass: f32) -> Result<(), PlateError> {
        let (ax, ay) = self.local_or_err(x, y)?;
        let (bx, by) = other.local_or_err(x, y)?;

        if self.mass <= 0.0 || coll_mass <= 0.0 {
            warn!(
                "ignoring collision at ({x}, {y}) with mass {} against {}",
                self.mass, coll_mass
            );
            return Ok(());
        }

        let from_self = Vec2::new(ax as f32, ay as f32) - self.center.trunc();
        let from_other = Vec2::new(bx as f32, by as f32) - other.center.trunc();
        let normal = from_self - from_other;
        let length_sq = normal.length_squared();
        if length_sq <= 0.0 {
            return Ok(());
        }
        let normal = normal / length_sq.sqrt();

        let relative = self.heading - other.heading;
        let approach = relative.dot(normal);
        if approach <= 0.0 {
            return Ok(());
        }

        let denominator = normal.length_squared() * (1.0 / self.mass + 1.0 / coll_mass);
        let j = -(1.0 + RESTITUTION) * approach / denominator;

        self.impulse += normal * (j / self.mass);
        other.impulse -= normal * (j / (coll_mass + other.mass));

        Ok(())
    }

    /// Moves the whole continent under `(x, y)` onto `other` and returns the
    /// mass transferred.
    ///
    /// The continent's cells keep their world positions on `other` and join
    /// the continent `other` has at the same point. Calling this again for
    /// the same continent transfers nothing.
    pub fn aggregate_crust(&mut self, other: &mut Plate, x: usize, y: usize) -> Result<f32, PlateError> {
        self.transfer_continent(other, x, y)
            .map_err(|e| e.during(Operation::AggregateCrust, x, y))
    }

    fn transfer_continent(&mut self, other: &mut Plate, x: usize, y: usize) -> Result<f32, PlateError> {
        let (lx, ly) = self.local_or_err(x, y)?;
        let id = self.resolve_continent(x, y)?;
        let segment = self
            .segmentation
            .segment(id)
            .ok_or(PlateError::UnresolvedContinent { x, y })?;
        if segment.is_empty() {
            return Ok(0.0);
        }
        let bounds = segment.bounds;

        let target = other.resolve_continent(x, y)?;

        // Offsetting by a full world keeps the subtraction below non-negative.
        let base_x = x + self.world.width();
        let base_y = y + self.world.height();
        let before = self.mass;

        for cy in bounds.top..=bounds.bottom {
            for cx in bounds.left..=bounds.right {
                let index = self.crust.index_of(cx, cy);
                let thickness = self.crust[index];
                if self.segmentation.id_at(index) != Some(id) || thickness <= 0.0 {
                    continue;
                }
                other.add_crust_by_collision(
                    base_x + cx - lx,
                    base_y + cy - ly,
                    thickness,
                    self.age[index],
                    target,
                )?;
                self.mass -= thickness;
                self.crust[index] = 0.0;
            }
        }

        if let Some(segment) = self.segmentation.segment_mut(id) {
            segment.area = 0;
        }

        let transferred = before - self.mass;
        debug!(
            "continent {} of plate {} aggregated onto continent {} of plate {}: mass {:.3}",
            id,
            self.bounds(),
            target,
            other.bounds(),
            transferred
        );
        Ok(transferred)
    }

    /// Adds crust received from another plate and labels the cell with
    /// `continent`.
    pub fn add_crust_by_collision(
        &mut self,
        x: usize,
        y: usize,
        z: f32,
        t: u32,
        continent: ContinentId,
    ) -> Result<(), PlateError> {
        self.receive_crust(x, y, z, t, continent)
            .map_err(|e| e.during(Operation::AddCrustByCollision, x, y))
    }

    fn receive_crust(&mut self, x: usize, y: usize, z: f32, t: u32, continent: ContinentId) -> Result<(), PlateError> {
        if self.segmentation.segment(continent).is_none() {
            return Err(PlateError::UnresolvedContinent { x, y });
        }
        let current = self.crust(x, y);
        if let Some((lx, ly)) = self.write_crust(x, y, current + z, t)? {
            self.segmentation.assign(lx, ly, continent);
        }
        Ok(())
    }

    /// Slows the plate down in proportion to the mass deformed in a
    /// collision. Speed never drops below zero.
    pub fn apply_friction(&mut self, deformed_mass: f32) {
        if self.mass > 0.0 {
            let decrease = self.config.deformation_weight * deformed_mass / self.mass;
            self.velocity -= decrease.min(self.velocity);
        }
    }
}
