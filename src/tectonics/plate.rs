//! The tectonic plate entity.

use std::f32::consts::TAU;

use glam::Vec2;
use log::trace;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::config::PlateConfig;
use super::error::PlateError;
use super::segment::{ContinentSegment, Segmentation};
use crate::erosion::cpu::erode_crust;
use crate::geometry::{EdgeWrap, Grid, PlateRect, WorldDimension};

/// A rectangular piece of lithosphere drifting over the toroidal world.
///
/// The plate owns its crust thickness grid, a parallel age grid and the
/// continent labels of its cells. Its grid is anchored at `(left, top)` in
/// world coordinates and grows on demand when crust is written outside it.
#[derive(Debug, Clone)]
pub struct Plate {
    pub(super) config: PlateConfig,
    pub(super) world: WorldDimension,
    pub(super) rng: ChaCha8Rng,

    pub(super) left: f32,
    pub(super) top: f32,
    pub(super) crust: Grid<f32>,
    pub(super) age: Grid<u32>,
    pub(super) segmentation: Segmentation,

    /// Sum of all crust thicknesses.
    pub(super) mass: f32,
    /// Mass-weighted centroid in local coordinates.
    pub(super) center: Vec2,

    /// Unit direction of travel.
    pub(super) heading: Vec2,
    /// Distance travelled per step.
    pub(super) velocity: f32,
    /// Collision impulses not yet applied to the heading.
    pub(super) impulse: Vec2,
    /// +1 or -1; the side the drift curves to.
    pub(super) rot_dir: f32,
}

impl Plate {
    /// Creates a plate from a row-major heightmap.
    ///
    /// # Arguments
    /// * `seed` - Seed of the plate's random source (heading, jitter, noise)
    /// * `heightmap` - `width * height` crust thicknesses
    /// * `x`, `y` - World position of the plate's top-left cell
    /// * `age` - Creation step; stamped on every cell that has crust
    /// * `world` - Extents of the world the plate lives in
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        seed: u64,
        heightmap: &[f32],
        width: usize,
        height: usize,
        x: usize,
        y: usize,
        age: u32,
        world: WorldDimension,
        config: PlateConfig,
    ) -> Result<Self, PlateError> {
        if heightmap.is_empty() {
            return Err(PlateError::EmptyHeightmap);
        }
        if width == 0 || height == 0 || width > world.width() || height > world.height() {
            return Err(PlateError::InvalidDimensions {
                width,
                height,
                world_width: world.width(),
                world_height: world.height(),
            });
        }
        if heightmap.len() != width * height {
            return Err(PlateError::HeightmapSize {
                expected: width * height,
                actual: heightmap.len(),
            });
        }
        if let Some((index, &value)) = heightmap.iter().enumerate().find(|(_, h)| !h.is_finite()) {
            return Err(PlateError::InvalidHeight { index, value });
        }
        if x >= world.width() || y >= world.height() {
            return Err(PlateError::OutsideWorld {
                left: x as f32,
                top: y as f32,
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let angle = TAU * rng.random::<f32>();
        let rot_dir = if rng.random::<bool>() { 1.0 } else { -1.0 };

        let thickness: Vec<f32> = heightmap.iter().map(|&h| h.max(0.0)).collect();
        let ages: Vec<u32> = thickness.iter().map(|&h| if h > 0.0 { age } else { 0 }).collect();

        let mut plate = Self {
            left: x as f32,
            top: y as f32,
            crust: Grid::from_vec(width, height, thickness).ok_or(PlateError::HeightmapSize {
                expected: width * height,
                actual: heightmap.len(),
            })?,
            age: Grid::from_vec(width, height, ages).ok_or(PlateError::HeightmapSize {
                expected: width * height,
                actual: heightmap.len(),
            })?,
            segmentation: Segmentation::new(width, height),
            mass: 0.0,
            center: Vec2::ZERO,
            heading: Vec2::from_angle(angle),
            velocity: config.initial_speed,
            impulse: Vec2::ZERO,
            rot_dir,
            config,
            world,
            rng,
        };
        plate.recompute_mass();
        Ok(plate)
    }

    /// Recomputes total mass and centroid from the crust grid.
    pub(super) fn recompute_mass(&mut self) {
        let width = self.crust.width();
        let mut mass = 0.0f32;
        let mut weighted = Vec2::ZERO;
        for (i, &h) in self.crust.iter().enumerate() {
            mass += h;
            weighted += Vec2::new((i % width) as f32, (i / width) as f32) * h;
        }
        self.mass = mass;
        self.center = if mass > 0.0 { weighted / mass } else { Vec2::ZERO };
    }

    /// Integer rectangle currently covered by the plate's grid.
    pub fn bounds(&self) -> PlateRect {
        PlateRect::new(
            self.left as usize,
            self.top as usize,
            self.crust.width(),
            self.crust.height(),
        )
    }

    /// Local coordinates of a world point, if the plate covers it.
    pub(super) fn local(&self, x: usize, y: usize) -> Option<(usize, usize)> {
        self.bounds().to_local(&self.world, x, y)
    }

    pub(super) fn local_or_err(&self, x: usize, y: usize) -> Result<(usize, usize), PlateError> {
        self.local(x, y).ok_or(PlateError::OutOfBounds {
            x,
            y,
            bounds: self.bounds(),
        })
    }

    pub(super) fn edge_wrap(&self) -> EdgeWrap {
        self.world.edge_wrap(self.crust.width(), self.crust.height())
    }

    /// True if the plate's grid covers the world point.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        self.local(x, y).is_some()
    }

    /// Erodes crust at or above `lower_bound` and re-derives mass and centroid.
    ///
    /// Ages are left untouched.
    pub fn erode(&mut self, lower_bound: f32) {
        let before = self.mass;
        let wrap = self.edge_wrap();
        self.crust = erode_crust(&self.crust, lower_bound, wrap, &self.config.erosion, &mut self.rng);
        self.recompute_mass();
        trace!(
            "eroded plate {}: mass {:.3} -> {:.3}",
            self.bounds(),
            before,
            self.mass
        );
    }

    /// Clears continent labels; call once per step after the crust moved.
    pub fn reset_segments(&mut self) {
        self.segmentation.reset();
    }

    pub fn world(&self) -> WorldDimension {
        self.world
    }

    pub fn config(&self) -> &PlateConfig {
        &self.config
    }

    /// Fractional world position of the grid's top-left corner.
    pub fn position(&self) -> (f32, f32) {
        (self.left, self.top)
    }

    pub fn width(&self) -> usize {
        self.crust.width()
    }

    pub fn height(&self) -> usize {
        self.crust.height()
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn momentum(&self) -> f32 {
        self.mass * self.velocity
    }

    /// Mass-weighted centroid in local coordinates.
    pub fn center(&self) -> Vec2 {
        self.center
    }

    pub fn heading(&self) -> Vec2 {
        self.heading
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Heading scaled by speed.
    pub fn velocity_vector(&self) -> Vec2 {
        self.heading * self.velocity
    }

    pub fn impulse(&self) -> Vec2 {
        self.impulse
    }

    pub fn rotation_direction(&self) -> f32 {
        self.rot_dir
    }

    pub fn is_empty(&self) -> bool {
        self.mass <= 0.0
    }

    pub fn crust_map(&self) -> &Grid<f32> {
        &self.crust
    }

    pub fn age_map(&self) -> &Grid<u32> {
        &self.age
    }

    pub fn segments(&self) -> &[ContinentSegment] {
        self.segmentation.segments()
    }

    pub fn segmentation(&self) -> &Segmentation {
        &self.segmentation
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn world(side: usize) -> WorldDimension {
        WorldDimension::square(side).unwrap()
    }

    /// Plate of uniform thickness at `(x, y)`.
    pub(crate) fn flat_plate(
        width: usize,
        height: usize,
        x: usize,
        y: usize,
        thickness: f32,
        world: WorldDimension,
    ) -> Plate {
        let map = vec![thickness; width * height];
        Plate::new(7, &map, width, height, x, y, 3, world, PlateConfig::default()).unwrap()
    }

    pub(crate) fn crust_sum(plate: &Plate) -> f32 {
        plate.crust_map().iter().sum()
    }

    #[test]
    fn test_construction_rejects_bad_input() {
        let w = world(16);
        let cfg = PlateConfig::default;

        assert_eq!(
            Plate::new(1, &[], 2, 2, 0, 0, 0, w, cfg()).unwrap_err(),
            PlateError::EmptyHeightmap
        );
        assert!(matches!(
            Plate::new(1, &[1.0; 4], 0, 4, 0, 0, 0, w, cfg()),
            Err(PlateError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            Plate::new(1, &[1.0; 34], 17, 2, 0, 0, 0, w, cfg()),
            Err(PlateError::InvalidDimensions { .. })
        ));
        assert_eq!(
            Plate::new(1, &[1.0; 3], 2, 2, 0, 0, 0, w, cfg()).unwrap_err(),
            PlateError::HeightmapSize { expected: 4, actual: 3 }
        );
        assert!(matches!(
            Plate::new(1, &[1.0, f32::NAN, 1.0, 1.0], 2, 2, 0, 0, 0, w, cfg()),
            Err(PlateError::InvalidHeight { index: 1, .. })
        ));
        assert!(matches!(
            Plate::new(1, &[1.0; 4], 2, 2, 16, 0, 0, w, cfg()),
            Err(PlateError::OutsideWorld { .. })
        ));
    }

    #[test]
    fn test_construction_state() {
        let map = [0.0, 2.0, 0.0, 2.0, -1.0, 0.0];
        let plate = Plate::new(5, &map, 3, 2, 4, 6, 11, world(16), PlateConfig::default()).unwrap();

        assert_eq!(plate.mass(), 4.0);
        assert_eq!(plate.center(), Vec2::new(0.5, 0.5));
        assert_eq!(plate.age_map().as_slice(), &[0, 11, 0, 11, 0, 0]);
        // Negative input is clamped.
        assert_eq!(plate.crust_map()[4], 0.0);
        assert!((plate.heading().length() - 1.0).abs() < 1e-5);
        assert_eq!(plate.velocity(), 1.0);
        assert!(plate.rotation_direction() == 1.0 || plate.rotation_direction() == -1.0);
        assert_eq!(plate.bounds(), PlateRect::new(4, 6, 3, 2));
    }

    #[test]
    fn test_initial_speed_sets_velocity() {
        let config = PlateConfig {
            initial_speed: 2.5,
            ..Default::default()
        };
        let plate = Plate::new(5, &[1.0; 4], 2, 2, 0, 0, 0, world(16), config).unwrap();

        assert!((plate.heading().length() - 1.0).abs() < 1e-5);
        assert_eq!(plate.velocity(), 2.5);
        assert!((plate.velocity_vector().length() - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_same_seed_same_plate() {
        let a = flat_plate(4, 4, 0, 0, 1.0, world(16));
        let b = flat_plate(4, 4, 0, 0, 1.0, world(16));
        assert_eq!(a.heading(), b.heading());
        assert_eq!(a.rotation_direction(), b.rotation_direction());
    }

    #[test]
    fn test_contains_across_seam() {
        let plate = flat_plate(4, 4, 14, 14, 1.0, world(16));
        assert!(plate.contains(15, 15));
        assert!(plate.contains(1, 1));
        assert!(plate.contains(17, 1));
        assert!(!plate.contains(2, 1));
        assert!(!plate.contains(13, 14));
    }

    #[test]
    fn test_empty_plate_has_zero_center() {
        let plate = flat_plate(3, 3, 0, 0, 0.0, world(8));
        assert!(plate.is_empty());
        assert_eq!(plate.center(), Vec2::ZERO);
    }

    #[test]
    fn test_erode_flat_plate_without_noise_is_stable() {
        let config = PlateConfig {
            erosion: crate::erosion::ErosionConfig::without_noise(),
            ..Default::default()
        };
        let map = vec![2.0f32; 16 * 16];
        let mut plate = Plate::new(7, &map, 16, 16, 0, 0, 3, world(64), config).unwrap();

        plate.erode(0.1);

        assert!(plate.crust_map().iter().all(|&h| h == 2.0));
        assert_eq!(plate.mass(), 512.0);
    }

    #[test]
    fn test_erode_flat_plate_mass() {
        let mut plate = flat_plate(32, 32, 0, 0, 2.0, world(64));
        let initial = plate.mass();

        // A flat plate has no rivers; only the noise changes its mass.
        plate.erode(0.1);
        assert!((plate.mass() - initial).abs() <= 0.1 * initial);
        assert!((plate.mass() - crust_sum(&plate)).abs() < 1e-3 * initial);

        // Once roughened, rivers carve it down.
        for _ in 0..4 {
            let before = plate.mass();
            plate.erode(0.1);
            assert!(plate.crust_map().iter().all(|&h| h >= 0.0));
            assert!((plate.mass() - crust_sum(&plate)).abs() < 1e-3 * initial);
            assert!(plate.mass() <= before, "{} > {}", plate.mass(), before);
        }
    }

    #[test]
    fn test_erode_wears_down_peak() {
        let mut map = vec![1.0f32; 25];
        map[12] = 5.0;
        let mut plate = Plate::new(9, &map, 5, 5, 0, 0, 0, world(16), PlateConfig::default()).unwrap();

        plate.erode(0.5);
        let peak = plate.crust_map()[12];
        // Flow routing takes 20% and diffusion levels the rest; noise is at most 10%.
        assert!(peak < 5.0 * 0.8 * 1.1, "peak {peak}");
        assert!((plate.mass() - crust_sum(&plate)).abs() < 1e-4);
    }
}
