//! World-space views of a plate: projected crust and continent maps.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::ImageEncoder;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::png::{image_dimensions, PngExportError};
use crate::geometry::Grid;
use crate::tectonics::Plate;

const OCEAN_COLOR: [u8; 3] = [24, 48, 96];
const OPEN_WORLD_COLOR: [u8; 3] = [0, 0, 0];
const UNLABELED_LAND_COLOR: [u8; 3] = [128, 128, 128];

/// Options for continent map export.
#[derive(Debug, Clone)]
pub struct PlateMapOptions {
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
    /// Seed for continent colors.
    pub color_seed: u64,
}

impl Default for PlateMapOptions {
    fn default() -> Self {
        Self {
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
            color_seed: 0,
        }
    }
}

/// Renders a plate's crust into a world-sized grid. Cells the plate does not
/// cover are 0.
pub fn world_crust(plate: &Plate) -> Grid<f32> {
    let world = plate.world();
    let mut map = Grid::new(world.width(), world.height(), 0.0f32);
    for y in 0..world.height() {
        for x in 0..world.width() {
            let i = map.index_of(x, y);
            map[i] = plate.crust(x, y);
        }
    }
    map
}

/// Generates distinct colors using golden ratio hue spacing.
pub fn generate_continent_colors(count: usize, seed: u64) -> Vec<[u8; 3]> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let golden_ratio = 0.618_034_f32;

    let mut hue = rng.random::<f32>();
    (0..count)
        .map(|_| {
            hue = (hue + golden_ratio) % 1.0;
            let saturation = 0.5 + rng.random::<f32>() * 0.4;
            let value = 0.6 + rng.random::<f32>() * 0.3;
            hsv_to_rgb(hue, saturation, value)
        })
        .collect()
}

/// Converts HSV color to RGB.
fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [u8; 3] {
    let h = h * 6.0;
    let i = h.floor() as i32;
    let f = h - i as f32;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    let (r, g, b) = match i.rem_euclid(6) {
        0 => (v, t, p),
        1 => (q, v, p),
        2 => (p, v, t),
        3 => (p, q, v),
        4 => (t, p, v),
        _ => (v, p, q),
    };

    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}

/// Colors every world cell by what the plate has there: nothing, oceanic
/// crust, or one of its continents.
pub fn continent_pixels(plate: &Plate, colors: &[[u8; 3]]) -> Vec<[u8; 3]> {
    let world = plate.world();
    let bounds = plate.bounds();
    let threshold = plate.config().continental_base;
    let crust = plate.crust_map();
    let ids = plate.segmentation().ids();

    let mut pixels = Vec::with_capacity(world.area());
    for y in 0..world.height() {
        for x in 0..world.width() {
            let color = match bounds.to_local(&world, x, y) {
                None => OPEN_WORLD_COLOR,
                Some((lx, ly)) => {
                    let i = crust.index_of(lx, ly);
                    if crust[i] < threshold {
                        OCEAN_COLOR
                    } else {
                        ids[i]
                            .and_then(|id| colors.get(id).copied())
                            .unwrap_or(UNLABELED_LAND_COLOR)
                    }
                }
            };
            pixels.push(color);
        }
    }
    pixels
}

/// Exports the plate's continents as an RGB PNG covering the whole world.
///
/// Only continents discovered so far get their own color; call
/// `continent_at` on the cells of interest first.
pub fn export_continent_map(
    plate: &Plate,
    path: &Path,
    options: &PlateMapOptions,
) -> Result<(), PngExportError> {
    let world = plate.world();
    let (width, height) = image_dimensions(world.width(), world.height())?;
    let colors = generate_continent_colors(plate.segments().len(), options.color_seed);
    let bytes: Vec<u8> = continent_pixels(plate, &colors).into_iter().flatten().collect();

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);
    encoder.write_image(&bytes, width, height, image::ExtendedColorType::Rgb8)?;
    Ok(())
}
