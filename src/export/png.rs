//! PNG export functionality for crust maps.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Luma};
use thiserror::Error;

use crate::geometry::Grid;

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum PngExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid height range: min ({0}) >= max ({1})")]
    InvalidHeightRange(f32, f32),
    #[error("Map of {0}x{1} cells is too large for a PNG")]
    TooLarge(usize, usize),
}

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    /// Thickness mapped to black.
    pub min_height: f32,
    /// Thickness mapped to white.
    pub max_height: f32,
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            min_height: 0.0,
            max_height: 2.0,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngExportOptions {
    /// Creates options spanning the map's own thickness range.
    pub fn auto_range(map: &Grid<f32>) -> Self {
        let (min, max) = height_range(map);
        Self {
            min_height: min,
            max_height: if max > min { max } else { min + 1.0 },
            ..Default::default()
        }
    }
}

/// Smallest and largest value of a map; `(0, 0)` for an empty map.
pub fn height_range(map: &Grid<f32>) -> (f32, f32) {
    if map.is_empty() {
        return (0.0, 0.0);
    }
    map.iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &h| (lo.min(h), hi.max(h)))
}

pub(super) fn image_dimensions(width: usize, height: usize) -> Result<(u32, u32), PngExportError> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(PngExportError::TooLarge(width, height)),
    }
}

/// Exports a crust thickness map as a 16-bit grayscale PNG.
///
/// # Arguments
/// * `map` - Row-major thickness grid
/// * `path` - Output file path
/// * `options` - Export options including the range used for normalization
pub fn export_crust_png(
    map: &Grid<f32>,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    let min = options.min_height;
    let max = options.max_height;
    if min >= max {
        return Err(PngExportError::InvalidHeightRange(min, max));
    }
    let (width, height) = image_dimensions(map.width(), map.height())?;
    let range = max - min;

    let pixels: Vec<u16> = map
        .iter()
        .map(|&h| (((h - min) / range).clamp(0.0, 1.0) * 65535.0) as u16)
        .collect();
    let img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::from_raw(width, height, pixels)
        .ok_or(PngExportError::TooLarge(map.width(), map.height()))?;

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);

    let byte_slice: &[u8] = bytemuck::cast_slice(img.as_raw());
    encoder.write_image(byte_slice, width, height, image::ExtendedColorType::L16)?;

    Ok(())
}

/// Exports a crust age map as a 16-bit grayscale PNG, oldest crust darkest.
pub fn export_age_png(
    ages: &Grid<u32>,
    path: &Path,
    now: u32,
    compression: CompressionType,
    filter: FilterType,
) -> Result<(), PngExportError> {
    let (width, height) = image_dimensions(ages.width(), ages.height())?;
    let span = now.max(1) as f32;

    let pixels: Vec<u16> = ages
        .iter()
        .map(|&t| ((t.min(now) as f32 / span) * 65535.0) as u16)
        .collect();
    let byte_slice: &[u8] = bytemuck::cast_slice(&pixels);

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, compression, filter);
    encoder.write_image(byte_slice, width, height, image::ExtendedColorType::L16)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn gradient(width: usize, height: usize) -> Grid<f32> {
        let cells = (0..width * height)
            .map(|i| (i % width + i / width) as f32 / (width + height - 2) as f32 * 2.0)
            .collect();
        Grid::from_vec(width, height, cells).unwrap()
    }

    #[test]
    fn test_export_crust_png() {
        let map = gradient(48, 32);
        let dir = tempdir().unwrap();
        let path = dir.path().join("crust.png");

        export_crust_png(&map, &path, &PngExportOptions::default()).unwrap();

        let img = image::open(&path).unwrap();
        assert_eq!(img.width(), 48);
        assert_eq!(img.height(), 32);
        let luma = img.to_luma16();
        assert_eq!(luma.get_pixel(0, 0).0[0], 0);
        assert_eq!(luma.get_pixel(47, 31).0[0], 65535);
    }

    #[test]
    fn test_invalid_height_range() {
        let map = gradient(4, 4);
        let dir = tempdir().unwrap();
        let path = dir.path().join("crust.png");

        let options = PngExportOptions {
            min_height: 1.0,
            max_height: -1.0,
            ..Default::default()
        };
        let result = export_crust_png(&map, &path, &options);
        assert!(matches!(result, Err(PngExportError::InvalidHeightRange(..))));
    }

    #[test]
    fn test_auto_range() {
        let mut map = Grid::new(16, 16, 1.0f32);
        map[0] = 0.25;
        map[255] = 3.5;

        let options = PngExportOptions::auto_range(&map);
        assert_eq!(options.min_height, 0.25);
        assert_eq!(options.max_height, 3.5);

        let flat = PngExportOptions::auto_range(&Grid::new(2, 2, 1.0f32));
        assert!(flat.max_height > flat.min_height);
    }

    #[test]
    fn test_export_age_png() {
        let ages = Grid::from_vec(2, 2, vec![0u32, 5, 10, 20]).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("age.png");

        export_age_png(&ages, &path, 10, CompressionType::Fast, FilterType::NoFilter).unwrap();

        let luma = image::open(&path).unwrap().to_luma16();
        assert_eq!(luma.get_pixel(0, 0).0[0], 0);
        assert_eq!(luma.get_pixel(0, 1).0[0], 65535);
        // Ages past `now` are clamped.
        assert_eq!(luma.get_pixel(1, 1).0[0], 65535);
    }
}
