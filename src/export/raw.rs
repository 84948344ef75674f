//! RAW format export for game engine compatibility.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::geometry::Grid;

/// Errors that can occur during RAW export.
#[derive(Error, Debug)]
pub enum RawExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid height range: min ({0}) >= max ({1})")]
    InvalidHeightRange(f32, f32),
}

/// RAW export format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RawFormat {
    /// 16-bit unsigned integer, little-endian (Unity default).
    #[default]
    R16LittleEndian,
    /// 16-bit unsigned integer, big-endian.
    R16BigEndian,
    /// 32-bit float, little-endian (high precision).
    R32Float,
}

impl RawFormat {
    /// Bytes written per cell.
    pub fn bytes_per_cell(&self) -> usize {
        match self {
            RawFormat::R16LittleEndian | RawFormat::R16BigEndian => 2,
            RawFormat::R32Float => 4,
        }
    }
}

/// Exports a crust thickness map as a RAW heightmap.
///
/// # Arguments
/// * `map` - Row-major thickness grid
/// * `path` - Output file path
/// * `format` - RAW format (R16 or R32)
/// * `min_height` - Thickness mapped to 0 (R16 only)
/// * `max_height` - Thickness mapped to 65535 (R16 only)
pub fn export_crust_raw(
    map: &Grid<f32>,
    path: &Path,
    format: RawFormat,
    min_height: f32,
    max_height: f32,
) -> Result<(), RawExportError> {
    if format != RawFormat::R32Float && min_height >= max_height {
        return Err(RawExportError::InvalidHeightRange(min_height, max_height));
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    let range = max_height - min_height;
    let quantize = |h: f32| (((h - min_height) / range).clamp(0.0, 1.0) * 65535.0) as u16;

    match format {
        RawFormat::R16LittleEndian => {
            for &h in map.iter() {
                writer.write_all(&quantize(h).to_le_bytes())?;
            }
        }
        RawFormat::R16BigEndian => {
            for &h in map.iter() {
                writer.write_all(&quantize(h).to_be_bytes())?;
            }
        }
        RawFormat::R32Float => {
            for &h in map.iter() {
                writer.write_all(&h.to_le_bytes())?;
            }
        }
    }

    writer.flush()?;
    Ok(())
}
