//! Export module for saving plate data to image and RAW files.
//!
//! Supports 16-bit PNG for universal compatibility, RAW formats
//! for game engine imports, and continent visualization maps.

mod plate_map;
mod png;
mod raw;

pub use plate_map::{
    continent_pixels, export_continent_map, generate_continent_colors, world_crust,
    PlateMapOptions,
};
pub use png::{export_age_png, export_crust_png, height_range, PngExportError, PngExportOptions};
pub use raw::{export_crust_raw, RawExportError, RawFormat};
