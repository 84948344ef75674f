//! Multi-octave fractal Brownian motion (fBm) heightmaps.

use serde::{Deserialize, Serialize};
use simdnoise::NoiseBuilder;

/// Thickness of oceanic crust where the noise is at its minimum height.
const OCEANIC_CRUST: f32 = 0.1;

/// Configuration for multi-octave fractal noise generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FractalNoiseConfig {
    /// Number of noise octaves (4-8 typical).
    pub octaves: u8,
    /// Base frequency in cycles per cell.
    pub frequency: f32,
    /// Frequency multiplier per octave (typically 2.0).
    pub lacunarity: f32,
    /// Amplitude decay per octave (0.4-0.6 typical).
    pub persistence: f32,
    /// Random seed for reproducible generation.
    pub seed: i32,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 6,
            frequency: 0.02,
            lacunarity: 2.0,
            persistence: 0.5,
            seed: 42,
        }
    }
}

impl FractalNoiseConfig {
    /// Creates a new noise configuration with the given seed.
    pub fn with_seed(seed: i32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Large, smooth landmasses.
    pub fn continental(seed: i32) -> Self {
        Self {
            octaves: 5,
            frequency: 0.01,
            lacunarity: 2.1,
            persistence: 0.45,
            seed,
        }
    }

    /// Many small islands.
    pub fn archipelago(seed: i32) -> Self {
        Self {
            octaves: 7,
            frequency: 0.05,
            lacunarity: 2.0,
            persistence: 0.6,
            seed,
        }
    }
}

/// Generates a `width × height` row-major fBm field normalized to [-1, 1].
///
/// A constant field (for example a single cell) comes back as all zeros.
pub fn fractal_heightmap(width: usize, height: usize, config: &FractalNoiseConfig) -> Vec<f32> {
    if width == 0 || height == 0 {
        return Vec::new();
    }

    let (values, min, max) = NoiseBuilder::fbm_2d(width, height)
        .with_seed(config.seed)
        .with_freq(config.frequency)
        .with_octaves(config.octaves.max(1))
        .with_lacunarity(config.lacunarity)
        .with_gain(config.persistence)
        .generate();

    let range = max - min;
    if range.is_nan() || range <= f32::EPSILON {
        return vec![0.0; width * height];
    }
    values
        .into_iter()
        .map(|v| ((v - min) / range) * 2.0 - 1.0)
        .collect()
}

/// Turns an fBm field into crust thickness.
///
/// Noise above `sea_level` becomes continental crust of at least
/// `continental_base`; the rest becomes thin oceanic crust.
pub fn crust_heightmap(
    width: usize,
    height: usize,
    config: &FractalNoiseConfig,
    sea_level: f32,
    continental_base: f32,
) -> Vec<f32> {
    fractal_heightmap(width, height, config)
        .into_iter()
        .map(|n| {
            if n > sea_level {
                continental_base * (1.0 + n - sea_level)
            } else {
                OCEANIC_CRUST * (1.0 + n).max(0.0)
            }
        })
        .collect()
}
