//! Configuration for plate simulation.

use serde::{Deserialize, Serialize};

use crate::erosion::ErosionConfig;

/// Tunable constants of a single plate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateConfig {
    /// Crust at or above this thickness is continental and gets segmented.
    pub continental_base: f32,
    /// Weight of deformed mass when slowing a plate down after a collision.
    pub deformation_weight: f32,
    /// Speed a new plate starts with.
    pub initial_speed: f32,
    /// Drift circle radius as a fraction of the mean world side.
    pub curvature_factor: f32,
    /// Multiplier pushing subducted crust inland along the relative drift.
    pub subduction_inland_bias: f32,
    /// Amplitude of the random offset added to subducted crust.
    pub subduction_jitter: f32,
    /// Plates grow in multiples of this many cells.
    pub growth_granularity: usize,

    /// Erosion pass parameters.
    pub erosion: ErosionConfig,
}

impl Default for PlateConfig {
    fn default() -> Self {
        Self {
            continental_base: 1.0,
            deformation_weight: 2.0,
            initial_speed: 1.0,
            curvature_factor: 0.33,
            subduction_inland_bias: 10.0,
            subduction_jitter: 3.0,
            growth_granularity: 8,
            erosion: ErosionConfig::default(),
        }
    }
}

impl PlateConfig {
    /// Default constants with a different continental threshold.
    pub fn with_continental_base(continental_base: f32) -> Self {
        Self {
            continental_base,
            ..Default::default()
        }
    }

    /// Plates that barely curve and lose little speed in collisions.
    pub fn rigid() -> Self {
        Self {
            deformation_weight: 0.5,
            curvature_factor: 1.0,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlateConfig::default();
        assert_eq!(config.continental_base, 1.0);
        assert_eq!(config.deformation_weight, 2.0);
        assert_eq!(config.growth_granularity, 8);
    }

    #[test]
    fn test_with_continental_base() {
        let config = PlateConfig::with_continental_base(0.0);
        assert_eq!(config.continental_base, 0.0);
        assert_eq!(config.subduction_inland_bias, 10.0);
    }

    #[test]
    fn test_rigid_config() {
        let config = PlateConfig::rigid();
        assert!(config.deformation_weight < PlateConfig::default().deformation_weight);
        assert!(config.curvature_factor > PlateConfig::default().curvature_factor);
    }
}
