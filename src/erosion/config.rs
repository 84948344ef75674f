//! Erosion configuration.

use serde::{Deserialize, Serialize};

/// Parameters of the per-step crust erosion pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErosionConfig {
    /// Fraction of the height above the lower bound a river source loses.
    pub flow_strength: f32,
    /// Cells are scaled by a random factor in `1 ± noise_amplitude`.
    pub noise_amplitude: f32,
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            flow_strength: 0.2,
            noise_amplitude: 0.1,
        }
    }
}

impl ErosionConfig {
    /// Deterministic erosion: rivers and diffusion only.
    pub fn without_noise() -> Self {
        Self {
            noise_amplitude: 0.0,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ErosionConfig::default();
        assert_eq!(config.flow_strength, 0.2);
        assert_eq!(config.noise_amplitude, 0.1);
    }

    #[test]
    fn test_without_noise() {
        let config = ErosionConfig::without_noise();
        assert_eq!(config.noise_amplitude, 0.0);
        assert_eq!(config.flow_strength, 0.2);
    }
}
