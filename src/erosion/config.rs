//! Erosion configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for physically meaningless erosion parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErosionConfigError {
    #[error("Inertia must lie in [0, 1) (got {0})")]
    InvalidInertia(f32),
    #[error("Minimum slope must be positive (got {0})")]
    NonPositiveMinSlope(f32),
    #[error("Sediment capacity must be positive (got {0})")]
    NonPositiveCapacity(f32),
    #[error("Deposition rate must lie in (0, 1] (got {0})")]
    InvalidDepositionRate(f32),
    #[error("Erosion rate must lie in (0, 1] (got {0})")]
    InvalidErosionRate(f32),
    #[error("Evaporation must lie in [0, 1) (got {0})")]
    InvalidEvaporation(f32),
    #[error("Minimum water volume must be positive (got {0})")]
    NonPositiveMinWater(f32),
    #[error("Maximum droplet steps must be at least 1")]
    ZeroMaxSteps,
}

/// Parameters for droplet-based hydraulic erosion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErosionConfig {
    /// Seed for the droplet spawn stream.
    pub seed: u32,
    /// Number of droplets simulated by [`crate::erosion::ErosionEngine::run`].
    pub iterations: u32,

    /// How strongly a droplet keeps its previous direction (0 follows the
    /// steepest descent exactly).
    pub inertia: f32,
    /// Speed below which a droplet deposits regardless of slope.
    pub min_slope: f32,
    /// Sediment capacity per unit speed (Kc).
    pub capacity: f32,
    /// Fraction of the deposit amount actually dropped (Kd).
    pub deposition_rate: f32,
    /// Fraction of the erodible amount actually removed (Ks).
    pub erosion_rate: f32,

    /// Water lost per step; water is multiplied by `1 - evaporation`.
    pub evaporation: f32,
    /// Droplets with this much water or less are discarded.
    pub min_water: f32,
    /// Hard cap on steps per droplet.
    pub max_steps: u32,
}

impl Default for ErosionConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            iterations: 50_000,

            inertia: 0.05,
            min_slope: 0.01,
            capacity: 4.0,
            deposition_rate: 0.3,
            erosion_rate: 0.3,

            evaporation: 0.01,
            min_water: 0.01,
            max_steps: 1000,
        }
    }
}

impl ErosionConfig {
    /// Default physics with the given spawn seed.
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Checks every physical constant against its valid range.
    pub fn validate(&self) -> Result<(), ErosionConfigError> {
        if !(0.0..1.0).contains(&self.inertia) {
            return Err(ErosionConfigError::InvalidInertia(self.inertia));
        }
        if !(self.min_slope > 0.0) {
            return Err(ErosionConfigError::NonPositiveMinSlope(self.min_slope));
        }
        if !(self.capacity > 0.0 && self.capacity.is_finite()) {
            return Err(ErosionConfigError::NonPositiveCapacity(self.capacity));
        }
        if !(self.deposition_rate > 0.0 && self.deposition_rate <= 1.0) {
            return Err(ErosionConfigError::InvalidDepositionRate(self.deposition_rate));
        }
        if !(self.erosion_rate > 0.0 && self.erosion_rate <= 1.0) {
            return Err(ErosionConfigError::InvalidErosionRate(self.erosion_rate));
        }
        if !(0.0..1.0).contains(&self.evaporation) {
            return Err(ErosionConfigError::InvalidEvaporation(self.evaporation));
        }
        if !(self.min_water > 0.0) {
            return Err(ErosionConfigError::NonPositiveMinWater(self.min_water));
        }
        if self.max_steps == 0 {
            return Err(ErosionConfigError::ZeroMaxSteps);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = ErosionConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.inertia, 0.05);
        assert_eq!(cfg.capacity, 4.0);
        assert_eq!(ErosionConfig::with_seed(9).seed, 9);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let cases = [
            (
                ErosionConfig { inertia: 1.0, ..Default::default() },
                ErosionConfigError::InvalidInertia(1.0),
            ),
            (
                ErosionConfig { min_slope: 0.0, ..Default::default() },
                ErosionConfigError::NonPositiveMinSlope(0.0),
            ),
            (
                ErosionConfig { capacity: -1.0, ..Default::default() },
                ErosionConfigError::NonPositiveCapacity(-1.0),
            ),
            (
                ErosionConfig { deposition_rate: 1.5, ..Default::default() },
                ErosionConfigError::InvalidDepositionRate(1.5),
            ),
            (
                ErosionConfig { erosion_rate: 0.0, ..Default::default() },
                ErosionConfigError::InvalidErosionRate(0.0),
            ),
            (
                ErosionConfig { evaporation: 1.0, ..Default::default() },
                ErosionConfigError::InvalidEvaporation(1.0),
            ),
            (
                ErosionConfig { min_water: 0.0, ..Default::default() },
                ErosionConfigError::NonPositiveMinWater(0.0),
            ),
            (
                ErosionConfig { max_steps: 0, ..Default::default() },
                ErosionConfigError::ZeroMaxSteps,
            ),
        ];

        for (cfg, expected) in cases {
            assert_eq!(cfg.validate(), Err(expected));
        }
    }

    #[test]
    fn test_nan_parameters_rejected() {
        let cfg = ErosionConfig {
            min_slope: f32::NAN,
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
