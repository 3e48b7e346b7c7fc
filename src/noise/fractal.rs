//! Multi-octave fractal Brownian motion (fBm) noise generation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::perlin::PerlinNoise;

/// Errors for malformed noise configurations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NoiseConfigError {
    #[error("Octave count must be at least 1")]
    ZeroOctaves,
    #[error("Base frequency must be positive and finite (got {0})")]
    NonPositiveFrequency(f64),
    #[error("Persistence must be positive and finite (got {0})")]
    InvalidPersistence(f64),
    #[error("Lacunarity must be positive and finite (got {0})")]
    InvalidLacunarity(f64),
}

/// Configuration for multi-octave fractal noise generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FractalNoiseConfig {
    /// Number of noise octaves (4-8 typical).
    pub octaves: u32,
    /// Base frequency over the normalized `[-0.5, 0.5]` domain. Higher values
    /// give more, smaller features.
    pub frequency: f64,
    /// Frequency multiplier per octave (typically 2.0).
    pub lacunarity: f64,
    /// Amplitude multiplier per octave (typically 0.5).
    pub persistence: f64,
    /// Random seed for reproducible generation.
    pub seed: u32,
}

impl Default for FractalNoiseConfig {
    fn default() -> Self {
        Self {
            octaves: 6,
            frequency: 4.0,
            lacunarity: 2.0,
            persistence: 0.5,
            seed: 42,
        }
    }
}

impl FractalNoiseConfig {
    /// Creates a new noise configuration with the given seed.
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Rugged terrain with many fine octaves.
    pub fn detailed(seed: u32) -> Self {
        Self {
            octaves: 8,
            frequency: 6.0,
            seed,
            ..Default::default()
        }
    }

    /// Rolling hills: few octaves, low frequency.
    pub fn smooth(seed: u32) -> Self {
        Self {
            octaves: 3,
            frequency: 2.0,
            persistence: 0.4,
            seed,
            ..Default::default()
        }
    }

    /// Checks that the configuration can produce a bounded field.
    pub fn validate(&self) -> Result<(), NoiseConfigError> {
        if self.octaves == 0 {
            return Err(NoiseConfigError::ZeroOctaves);
        }
        if !(self.frequency.is_finite() && self.frequency > 0.0) {
            return Err(NoiseConfigError::NonPositiveFrequency(self.frequency));
        }
        if !(self.persistence.is_finite() && self.persistence > 0.0) {
            return Err(NoiseConfigError::InvalidPersistence(self.persistence));
        }
        if !(self.lacunarity.is_finite() && self.lacunarity > 0.0) {
            return Err(NoiseConfigError::InvalidLacunarity(self.lacunarity));
        }
        Ok(())
    }
}

/// Samples fractal noise at a 2-D position.
///
/// Each octave scales the frequency by `lacunarity` and the amplitude by
/// `persistence`, starting from amplitude 1.0 at the base frequency.
///
/// # Returns
/// A noise value in approximately [-1, 1] range (normalized by amplitude sum)
pub fn sample_fractal_noise(noise: &PerlinNoise, x: f64, y: f64, config: &FractalNoiseConfig) -> f64 {
    let mut total = 0.0f64;
    let mut amplitude = 1.0f64;
    let mut frequency = config.frequency;
    let mut max_amplitude = 0.0f64;

    for _ in 0..config.octaves {
        total += noise.sample(x * frequency, y * frequency) * amplitude;
        max_amplitude += amplitude;
        amplitude *= config.persistence;
        frequency *= config.lacunarity;
    }

    if max_amplitude > 0.0 {
        total / max_amplitude
    } else {
        0.0
    }
}
