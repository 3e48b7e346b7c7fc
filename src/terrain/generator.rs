//! Heightmap synthesis strategies.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

use super::heightmap::{Heightmap, HeightmapError};
use crate::noise::{sample_fractal_noise, FractalNoiseConfig, NoiseConfigError, PerlinNoise};

/// A strategy that fills a new heightmap of the requested size.
///
/// Implementations are interchangeable wherever a heightmap source is needed
/// (see [`crate::pipeline::HeightmapStage`]).
pub trait TerrainGenerator: Send + Sync {
    /// Generates a fully populated `width x height` heightmap.
    ///
    /// Fails only when either dimension is zero.
    fn generate(&self, width: u32, height: u32) -> Result<Heightmap, HeightmapError>;

    /// Human-readable strategy name.
    fn name(&self) -> &str;
}

/// Fractal Perlin-noise terrain with values in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct PerlinNoiseGenerator {
    noise: PerlinNoise,
    config: FractalNoiseConfig,
}

impl PerlinNoiseGenerator {
    /// Builds the generator, rejecting zero octaves or non-positive frequency.
    pub fn new(config: FractalNoiseConfig) -> Result<Self, NoiseConfigError> {
        config.validate()?;
        Ok(Self {
            noise: PerlinNoise::new(config.seed),
            config,
        })
    }

    pub fn config(&self) -> &FractalNoiseConfig {
        &self.config
    }

    pub fn noise(&self) -> &PerlinNoise {
        &self.noise
    }

    /// Elevation of cell `(x, y)` in a `width x height` grid.
    ///
    /// Cell coordinates are mapped to a domain centered on the origin so that
    /// features scale with the grid rather than with absolute cell indices.
    pub fn elevation(&self, x: u32, y: u32, width: u32, height: u32) -> f32 {
        let nx = x as f64 / width as f64 - 0.5;
        let ny = y as f64 / height as f64 - 0.5;
        let value = sample_fractal_noise(&self.noise, nx, ny, &self.config);
        (((value + 1.0) / 2.0) as f32).clamp(0.0, 1.0)
    }
}

impl TerrainGenerator for PerlinNoiseGenerator {
    fn generate(&self, width: u32, height: u32) -> Result<Heightmap, HeightmapError> {
        let mut map = Heightmap::new(width, height)?;

        // Each cell is a pure function of its coordinates, so the parallel
        // fill matches a serial one bit for bit.
        map.as_mut_slice()
            .par_iter_mut()
            .enumerate()
            .for_each(|(i, h)| {
                let x = (i % width as usize) as u32;
                let y = (i / width as usize) as u32;
                *h = self.elevation(x, y, width, height);
            });

        log::debug!(
            "generated {}x{} perlin heightmap (seed={}, octaves={}, frequency={})",
            width,
            height,
            self.config.seed,
            self.config.octaves,
            self.config.frequency
        );
        Ok(map)
    }

    fn name(&self) -> &str {
        "perlin"
    }
}

/// Uncorrelated uniform noise in `[0, 1)`, one independent draw per cell.
///
/// Useful as a worst-case input for erosion and as a contrast to the
/// coherent generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WhiteNoiseGenerator {
    pub seed: u32,
}

impl WhiteNoiseGenerator {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }
}

impl TerrainGenerator for WhiteNoiseGenerator {
    fn generate(&self, width: u32, height: u32) -> Result<Heightmap, HeightmapError> {
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed as u64);
        Heightmap::from_fn(width, height, |_, _| rng.random::<f32>())
    }

    fn name(&self) -> &str {
        "white-noise"
    }
}
