//! Noise generation module for terrain synthesis.
//!
//! A seeded permutation-table gradient noise field plus the fractal octave
//! accumulation built on top of it.

mod fractal;
mod perlin;

pub use fractal::{sample_fractal_noise, FractalNoiseConfig, NoiseConfigError};
pub use perlin::PerlinNoise;
