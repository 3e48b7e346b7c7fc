//! Terrain generation module.
//!
//! Provides the heightmap grid, bilinear sampling over it, the synthesis
//! strategies that fill it, and the [`Terrain`] target used by the pipeline.

mod generator;
mod heightmap;
mod sampler;
mod surface;

pub use generator::{PerlinNoiseGenerator, TerrainGenerator, WhiteNoiseGenerator};
pub use heightmap::{Heightmap, HeightmapError};
pub use sampler::{gradient_at, sample_bilinear};
pub use surface::Terrain;
