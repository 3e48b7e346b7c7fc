//! Procedural heightmap synthesis and droplet hydraulic erosion.
//!
//! This crate generates a 2-D elevation grid from seeded fractal Perlin noise
//! and then weathers it by simulating individual water droplets that carve
//! and deposit sediment as they run downhill.

pub mod noise;
pub mod terrain;
pub mod erosion;
pub mod export;
pub mod pipeline;

pub use noise::{FractalNoiseConfig, PerlinNoise};
pub use terrain::{Heightmap, PerlinNoiseGenerator, Terrain, TerrainGenerator, WhiteNoiseGenerator};
pub use erosion::{ErosionConfig, ErosionEngine, ErosionStats};
pub use pipeline::{ErosionStage, GenerationStage, HeightmapStage, Pipeline, StageConfig};
