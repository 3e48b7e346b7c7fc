//! The elevation grid shared by generation, erosion and export.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::sampler::sample_bilinear;

/// Errors raised when a heightmap is constructed with invalid dimensions or data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HeightmapError {
    #[error("Heightmap dimensions must be non-zero (got {width}x{height})")]
    ZeroDimension { width: u32, height: u32 },
    #[error("Heightmap data length mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
}

/// A rectangular grid of elevation values stored in row-major order.
///
/// Values are conventionally in `[0, 1]` but nothing clamps them; erosion may
/// push individual cells slightly outside that range. The dimensions are fixed
/// at construction. Mutation is reserved to this crate's generators and the
/// erosion engine, so collaborators only ever see a read-only grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawHeightmap")]
pub struct Heightmap {
    width: u32,
    height: u32,
    heights: Vec<f32>,
}

/// Unvalidated wire form, checked on deserialization.
#[derive(Deserialize)]
struct RawHeightmap {
    width: u32,
    height: u32,
    heights: Vec<f32>,
}

impl TryFrom<RawHeightmap> for Heightmap {
    type Error = HeightmapError;

    fn try_from(raw: RawHeightmap) -> Result<Self, Self::Error> {
        Heightmap::from_vec(raw.width, raw.height, raw.heights)
    }
}

impl Heightmap {
    /// Creates a heightmap with every cell set to 0.0.
    pub fn new(width: u32, height: u32) -> Result<Self, HeightmapError> {
        Self::filled(width, height, 0.0)
    }

    /// Creates a heightmap with every cell set to `value`.
    pub fn filled(width: u32, height: u32, value: f32) -> Result<Self, HeightmapError> {
        check_dimensions(width, height)?;
        Ok(Self {
            width,
            height,
            heights: vec![value; cell_count(width, height)],
        })
    }

    /// Wraps an existing row-major buffer.
    pub fn from_vec(width: u32, height: u32, heights: Vec<f32>) -> Result<Self, HeightmapError> {
        check_dimensions(width, height)?;
        let expected = cell_count(width, height);
        if heights.len() != expected {
            return Err(HeightmapError::SizeMismatch {
                expected,
                actual: heights.len(),
            });
        }
        Ok(Self { width, height, heights })
    }

    /// Builds a heightmap by evaluating `f(x, y)` for every cell.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Result<Self, HeightmapError>
    where
        F: FnMut(u32, u32) -> f32,
    {
        check_dimensions(width, height)?;
        let mut heights = Vec::with_capacity(cell_count(width, height));
        for y in 0..height {
            for x in 0..width {
                heights.push(f(x, y));
            }
        }
        Ok(Self { width, height, heights })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the elevation at a grid cell.
    ///
    /// # Panics
    /// Panics if `x >= width` or `y >= height`.
    pub fn value_at(&self, x: u32, y: u32) -> f32 {
        assert!(
            x < self.width && y < self.height,
            "cell ({}, {}) outside {}x{} heightmap",
            x,
            y,
            self.width,
            self.height
        );
        self.heights[self.index(x, y)]
    }

    /// Returns the elevation at a grid cell, or `None` when out of bounds.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.heights[self.index(x, y)])
        } else {
            None
        }
    }

    /// Interpolated elevation at a continuous coordinate (see [`sample_bilinear`]).
    pub fn height_at(&self, x: f32, y: f32) -> f32 {
        sample_bilinear(self, x, y)
    }

    /// Returns one row of elevations.
    pub fn row(&self, y: u32) -> &[f32] {
        let start = y as usize * self.width as usize;
        &self.heights[start..start + self.width as usize]
    }

    /// Iterates over rows from `y = 0` upward.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        self.heights.chunks_exact(self.width as usize)
    }

    /// The full row-major buffer.
    pub fn as_slice(&self) -> &[f32] {
        &self.heights
    }

    pub fn cell_count(&self) -> usize {
        self.heights.len()
    }

    /// Returns (min, max) elevation.
    pub fn height_range(&self) -> (f32, f32) {
        let min = self.heights.iter().cloned().fold(f32::MAX, f32::min);
        let max = self.heights.iter().cloned().fold(f32::MIN, f32::max);
        (min, max)
    }

    /// Sum of all elevations, used to track net material moved by erosion.
    pub fn total_mass(&self) -> f64 {
        self.heights.iter().map(|&h| h as f64).sum()
    }

    #[cfg(test)]
    pub(crate) fn set(&mut self, x: u32, y: u32, value: f32) {
        let i = self.index(x, y);
        self.heights[i] = value;
    }

    pub(crate) fn add(&mut self, x: u32, y: u32, delta: f32) {
        let i = self.index(x, y);
        self.heights[i] += delta;
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.heights
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        debug_assert!(
            x < self.width && y < self.height,
            "cell ({}, {}) outside {}x{} heightmap",
            x,
            y,
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }
}

fn check_dimensions(width: u32, height: u32) -> Result<(), HeightmapError> {
    if width == 0 || height == 0 {
        return Err(HeightmapError::ZeroDimension { width, height });
    }
    Ok(())
}

fn cell_count(width: u32, height: u32) -> usize {
    (width as usize) * (height as usize)
}
