//! Pipeline target holding the grid size and whatever the stages produced.

use crate::erosion::ErosionStats;
use super::heightmap::Heightmap;

/// A terrain under construction.
///
/// Starts empty with fixed dimensions; the heightmap stage fills in
/// `heightmap` and the erosion stage mutates it and records its statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Terrain {
    /// Grid width in cells.
    pub width: u32,
    /// Grid height in cells.
    pub height: u32,
    /// Elevation grid (populated after the heightmap stage).
    pub heightmap: Option<Heightmap>,
    /// Erosion counters (populated after the erosion stage).
    pub erosion: Option<ErosionStats>,
}

impl Terrain {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            heightmap: None,
            erosion: None,
        }
    }

    /// Returns true once a heightmap has been generated.
    pub fn is_generated(&self) -> bool {
        self.heightmap.is_some()
    }

    /// Computes the min and max elevation, or `None` before generation.
    pub fn height_range(&self) -> Option<(f32, f32)> {
        self.heightmap.as_ref().map(Heightmap::height_range)
    }
}
