//! Sources of droplet spawn positions.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// A sequence of spawn cells, consumed once per erosion iteration.
///
/// Erosion is reproducible as long as the source yields the same sequence, so
/// tests can swap in [`FixedSpawns`] to drive the physics from known cells.
pub trait SpawnSource {
    /// Returns the next spawn cell for a `width x height` grid.
    fn next_spawn(&mut self, width: u32, height: u32) -> (u32, u32);
}

/// Uniformly random cells from a seeded ChaCha8 stream.
#[derive(Debug, Clone)]
pub struct SeededSpawner {
    rng: ChaCha8Rng,
}

impl SeededSpawner {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed as u64),
        }
    }
}

impl SpawnSource for SeededSpawner {
    fn next_spawn(&mut self, width: u32, height: u32) -> (u32, u32) {
        let x = self.rng.random_range(0..width.max(1));
        let y = self.rng.random_range(0..height.max(1));
        (x, y)
    }
}

/// A fixed list of cells, repeated from the start once exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSpawns {
    cells: Vec<(u32, u32)>,
    next: usize,
}

impl FixedSpawns {
    /// # Panics
    /// Panics if `cells` is empty.
    pub fn new(cells: Vec<(u32, u32)>) -> Self {
        assert!(!cells.is_empty(), "FixedSpawns needs at least one cell");
        Self { cells, next: 0 }
    }
}

impl SpawnSource for FixedSpawns {
    fn next_spawn(&mut self, _width: u32, _height: u32) -> (u32, u32) {
        let cell = self.cells[self.next];
        self.next = (self.next + 1) % self.cells.len();
        cell
    }
}

impl<S: SpawnSource + ?Sized> SpawnSource for &mut S {
    fn next_spawn(&mut self, width: u32, height: u32) -> (u32, u32) {
        (**self).next_spawn(width, height)
    }
}
