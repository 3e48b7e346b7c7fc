//! Seeded 2-D gradient (Perlin) noise.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Number of distinct lattice hashes before the pattern repeats.
const TABLE_SIZE: usize = 256;

/// Coherent gradient noise defined by a seeded permutation table.
///
/// The table is the only state: the integers `0..256` shuffled by a ChaCha8
/// stream seeded from `seed`, stored twice so corner lookups never need to
/// wrap. Two fields built from the same seed sample identically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PerlinNoise {
    seed: u32,
    perm: [u8; TABLE_SIZE * 2],
}

impl PerlinNoise {
    pub fn new(seed: u32) -> Self {
        let mut table: Vec<u8> = (0..TABLE_SIZE).map(|i| i as u8).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed as u64);
        table.shuffle(&mut rng);

        let mut perm = [0u8; TABLE_SIZE * 2];
        perm[..TABLE_SIZE].copy_from_slice(&table);
        perm[TABLE_SIZE..].copy_from_slice(&table);

        Self { seed, perm }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The first half of the permutation table.
    pub fn permutation(&self) -> &[u8] {
        &self.perm[..TABLE_SIZE]
    }

    /// Samples the noise field at a continuous coordinate.
    ///
    /// Total and smooth across lattice lines; values lie in roughly `[-1, 1]`
    /// and are exactly zero on integer lattice points.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let xf = x.floor();
        let yf = y.floor();
        let xi = (xf as i64 & 255) as usize;
        let yi = (yf as i64 & 255) as usize;

        let x = x - xf;
        let y = y - yf;

        let u = fade(x);
        let v = fade(y);

        let p = &self.perm;
        let a = p[xi] as usize + yi;
        let b = p[xi + 1] as usize + yi;

        lerp(
            v,
            lerp(u, grad(p[a], x, y), grad(p[b], x - 1.0, y)),
            lerp(u, grad(p[a + 1], x, y - 1.0), grad(p[b + 1], x - 1.0, y - 1.0)),
        )
    }
}

/// Quintic fade curve `6t^5 - 15t^4 + 10t^3`.
#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product of the offset `(x, y)` with one of the fixed lattice gradients
/// selected by the low four bits of `hash`.
#[inline]
fn grad(hash: u8, x: f64, y: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        0.0
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}
