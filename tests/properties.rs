//! Property-based tests for terrain synthesis and droplet erosion.
//!
//! These verify invariants across random grids and seeds:
//! - Bilinear sampling is exact at lattice points
//! - Synthesized heights stay within [0, 1] and are deterministic
//! - Zero-iteration erosion is the identity
//! - Erosion never produces non-finite heights
//! - Droplet steps stay inside the interior and under the step cap

use erodex::erosion::{ErosionConfig, ErosionEngine, FixedSpawns, Termination};
use erodex::noise::FractalNoiseConfig;
use erodex::terrain::{
    sample_bilinear, Heightmap, PerlinNoiseGenerator, TerrainGenerator, WhiteNoiseGenerator,
};
use proptest::prelude::*;

const MAX_SIDE: u32 = 24;

/// Strategy for a small heightmap with arbitrary values in [0, 1).
fn small_heightmap() -> impl Strategy<Value = Heightmap> {
    (1u32..=MAX_SIDE, 1u32..=MAX_SIDE).prop_flat_map(|(w, h)| {
        prop::collection::vec(0.0f32..1.0, (w * h) as usize)
            .prop_map(move |heights| Heightmap::from_vec(w, h, heights).unwrap())
    })
}

/// Strategy for a valid fractal noise configuration.
fn noise_config() -> impl Strategy<Value = FractalNoiseConfig> {
    (any::<u32>(), 1u32..=8, 0.5f64..8.0, 1.5f64..3.0, 0.2f64..0.8).prop_map(
        |(seed, octaves, frequency, lacunarity, persistence)| FractalNoiseConfig {
            octaves,
            frequency,
            lacunarity,
            persistence,
            seed,
        },
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn sampler_exact_at_lattice_points(map in small_heightmap()) {
        for y in 0..map.height() {
            for x in 0..map.width() {
                let sampled = sample_bilinear(&map, x as f32, y as f32);
                prop_assert_eq!(sampled, map.value_at(x, y));
            }
        }
    }

    #[test]
    fn sampler_stays_within_cell_bounds(
        map in small_heightmap(),
        u in 0.0f32..1.0,
        v in 0.0f32..1.0,
    ) {
        let x = u * (map.width() - 1) as f32;
        let y = v * (map.height() - 1) as f32;
        let (min, max) = map.height_range();
        let h = sample_bilinear(&map, x, y);
        prop_assert!(h >= min - 1e-5 && h <= max + 1e-5, "h={} outside [{}, {}]", h, min, max);
    }

    #[test]
    fn synthesized_heights_in_unit_range(
        config in noise_config(),
        w in 1u32..=MAX_SIDE,
        h in 1u32..=MAX_SIDE,
    ) {
        let map = PerlinNoiseGenerator::new(config).unwrap().generate(w, h).unwrap();
        prop_assert_eq!(map.cell_count(), (w * h) as usize);
        for &v in map.as_slice() {
            prop_assert!((0.0..=1.0).contains(&v), "height {} outside [0, 1]", v);
        }
    }

    #[test]
    fn synthesis_is_deterministic(config in noise_config(), w in 1u32..=16, h in 1u32..=16) {
        let a = PerlinNoiseGenerator::new(config.clone()).unwrap().generate(w, h).unwrap();
        let b = PerlinNoiseGenerator::new(config).unwrap().generate(w, h).unwrap();
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            prop_assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn zero_iterations_is_identity(map in small_heightmap(), seed in any::<u32>()) {
        let mut eroded = map.clone();
        let mut engine = ErosionEngine::new(ErosionConfig::with_seed(seed)).unwrap();
        let stats = engine.erode(&mut eroded, 0);
        prop_assert_eq!(stats.droplets, 0);
        prop_assert_eq!(eroded, map);
    }

    #[test]
    fn erosion_keeps_heights_finite(
        seed in any::<u32>(),
        w in 3u32..=MAX_SIDE,
        h in 3u32..=MAX_SIDE,
        inertia in 0.0f32..0.9,
    ) {
        let mut map = WhiteNoiseGenerator::new(seed).generate(w, h).unwrap();
        let config = ErosionConfig { seed, inertia, max_steps: 200, ..Default::default() };
        let mut engine = ErosionEngine::new(config).unwrap();
        let stats = engine.erode(&mut map, 50);

        prop_assert_eq!(stats.droplets, 50);
        prop_assert!(map.as_slice().iter().all(|h| h.is_finite()));
    }

    #[test]
    fn droplet_steps_stay_in_interior(
        seed in any::<u32>(),
        x in 0u32..16,
        y in 0u32..16,
    ) {
        let mut map = WhiteNoiseGenerator::new(seed).generate(16, 16).unwrap();
        let config = ErosionConfig { max_steps: 64, ..Default::default() };
        let engine = ErosionEngine::with_spawner(config, FixedSpawns::new(vec![(x, y)])).unwrap();
        let outcome = engine.simulate_droplet(&mut map, x, y);

        prop_assert!(outcome.steps.len() <= 64);
        if outcome.steps.len() == 64 {
            prop_assert_eq!(outcome.termination, Termination::StepLimit);
        }
        for step in &outcome.steps {
            let (cx, cy) = step.cell;
            prop_assert!((1..=14).contains(&cx) && (1..=14).contains(&cy));
            prop_assert!(step.speed >= 0.0 && step.speed.is_finite());
        }
    }
}

#[test]
fn heightmap_deserialization_checks_buffer_size() {
    let map = Heightmap::from_fn(3, 2, |x, y| (x + y) as f32).unwrap();
    let json = serde_json::to_string(&map).unwrap();
    let restored: Heightmap = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, map);

    let bad = r#"{"width":3,"height":2,"heights":[0.0,1.0]}"#;
    assert!(serde_json::from_str::<Heightmap>(bad).is_err());

    let empty = r#"{"width":0,"height":2,"heights":[]}"#;
    assert!(serde_json::from_str::<Heightmap>(empty).is_err());
}
