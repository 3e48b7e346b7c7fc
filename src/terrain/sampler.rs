//! Bilinear sampling of a heightmap at continuous coordinates.

use super::heightmap::Heightmap;

/// Interpolates the elevation at `(x, y)` from the four surrounding lattice cells.
///
/// Lattice indices are clamped independently to the grid, so queries outside
/// the map degrade to the nearest edge values instead of failing. The
/// fractional weights are taken against the unclamped lower corner, which
/// keeps the result exact at lattice points: `sample_bilinear(map, x, y)` for
/// integer `x, y` inside the grid returns the stored cell unchanged.
pub fn sample_bilinear(map: &Heightmap, x: f32, y: f32) -> f32 {
    let max_x = map.width() as i64 - 1;
    let max_y = map.height() as i64 - 1;

    let fx0 = x.floor();
    let fy0 = y.floor();
    let fx = x - fx0;
    let fy = y - fy0;

    // Casts saturate for huge coordinates.
    let x0 = fx0 as i64;
    let y0 = fy0 as i64;
    let cx0 = x0.clamp(0, max_x) as u32;
    let cx1 = x0.saturating_add(1).clamp(0, max_x) as u32;
    let cy0 = y0.clamp(0, max_y) as u32;
    let cy1 = y0.saturating_add(1).clamp(0, max_y) as u32;

    let h00 = map.value_at(cx0, cy0);
    let h10 = map.value_at(cx1, cy0);
    let h01 = map.value_at(cx0, cy1);
    let h11 = map.value_at(cx1, cy1);

    let h0 = h00 * (1.0 - fx) + h10 * fx;
    let h1 = h01 * (1.0 - fx) + h11 * fx;

    h0 * (1.0 - fy) + h1 * fy
}

/// Centered-difference gradient of the interpolated surface at `(x, y)`.
///
/// Uses samples one unit away on each axis, scaled by 0.5.
pub fn gradient_at(map: &Heightmap, x: f32, y: f32) -> (f32, f32) {
    let gx = (sample_bilinear(map, x + 1.0, y) - sample_bilinear(map, x - 1.0, y)) * 0.5;
    let gy = (sample_bilinear(map, x, y + 1.0) - sample_bilinear(map, x, y - 1.0)) * 0.5;
    (gx, gy)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp() -> Heightmap {
        // h(x, y) = x + 10 y
        Heightmap::from_fn(4, 4, |x, y| x as f32 + 10.0 * y as f32).unwrap()
    }

    #[test]
    fn test_exact_at_lattice_points() {
        let map = Heightmap::from_fn(5, 3, |x, y| ((x * 7 + y * 13) % 11) as f32 / 11.0).unwrap();
        for y in 0..3 {
            for x in 0..5 {
                assert_eq!(sample_bilinear(&map, x as f32, y as f32), map.value_at(x, y));
            }
        }
    }

    #[test]
    fn test_interpolates_between_cells() {
        let map = ramp();
        assert!((sample_bilinear(&map, 1.5, 0.0) - 1.5).abs() < 1e-6);
        assert!((sample_bilinear(&map, 0.0, 0.5) - 5.0).abs() < 1e-6);
        assert!((sample_bilinear(&map, 2.25, 1.75) - 19.75).abs() < 1e-5);
    }

    #[test]
    fn test_out_of_range_clamps_to_edge() {
        let map = ramp();
        assert_eq!(sample_bilinear(&map, -3.5, 0.0), 0.0);
        assert_eq!(sample_bilinear(&map, 10.0, 0.0), 3.0);
        assert_eq!(sample_bilinear(&map, 0.0, 42.0), 30.0);
        assert!(sample_bilinear(&map, -1e6, 1e6).is_finite());
    }

    #[test]
    fn test_huge_coordinates_clamp_to_edge() {
        let map = ramp();
        for far in [1e19f32, 1e30, f32::MAX] {
            assert_eq!(sample_bilinear(&map, far, 0.0), 3.0);
            assert_eq!(sample_bilinear(&map, -far, 0.0), 0.0);
            assert_eq!(sample_bilinear(&map, 0.0, far), 30.0);
            assert_eq!(sample_bilinear(&map, 0.0, -far), 0.0);
            assert_eq!(sample_bilinear(&map, far, far), 33.0);
        }
    }

    #[test]
    fn test_last_row_and_column() {
        let map = ramp();
        // Upper neighbours clamp onto the last lattice line.
        assert_eq!(sample_bilinear(&map, 3.0, 3.0), 33.0);
        assert!((sample_bilinear(&map, 3.5, 3.0) - 33.0).abs() < 1e-6);
    }

    #[test]
    fn test_single_cell_map() {
        let map = Heightmap::filled(1, 1, 0.7).unwrap();
        assert!((sample_bilinear(&map, 0.3, 0.9) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_gradient_of_ramp() {
        let map = ramp();
        let (gx, gy) = gradient_at(&map, 1.5, 1.5);
        assert!((gx - 1.0).abs() < 1e-5);
        assert!((gy - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_gradient_of_flat_map_is_zero() {
        let map = Heightmap::filled(6, 6, 0.5).unwrap();
        let (gx, gy) = gradient_at(&map, 2.3, 3.7);
        assert!(gx.abs() < 1e-6 && gy.abs() < 1e-6);
    }
}
