//! PNG export functionality for heightmaps.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{ImageBuffer, ImageEncoder, Luma};
use thiserror::Error;

use crate::terrain::Heightmap;

/// Errors that can occur during PNG export.
#[derive(Error, Debug)]
pub enum PngExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid height range: min ({0}) >= max ({1})")]
    InvalidHeightRange(f32, f32),
}

/// Options for PNG export.
#[derive(Debug, Clone)]
pub struct PngExportOptions {
    /// Height mapped to black.
    pub min_height: f32,
    /// Height mapped to white.
    pub max_height: f32,
    /// PNG compression type.
    pub compression: CompressionType,
    /// PNG filter type.
    pub filter: FilterType,
}

impl Default for PngExportOptions {
    fn default() -> Self {
        Self {
            min_height: 0.0,
            max_height: 1.0,
            compression: CompressionType::Default,
            filter: FilterType::Adaptive,
        }
    }
}

impl PngExportOptions {
    /// Creates options spanning the heightmap's actual elevation range.
    ///
    /// A perfectly flat map gets a tiny non-empty range so it still exports.
    pub fn auto_range(map: &Heightmap) -> Self {
        let (min, max) = map.height_range();
        let max = if max > min { max } else { min + 1e-6 };
        Self {
            min_height: min,
            max_height: max,
            ..Default::default()
        }
    }
}

/// Exports a heightmap as a 16-bit grayscale PNG.
///
/// Heights are normalized from `[min_height, max_height]` to the full
/// `u16` range; values outside the range are clamped.
pub fn export_heightmap_png(
    map: &Heightmap,
    path: &Path,
    options: &PngExportOptions,
) -> Result<(), PngExportError> {
    let min = options.min_height;
    let max = options.max_height;

    if min >= max {
        return Err(PngExportError::InvalidHeightRange(min, max));
    }

    let (width, height) = (map.width(), map.height());
    let range = max - min;

    let mut img: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(width, height);
    for (y, row) in map.rows().enumerate() {
        for (x, &h) in row.iter().enumerate() {
            let normalized = ((h - min) / range).clamp(0.0, 1.0);
            let value = (normalized * 65535.0) as u16;
            img.put_pixel(x as u32, y as u32, Luma([value]));
        }
    }

    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let encoder = PngEncoder::new_with_quality(writer, options.compression, options.filter);

    let raw_data = img.as_raw();
    let byte_slice: &[u8] = bytemuck::cast_slice(raw_data);

    encoder.write_image(byte_slice, width, height, image::ExtendedColorType::L16)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_export_heightmap_png() {
        let map = Heightmap::from_fn(64, 32, |x, y| (x + y) as f32 / 94.0).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("test.png");

        export_heightmap_png(&map, &path, &PngExportOptions::default()).unwrap();

        assert!(path.exists());
        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn test_png_roundtrip_pixels() {
        let map = Heightmap::from_vec(2, 2, vec![0.0, 1.0, 0.5, 2.0]).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("pixels.png");

        export_heightmap_png(&map, &path, &PngExportOptions::default()).unwrap();

        let img = image::open(&path).unwrap().to_luma16();
        assert_eq!(img.dimensions(), (2, 2));
        assert_eq!(img.get_pixel(0, 0)[0], 0);
        assert_eq!(img.get_pixel(1, 0)[0], 65535);
        assert!((img.get_pixel(0, 1)[0] as i32 - 32767).abs() < 2);
        // Out-of-range heights clamp to white.
        assert_eq!(img.get_pixel(1, 1)[0], 65535);
    }

    #[test]
    fn test_invalid_height_range() {
        let map = Heightmap::new(16, 16).unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.png");

        let options = PngExportOptions {
            min_height: 1.0,
            max_height: -1.0,
            ..Default::default()
        };

        let result = export_heightmap_png(&map, &path, &options);
        assert!(matches!(result, Err(PngExportError::InvalidHeightRange(_, _))));
    }

    #[test]
    fn test_auto_range() {
        let map = Heightmap::from_vec(2, 1, vec![-0.5, 0.75]).unwrap();
        let options = PngExportOptions::auto_range(&map);
        assert_eq!(options.min_height, -0.5);
        assert_eq!(options.max_height, 0.75);
    }

    #[test]
    fn test_auto_range_flat_map_is_exportable() {
        let map = Heightmap::filled(4, 4, 0.5).unwrap();
        let options = PngExportOptions::auto_range(&map);
        assert!(options.min_height < options.max_height);

        let dir = tempdir().unwrap();
        export_heightmap_png(&map, &dir.path().join("flat.png"), &options).unwrap();
    }
}
