//! Erodex CLI - procedural heightmap generator.
//!
//! Synthesizes fractal-noise terrain and weathers it with droplet
//! hydraulic erosion, then writes the result as PNG or RAW.

use clap::{Parser, Subcommand, ValueEnum};
use std::cell::Cell;
use std::path::PathBuf;
use std::time::Instant;

use erodex::erosion::ErosionConfig;
use erodex::export::{
    expected_file_size, export_heightmap_png, export_heightmap_raw, PngExportOptions, RawFormat,
};
use erodex::noise::FractalNoiseConfig;
use erodex::pipeline::{ErosionStage, HeightmapStage, Pipeline, StageConfig};
use erodex::terrain::{Terrain, WhiteNoiseGenerator};

/// Procedural heightmap generator with hydraulic erosion.
#[derive(Parser)]
#[command(name = "erodex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate and erode a new heightmap.
    Generate {
        /// Grid width in cells.
        #[arg(long, default_value = "512")]
        width: u32,

        /// Grid height in cells.
        #[arg(long, default_value = "512")]
        height: u32,

        /// Random seed for reproducible generation.
        #[arg(short, long)]
        seed: Option<u32>,

        /// Output directory for generated files.
        #[arg(short, long, default_value = "./output")]
        output: PathBuf,

        /// Base name for output files.
        #[arg(short, long, default_value = "terrain")]
        name: String,

        /// Export format.
        #[arg(short, long, default_value = "png")]
        format: ExportFormat,

        /// Number of noise octaves.
        #[arg(long, default_value = "6")]
        octaves: u32,

        /// Base noise frequency.
        #[arg(long, default_value = "4.0")]
        frequency: f64,

        /// Frequency multiplier per octave (lacunarity).
        #[arg(long, default_value = "2.0")]
        lacunarity: f64,

        /// Amplitude decay per octave (persistence).
        #[arg(long, default_value = "0.5")]
        persistence: f64,

        /// Use uncorrelated white noise instead of fractal Perlin noise.
        #[arg(long)]
        white_noise: bool,

        // Erosion options
        /// Skip hydraulic erosion.
        #[arg(long)]
        skip_erosion: bool,

        /// Number of droplets to simulate.
        #[arg(long, default_value = "50000")]
        iterations: u32,

        /// Droplet direction inertia (0-1).
        #[arg(long, default_value = "0.05")]
        inertia: f32,

        /// Speed below which droplets deposit.
        #[arg(long, default_value = "0.01")]
        min_slope: f32,

        /// Sediment capacity factor.
        #[arg(long, default_value = "4.0")]
        capacity: f32,

        /// Deposition rate (0-1).
        #[arg(long, default_value = "0.3")]
        deposition_rate: f32,

        /// Erosion rate (0-1).
        #[arg(long, default_value = "0.3")]
        erosion_rate: f32,

        /// Water evaporated per step (0-1).
        #[arg(long, default_value = "0.01")]
        evaporation: f32,

        /// Maximum steps per droplet.
        #[arg(long, default_value = "1000")]
        max_steps: u32,
    },

    /// Display memory and export sizes for a grid.
    Info {
        /// Grid width in cells.
        #[arg(long, default_value = "512")]
        width: u32,

        /// Grid height in cells.
        #[arg(long, default_value = "512")]
        height: u32,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    /// 16-bit PNG (universal compatibility).
    Png,
    /// 16-bit RAW little-endian (Unity).
    Raw,
    /// 32-bit float RAW (high precision).
    RawFloat,
}

struct GenerateArgs {
    width: u32,
    height: u32,
    seed: Option<u32>,
    output: PathBuf,
    name: String,
    format: ExportFormat,
    noise: FractalNoiseConfig,
    white_noise: bool,
    skip_erosion: bool,
    erosion: ErosionConfig,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            width,
            height,
            seed,
            output,
            name,
            format,
            octaves,
            frequency,
            lacunarity,
            persistence,
            white_noise,
            skip_erosion,
            iterations,
            inertia,
            min_slope,
            capacity,
            deposition_rate,
            erosion_rate,
            evaporation,
            max_steps,
        } => {
            run_generate(GenerateArgs {
                width,
                height,
                seed,
                output,
                name,
                format,
                noise: FractalNoiseConfig {
                    octaves,
                    frequency,
                    lacunarity,
                    persistence,
                    ..Default::default()
                },
                white_noise,
                skip_erosion,
                erosion: ErosionConfig {
                    iterations,
                    inertia,
                    min_slope,
                    capacity,
                    deposition_rate,
                    erosion_rate,
                    evaporation,
                    max_steps,
                    ..Default::default()
                },
            });
        }
        Commands::Info { width, height } => {
            run_info(width, height);
        }
    }
}

fn run_generate(args: GenerateArgs) {
    let GenerateArgs {
        width,
        height,
        seed,
        output,
        name,
        format,
        mut noise,
        white_noise,
        skip_erosion,
        mut erosion,
    } = args;

    if width == 0 || height == 0 || width > 16384 || height > 16384 {
        eprintln!("Error: Width and height must be between 1 and 16384");
        std::process::exit(1);
    }

    // Generate seed if not provided
    let seed = seed.unwrap_or_else(|| {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as u32)
            .unwrap_or(0)
    });
    noise.seed = seed;
    erosion.seed = seed;

    if let Err(e) = noise.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    if !skip_erosion {
        if let Err(e) = erosion.validate() {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    println!("Erodex - Heightmap Generator");
    println!("============================");
    println!("Grid:        {}x{}", width, height);
    println!("Seed:        {}", seed);
    if white_noise {
        println!("Terrain:     white noise");
    } else {
        println!(
            "Terrain:     perlin ({} octaves, frequency {}, lacunarity {}, persistence {})",
            noise.octaves, noise.frequency, noise.lacunarity, noise.persistence
        );
    }
    if skip_erosion {
        println!("Erosion:     skipped");
    } else {
        println!(
            "Erosion:     {} droplets (inertia {}, capacity {}, evaporation {})",
            erosion.iterations, erosion.inertia, erosion.capacity, erosion.evaporation
        );
    }
    println!();

    let start = Instant::now();

    let mut pipeline = Pipeline::new(StageConfig::with_noise(noise));
    if white_noise {
        pipeline.add_stage(HeightmapStage::with_generator(WhiteNoiseGenerator::new(seed)));
    } else {
        pipeline.add_stage(HeightmapStage::new());
    }
    if !skip_erosion {
        pipeline.add_stage(ErosionStage::new(erosion));
    }

    let mut terrain = Terrain::new(width, height);
    let stage_start = Cell::new(Instant::now());
    let result = pipeline.run_with_callbacks(
        &mut terrain,
        |stage, i, total| {
            stage_start.set(Instant::now());
            println!("[{}/{}] {}...", i + 1, total, stage);
        },
        |stage, _, _| {
            println!("  {} completed in {:.2?}", stage, stage_start.get().elapsed());
        },
    );

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let Some(map) = terrain.heightmap.as_ref() else {
        eprintln!("Error: pipeline produced no heightmap");
        std::process::exit(1);
    };

    let (min_h, max_h) = map.height_range();
    println!();
    println!("Height range: [{:.4}, {:.4}]", min_h, max_h);
    if let Some(stats) = &terrain.erosion {
        println!(
            "Erosion: {} steps, eroded {:.4}, deposited {:.4}",
            stats.steps, stats.eroded, stats.deposited
        );
        println!(
            "  Droplets: {} evaporated, {} left the map, {} hit the step limit",
            stats.evaporated, stats.left_map, stats.step_limited
        );
    }

    if let Err(e) = std::fs::create_dir_all(&output) {
        eprintln!("Error creating output directory: {}", e);
        std::process::exit(1);
    }

    println!();
    println!("Exporting to {:?}...", output);
    let export_start = Instant::now();

    let path = match format {
        ExportFormat::Png => {
            let path = output.join(format!("{}.png", name));
            let options = PngExportOptions::auto_range(map);
            if let Err(e) = export_heightmap_png(map, &path, &options) {
                eprintln!("Error exporting PNG: {}", e);
                std::process::exit(1);
            }
            path
        }
        ExportFormat::Raw | ExportFormat::RawFloat => {
            let raw_format = match format {
                ExportFormat::RawFloat => RawFormat::R32Float,
                _ => RawFormat::R16LittleEndian,
            };
            let path = output.join(format!("{}.raw", name));
            let options = PngExportOptions::auto_range(map);
            if let Err(e) = export_heightmap_raw(
                map,
                &path,
                raw_format,
                options.min_height,
                options.max_height,
            ) {
                eprintln!("Error exporting RAW: {}", e);
                std::process::exit(1);
            }
            path
        }
    };

    println!("  Wrote {}", path.display());
    println!("Export completed in {:.2?}", export_start.elapsed());
    println!("\nTotal time: {:.2?}", start.elapsed());
    println!("Done!");
}

fn run_info(width: u32, height: u32) {
    print!("{}", info_report(width, height));
}

/// Grid size, memory use and export sizes for `info`.
fn info_report(width: u32, height: u32) -> String {
    use std::fmt::Write;

    let cells = (width as u64) * (height as u64);
    let bytes_heights = cells * 4;
    let bytes_png = cells * 2;
    let bytes_raw_r16 = expected_file_size(width, height, RawFormat::R16LittleEndian);
    let bytes_raw_r32 = expected_file_size(width, height, RawFormat::R32Float);

    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "Erodex - Grid Configuration Info");
    let _ = writeln!(out, "================================");
    let _ = writeln!(out);
    let _ = writeln!(out, "Grid: {}x{}", width, height);
    let _ = writeln!(out, "Cells: {:>12}", cells);
    let _ = writeln!(out);
    let _ = writeln!(out, "Memory usage (in-memory):");
    let _ = writeln!(out, "  Heights:  {:>12} bytes ({:.2} MB)", bytes_heights, to_mb(bytes_heights));
    let _ = writeln!(out);
    let _ = writeln!(out, "Export file sizes:");
    let _ = writeln!(out, "  PNG (16-bit):  {:>12} bytes ({:.2} MB, uncompressed)", bytes_png, to_mb(bytes_png));
    let _ = writeln!(out, "  RAW (R16):     {:>12} bytes ({:.2} MB)", bytes_raw_r16, to_mb(bytes_raw_r16));
    let _ = writeln!(out, "  RAW (R32):     {:>12} bytes ({:.2} MB)", bytes_raw_r32, to_mb(bytes_raw_r32));
    out
}

fn to_mb(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_report_lists_sizes() {
        let report = info_report(512, 256);
        assert!(report.contains("Grid: 512x256"));
        assert!(report.contains(&format!("{:>12} bytes", 512 * 256 * 4)));
        assert!(report.contains(&format!("{:>12} bytes", 512 * 256 * 2)));
    }

    #[test]
    fn test_info_report_has_no_engine_notes() {
        let report = info_report(513, 513);
        for engine in ["Unity", "Godot", "Unreal"] {
            assert!(!report.contains(engine), "unexpected {} note", engine);
        }
    }
}
