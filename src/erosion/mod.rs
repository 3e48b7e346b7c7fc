//! Droplet-based hydraulic erosion.
//!
//! An [`ErosionEngine`] owns its physical constants and a [`SpawnSource`],
//! and mutates a borrowed [`crate::terrain::Heightmap`] one droplet at a time.

mod config;
mod droplet;
mod spawn;

pub use config::{ErosionConfig, ErosionConfigError};
pub use droplet::{DropletOutcome, ErosionEngine, ErosionStats, StepKind, StepRecord, Termination};
pub use spawn::{FixedSpawns, SeededSpawner, SpawnSource};
