//! Single-particle hydraulic erosion.
//!
//! Each iteration spawns one water droplet that follows the interpolated
//! surface downhill, picking up sediment where it accelerates and dropping it
//! where it climbs or stalls. Droplets run strictly one after another against
//! the same grid.

use glam::Vec2;

use super::config::{ErosionConfig, ErosionConfigError};
use super::spawn::{SeededSpawner, SpawnSource};
use crate::terrain::{gradient_at, Heightmap};

/// Why a droplet stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Termination {
    /// Water fell to `min_water` or below.
    Evaporated,
    /// The current cell lies within one unit of the grid edge.
    EdgeOfMap,
    /// A step carried the droplet outside the sampling bounds.
    LeftBounds,
    /// `max_steps` was reached.
    StepLimit,
}

/// Which branch a step took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Deposit,
    Erode,
}

/// What one droplet step did to the grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepRecord {
    /// Cell the droplet left, which is the cell that was modified.
    pub cell: (u32, u32),
    /// Position after the move.
    pub position: Vec2,
    /// Interpolated height at `position` minus the height of `cell`.
    pub delta_height: f32,
    pub kind: StepKind,
    /// Measured change of the cell's elevation.
    pub cell_change: f32,
    /// Measured change of the carried sediment.
    pub sediment_change: f32,
    /// Speed at the start of the step.
    pub speed: f32,
    /// Water left after evaporation.
    pub water: f32,
}

/// Full trace of one droplet's lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct DropletOutcome {
    pub spawn: (u32, u32),
    pub steps: Vec<StepRecord>,
    pub termination: Termination,
    /// Sediment still carried when the droplet was discarded.
    pub sediment: f32,
}

/// Aggregate counters for an [`ErosionEngine::erode`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ErosionStats {
    pub droplets: u32,
    pub steps: u64,
    /// Material removed by erosion steps.
    pub eroded: f64,
    /// Net material added by deposition steps (negative deposits included).
    pub deposited: f64,
    pub evaporated: u32,
    pub left_map: u32,
    pub step_limited: u32,
}

impl ErosionStats {
    fn record(&mut self, step: &StepRecord) {
        self.steps += 1;
        match step.kind {
            StepKind::Erode => self.eroded -= step.cell_change as f64,
            StepKind::Deposit => self.deposited += step.cell_change as f64,
        }
    }

    fn finish(&mut self, termination: Termination) {
        self.droplets += 1;
        match termination {
            Termination::Evaporated => self.evaporated += 1,
            Termination::EdgeOfMap | Termination::LeftBounds => self.left_map += 1,
            Termination::StepLimit => self.step_limited += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Droplet {
    pos: Vec2,
    dir: Vec2,
    speed: f32,
    water: f32,
    sediment: f32,
}

impl Droplet {
    fn spawn(x: u32, y: u32) -> Self {
        Self {
            pos: Vec2::new(x as f32, y as f32),
            dir: Vec2::ZERO,
            speed: 1.0,
            water: 1.0,
            sediment: 0.0,
        }
    }
}

/// Droplet erosion over a heightmap, driven by a spawn source.
#[derive(Debug, Clone)]
pub struct ErosionEngine<S = SeededSpawner> {
    config: ErosionConfig,
    spawner: S,
}

impl ErosionEngine<SeededSpawner> {
    /// Creates an engine whose spawn stream is seeded from `config.seed`.
    pub fn new(config: ErosionConfig) -> Result<Self, ErosionConfigError> {
        let spawner = SeededSpawner::new(config.seed);
        Self::with_spawner(config, spawner)
    }
}

impl<S: SpawnSource> ErosionEngine<S> {
    /// Creates an engine that takes spawn cells from `spawner`.
    pub fn with_spawner(config: ErosionConfig, spawner: S) -> Result<Self, ErosionConfigError> {
        config.validate()?;
        Ok(Self { config, spawner })
    }

    pub fn config(&self) -> &ErosionConfig {
        &self.config
    }

    /// Runs `config.iterations` droplets.
    pub fn run(&mut self, map: &mut Heightmap) -> ErosionStats {
        let iterations = self.config.iterations;
        self.erode(map, iterations)
    }

    /// Runs `iterations` droplets in sequence, mutating `map` in place.
    ///
    /// Each iteration pulls exactly one spawn cell from the source, so the
    /// result depends only on the source's sequence and the starting grid.
    pub fn erode(&mut self, map: &mut Heightmap, iterations: u32) -> ErosionStats {
        let mut stats = ErosionStats::default();
        let (width, height) = (map.width(), map.height());

        for _ in 0..iterations {
            let (x, y) = self.spawner.next_spawn(width, height);
            let termination = trace_droplet(&self.config, map, x, y, |step| stats.record(step)).0;
            stats.finish(termination);
        }

        log::debug!(
            "eroded {}x{} heightmap: {} droplets, {} steps, eroded={:.4}, deposited={:.4}",
            width,
            height,
            stats.droplets,
            stats.steps,
            stats.eroded,
            stats.deposited
        );
        stats
    }

    /// Simulates one droplet from cell `(x, y)` and returns its trace.
    ///
    /// Does not consume the spawn source.
    pub fn simulate_droplet(&self, map: &mut Heightmap, x: u32, y: u32) -> DropletOutcome {
        let mut steps = Vec::new();
        let (termination, sediment) =
            trace_droplet(&self.config, map, x, y, |step| steps.push(*step));
        DropletOutcome {
            spawn: (x, y),
            steps,
            termination,
            sediment,
        }
    }
}

/// Runs a droplet to completion, reporting every step to `on_step`.
///
/// Returns the termination reason and the sediment left in the droplet.
fn trace_droplet<F>(
    cfg: &ErosionConfig,
    map: &mut Heightmap,
    x: u32,
    y: u32,
    mut on_step: F,
) -> (Termination, f32)
where
    F: FnMut(&StepRecord),
{
    let width = map.width() as i64;
    let height = map.height() as i64;
    let max_x = (width - 1) as f32;
    let max_y = (height - 1) as f32;

    let mut drop = Droplet::spawn(x, y);
    let mut steps = 0u32;

    while drop.water > cfg.min_water {
        if steps >= cfg.max_steps {
            return (Termination::StepLimit, drop.sediment);
        }

        // Gradient samples reach one unit out, so stay off the outer ring.
        let cell_x = drop.pos.x.floor() as i64;
        let cell_y = drop.pos.y.floor() as i64;
        if cell_x < 1 || cell_y < 1 || cell_x > width - 2 || cell_y > height - 2 {
            return (Termination::EdgeOfMap, drop.sediment);
        }
        let cell = (cell_x as u32, cell_y as u32);

        let (gx, gy) = gradient_at(map, drop.pos.x, drop.pos.y);
        let gradient = Vec2::new(gx, gy);
        drop.dir = (drop.dir * cfg.inertia - gradient * (1.0 - cfg.inertia)).normalize_or_zero();

        drop.pos += drop.dir;
        if drop.pos.x < 0.0 || drop.pos.x >= max_x || drop.pos.y < 0.0 || drop.pos.y >= max_y {
            return (Termination::LeftBounds, drop.sediment);
        }

        let old_height = map.value_at(cell.0, cell.1);
        let delta_height = map.height_at(drop.pos.x, drop.pos.y) - old_height;
        let speed = drop.speed;
        let sediment_before = drop.sediment;

        let kind = if delta_height >= 0.0 || speed < cfg.min_slope {
            // A stalled droplet still caps its deposit by the (possibly
            // negative) height delta, which can dig into the cell.
            if drop.sediment > 0.0 {
                let deposit = delta_height.min(drop.sediment) * cfg.deposition_rate;
                drop.sediment -= deposit;
                map.add(cell.0, cell.1, deposit);
            }
            StepKind::Deposit
        } else {
            let erode = (-delta_height).min(cfg.capacity * speed - drop.sediment) * cfg.erosion_rate;
            map.add(cell.0, cell.1, -erode);
            drop.sediment += erode;
            StepKind::Erode
        };

        drop.speed = (speed * speed + delta_height).max(0.0).sqrt();
        drop.water *= 1.0 - cfg.evaporation;
        steps += 1;

        on_step(&StepRecord {
            cell,
            position: drop.pos,
            delta_height,
            kind,
            cell_change: map.value_at(cell.0, cell.1) - old_height,
            sediment_change: drop.sediment - sediment_before,
            speed,
            water: drop.water,
        });
    }

    (Termination::Evaporated, drop.sediment)
}
