//! Generation stage trait and pipeline orchestration.

use std::time::Instant;
use thiserror::Error;

use crate::erosion::{ErosionConfig, ErosionConfigError, ErosionEngine};
use crate::noise::{FractalNoiseConfig, NoiseConfigError};
use crate::terrain::{HeightmapError, PerlinNoiseGenerator, Terrain, TerrainGenerator};

/// Unique identifier for generation stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StageId {
    /// Initial heightmap generation.
    Heightmap,
    /// Droplet hydraulic erosion.
    Erosion,
}

impl StageId {
    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Heightmap => "heightmap",
            StageId::Erosion => "erosion",
        }
    }
}

/// Configuration passed to each generation stage.
#[derive(Debug, Clone, Default)]
pub struct StageConfig {
    /// Noise configuration for the default terrain generator.
    pub noise: FractalNoiseConfig,
}

impl StageConfig {
    /// Creates a new configuration with the given noise settings.
    pub fn with_noise(noise: FractalNoiseConfig) -> Self {
        Self { noise }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
    #[error("Stage '{0}' requires a generated heightmap")]
    NotGenerated(String),
    #[error("Invalid noise configuration: {0}")]
    Noise(#[from] NoiseConfigError),
    #[error("Invalid heightmap: {0}")]
    Heightmap(#[from] HeightmapError),
    #[error("Invalid erosion configuration: {0}")]
    Erosion(#[from] ErosionConfigError),
}

/// Trait for implementing generation stages.
///
/// Each stage transforms the terrain in some way, building upon
/// previous stages.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str;

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Executes the generation stage, modifying the terrain in place.
    fn execute(&self, terrain: &mut Terrain, config: &StageConfig) -> Result<(), PipelineError>;
}

/// Orchestrates multiple generation stages into a complete pipeline.
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
    config: StageConfig,
}

impl Pipeline {
    /// Creates a new empty pipeline with the given configuration.
    pub fn new(config: StageConfig) -> Self {
        Self {
            stages: Vec::new(),
            config,
        }
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Executes all stages in order on the given terrain.
    pub fn run(&self, terrain: &mut Terrain) -> Result<(), PipelineError> {
        self.run_with_callbacks(terrain, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `terrain` - The terrain to generate
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        terrain: &mut Terrain,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            let start = Instant::now();
            stage.execute(terrain, &self.config)?;
            completed.push(stage.id());
            log::info!("stage '{}' finished in {:.2?}", stage.name(), start.elapsed());

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}

/// Heightmap generation stage.
///
/// Uses fractal Perlin noise from [`StageConfig::noise`] unless another
/// [`TerrainGenerator`] is supplied.
#[derive(Default)]
pub struct HeightmapStage {
    generator: Option<Box<dyn TerrainGenerator>>,
}

impl HeightmapStage {
    /// Stage using the pipeline's noise configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage using a specific generation strategy.
    pub fn with_generator<G: TerrainGenerator + 'static>(generator: G) -> Self {
        Self {
            generator: Some(Box::new(generator)),
        }
    }
}

impl GenerationStage for HeightmapStage {
    fn id(&self) -> StageId {
        StageId::Heightmap
    }

    fn name(&self) -> &str {
        "Heightmap Generation"
    }

    fn execute(&self, terrain: &mut Terrain, config: &StageConfig) -> Result<(), PipelineError> {
        let map = match &self.generator {
            Some(generator) => generator.generate(terrain.width, terrain.height)?,
            None => PerlinNoiseGenerator::new(config.noise.clone())?
                .generate(terrain.width, terrain.height)?,
        };
        terrain.heightmap = Some(map);
        terrain.erosion = None;
        Ok(())
    }
}

/// Erosion stage: runs `config.iterations` droplets over the heightmap.
pub struct ErosionStage {
    pub config: ErosionConfig,
}

impl ErosionStage {
    pub fn new(config: ErosionConfig) -> Self {
        Self { config }
    }
}

impl GenerationStage for ErosionStage {
    fn id(&self) -> StageId {
        StageId::Erosion
    }

    fn name(&self) -> &str {
        "Hydraulic Erosion"
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Heightmap]
    }

    fn execute(&self, terrain: &mut Terrain, _config: &StageConfig) -> Result<(), PipelineError> {
        let mut engine = ErosionEngine::new(self.config.clone())?;
        let map = terrain
            .heightmap
            .as_mut()
            .ok_or_else(|| PipelineError::NotGenerated(self.name().to_string()))?;

        let stats = engine.run(map);
        terrain.erosion = Some(stats);
        Ok(())
    }
}
