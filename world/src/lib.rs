#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative generation pipeline for Undercroft.
//!
//! A [`Generator`] walks the phases `Idle → Splitting → GraphBuilt → Pruning →
//! Rasterizing → FloodFilling → WallClassifying → PathMapBuilding → Ready`
//! one bounded step per [`Generator::advance`] call, so a host loop can render
//! progress between steps. [`Generator::cancel`] moves any unfinished run to
//! `Aborted` and discards everything built so far. Read-only access lives in
//! [`query`].

mod dungeon;

pub use dungeon::Dungeon;

use std::fmt;
use std::time::Instant;

use glam::Vec2;
use log::{debug, info};
use thiserror::Error;
use undercroft_core::{Graph, Phase, Progress, Settings, SettingsError};
use undercroft_system_layout::{
    assemble_graph, Floorplan, Partitioner, PruneStep, Pruner, RandomSource, SplitStep,
};
use undercroft_system_navigation::PathfindingMap;
use undercroft_system_raster::{
    flood_seed, spawn_point, AssetSpawner, FloodFill, NullSpawner, Placement, Rasterizer,
    TileMap, WallClassifier,
};

/// Failures surfaced by the generation pipeline.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum GenerationError {
    /// The configuration was rejected before any work started.
    #[error("invalid settings: {0}")]
    InvalidSettings(#[from] SettingsError),
    /// The run was cancelled before it finished.
    #[error("generation was aborted")]
    Aborted,
}

/// Outcome of one [`Generator::advance`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Status {
    /// More steps are needed.
    Running(Progress),
    /// The dungeon is complete.
    Ready,
    /// The run was cancelled.
    Aborted,
}

/// State threaded through every phase of one run.
struct GenerationContext<S: AssetSpawner> {
    rng: RandomSource,
    spawner: S,
    handles: Vec<S::Handle>,
}

impl<S: AssetSpawner> GenerationContext<S> {
    fn new(seed: u64, spawner: S) -> Self {
        Self {
            rng: RandomSource::from_seed(seed),
            spawner,
            handles: Vec::new(),
        }
    }

    fn spawn_all(&mut self, placements: &[Placement]) {
        for placement in placements {
            let handle = self.spawner.spawn(placement);
            self.handles.push(handle);
        }
    }
}

/// Intermediate products of the phase the run is in.
#[derive(Debug)]
enum Stage {
    Idle,
    Splitting(Partitioner),
    GraphBuilt(Floorplan),
    Pruning {
        floorplan: Floorplan,
        pruner: Pruner,
    },
    Rasterizing {
        graph: Graph,
        rasterizer: Rasterizer,
    },
    FloodFilling {
        graph: Graph,
        tilemap: TileMap,
        spawn_point: Option<Vec2>,
        fill: FloodFill,
    },
    WallClassifying {
        graph: Graph,
        tilemap: TileMap,
        spawn_point: Option<Vec2>,
        walls: WallClassifier,
    },
    PathMapBuilding {
        graph: Graph,
        tilemap: TileMap,
        spawn_point: Option<Vec2>,
    },
    Ready(Dungeon),
    Aborted,
}

impl Stage {
    fn phase(&self) -> Phase {
        match self {
            Self::Idle => Phase::Idle,
            Self::Splitting(_) => Phase::Splitting,
            Self::GraphBuilt(_) => Phase::GraphBuilt,
            Self::Pruning { .. } => Phase::Pruning,
            Self::Rasterizing { .. } => Phase::Rasterizing,
            Self::FloodFilling { .. } => Phase::FloodFilling,
            Self::WallClassifying { .. } => Phase::WallClassifying,
            Self::PathMapBuilding { .. } => Phase::PathMapBuilding,
            Self::Ready(_) => Phase::Ready,
            Self::Aborted => Phase::Aborted,
        }
    }

    fn progress(&self) -> Progress {
        let fraction = match self {
            Self::Idle | Self::Aborted | Self::PathMapBuilding { .. } => 0.0,
            Self::Splitting(partitioner) => partitioner.progress(),
            Self::GraphBuilt(_) | Self::Ready(_) => 1.0,
            Self::Pruning { pruner, .. } => pruner.progress(),
            Self::Rasterizing { graph, rasterizer } => rasterizer.progress(graph),
            Self::FloodFilling { fill, .. } => fill.progress(),
            Self::WallClassifying { walls, .. } => walls.progress(),
        };
        Progress::new(self.phase(), fraction)
    }
}

/// Step-driven dungeon generator.
pub struct Generator<S: AssetSpawner = NullSpawner> {
    settings: Settings,
    stage: Stage,
    context: GenerationContext<S>,
    started: Instant,
    phase_started: Instant,
}

impl Generator<NullSpawner> {
    /// Creates a generator whose placements are not instantiated anywhere.
    pub fn new(settings: Settings) -> Result<Self, GenerationError> {
        Self::with_spawner(settings, NullSpawner)
    }
}

impl<S: AssetSpawner> Generator<S> {
    /// Creates a generator that hands every floor and wall placement to
    /// `spawner`. The settings are validated before anything else happens.
    pub fn with_spawner(settings: Settings, spawner: S) -> Result<Self, GenerationError> {
        settings.validate()?;
        let now = Instant::now();
        Ok(Self {
            context: GenerationContext::new(settings.generation.seed, spawner),
            settings,
            stage: Stage::Idle,
            started: now,
            phase_started: now,
        })
    }

    /// Performs one bounded unit of work and reports where the run stands.
    ///
    /// Calling `advance` on a finished or aborted run changes nothing.
    pub fn advance(&mut self) -> Status {
        let stage = std::mem::replace(&mut self.stage, Stage::Aborted);
        let before = stage.phase();
        self.stage = self.step(stage);

        let after = self.stage.phase();
        if before != after {
            self.log_transition(before, after);
        }
        self.status()
    }

    /// Advances until the run is ready or aborted.
    pub fn run_to_completion(&mut self) -> Result<&Dungeon, GenerationError> {
        loop {
            match self.advance() {
                Status::Running(_) => {}
                Status::Ready | Status::Aborted => break,
            }
        }
        query::dungeon(self).ok_or(GenerationError::Aborted)
    }

    /// Abandons an unfinished run, dropping every intermediate product and
    /// spawned handle. A ready dungeon is left untouched.
    pub fn cancel(&mut self) {
        let phase = self.stage.phase();
        if phase.is_terminal() {
            return;
        }
        self.stage = Stage::Aborted;
        self.context.handles.clear();
        info!("generation aborted during {}", phase.label());
    }

    /// Discards the current run and returns to `Idle` with a freshly seeded
    /// random source.
    pub fn reset(&mut self) {
        self.stage = Stage::Idle;
        self.context.rng = RandomSource::from_seed(self.settings.generation.seed);
        self.context.handles.clear();
    }

    /// Consumes the generator, yielding the dungeon of a ready run.
    #[must_use]
    pub fn into_dungeon(self) -> Option<Dungeon> {
        match self.stage {
            Stage::Ready(dungeon) => Some(dungeon),
            _ => None,
        }
    }

    fn status(&self) -> Status {
        match self.stage {
            Stage::Ready(_) => Status::Ready,
            Stage::Aborted => Status::Aborted,
            _ => Status::Running(self.stage.progress()),
        }
    }

    fn budget(&self) -> usize {
        usize::try_from(self.settings.raster.batch_size)
            .unwrap_or(usize::MAX)
            .max(1)
    }

    fn step(&mut self, stage: Stage) -> Stage {
        let generation = &self.settings.generation;
        let raster = &self.settings.raster;

        match stage {
            Stage::Idle => {
                self.started = Instant::now();
                info!(
                    "generating {}x{} dungeon with seed {}",
                    generation.grid_width, generation.grid_height, generation.seed
                );
                Stage::Splitting(Partitioner::new(generation))
            }
            Stage::Splitting(mut partitioner) => match partitioner.step(&mut self.context.rng) {
                SplitStep::Finished => {
                    let floorplan = partitioner.into_floorplan();
                    info!("created {} rooms", floorplan.active().len());
                    Stage::GraphBuilt(floorplan)
                }
                SplitStep::Split { .. } | SplitStep::Leaf(_) => Stage::Splitting(partitioner),
            },
            Stage::GraphBuilt(floorplan) => Stage::Pruning {
                pruner: Pruner::new(&floorplan, generation.room_removal_percentage),
                floorplan,
            },
            Stage::Pruning {
                mut floorplan,
                mut pruner,
            } => match pruner.step(&mut floorplan) {
                PruneStep::Finished => {
                    let graph = assemble_graph(&floorplan, generation.door_layout);
                    info!(
                        "removed {} rooms, {} remain with {} doors",
                        pruner.removed(),
                        graph.len(),
                        graph.doors().len()
                    );
                    let width = u32::try_from(generation.grid_width).unwrap_or(0);
                    let height = u32::try_from(generation.grid_height).unwrap_or(0);
                    Stage::Rasterizing {
                        rasterizer: Rasterizer::new(
                            width,
                            height,
                            generation.wall_width,
                            raster.columns,
                        ),
                        graph,
                    }
                }
                PruneStep::Removed(_) | PruneStep::Kept(_) => Stage::Pruning { floorplan, pruner },
            },
            Stage::Rasterizing {
                graph,
                mut rasterizer,
            } => {
                if !rasterizer.step(&graph) {
                    return Stage::Rasterizing { graph, rasterizer };
                }
                let tilemap = rasterizer.into_tilemap();
                let seed = flood_seed(&tilemap, &graph);
                let spawn_point = seed.map(|cell| spawn_point(cell, raster.cell_scale));
                debug!("flood fill seeded at {seed:?}");
                Stage::FloodFilling {
                    fill: FloodFill::new(&tilemap, seed),
                    graph,
                    tilemap,
                    spawn_point,
                }
            }
            Stage::FloodFilling {
                graph,
                tilemap,
                spawn_point,
                mut fill,
            } => {
                let mut placements = Vec::new();
                let done = fill.step(&tilemap, raster.cell_scale, self.budget(), &mut placements);
                self.context.spawn_all(&placements);
                if !done {
                    return Stage::FloodFilling {
                        graph,
                        tilemap,
                        spawn_point,
                        fill,
                    };
                }
                info!("placed {} floor tiles", fill.filled());
                Stage::WallClassifying {
                    walls: WallClassifier::new(&tilemap),
                    graph,
                    tilemap,
                    spawn_point,
                }
            }
            Stage::WallClassifying {
                graph,
                tilemap,
                spawn_point,
                mut walls,
            } => {
                let mut placements = Vec::new();
                let done = walls.step(&tilemap, raster.cell_scale, self.budget(), &mut placements);
                self.context.spawn_all(&placements);
                if !done {
                    return Stage::WallClassifying {
                        graph,
                        tilemap,
                        spawn_point,
                        walls,
                    };
                }
                info!("placed {} wall pieces", walls.placed());
                Stage::PathMapBuilding {
                    graph,
                    tilemap,
                    spawn_point,
                }
            }
            Stage::PathMapBuilding {
                graph,
                tilemap,
                spawn_point,
            } => {
                let map = PathfindingMap::build(
                    tilemap.occupancy(),
                    tilemap.room_index(),
                    &graph,
                    raster.cell_scale,
                );
                info!("generation finished in {:.2?}", self.started.elapsed());
                Stage::Ready(Dungeon::new(graph, tilemap, spawn_point, map))
            }
            Stage::Ready(dungeon) => Stage::Ready(dungeon),
            Stage::Aborted => Stage::Aborted,
        }
    }

    fn log_transition(&mut self, from: Phase, to: Phase) {
        if from != Phase::Idle {
            debug!("{} took {:.2?}", from.label(), self.phase_started.elapsed());
        }
        info!("{}", to.label());
        self.phase_started = Instant::now();
    }
}

impl<S: AssetSpawner> fmt::Debug for Generator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Generator")
            .field("settings", &self.settings)
            .field("phase", &self.stage.phase())
            .field("handles", &self.context.handles.len())
            .finish_non_exhaustive()
    }
}

/// Runs a full generation with no spawner attached.
pub fn generate_dungeon(settings: Settings) -> Result<Dungeon, GenerationError> {
    let mut generator = Generator::new(settings)?;
    let _ = generator.run_to_completion()?;
    generator.into_dungeon().ok_or(GenerationError::Aborted)
}

/// Query functions that provide read-only access to a generator.
pub mod query {
    use undercroft_core::{Phase, Progress, Settings};
    use undercroft_system_raster::AssetSpawner;

    use super::{Dungeon, Generator, Stage};

    /// Phase label and completion of the current run.
    #[must_use]
    pub fn progress<S: AssetSpawner>(generator: &Generator<S>) -> Progress {
        generator.stage.progress()
    }

    /// Phase the run is in.
    #[must_use]
    pub fn phase<S: AssetSpawner>(generator: &Generator<S>) -> Phase {
        generator.stage.phase()
    }

    /// Dungeon of a ready run.
    #[must_use]
    pub fn dungeon<S: AssetSpawner>(generator: &Generator<S>) -> Option<&Dungeon> {
        match &generator.stage {
            Stage::Ready(dungeon) => Some(dungeon),
            _ => None,
        }
    }

    /// Handles returned by the spawner for every placement of the current run.
    #[must_use]
    pub fn handles<S: AssetSpawner>(generator: &Generator<S>) -> &[S::Handle] {
        &generator.context.handles
    }

    /// Spawner receiving the placements.
    #[must_use]
    pub fn spawner<S: AssetSpawner>(generator: &Generator<S>) -> &S {
        &generator.context.spawner
    }

    /// Validated configuration of the run.
    #[must_use]
    pub fn settings<S: AssetSpawner>(generator: &Generator<S>) -> &Settings {
        &generator.settings
    }
}
