#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Room layout system: partitions the bounding area, prunes small rooms and
//! assembles the connected room graph.
//!
//! Each stage is exposed as a step-driven state object ([`Partitioner`],
//! [`Pruner`]) so the generation pipeline can report progress and observe
//! cancellation between steps. [`generate`] runs every stage to completion.

mod assemble;
mod floorplan;
mod partition;
mod prune;
mod rng;

pub use assemble::assemble_graph;
pub use floorplan::Floorplan;
pub use partition::{place_door, split_room, Partitioner, SplitAxis, SplitStep};
pub use prune::{PruneStep, Pruner};
pub use rng::RandomSource;

use undercroft_core::{GenerationSettings, Graph, SettingsError};

/// Generates the room graph described by `settings` in one call.
pub fn generate(settings: &GenerationSettings) -> Result<Graph, SettingsError> {
    settings.validate()?;

    let mut rng = RandomSource::from_seed(settings.seed);
    let mut partitioner = Partitioner::new(settings);
    while partitioner.step(&mut rng) != SplitStep::Finished {}

    let mut floorplan = partitioner.into_floorplan();
    let mut pruner = Pruner::new(&floorplan, settings.room_removal_percentage);
    while pruner.step(&mut floorplan) != PruneStep::Finished {}

    Ok(assemble_graph(&floorplan, settings.door_layout))
}
