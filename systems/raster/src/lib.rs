#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Raster system: stamps a room graph into grids and derives the floor and
//! wall placements a host instantiates.
//!
//! The stages run in a fixed order: [`Rasterizer`] stamps rooms, columns and
//! doors into a [`TileMap`]; [`FloodFill`] enumerates the floor reachable
//! from the spawn cell; [`WallClassifier`] picks a wall piece for every
//! junction that needs one. Each stage advances in bounded steps.

mod floodfill;
mod spawner;
mod tilemap;
mod walls;

pub use floodfill::{flood_seed, spawn_point, FloodFill};
pub use spawner::{AssetKind, AssetSpawner, NullSpawner, Placement};
pub use tilemap::{column_rects, stamp_graph, Rasterizer, TileMap};
pub use walls::{wall_variant, WallClassifier};

use glam::Vec2;
use undercroft_core::{GenerationSettings, Graph, RasterSettings};

/// Result of rasterizing a graph in one call.
#[derive(Clone, Debug)]
pub struct Raster {
    /// Occupancy and room-index grids.
    pub tilemap: TileMap,
    /// Centre of the flood-fill seed cell, absent when room 0 has no floor.
    pub spawn_point: Option<Vec2>,
    /// Floor placements in flood-fill order followed by wall placements in
    /// row-major junction order.
    pub placements: Vec<Placement>,
}

/// Runs every raster stage to completion.
#[must_use]
pub fn rasterize(graph: &Graph, generation: &GenerationSettings, raster: &RasterSettings) -> Raster {
    let width = u32::try_from(generation.grid_width).unwrap_or(0);
    let height = u32::try_from(generation.grid_height).unwrap_or(0);
    let tilemap = stamp_graph(graph, width, height, generation.wall_width, raster.columns);

    let seed = flood_seed(&tilemap, graph);
    let spawn_point = seed.map(|cell| spawn_point(cell, raster.cell_scale));
    let budget = usize::try_from(raster.batch_size).unwrap_or(usize::MAX).max(1);

    let mut placements = Vec::new();
    let mut fill = FloodFill::new(&tilemap, seed);
    while !fill.step(&tilemap, raster.cell_scale, budget, &mut placements) {}

    let mut walls = WallClassifier::new(&tilemap);
    while !walls.step(&tilemap, raster.cell_scale, budget, &mut placements) {}

    Raster {
        tilemap,
        spawn_point,
        placements,
    }
}
