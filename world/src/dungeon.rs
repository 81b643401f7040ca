//! The finished product of a generation run.

use glam::Vec2;
use undercroft_core::Graph;
use undercroft_system_navigation::{find_path, PathMode, PathQueryError, PathfindingMap};
use undercroft_system_raster::TileMap;

/// Room graph, grids, spawn point and pathfinding map of a completed run.
///
/// Nothing mutates a dungeon after it is built, so any number of path queries
/// may run against it concurrently.
#[derive(Clone, Debug)]
pub struct Dungeon {
    graph: Graph,
    tilemap: TileMap,
    spawn_point: Option<Vec2>,
    map: PathfindingMap,
}

impl Dungeon {
    pub(crate) fn new(
        graph: Graph,
        tilemap: TileMap,
        spawn_point: Option<Vec2>,
        map: PathfindingMap,
    ) -> Self {
        Self {
            graph,
            tilemap,
            spawn_point,
            map,
        }
    }

    /// Rooms and doors, room 0 being the spawn room.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Occupancy and room-index grids.
    #[must_use]
    pub fn tilemap(&self) -> &TileMap {
        &self.tilemap
    }

    /// World position of the flood-fill seed, if room 0 has any floor.
    #[must_use]
    pub fn spawn_point(&self) -> Option<Vec2> {
        self.spawn_point
    }

    /// Tile and group graph used by path queries.
    #[must_use]
    pub fn pathfinding_map(&self) -> &PathfindingMap {
        &self.map
    }

    /// Finds a walkable route between two world positions.
    pub fn find_path(
        &self,
        start: Vec2,
        end: Vec2,
        mode: PathMode,
    ) -> Result<Vec<Vec2>, PathQueryError> {
        find_path(&self.map, start, end, mode)
    }
}
