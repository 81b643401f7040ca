//! Breadth-first enumeration of the floor reachable from the spawn cell.

use std::collections::VecDeque;

use glam::Vec2;
use undercroft_core::{CellCoord, Graph, RoomId};

use crate::spawner::{AssetKind, Placement};
use crate::tilemap::TileMap;

/// Floor cell the flood fill starts from: the centre cell of room 0, or the
/// first floor cell of a row-major scan of that room when the centre is not
/// floor.
#[must_use]
pub fn flood_seed(tilemap: &TileMap, graph: &Graph) -> Option<CellCoord> {
    let bounds = graph.room(RoomId::new(0))?.bounds();
    if let Some(center) = bounds.center_cell() {
        if tilemap.is_floor(center) {
            return Some(center);
        }
    }
    bounds.cells().find(|&cell| tilemap.is_floor(cell))
}

/// World position of the spawn cell's centre.
#[must_use]
pub fn spawn_point(seed: CellCoord, cell_scale: f32) -> Vec2 {
    seed.center(cell_scale)
}

/// Incremental 4-connected flood fill over floor cells.
///
/// Cells are marked when queued, so each floor cell is emitted once.
/// Neighbours are queued in the order `+x`, `-x`, `+y`, `-y`.
#[derive(Clone, Debug)]
pub struct FloodFill {
    queue: VecDeque<CellCoord>,
    visited: Vec<bool>,
    filled: usize,
    total: usize,
}

impl FloodFill {
    /// Starts a fill at `seed`; a missing or non-floor seed yields an empty fill.
    #[must_use]
    pub fn new(tilemap: &TileMap, seed: Option<CellCoord>) -> Self {
        let mut fill = Self {
            queue: VecDeque::new(),
            visited: vec![false; tilemap.occupancy().cells().len()],
            filled: 0,
            total: tilemap.floor_count(),
        };
        if let Some(seed) = seed {
            fill.enqueue(tilemap, seed);
        }
        fill
    }

    fn enqueue(&mut self, tilemap: &TileMap, cell: CellCoord) {
        if !tilemap.is_floor(cell) {
            return;
        }
        let Some(index) = tilemap.occupancy().index(cell) else {
            return;
        };
        if let Some(slot) = self.visited.get_mut(index) {
            if !*slot {
                *slot = true;
                self.queue.push_back(cell);
            }
        }
    }

    /// Visits up to `budget` floor cells, appending a floor placement for each.
    /// Returns `true` once the reachable floor is exhausted.
    pub fn step(
        &mut self,
        tilemap: &TileMap,
        cell_scale: f32,
        budget: usize,
        out: &mut Vec<Placement>,
    ) -> bool {
        for _ in 0..budget {
            let Some(cell) = self.queue.pop_front() else {
                break;
            };
            self.filled += 1;
            out.push(Placement {
                kind: AssetKind::Floor,
                cell,
                position: cell.center(cell_scale),
                room: tilemap.room_at(cell),
            });

            for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
                if let Some(next) = cell.offset(dx, dy) {
                    self.enqueue(tilemap, next);
                }
            }
        }
        self.is_finished()
    }

    /// Reports whether no queued cells remain.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.queue.is_empty()
    }

    /// Floor cells emitted so far.
    #[must_use]
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Share of the map's floor emitted so far.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.is_finished() || self.total == 0 {
            return 1.0;
        }
        (self.filled as f32 / self.total as f32).clamp(0.0, 1.0)
    }
}
