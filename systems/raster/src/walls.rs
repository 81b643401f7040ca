//! Classification of wall pieces at cell junctions.
//!
//! A junction `(x, y)` is the corner shared by the cells `(x-1, y-1)`,
//! `(x, y-1)`, `(x-1, y)` and `(x, y)`. Its variant is the 4-bit mask
//! `2·g[y][x] + g[y-1][x] + 4·g[y][x-1] + 8·g[y-1][x-1]` over the occupancy
//! values, where walls count 1 and floor 0.

use glam::Vec2;
use undercroft_core::{Cell, CellCoord};

use crate::spawner::{AssetKind, Placement};
use crate::tilemap::TileMap;

/// Wall-piece variant needed at `junction`.
///
/// Returns `None` for junctions on the top or left border, junctions touching
/// an unassigned cell, and junctions surrounded by floor.
#[must_use]
pub fn wall_variant(tilemap: &TileMap, junction: CellCoord) -> Option<u8> {
    let here = tilemap.occupancy().get(junction).copied()?;
    let up = neighbour(tilemap, junction, 0, -1)?;
    let left = neighbour(tilemap, junction, -1, 0)?;
    let up_left = neighbour(tilemap, junction, -1, -1)?;

    let mut mask = 0_u8;
    for (cell, weight) in [(here, 2), (up, 1), (left, 4), (up_left, 8)] {
        match cell {
            Cell::Unassigned => return None,
            Cell::Wall => mask += weight,
            Cell::Floor => {}
        }
    }

    (mask != 0).then_some(mask)
}

fn neighbour(tilemap: &TileMap, cell: CellCoord, dx: i32, dy: i32) -> Option<Cell> {
    let other = cell.offset(dx, dy)?;
    tilemap.occupancy().get(other).copied()
}

/// Incremental scan over every interior junction in row-major order.
#[derive(Clone, Debug)]
pub struct WallClassifier {
    cursor: usize,
    total: usize,
    placed: usize,
}

impl WallClassifier {
    /// Prepares a scan over `tilemap`.
    #[must_use]
    pub fn new(tilemap: &TileMap) -> Self {
        let width = usize::try_from(tilemap.width().saturating_sub(1)).unwrap_or(0);
        let height = usize::try_from(tilemap.height().saturating_sub(1)).unwrap_or(0);
        Self {
            cursor: 0,
            total: width * height,
            placed: 0,
        }
    }

    fn junction(&self, tilemap: &TileMap) -> Option<CellCoord> {
        let width = tilemap.width().checked_sub(1)?;
        if width == 0 {
            return None;
        }
        let cursor = u32::try_from(self.cursor).ok()?;
        Some(CellCoord::new(cursor % width + 1, cursor / width + 1))
    }

    /// Examines up to `budget` junctions, appending a wall placement for each
    /// one that needs a piece. Returns `true` once every junction is done.
    pub fn step(
        &mut self,
        tilemap: &TileMap,
        cell_scale: f32,
        budget: usize,
        out: &mut Vec<Placement>,
    ) -> bool {
        for _ in 0..budget {
            if self.is_finished() {
                break;
            }
            let junction = self.junction(tilemap);
            self.cursor += 1;

            let Some(junction) = junction else {
                continue;
            };
            let Some(variant) = wall_variant(tilemap, junction) else {
                continue;
            };

            self.placed += 1;
            out.push(Placement {
                kind: AssetKind::Wall(variant),
                cell: junction,
                position: Vec2::new(
                    junction.column() as f32 * cell_scale,
                    junction.row() as f32 * cell_scale,
                ),
                room: tilemap.room_at(junction),
            });
        }
        self.is_finished()
    }

    /// Reports whether every junction has been examined.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.total
    }

    /// Wall pieces emitted so far.
    #[must_use]
    pub fn placed(&self) -> usize {
        self.placed
    }

    /// Share of junctions examined so far.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        (self.cursor as f32 / self.total as f32).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::{wall_variant, WallClassifier};
    use crate::spawner::AssetKind;
    use crate::tilemap::stamp_graph;
    use glam::Vec2;
    use undercroft_core::{CellCoord, Graph, Rect};

    fn single_room() -> crate::tilemap::TileMap {
        let mut graph = Graph::new();
        let _ = graph.add_room(Rect::new(0, 0, 4, 4));
        stamp_graph(&graph, 5, 4, 1, None)
    }

    #[test]
    fn corner_masks_follow_the_weighting() {
        let tilemap = single_room();

        // Top-left interior corner: walls up, left and up-left; floor here.
        assert_eq!(wall_variant(&tilemap, CellCoord::new(1, 1)), Some(13));
        // Along the top wall: walls above, floor below.
        assert_eq!(wall_variant(&tilemap, CellCoord::new(2, 1)), Some(9));
        // Bottom-right interior corner: only the up-left cell is floor.
        assert_eq!(wall_variant(&tilemap, CellCoord::new(3, 3)), Some(7));
        // Surrounded by floor.
        assert_eq!(wall_variant(&tilemap, CellCoord::new(2, 2)), None);
    }

    #[test]
    fn junctions_touching_unassigned_cells_are_skipped() {
        let tilemap = single_room();

        assert_eq!(wall_variant(&tilemap, CellCoord::new(4, 1)), None);
        assert_eq!(wall_variant(&tilemap, CellCoord::new(0, 1)), None);
    }

    #[test]
    fn classifier_places_pieces_at_cell_corners() {
        let tilemap = single_room();
        let mut classifier = WallClassifier::new(&tilemap);
        let mut placements = Vec::new();

        while !classifier.step(&tilemap, 2.0, 3, &mut placements) {}

        // Every interior junction of a 4x4 room except (2, 2) needs a piece.
        assert_eq!(placements.len(), 8);
        assert_eq!(classifier.placed(), 8);
        let first = placements[0];
        assert_eq!(first.cell, CellCoord::new(1, 1));
        assert_eq!(first.kind, AssetKind::Wall(13));
        assert_eq!(first.position, Vec2::new(2.0, 2.0));
    }
}
