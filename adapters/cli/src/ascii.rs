//! Text rendering of the occupancy grid.

use glam::Vec2;
use undercroft_core::{Cell, CellCoord, OccupancyGrid};

const WALL: char = '#';
const FLOOR: char = '.';
const UNASSIGNED: char = ' ';
const SPAWN: char = '@';
const PATH: char = '*';

/// Draws one line per grid row. Path waypoints are drawn over the cells, and
/// the spawn point over everything else.
pub(crate) fn render(
    occupancy: &OccupancyGrid,
    cell_scale: f32,
    spawn_point: Option<Vec2>,
    path: &[Vec2],
) -> String {
    let mut canvas: Vec<Vec<char>> = occupancy
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Cell::Wall => WALL,
                    Cell::Floor => FLOOR,
                    Cell::Unassigned => UNASSIGNED,
                })
                .collect()
        })
        .collect();

    let marks = path
        .iter()
        .map(|&point| (point, PATH))
        .chain(spawn_point.map(|point| (point, SPAWN)));
    for (point, mark) in marks {
        let Some(cell) = cell_at(point, cell_scale) else {
            continue;
        };
        let (Ok(row), Ok(column)) = (usize::try_from(cell.row()), usize::try_from(cell.column()))
        else {
            continue;
        };
        if let Some(slot) = canvas.get_mut(row).and_then(|line| line.get_mut(column)) {
            *slot = mark;
        }
    }

    canvas
        .into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn cell_at(point: Vec2, cell_scale: f32) -> Option<CellCoord> {
    let scaled = (point / cell_scale).floor();
    if !scaled.is_finite() || scaled.x < 0.0 || scaled.y < 0.0 {
        return None;
    }
    Some(CellCoord::new(scaled.x as u32, scaled.y as u32))
}

#[cfg(test)]
mod tests {
    use super::render;
    use glam::Vec2;
    use undercroft_core::{Cell, OccupancyGrid, Rect};

    #[test]
    fn draws_walls_floor_spawn_and_path() {
        let mut occupancy = OccupancyGrid::filled(5, 3, Cell::Unassigned);
        occupancy.fill_rect(Rect::new(0, 0, 4, 3), Cell::Floor);
        occupancy.fill_rect_outline(Rect::new(0, 0, 4, 3), Cell::Wall, 1);

        let text = render(
            &occupancy,
            2.0,
            Some(Vec2::new(3.0, 3.0)),
            &[Vec2::new(3.0, 3.0), Vec2::new(5.0, 3.0)],
        );

        assert_eq!(text, "#### \n#@*# \n#### ");
    }

    #[test]
    fn marks_outside_the_grid_are_ignored() {
        let occupancy = OccupancyGrid::filled(2, 1, Cell::Floor);

        let text = render(&occupancy, 1.0, Some(Vec2::new(-1.0, 0.5)), &[Vec2::new(9.5, 0.5)]);

        assert_eq!(text, "..");
    }
}
