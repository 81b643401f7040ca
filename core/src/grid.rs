//! Dense row-major grids used for the occupancy map and the room-index map.

use crate::geometry::{CellCoord, Rect};
use crate::graph::RoomId;

/// Classification of a single occupancy cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Cell not covered by any surviving room.
    Unassigned,
    /// Walkable floor.
    Floor,
    /// Wall, column or any other blocking cell.
    Wall,
}

impl Cell {
    /// Integer encoding of the cell: `-1` unassigned, `0` floor, `1` wall.
    #[must_use]
    pub const fn value(self) -> i32 {
        match self {
            Self::Unassigned => -1,
            Self::Floor => 0,
            Self::Wall => 1,
        }
    }

    /// Reports whether a room has claimed the cell.
    #[must_use]
    pub const fn is_assigned(self) -> bool {
        !matches!(self, Self::Unassigned)
    }
}

/// Occupancy map of floor, wall and unassigned cells.
pub type OccupancyGrid = Grid<Cell>;

/// Map from every cell to the room that owns it.
pub type RoomIndexGrid = Grid<Option<RoomId>>;

/// Dense grid stored in row-major order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Grid<T> {
    width: u32,
    height: u32,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a `width × height` grid where every cell holds `value`.
    #[must_use]
    pub fn filled(width: u32, height: u32, value: T) -> Self {
        let count = usize::try_from(u64::from(width) * u64::from(height)).unwrap_or(0);
        Self {
            width,
            height,
            cells: vec![value; count],
        }
    }

    /// Writes `value` into every in-bounds cell of `area`.
    pub fn fill_rect(&mut self, area: Rect, value: T) {
        for cell in area.cells() {
            self.set(cell, value.clone());
        }
    }

    /// Writes `value` into a border of `thickness` cells running along the
    /// inside edge of `area`.
    pub fn fill_rect_outline(&mut self, area: Rect, value: T, thickness: i32) {
        let mut ring = area;
        for _ in 0..thickness {
            if ring.is_empty() {
                break;
            }

            let x_end = ring.x_max() - 1;
            let y_end = ring.y_max() - 1;
            for x in ring.x()..=x_end {
                self.set_signed(x, ring.y(), value.clone());
                self.set_signed(x, y_end, value.clone());
            }
            for y in ring.y()..=y_end {
                self.set_signed(ring.x(), y, value.clone());
                self.set_signed(x_end, y, value.clone());
            }

            ring = Rect::new(
                ring.x() + 1,
                ring.y() + 1,
                ring.width() - 2,
                ring.height() - 2,
            );
        }
    }

    /// Overwrites a single cell; out-of-bounds writes are ignored.
    pub fn set(&mut self, cell: CellCoord, value: T) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = value;
        }
    }

    fn set_signed(&mut self, x: i32, y: i32, value: T) {
        if let Some(cell) = CellCoord::from_signed(x, y) {
            self.set(cell, value);
        }
    }
}

impl<T> Grid<T> {
    /// Number of columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Cells in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Value stored at `cell`, if it lies within the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<&T> {
        self.index(cell).and_then(|index| self.cells.get(index))
    }

    /// Value stored at signed coordinates, if they lie within the grid.
    #[must_use]
    pub fn get_signed(&self, x: i32, y: i32) -> Option<&T> {
        CellCoord::from_signed(x, y).and_then(|cell| self.get(cell))
    }

    /// Reports whether `cell` lies within the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Row-major offset of `cell`.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    /// Coordinates of the cell stored at row-major `index`.
    #[must_use]
    pub fn coord(&self, index: usize) -> Option<CellCoord> {
        if index >= self.cells.len() || self.width == 0 {
            return None;
        }
        let width = usize::try_from(self.width).ok()?;
        let column = u32::try_from(index % width).ok()?;
        let row = u32::try_from(index / width).ok()?;
        Some(CellCoord::new(column, row))
    }

    /// Iterates every cell with its coordinates in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, &T)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(index, value)| self.coord(index).map(|cell| (cell, value)))
    }

    /// Iterates the rows of the grid from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        let width = usize::try_from(self.width).unwrap_or(0).max(1);
        self.cells.chunks(width)
    }
}
