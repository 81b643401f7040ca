//! Integer geometry shared by the layout, raster and navigation systems.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Converts signed coordinates into a cell, rejecting negative values.
    #[must_use]
    pub fn from_signed(x: i32, y: i32) -> Option<Self> {
        let column = u32::try_from(x).ok()?;
        let row = u32::try_from(y).ok()?;
        Some(Self::new(column, row))
    }

    /// Returns the neighbouring cell displaced by the provided offset, if it
    /// does not underflow the grid origin.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        let column = i64::from(self.column) + i64::from(dx);
        let row = i64::from(self.row) + i64::from(dy);
        Some(Self::new(u32::try_from(column).ok()?, u32::try_from(row).ok()?))
    }

    /// World-space position of the cell's center for the provided scale.
    #[must_use]
    pub fn center(self, cell_scale: f32) -> Vec2 {
        Vec2::new(
            (self.column as f32 + 0.5) * cell_scale,
            (self.row as f32 + 0.5) * cell_scale,
        )
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Axis-aligned rectangle measured in whole cells.
///
/// Rooms and doors are both described by a `Rect`. Two rooms with identical
/// bounds are the same room, so the rectangle doubles as the room's value key.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Rect {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
}

impl Rect {
    /// Creates a rectangle from its origin and size.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Leftmost column covered by the rectangle.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Topmost row covered by the rectangle.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Width of the rectangle in cells.
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    /// Height of the rectangle in cells.
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    /// Exclusive right edge.
    #[must_use]
    pub const fn x_max(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    #[must_use]
    pub const fn y_max(&self) -> i32 {
        self.y + self.height
    }

    /// Number of cells covered by the rectangle.
    #[must_use]
    pub fn area(&self) -> i64 {
        i64::from(self.width.max(0)) * i64::from(self.height.max(0))
    }

    /// Reports whether the rectangle covers no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Geometric center in cell units.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    /// Cell that contains the geometric center.
    #[must_use]
    pub fn center_cell(&self) -> Option<CellCoord> {
        CellCoord::from_signed(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Reports whether the cell lies inside the rectangle.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        let column = i64::from(cell.column());
        let row = i64::from(cell.row());
        column >= i64::from(self.x)
            && column < i64::from(self.x_max())
            && row >= i64::from(self.y)
            && row < i64::from(self.y_max())
    }

    /// Reports whether `other` lies entirely inside this rectangle.
    #[must_use]
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x_max() <= self.x_max()
            && other.y_max() <= self.y_max()
    }

    /// Reports whether the two rectangles share at least one cell.
    #[must_use]
    pub const fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x_max()
            && self.x_max() > other.x
            && self.y < other.y_max()
            && self.y_max() > other.y
    }

    /// Overlapping region of the two rectangles, if any.
    #[must_use]
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let width = self.x_max().min(other.x_max()) - x;
        let height = self.y_max().min(other.y_max()) - y;

        if width <= 0 || height <= 0 {
            return None;
        }

        Some(Rect::new(x, y, width, height))
    }

    /// Iterates the cells covered by the rectangle in row-major order,
    /// skipping any that fall at negative coordinates.
    pub fn cells(self) -> impl Iterator<Item = CellCoord> {
        (self.y..self.y_max())
            .flat_map(move |y| (self.x..self.x_max()).map(move |x| (x, y)))
            .filter_map(|(x, y)| CellCoord::from_signed(x, y))
    }
}
