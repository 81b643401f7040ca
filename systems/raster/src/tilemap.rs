//! Stamping rooms, columns and doors into the occupancy and room-index grids.

use log::debug;
use undercroft_core::{
    Cell, CellCoord, ColumnSettings, Door, Graph, OccupancyGrid, Rect, RoomId, RoomIndexGrid,
};

/// Occupancy grid plus the parallel map of which room owns each cell.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TileMap {
    occupancy: OccupancyGrid,
    room_index: RoomIndexGrid,
}

impl TileMap {
    /// Creates a map with every cell unassigned.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            occupancy: OccupancyGrid::filled(width, height, Cell::Unassigned),
            room_index: RoomIndexGrid::filled(width, height, None),
        }
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.occupancy.width()
    }

    /// Number of rows.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.occupancy.height()
    }

    /// Floor, wall and unassigned cells.
    #[must_use]
    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.occupancy
    }

    /// Owning room of every cell.
    #[must_use]
    pub fn room_index(&self) -> &RoomIndexGrid {
        &self.room_index
    }

    /// Classification of `cell`; cells outside the grid read as unassigned.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Cell {
        self.occupancy
            .get(cell)
            .copied()
            .unwrap_or(Cell::Unassigned)
    }

    /// Room owning `cell`.
    #[must_use]
    pub fn room_at(&self, cell: CellCoord) -> Option<RoomId> {
        self.room_index.get(cell).copied().flatten()
    }

    /// Reports whether `cell` is walkable floor.
    #[must_use]
    pub fn is_floor(&self, cell: CellCoord) -> bool {
        self.cell(cell) == Cell::Floor
    }

    /// Number of floor cells.
    #[must_use]
    pub fn floor_count(&self) -> usize {
        self.occupancy
            .cells()
            .iter()
            .filter(|&&cell| cell == Cell::Floor)
            .count()
    }

    /// Fills `bounds` with floor owned by `room`, rings it with walls and adds
    /// columns when the room is large enough.
    pub fn stamp_room(
        &mut self,
        room: RoomId,
        bounds: Rect,
        wall_width: i32,
        columns: Option<&ColumnSettings>,
    ) {
        self.occupancy.fill_rect(bounds, Cell::Floor);
        self.room_index.fill_rect(bounds, Some(room));
        self.occupancy
            .fill_rect_outline(bounds, Cell::Wall, wall_width);

        if let Some(columns) = columns {
            for column in column_rects(bounds, wall_width, columns) {
                self.occupancy.fill_rect(column, Cell::Wall);
            }
        }
    }

    /// Carves the door back to floor. Carved cells no room owns are handed to
    /// the door's first room.
    pub fn carve_door(&mut self, door: &Door) {
        let [owner, _] = door.rooms();
        for cell in door.bounds().cells() {
            if !self.occupancy.contains(cell) {
                continue;
            }
            self.occupancy.set(cell, Cell::Floor);
            if self.room_at(cell).is_none() {
                self.room_index.set(cell, Some(owner));
            }
        }
    }
}

/// Evenly spaced support columns for a room, empty unless the room is
/// strictly larger than both thresholds.
#[must_use]
pub fn column_rects(bounds: Rect, wall_width: i32, columns: &ColumnSettings) -> Vec<Rect> {
    if bounds.height() <= columns.min_height || bounds.width() <= columns.min_width {
        return Vec::new();
    }

    let inner_height = (bounds.height() - wall_width * 2) as f32;
    let inner_width = (bounds.width() - wall_width * 2) as f32;
    let rows = (inner_height / columns.min_height as f32).ceil() as i32;
    let cols = (inner_width / columns.min_width as f32).ceil() as i32;
    if rows <= 0 || cols <= 0 {
        return Vec::new();
    }

    let spacing_y = inner_height / (rows + 1) as f32;
    let spacing_x = inner_width / (cols + 1) as f32;
    let offset = (columns.size - 1) as f32;
    let wall = wall_width as f32;

    let mut rects = Vec::new();
    for row in 1..=rows {
        for col in 1..=cols {
            let x = (bounds.x() as f32 + spacing_x * col as f32 - offset + wall).round_ties_even();
            let y = (bounds.y() as f32 + spacing_y * row as f32 - offset + wall).round_ties_even();
            rects.push(Rect::new(x as i32, y as i32, columns.size, columns.size));
        }
    }
    rects
}

/// Incremental stamping of a graph into a [`TileMap`]: one room per step,
/// then every door in a final step.
#[derive(Clone, Debug)]
pub struct Rasterizer {
    tilemap: TileMap,
    wall_width: i32,
    columns: Option<ColumnSettings>,
    next_room: usize,
    doors_carved: bool,
}

impl Rasterizer {
    /// Prepares an empty `width × height` map.
    #[must_use]
    pub fn new(width: u32, height: u32, wall_width: i32, columns: Option<ColumnSettings>) -> Self {
        Self {
            tilemap: TileMap::new(width, height),
            wall_width,
            columns,
            next_room: 0,
            doors_carved: false,
        }
    }

    /// Stamps the next room of `graph`, or carves the doors once every room is
    /// in place. Returns `true` when nothing is left to do.
    pub fn step(&mut self, graph: &Graph) -> bool {
        if self.doors_carved {
            return true;
        }

        if let Some(room) = graph.rooms().get(self.next_room) {
            self.tilemap.stamp_room(
                RoomId::from_index(self.next_room),
                room.bounds(),
                self.wall_width,
                self.columns.as_ref(),
            );
            self.next_room += 1;
            return false;
        }

        let doors = graph.doors();
        for door in &doors {
            self.tilemap.carve_door(door);
        }
        debug!("stamped {} rooms and {} doors", self.next_room, doors.len());
        self.doors_carved = true;
        true
    }

    /// Share of `graph` already stamped.
    #[must_use]
    pub fn progress(&self, graph: &Graph) -> f32 {
        if self.doors_carved {
            return 1.0;
        }
        self.next_room as f32 / (graph.len() + 1) as f32
    }

    /// Map stamped so far.
    #[must_use]
    pub fn tilemap(&self) -> &TileMap {
        &self.tilemap
    }

    /// Consumes the rasterizer, yielding its map.
    #[must_use]
    pub fn into_tilemap(self) -> TileMap {
        self.tilemap
    }
}

/// Stamps every room and door of `graph` into a fresh map.
#[must_use]
pub fn stamp_graph(
    graph: &Graph,
    width: u32,
    height: u32,
    wall_width: i32,
    columns: Option<ColumnSettings>,
) -> TileMap {
    let mut rasterizer = Rasterizer::new(width, height, wall_width, columns);
    while !rasterizer.step(graph) {}
    rasterizer.into_tilemap()
}
