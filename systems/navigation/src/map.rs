//! Tile and group graph built from the rasterized dungeon.

use std::collections::HashMap;

use glam::Vec2;
use log::debug;
use undercroft_core::{Cell, CellCoord, DoorKey, Graph, OccupancyGrid, RoomId, RoomIndexGrid};

/// Neighbour offsets tried for every tile: the four orthogonal directions,
/// then `(+1,-1)`, `(+1,+1)`, `(-1,-1)` and `(+1,+1)` again. Symmetric
/// insertion links the remaining diagonals from the other end.
const NEIGHBOUR_OFFSETS: [(i32, i32); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (1, -1),
    (1, 1),
    (-1, -1),
    (1, 1),
];

/// Identifier of a tile; equal to the row-major index of its cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId(u32);

impl TileId {
    /// Creates a tile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    fn index(self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }
}

/// Pathfinding representation of one grid cell.
#[derive(Clone, Debug)]
pub struct Tile {
    cell: CellCoord,
    position: Vec2,
    walkable: bool,
    group: Option<RoomId>,
    neighbors: Vec<TileId>,
}

impl Tile {
    /// Cell the tile stands for.
    #[must_use]
    pub const fn cell(&self) -> CellCoord {
        self.cell
    }

    /// World-space centre of the cell.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Reports whether the cell is floor.
    #[must_use]
    pub const fn is_walkable(&self) -> bool {
        self.walkable
    }

    /// Group (room) the tile belongs to.
    #[must_use]
    pub const fn group(&self) -> Option<RoomId> {
        self.group
    }

    /// Tiles linked to this one.
    #[must_use]
    pub fn neighbors(&self) -> &[TileId] {
        &self.neighbors
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.cell == other.cell
    }
}

impl Eq for Tile {}

/// The tiles of one room plus the rooms it shares a door with.
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    room: RoomId,
    anchor: Vec2,
    tiles: Vec<TileId>,
    connected: Vec<RoomId>,
}

impl Group {
    /// Room the group mirrors.
    #[must_use]
    pub const fn room(&self) -> RoomId {
        self.room
    }

    /// World-space room centre used as the group's representative position.
    #[must_use]
    pub const fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// Tiles owned by the room.
    #[must_use]
    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    /// Groups reachable through one door.
    #[must_use]
    pub fn connected(&self) -> &[RoomId] {
        &self.connected
    }
}

/// Read-only tile and group graph every path query runs against.
#[derive(Clone, Debug)]
pub struct PathfindingMap {
    width: u32,
    height: u32,
    cell_scale: f32,
    tiles: Vec<Tile>,
    groups: Vec<Group>,
    door_tiles: HashMap<DoorKey, TileId>,
}

impl PathfindingMap {
    /// Builds one tile per cell and one group per room, then links tiles to
    /// their grid neighbours and groups along the graph's doors.
    ///
    /// Only tiles owned by a room take part in linking; cells outside every
    /// room stay isolated.
    #[must_use]
    pub fn build(
        occupancy: &OccupancyGrid,
        room_index: &RoomIndexGrid,
        graph: &Graph,
        cell_scale: f32,
    ) -> Self {
        let mut groups: Vec<Group> = graph
            .ids()
            .filter_map(|id| {
                let room = graph.room(id)?;
                Some(Group {
                    room: id,
                    anchor: room.center() * cell_scale,
                    tiles: Vec::new(),
                    connected: graph.neighbors(id),
                })
            })
            .collect();

        let mut tiles = Vec::with_capacity(occupancy.cells().len());
        for (index, (cell, value)) in occupancy.iter().enumerate() {
            let group = room_index
                .get(cell)
                .copied()
                .flatten()
                .filter(|room| room.index() < groups.len());
            if let (Some(room), Some(id)) = (group, TileId::from_index(index)) {
                groups[room.index()].tiles.push(id);
            }
            tiles.push(Tile {
                cell,
                position: cell.center(cell_scale),
                walkable: *value == Cell::Floor,
                group,
                neighbors: Vec::new(),
            });
        }

        let mut map = Self {
            width: occupancy.width(),
            height: occupancy.height(),
            cell_scale,
            tiles,
            groups,
            door_tiles: HashMap::new(),
        };
        map.link_tiles();
        map.index_doors(graph);

        debug!(
            "pathfinding map: {} tiles, {} groups, {} door tiles",
            map.tiles.len(),
            map.groups.len(),
            map.door_tiles.len()
        );
        map
    }

    fn link_tiles(&mut self) {
        for index in 0..self.tiles.len() {
            let Some(id) = TileId::from_index(index) else {
                continue;
            };
            let tile = &self.tiles[index];
            if tile.group.is_none() {
                continue;
            }
            let cell = tile.cell;
            for (dx, dy) in NEIGHBOUR_OFFSETS {
                let Some(other) = cell.offset(dx, dy).and_then(|target| self.tile_at(target))
                else {
                    continue;
                };
                if self.tile(other).is_some_and(|target| target.group.is_some()) {
                    self.connect(id, other);
                }
            }
        }
    }

    fn connect(&mut self, a: TileId, b: TileId) {
        for (from, to) in [(a, b), (b, a)] {
            if let Some(tile) = self.tiles.get_mut(from.index()) {
                if !tile.neighbors.contains(&to) {
                    tile.neighbors.push(to);
                }
            }
        }
    }

    fn index_doors(&mut self, graph: &Graph) {
        for door in graph.doors() {
            let bounds = door.bounds();
            let tile = CellCoord::from_signed(bounds.x(), bounds.y())
                .and_then(|origin| self.tile_at(origin));
            if let Some(tile) = tile {
                let _ = self.door_tiles.insert(door.key(), tile);
            }
        }
    }

    /// Number of tile columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tile rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// World units per cell.
    #[must_use]
    pub const fn cell_scale(&self) -> f32 {
        self.cell_scale
    }

    /// Every tile in row-major order.
    #[must_use]
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Every group in room order.
    #[must_use]
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Tile stored under `id`.
    #[must_use]
    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(id.index())
    }

    /// Group mirroring `room`.
    #[must_use]
    pub fn group(&self, room: RoomId) -> Option<&Group> {
        self.groups.get(room.index())
    }

    /// Tile standing for `cell`.
    #[must_use]
    pub fn tile_at(&self, cell: CellCoord) -> Option<TileId> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }
        let index = u64::from(cell.row()) * u64::from(self.width) + u64::from(cell.column());
        let index = usize::try_from(index).ok()?;
        TileId::from_index(index).filter(|id| id.index() < self.tiles.len())
    }

    /// Tile at the origin cell of the door joining `a` and `b`.
    #[must_use]
    pub fn door_tile(&self, a: RoomId, b: RoomId) -> Option<TileId> {
        self.door_tiles.get(&DoorKey::new(a, b)).copied()
    }

    /// Reports whether `position` lies inside the world rectangle covered by the grid.
    #[must_use]
    pub fn contains_position(&self, position: Vec2) -> bool {
        let extent = Vec2::new(self.width as f32, self.height as f32) * self.cell_scale;
        position.x >= 0.0 && position.y >= 0.0 && position.x < extent.x && position.y < extent.y
    }

    /// Walkable tile nearest to `position`, or `None` when the position lies
    /// outside the grid or no tile is walkable. Ties go to the tile that comes
    /// first in row-major order.
    #[must_use]
    pub fn nearest_walkable(&self, position: Vec2) -> Option<TileId> {
        if !self.contains_position(position) {
            return None;
        }

        let mut best: Option<(usize, f32)> = None;
        for (index, tile) in self.tiles.iter().enumerate() {
            if !tile.walkable {
                continue;
            }
            let distance = tile.position.distance(position);
            if best.map_or(true, |(_, closest)| distance < closest) {
                best = Some((index, distance));
            }
        }
        best.and_then(|(index, _)| TileId::from_index(index))
    }
}

#[cfg(test)]
mod tests {
    use super::{PathfindingMap, TileId};
    use glam::Vec2;
    use undercroft_core::{Cell, CellCoord, Graph, OccupancyGrid, Rect, RoomId, RoomIndexGrid};

    fn open_floor(width: u32, height: u32) -> PathfindingMap {
        let mut graph = Graph::new();
        let bounds = Rect::new(0, 0, width as i32, height as i32);
        let room = graph.add_room(bounds);
        let occupancy = OccupancyGrid::filled(width, height, Cell::Floor);
        let room_index = RoomIndexGrid::filled(width, height, Some(room));
        PathfindingMap::build(&occupancy, &room_index, &graph, 1.0)
    }

    #[test]
    fn interior_tiles_link_to_all_eight_neighbours() {
        let map = open_floor(3, 3);
        let centre = map.tile_at(CellCoord::new(1, 1)).expect("centre tile exists");

        assert_eq!(map.tile(centre).map(|tile| tile.neighbors().len()), Some(8));
    }

    #[test]
    fn links_are_symmetric() {
        let map = open_floor(4, 3);

        for (index, tile) in map.tiles().iter().enumerate() {
            let id = TileId::new(index as u32);
            for &neighbor in tile.neighbors() {
                let back = map.tile(neighbor).expect("neighbour exists");
                assert!(back.neighbors().contains(&id), "{id:?} -> {neighbor:?}");
            }
        }
    }

    #[test]
    fn corner_tile_has_three_neighbours() {
        let map = open_floor(3, 3);
        let corner = map.tile_at(CellCoord::new(0, 0)).expect("corner tile exists");

        assert_eq!(map.tile(corner).map(|tile| tile.neighbors().len()), Some(3));
    }

    #[test]
    fn groups_collect_their_tiles_and_anchor_at_room_centre() {
        let map = open_floor(4, 2);
        let group = map.group(RoomId::new(0)).expect("one group per room");

        assert_eq!(group.tiles().len(), 8);
        assert_eq!(group.anchor(), Vec2::new(2.0, 1.0));
    }

    #[test]
    fn positions_outside_the_grid_do_not_resolve() {
        let map = open_floor(3, 3);

        assert_eq!(map.nearest_walkable(Vec2::new(-0.1, 1.0)), None);
        assert_eq!(map.nearest_walkable(Vec2::new(1.0, 3.0)), None);
        assert_eq!(
            map.nearest_walkable(Vec2::new(2.9, 0.2)),
            map.tile_at(CellCoord::new(2, 0))
        );
    }
}
