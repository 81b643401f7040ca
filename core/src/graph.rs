//! Rooms, doors and the adjacency graph that joins them.
//!
//! Rooms are value objects identified by their bounds; doors are identified by
//! the unordered pair of rooms they connect. Neither relies on reference
//! identity, so every lookup goes through an explicit key.

use std::collections::{HashMap, HashSet, VecDeque};
use std::hash::{Hash, Hasher};

use glam::Vec2;

use crate::geometry::Rect;

/// Index of a room inside the collection that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(u32);

impl RoomId {
    /// Creates a new room identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Creates an identifier from a collection index.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Identifier expressed as a collection index.
    #[must_use]
    pub fn index(&self) -> usize {
        usize::try_from(self.0).unwrap_or(usize::MAX)
    }
}

/// Order-insensitive key naming the two rooms joined by a door.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DoorKey {
    low: RoomId,
    high: RoomId,
}

impl DoorKey {
    /// Builds the key for a door between `a` and `b`; argument order is irrelevant.
    #[must_use]
    pub fn new(a: RoomId, b: RoomId) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    /// The two rooms, smallest identifier first.
    #[must_use]
    pub const fn rooms(&self) -> (RoomId, RoomId) {
        (self.low, self.high)
    }

    /// Reports whether the key names the provided room.
    #[must_use]
    pub fn contains(&self, room: RoomId) -> bool {
        self.low == room || self.high == room
    }
}

/// Rectangular opening joining exactly two rooms.
///
/// Equality and hashing only consider the connected pair, so a door built
/// from `(a, b)` equals one built from `(b, a)` regardless of its bounds.
#[derive(Clone, Copy, Debug)]
pub struct Door {
    bounds: Rect,
    rooms: [RoomId; 2],
}

impl Door {
    /// Creates a door occupying `bounds` between rooms `a` and `b`.
    #[must_use]
    pub const fn new(bounds: Rect, a: RoomId, b: RoomId) -> Self {
        Self {
            bounds,
            rooms: [a, b],
        }
    }

    /// Cells carved by the door.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Connected rooms in construction order.
    #[must_use]
    pub const fn rooms(&self) -> [RoomId; 2] {
        self.rooms
    }

    /// Order-insensitive identity of the door.
    #[must_use]
    pub fn key(&self) -> DoorKey {
        DoorKey::new(self.rooms[0], self.rooms[1])
    }

    /// Returns the room on the far side of the door as seen from `room`.
    #[must_use]
    pub fn other_room(&self, room: RoomId) -> RoomId {
        if self.rooms[0] == room {
            self.rooms[1]
        } else {
            self.rooms[0]
        }
    }

    /// Reports whether the door opens into `room`.
    #[must_use]
    pub fn connects(&self, room: RoomId) -> bool {
        self.rooms.contains(&room)
    }

    /// Geometric center of the door in cell units.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }
}

impl PartialEq for Door {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Door {}

impl Hash for Door {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

/// Axis-aligned room plus the doors leading out of it.
#[derive(Clone, Debug)]
pub struct Room {
    bounds: Rect,
    doors: Vec<Door>,
}

impl Room {
    /// Creates a room without doors.
    #[must_use]
    pub const fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            doors: Vec::new(),
        }
    }

    /// Cells covered by the room, walls included.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Doors incident to the room in insertion order.
    #[must_use]
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    /// Number of cells covered by the room.
    #[must_use]
    pub fn area(&self) -> i64 {
        self.bounds.area()
    }

    /// Geometric center of the room in cell units.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    /// Registers a door unless an equal one is already present.
    pub fn add_door(&mut self, door: Door) -> bool {
        if self.doors.contains(&door) {
            return false;
        }
        self.doors.push(door);
        true
    }

    /// Drops the door identified by `key`, returning it when present.
    pub fn remove_door(&mut self, key: DoorKey) -> Option<Door> {
        let position = self.doors.iter().position(|door| door.key() == key)?;
        Some(self.doors.remove(position))
    }

    /// Removes and returns every door of the room.
    pub fn take_doors(&mut self) -> Vec<Door> {
        std::mem::take(&mut self.doors)
    }

    /// Door between this room (known as `own`) and `other`, if one exists.
    #[must_use]
    pub fn door_to(&self, own: RoomId, other: RoomId) -> Option<&Door> {
        let key = DoorKey::new(own, other);
        self.doors.iter().find(|door| door.key() == key)
    }

    /// Rooms reachable through one door, seen from this room known as `own`.
    pub fn connected_rooms(&self, own: RoomId) -> impl Iterator<Item = RoomId> + '_ {
        self.doors.iter().map(move |door| door.other_room(own))
    }
}

impl PartialEq for Room {
    fn eq(&self, other: &Self) -> bool {
        self.bounds == other.bounds
    }
}

impl Eq for Room {}

impl Hash for Room {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bounds.hash(state);
    }
}

/// Authoritative collection of rooms and the doors between them.
///
/// Rooms are appended in the order they are first mentioned and keep that
/// index for the lifetime of the graph, which is what the room-index grid and
/// the pathfinding groups refer to.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    rooms: Vec<Room>,
    lookup: HashMap<Rect, RoomId>,
}

impl Graph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rooms in index order.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Room stored under `id`.
    #[must_use]
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.index())
    }

    /// Number of rooms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// Reports whether the graph holds no rooms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Identifiers of every room in index order.
    pub fn ids(&self) -> impl Iterator<Item = RoomId> {
        (0..self.rooms.len()).map(RoomId::from_index)
    }

    /// Looks a room up by its bounds.
    #[must_use]
    pub fn room_id(&self, bounds: &Rect) -> Option<RoomId> {
        self.lookup.get(bounds).copied()
    }

    /// Returns the identifier of the room with `bounds`, inserting a fresh
    /// copy when the graph does not know it yet.
    pub fn add_room(&mut self, bounds: Rect) -> RoomId {
        if let Some(id) = self.room_id(&bounds) {
            return id;
        }

        let id = RoomId::from_index(self.rooms.len());
        self.rooms.push(Room::new(bounds));
        let _ = self.lookup.insert(bounds, id);
        id
    }

    /// Joins the rooms with bounds `from` and `to` through a door occupying
    /// `door_bounds`. Missing rooms are added first. When the pair is already
    /// joined the existing door is kept and returned.
    pub fn add_edge(&mut self, from: Rect, to: Rect, door_bounds: Rect) -> Door {
        let a = self.add_room(from);
        let b = self.add_room(to);
        let door = Door::new(door_bounds, a, b);

        if let Some(existing) = self.door_between(a, b) {
            return *existing;
        }

        for id in [a, b] {
            if let Some(room) = self.rooms.get_mut(id.index()) {
                let _ = room.add_door(door);
            }
        }
        door
    }

    /// Every door in the graph exactly once, ordered by first appearance
    /// when walking rooms in index order.
    #[must_use]
    pub fn doors(&self) -> Vec<Door> {
        let mut seen = HashSet::new();
        let mut doors = Vec::new();
        for room in &self.rooms {
            for door in room.doors() {
                if seen.insert(door.key()) {
                    doors.push(*door);
                }
            }
        }
        doors
    }

    /// Rooms sharing a door with `id`, in door order.
    #[must_use]
    pub fn neighbors(&self, id: RoomId) -> Vec<RoomId> {
        self.room(id)
            .map(|room| room.connected_rooms(id).collect())
            .unwrap_or_default()
    }

    /// Door joining `a` and `b`, if any.
    #[must_use]
    pub fn door_between(&self, a: RoomId, b: RoomId) -> Option<&Door> {
        self.room(a).and_then(|room| room.door_to(a, b))
    }

    /// Number of rooms a breadth-first walk from `start` visits, `start` included.
    #[must_use]
    pub fn reachable_from(&self, start: RoomId) -> usize {
        if self.room(start).is_none() {
            return 0;
        }

        let mut discovered = HashSet::new();
        let mut queue = VecDeque::new();
        let _ = discovered.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for neighbor in self.neighbors(current) {
                if discovered.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        discovered.len()
    }

    /// Reports whether every room is reachable from every other room.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.rooms.is_empty() || self.reachable_from(RoomId::new(0)) == self.rooms.len()
    }
}
