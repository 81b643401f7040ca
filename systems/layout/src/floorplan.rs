//! Arena of rooms produced while partitioning.
//!
//! Every room ever created keeps its slot, so a [`RoomId`] stays valid after
//! its room has been split or pruned. The active list names the rooms that
//! currently make up the dungeon, in the order they were activated.

use std::collections::{HashSet, VecDeque};

use undercroft_core::{Door, DoorKey, Rect, Room, RoomId};

/// Rooms created by the partitioner plus the subset still in play.
#[derive(Clone, Debug)]
pub struct Floorplan {
    rooms: Vec<Room>,
    active: Vec<RoomId>,
}

impl Floorplan {
    /// Creates a floorplan holding one active room covering `bounds`.
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            rooms: vec![Room::new(bounds)],
            active: vec![RoomId::new(0)],
        }
    }

    /// Every room ever created, retired ones included.
    #[must_use]
    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    /// Room stored under `id`.
    #[must_use]
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.index())
    }

    /// Bounds of the room stored under `id`.
    #[must_use]
    pub fn bounds(&self, id: RoomId) -> Option<Rect> {
        self.room(id).map(Room::bounds)
    }

    /// Rooms currently making up the dungeon.
    #[must_use]
    pub fn active(&self) -> &[RoomId] {
        &self.active
    }

    /// Reports whether every active room can reach every other active room.
    #[must_use]
    pub fn is_connected(&self) -> bool {
        match self.active.first() {
            Some(&start) => self.reachable(start, None) == self.active.len(),
            None => true,
        }
    }

    /// Reports whether `candidate` can leave `among` without splitting the
    /// remaining rooms into separate components.
    ///
    /// The walk starts at the first room of `among` other than the candidate,
    /// with the candidate already marked as visited.
    #[must_use]
    pub fn can_remove(&self, candidate: RoomId, among: &[RoomId]) -> bool {
        if among.len() <= 1 {
            return false;
        }
        let Some(&start) = among.iter().find(|&&id| id != candidate) else {
            return false;
        };
        self.reachable(start, Some(candidate)) == among.len()
    }

    /// Number of rooms visited by a breadth-first walk from `start`, counting
    /// `blocked` as visited without walking through it.
    fn reachable(&self, start: RoomId, blocked: Option<RoomId>) -> usize {
        let mut discovered = HashSet::new();
        let mut queue = VecDeque::new();
        let _ = discovered.insert(start);
        if let Some(blocked) = blocked {
            let _ = discovered.insert(blocked);
        }
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            let Some(room) = self.room(current) else {
                continue;
            };
            for neighbor in room.connected_rooms(current) {
                if discovered.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        discovered.len()
    }

    pub(crate) fn push_room(&mut self, bounds: Rect) -> RoomId {
        let id = RoomId::from_index(self.rooms.len());
        self.rooms.push(Room::new(bounds));
        id
    }

    pub(crate) fn activate(&mut self, id: RoomId) {
        self.active.push(id);
    }

    pub(crate) fn retire(&mut self, id: RoomId) {
        self.active.retain(|&active| active != id);
    }

    pub(crate) fn replace_active(&mut self, active: Vec<RoomId>) {
        self.active = active;
    }

    /// Registers `door` with both rooms it connects.
    pub(crate) fn link(&mut self, door: Door) {
        for id in door.rooms() {
            if let Some(room) = self.rooms.get_mut(id.index()) {
                let _ = room.add_door(door);
            }
        }
    }

    pub(crate) fn take_doors(&mut self, id: RoomId) -> Vec<Door> {
        self.rooms
            .get_mut(id.index())
            .map(Room::take_doors)
            .unwrap_or_default()
    }

    pub(crate) fn remove_door(&mut self, id: RoomId, key: DoorKey) {
        if let Some(room) = self.rooms.get_mut(id.index()) {
            let _ = room.remove_door(key);
        }
    }

    /// Drops every door of `id`, removing each one from the room on its far side too.
    pub(crate) fn clear_connections(&mut self, id: RoomId) {
        for door in self.take_doors(id) {
            self.remove_door(door.other_room(id), door.key());
        }
    }
}
