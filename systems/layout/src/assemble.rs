//! Assembly of the final room graph from a pruned floorplan.

use std::collections::HashSet;

use log::warn;
use undercroft_core::{DoorLayout, Graph, RoomId};

use crate::floorplan::Floorplan;

/// Builds the room graph by walking doors depth first from the first active
/// room.
///
/// Rooms enter the graph in discovery order, so graph room 0 is the walk's
/// origin. Each door that discovers a room becomes an edge; with
/// [`DoorLayout::AllDoors`] every other door between discovered rooms is
/// added afterwards. Active rooms the walk never reaches are left out.
#[must_use]
pub fn assemble_graph(floorplan: &Floorplan, layout: DoorLayout) -> Graph {
    let mut graph = Graph::new();
    let Some(&origin) = floorplan.active().first() else {
        return graph;
    };
    let Some(origin_bounds) = floorplan.bounds(origin) else {
        return graph;
    };

    let active: HashSet<RoomId> = floorplan.active().iter().copied().collect();
    let mut discovered = HashSet::new();
    let mut order = vec![origin];
    let mut frontier = vec![origin];
    let _ = discovered.insert(origin);
    let _ = graph.add_room(origin_bounds);

    let mut current = origin;
    while discovered.len() < active.len() {
        let next = floorplan.room(current).and_then(|room| {
            room.doors()
                .iter()
                .map(|door| (door, door.other_room(current)))
                .find(|(_, other)| active.contains(other) && !discovered.contains(other))
        });

        if let Some((door, other)) = next {
            let (Some(from), Some(to)) = (floorplan.bounds(current), floorplan.bounds(other))
            else {
                break;
            };
            let _ = discovered.insert(other);
            let _ = graph.add_edge(from, to, door.bounds());
            order.push(other);
            frontier.push(other);
            current = other;
            continue;
        }

        frontier.retain(|&room| room != current);
        match frontier.first() {
            Some(&room) => current = room,
            None => break,
        }
    }

    if discovered.len() < active.len() {
        warn!(
            "dropping {} rooms unreachable from room {}",
            active.len() - discovered.len(),
            origin.get()
        );
    }

    if layout == DoorLayout::AllDoors {
        for &id in &order {
            let (Some(room), Some(from)) = (floorplan.room(id), floorplan.bounds(id)) else {
                continue;
            };
            for door in room.doors() {
                let other = door.other_room(id);
                if !discovered.contains(&other) {
                    continue;
                }
                if let Some(to) = floorplan.bounds(other) {
                    let _ = graph.add_edge(from, to, door.bounds());
                }
            }
        }
    }

    graph
}
