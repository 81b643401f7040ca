//! Tile-level, group-level and hierarchical path queries.

use std::fmt;

use glam::Vec2;
use log::debug;
use thiserror::Error;
use undercroft_core::RoomId;

use crate::map::{Group, PathfindingMap, Tile, TileId};
use crate::search::best_first;

/// Strategy used by [`find_path`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PathMode {
    /// One search over the whole tile graph.
    #[default]
    TileAStar,
    /// A room-level search refined into tile searches between door tiles.
    HierarchicalAStar,
}

/// Which end of a query failed to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// The query's starting position.
    Start,
    /// The query's destination.
    End,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

/// Failures that prevent a path query from starting.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum PathQueryError {
    /// The position lies outside the grid or the map has no walkable tile.
    #[error("{endpoint} position {position} does not resolve to a walkable tile")]
    UnresolvableEndpoint {
        /// Endpoint that failed.
        endpoint: Endpoint,
        /// Position supplied by the caller.
        position: Vec2,
    },
}

/// Snaps `position` to the nearest walkable tile.
pub fn resolve_endpoint(
    map: &PathfindingMap,
    position: Vec2,
    endpoint: Endpoint,
) -> Result<TileId, PathQueryError> {
    map.nearest_walkable(position)
        .ok_or(PathQueryError::UnresolvableEndpoint { endpoint, position })
}

/// Searches the tile graph from `start` to `goal`.
///
/// Only walkable tiles are entered. The result holds both ends, or is empty
/// when no path exists.
#[must_use]
pub fn find_tile_path(map: &PathfindingMap, start: TileId, goal: TileId) -> Vec<TileId> {
    best_first(
        start,
        goal,
        |id| map.tile(id).map(Tile::position),
        move |id| {
            map.tile(id)
                .into_iter()
                .flat_map(|tile| tile.neighbors().iter().copied())
        },
        |id| map.tile(id).is_some_and(Tile::is_walkable),
    )
}

/// Searches the group graph from `start` to `goal` using the room anchors.
#[must_use]
pub fn find_group_path(map: &PathfindingMap, start: RoomId, goal: RoomId) -> Vec<RoomId> {
    best_first(
        start,
        goal,
        |room| map.group(room).map(Group::anchor),
        move |room| {
            map.group(room)
                .into_iter()
                .flat_map(|group| group.connected().iter().copied())
        },
        |room| map.group(room).is_some(),
    )
}

/// Coarse waypoints for a hierarchical query: the start tile, the door tile
/// of every room transition along the group path, then the end tile.
///
/// Consecutive duplicates are dropped, so a query whose ends coincide yields
/// one waypoint. Tiles outside every room fall back to `[start, end]`. An
/// empty result means the rooms are not connected.
#[must_use]
pub fn plan_waypoints(map: &PathfindingMap, start: TileId, end: TileId) -> Vec<TileId> {
    if start == end {
        return vec![start];
    }

    let start_group = map.tile(start).and_then(Tile::group);
    let end_group = map.tile(end).and_then(Tile::group);
    let (Some(start_group), Some(end_group)) = (start_group, end_group) else {
        return vec![start, end];
    };

    let rooms = find_group_path(map, start_group, end_group);
    if rooms.is_empty() {
        return Vec::new();
    }

    let mut waypoints = vec![start];
    for pair in rooms.windows(2) {
        match map.door_tile(pair[0], pair[1]) {
            Some(door) => waypoints.push(door),
            None => debug!("no door tile between rooms {:?} and {:?}", pair[0], pair[1]),
        }
    }
    waypoints.push(end);
    waypoints.dedup();
    waypoints
}

/// Refines `plan_waypoints` into a tile path by searching between every
/// consecutive pair of waypoints. Any unreachable leg empties the result.
#[must_use]
pub fn find_hierarchical_path(map: &PathfindingMap, start: TileId, end: TileId) -> Vec<TileId> {
    let waypoints = plan_waypoints(map, start, end);
    let Some(&first) = waypoints.first() else {
        return Vec::new();
    };

    let mut path = vec![first];
    for pair in waypoints.windows(2) {
        let segment = find_tile_path(map, pair[0], pair[1]);
        if segment.is_empty() {
            return Vec::new();
        }
        path.extend(segment.into_iter().skip(1));
    }
    path
}

/// Finds a walkable route between two world positions.
///
/// Both positions snap to their nearest walkable tile. The waypoints are tile
/// centres from the start tile to the end tile; an empty vector means no path
/// exists.
pub fn find_path(
    map: &PathfindingMap,
    start: Vec2,
    end: Vec2,
    mode: PathMode,
) -> Result<Vec<Vec2>, PathQueryError> {
    let start_tile = resolve_endpoint(map, start, Endpoint::Start)?;
    let end_tile = resolve_endpoint(map, end, Endpoint::End)?;

    let tiles = match mode {
        PathMode::TileAStar => find_tile_path(map, start_tile, end_tile),
        PathMode::HierarchicalAStar => find_hierarchical_path(map, start_tile, end_tile),
    };
    debug!("{mode:?} query produced {} waypoints", tiles.len());

    Ok(tiles
        .into_iter()
        .filter_map(|id| map.tile(id).map(Tile::position))
        .collect())
}
