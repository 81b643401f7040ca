#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Navigation system: turns the rasterized dungeon into a tile and group
//! graph and answers path queries against it.
//!
//! [`PathfindingMap::build`] creates one [`Tile`] per grid cell and one
//! [`Group`] per room. Queries come in two flavours selected by [`PathMode`]:
//! a single weighted best-first search over tiles, or a room-level search
//! whose door tiles become waypoints for shorter tile searches. The map is
//! immutable once built, so queries only allocate their own scratch state.

mod map;
mod path;
mod search;

pub use map::{Group, PathfindingMap, Tile, TileId};
pub use path::{
    find_group_path, find_hierarchical_path, find_path, find_tile_path, plan_waypoints,
    resolve_endpoint, Endpoint, PathMode, PathQueryError,
};
pub use search::{heuristic, step_cost, COST_WEIGHT, HEURISTIC_WEIGHT};
