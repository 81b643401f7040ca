#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Undercroft dungeon generator.
//!
//! This crate defines the value types that flow between the pure systems and
//! the authoritative generation pipeline. The layout system produces a
//! [`Graph`] of rooms joined by doors, the raster system stamps that graph into
//! an [`OccupancyGrid`] and a [`RoomIndexGrid`], and the navigation system reads
//! all three to answer path queries. Nothing in here owns randomness or
//! performs work on its own; every operation is a pure function of its inputs.

pub mod geometry;
pub mod graph;
pub mod grid;
pub mod progress;
pub mod settings;

pub use geometry::{CellCoord, Rect};
pub use graph::{Door, DoorKey, Graph, Room, RoomId};
pub use grid::{Cell, Grid, OccupancyGrid, RoomIndexGrid};
pub use progress::{Phase, Progress};
pub use settings::{
    ColumnSettings, DoorLayout, GenerationSettings, RasterSettings, Settings, SettingsError,
};

/// Canonical banner printed by adapters when they start.
pub const WELCOME_BANNER: &str = "Undercroft dungeon generator.";
