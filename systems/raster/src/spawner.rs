//! Seam through which rasterized cells reach whatever instantiates assets.

use glam::Vec2;
use undercroft_core::{CellCoord, RoomId};

/// What a placement asks the host to create.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// A floor tile centred on its cell.
    Floor,
    /// A wall piece at a cell junction; the variant is the 4-bit neighbour mask.
    Wall(u8),
}

/// One asset the rasterizer wants placed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Asset to create.
    pub kind: AssetKind,
    /// Cell the placement was derived from.
    pub cell: CellCoord,
    /// World-space position of the asset.
    pub position: Vec2,
    /// Room owning the cell, if any.
    pub room: Option<RoomId>,
}

/// Host-side collaborator that instantiates assets.
pub trait AssetSpawner {
    /// Opaque handle to a placed asset.
    type Handle;

    /// Places one asset and returns its handle.
    fn spawn(&mut self, placement: &Placement) -> Self::Handle;
}

/// Spawner that places nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NullSpawner;

impl AssetSpawner for NullSpawner {
    type Handle = ();

    fn spawn(&mut self, _placement: &Placement) -> Self::Handle {}
}
