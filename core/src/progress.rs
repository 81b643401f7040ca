//! Pipeline phases and the progress report handed to observers.

/// Stage of a generation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Nothing has been started yet.
    Idle,
    /// Rooms are being partitioned and joined by doors.
    Splitting,
    /// Partitioning finished and the room graph exists.
    GraphBuilt,
    /// Small rooms are being removed.
    Pruning,
    /// Rooms are being stamped into the occupancy grid.
    Rasterizing,
    /// Reachable floor is being flood filled.
    FloodFilling,
    /// Wall junctions are being classified and spawned.
    WallClassifying,
    /// Tiles and groups for pathfinding are being built.
    PathMapBuilding,
    /// The dungeon is complete.
    Ready,
    /// The run was cancelled.
    Aborted,
}

impl Phase {
    /// Human readable label shown by progress displays.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Splitting => "Creating rooms",
            Self::GraphBuilt => "Creating graph",
            Self::Pruning => "Removing small rooms",
            Self::Rasterizing => "Rasterizing rooms",
            Self::FloodFilling => "Creating floors",
            Self::WallClassifying => "Creating walls",
            Self::PathMapBuilding => "Building pathfinding map",
            Self::Ready => "Ready",
            Self::Aborted => "Aborted",
        }
    }

    /// Portion of the overall run covered by this phase, as `(start, end)`.
    #[must_use]
    pub const fn band(self) -> (f32, f32) {
        match self {
            Self::Idle => (0.0, 0.0),
            Self::Splitting => (0.0, 0.3),
            Self::GraphBuilt => (0.3, 0.3),
            Self::Pruning => (0.3, 0.4),
            Self::Rasterizing => (0.4, 0.5),
            Self::FloodFilling => (0.5, 0.75),
            Self::WallClassifying => (0.75, 0.95),
            Self::PathMapBuilding => (0.95, 1.0),
            Self::Ready => (1.0, 1.0),
            Self::Aborted => (0.0, 0.0),
        }
    }

    /// Reports whether no further work will happen.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Aborted)
    }
}

/// Snapshot of how far a generation run has come.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    phase: Phase,
    phase_fraction: f32,
    overall: f32,
}

impl Progress {
    /// Builds a report for `phase` with `phase_fraction` of it done.
    ///
    /// The fraction is clamped into `0.0..=1.0` and mapped onto the phase's band
    /// to derive the overall fraction.
    #[must_use]
    pub fn new(phase: Phase, phase_fraction: f32) -> Self {
        let phase_fraction = if phase_fraction.is_nan() {
            0.0
        } else {
            phase_fraction.clamp(0.0, 1.0)
        };
        let (start, end) = phase.band();
        Self {
            phase,
            phase_fraction,
            overall: start + (end - start) * phase_fraction,
        }
    }

    /// Phase the run is in.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Completed fraction of the current phase.
    #[must_use]
    pub const fn phase_fraction(&self) -> f32 {
        self.phase_fraction
    }

    /// Completed fraction of the whole run.
    #[must_use]
    pub const fn overall(&self) -> f32 {
        self.overall
    }

    /// Label of the current phase.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.phase.label()
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new(Phase::Idle, 0.0)
    }
}
