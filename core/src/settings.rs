//! Configuration consumed by the generation pipeline.
//!
//! Every settings struct deserialises with `#[serde(default)]`, so a partial
//! TOML document only overrides the fields it names.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which doors survive into the assembled room graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorLayout {
    /// Keep every door between surviving rooms.
    #[default]
    AllDoors,
    /// Keep only the doors that first discovered each room, giving a loop-free dungeon.
    SpanningTree,
}

/// Parameters controlling partitioning, door placement and pruning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationSettings {
    /// Number of cell columns in the bounding area.
    pub grid_width: i32,
    /// Number of cell rows in the bounding area.
    pub grid_height: i32,
    /// A split is rejected when either half would not be wider than this.
    pub min_room_width: i32,
    /// A split is rejected when either half would not be taller than this.
    pub min_room_height: i32,
    /// Thickness of the wall shared by neighbouring rooms.
    pub wall_width: i32,
    /// Width of every door rectangle.
    pub door_width: i32,
    /// Height of every door rectangle.
    pub door_height: i32,
    /// Lower bound of the split point as a fraction of the split length.
    pub split_min_ratio: f32,
    /// Upper bound of the split point as a fraction of the split length.
    pub split_max_ratio: f32,
    /// Percentage of the smallest rooms considered for removal.
    pub room_removal_percentage: f32,
    /// Door set kept when assembling the final graph.
    pub door_layout: DoorLayout,
    /// Seed for the generation's random source.
    pub seed: u64,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            grid_width: 64,
            grid_height: 48,
            min_room_width: 8,
            min_room_height: 8,
            wall_width: 1,
            door_width: 2,
            door_height: 2,
            split_min_ratio: 0.4,
            split_max_ratio: 0.6,
            room_removal_percentage: 10.0,
            door_layout: DoorLayout::AllDoors,
            seed: 0,
        }
    }
}

impl GenerationSettings {
    /// Rejects structurally impossible configurations.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.grid_width <= 0 || self.grid_height <= 0 {
            return Err(SettingsError::NonPositiveGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.min_room_width <= 0 || self.min_room_height <= 0 {
            return Err(SettingsError::NonPositiveMinimumRoom {
                width: self.min_room_width,
                height: self.min_room_height,
            });
        }
        if self.min_room_width > self.grid_width || self.min_room_height > self.grid_height {
            return Err(SettingsError::InfeasibleMinimumRoom {
                min_width: self.min_room_width,
                min_height: self.min_room_height,
                grid_width: self.grid_width,
                grid_height: self.grid_height,
            });
        }
        if self.wall_width <= 0 {
            return Err(SettingsError::NonPositiveWallWidth(self.wall_width));
        }
        if self.door_width < self.wall_width || self.door_height < self.wall_width {
            return Err(SettingsError::DoorNarrowerThanWall {
                door_width: self.door_width,
                door_height: self.door_height,
                wall_width: self.wall_width,
            });
        }
        let ratios_valid = self.split_min_ratio > 0.0
            && self.split_min_ratio <= self.split_max_ratio
            && self.split_max_ratio < 1.0;
        if !ratios_valid {
            return Err(SettingsError::InvalidSplitRatio {
                min: self.split_min_ratio,
                max: self.split_max_ratio,
            });
        }
        if !(0.0..=100.0).contains(&self.room_removal_percentage) {
            return Err(SettingsError::InvalidRemovalPercentage(
                self.room_removal_percentage,
            ));
        }
        Ok(())
    }
}

/// Size and spacing of the support columns inserted into large rooms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnSettings {
    /// Rooms must be wider than this to receive columns; also the column pitch.
    pub min_width: i32,
    /// Rooms must be taller than this to receive columns; also the column pitch.
    pub min_height: i32,
    /// Side length of each square column.
    pub size: i32,
}

impl Default for ColumnSettings {
    fn default() -> Self {
        Self {
            min_width: 14,
            min_height: 14,
            size: 1,
        }
    }
}

/// Parameters controlling rasterisation and the pathfinding map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RasterSettings {
    /// Length of one cell edge in world units.
    pub cell_scale: f32,
    /// Cells processed between two suspension points.
    pub batch_size: u32,
    /// Delay a host may wait between two suspension points, in milliseconds.
    pub pacing_ms: u64,
    /// Column insertion, disabled when absent.
    pub columns: Option<ColumnSettings>,
}

impl Default for RasterSettings {
    fn default() -> Self {
        Self {
            cell_scale: 1.0,
            batch_size: 256,
            pacing_ms: 0,
            columns: Some(ColumnSettings::default()),
        }
    }
}

impl RasterSettings {
    /// Rejects structurally impossible configurations.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(self.cell_scale > 0.0 && self.cell_scale.is_finite()) {
            return Err(SettingsError::NonPositiveCellScale(self.cell_scale));
        }
        if self.batch_size == 0 {
            return Err(SettingsError::ZeroBatchSize);
        }
        if let Some(columns) = self.columns {
            if columns.min_width <= 0 || columns.min_height <= 0 || columns.size <= 0 {
                return Err(SettingsError::InvalidColumns {
                    min_width: columns.min_width,
                    min_height: columns.min_height,
                    size: columns.size,
                });
            }
        }
        Ok(())
    }
}

/// Complete configuration of a generation run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Layout parameters.
    pub generation: GenerationSettings,
    /// Rasterisation and pathfinding parameters.
    pub raster: RasterSettings,
}

impl Settings {
    /// Validates both halves of the configuration.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.generation.validate()?;
        self.raster.validate()
    }
}

/// Reasons a configuration is rejected before generation starts.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum SettingsError {
    /// The bounding grid has no cells.
    #[error("grid must have positive dimensions, got {width}x{height}")]
    NonPositiveGrid {
        /// Configured grid width.
        width: i32,
        /// Configured grid height.
        height: i32,
    },
    /// The minimum room size is zero or negative.
    #[error("minimum room size must be positive, got {width}x{height}")]
    NonPositiveMinimumRoom {
        /// Configured minimum width.
        width: i32,
        /// Configured minimum height.
        height: i32,
    },
    /// The minimum room size does not fit inside the grid.
    #[error(
        "minimum room {min_width}x{min_height} does not fit a {grid_width}x{grid_height} grid"
    )]
    InfeasibleMinimumRoom {
        /// Configured minimum width.
        min_width: i32,
        /// Configured minimum height.
        min_height: i32,
        /// Configured grid width.
        grid_width: i32,
        /// Configured grid height.
        grid_height: i32,
    },
    /// Walls must be at least one cell thick.
    #[error("wall width must be positive, got {0}")]
    NonPositiveWallWidth(i32),
    /// A door thinner than the wall would leave the wall closed.
    #[error("door {door_width}x{door_height} cannot pierce a wall {wall_width} cells thick")]
    DoorNarrowerThanWall {
        /// Configured door width.
        door_width: i32,
        /// Configured door height.
        door_height: i32,
        /// Configured wall width.
        wall_width: i32,
    },
    /// Split ratios must satisfy `0 < min <= max < 1`.
    #[error("split ratios must satisfy 0 < min <= max < 1, got {min}..{max}")]
    InvalidSplitRatio {
        /// Configured lower ratio.
        min: f32,
        /// Configured upper ratio.
        max: f32,
    },
    /// The removal percentage lies outside `0..=100`.
    #[error("room removal percentage must lie within 0..=100, got {0}")]
    InvalidRemovalPercentage(f32),
    /// The cell scale is zero, negative or not finite.
    #[error("cell scale must be positive and finite, got {0}")]
    NonPositiveCellScale(f32),
    /// Batches must process at least one cell.
    #[error("batch size must be at least one")]
    ZeroBatchSize,
    /// Column thresholds and size must be positive.
    #[error("column settings must be positive, got min {min_width}x{min_height} size {size}")]
    InvalidColumns {
        /// Configured width threshold.
        min_width: i32,
        /// Configured height threshold.
        min_height: i32,
        /// Configured column size.
        size: i32,
    },
}
