//! Binary space partitioning of the bounding area into rooms.
//!
//! Splitting is driven from an explicit work stack. Each call to
//! [`Partitioner::step`] pops one room and either splits it in two or keeps
//! it as a leaf, so a host can interleave its own work between steps.

use log::debug;
use undercroft_core::{Door, GenerationSettings, Rect, RoomId};

use crate::floorplan::Floorplan;
use crate::rng::RandomSource;

/// Direction of the cut dividing a room.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SplitAxis {
    /// A vertical cut dividing the width; children sit side by side.
    Vertical,
    /// A horizontal cut dividing the height; children sit on top of each other.
    Horizontal,
}

impl SplitAxis {
    /// The other axis.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Vertical => Self::Horizontal,
            Self::Horizontal => Self::Vertical,
        }
    }
}

/// Outcome of a single partitioning step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SplitStep {
    /// `parent` was replaced by two children.
    Split {
        /// Room that was divided and retired.
        parent: RoomId,
        /// The two new rooms, in creation order.
        children: [RoomId; 2],
        /// Axis the accepted cut ran along.
        axis: SplitAxis,
    },
    /// The room could not be split along either axis and stays whole.
    Leaf(RoomId),
    /// The work stack is empty.
    Finished,
}

fn lerp(from: f32, to: f32, fraction: f32) -> f32 {
    from + (to - from) * fraction.clamp(0.0, 1.0)
}

/// Cuts `bounds` along `axis` without checking the result.
///
/// Both children receive half the wall width past the split point so that
/// neighbours share exactly `wall_width` cells; an odd wall gives the first
/// child the extra cell.
fn cut(bounds: Rect, axis: SplitAxis, fraction: f32, settings: &GenerationSettings) -> (Rect, Rect) {
    let half_wall = settings.wall_width / 2;
    let odd_wall = settings.wall_width % 2;
    let low = settings.split_min_ratio;
    let high = settings.split_max_ratio;

    match axis {
        SplitAxis::Vertical => {
            let length = bounds.width();
            let split = lerp(length as f32 * low, length as f32 * high, fraction) as i32;
            (
                Rect::new(
                    bounds.x(),
                    bounds.y(),
                    split + half_wall + odd_wall,
                    bounds.height(),
                ),
                Rect::new(
                    bounds.x() + split - half_wall,
                    bounds.y(),
                    length - split + half_wall,
                    bounds.height(),
                ),
            )
        }
        SplitAxis::Horizontal => {
            let length = bounds.height();
            let split = lerp(length as f32 * low, length as f32 * high, fraction) as i32;
            (
                Rect::new(
                    bounds.x(),
                    bounds.y(),
                    bounds.width(),
                    split + half_wall + odd_wall,
                ),
                Rect::new(
                    bounds.x(),
                    bounds.y() + split - half_wall,
                    bounds.width(),
                    length - split + half_wall,
                ),
            )
        }
    }
}

fn accepts(
    parent: Rect,
    children: (Rect, Rect),
    axis: SplitAxis,
    settings: &GenerationSettings,
) -> bool {
    let (first, second) = children;
    let large_enough = match axis {
        SplitAxis::Vertical => {
            first.width() > settings.min_room_width && second.width() > settings.min_room_width
        }
        SplitAxis::Horizontal => {
            first.height() > settings.min_room_height
                && second.height() > settings.min_room_height
        }
    };

    large_enough
        && parent.contains_rect(&first)
        && parent.contains_rect(&second)
        && first.area() < parent.area()
        && second.area() < parent.area()
}

/// Splits `bounds` along `axis`, falling back to the other axis with the same
/// fraction. Returns `None` when neither cut leaves both halves larger than
/// the minimum room size.
#[must_use]
pub fn split_room(
    bounds: Rect,
    axis: SplitAxis,
    fraction: f32,
    settings: &GenerationSettings,
) -> Option<(SplitAxis, Rect, Rect)> {
    [axis, axis.flipped()].into_iter().find_map(|candidate| {
        let children = cut(bounds, candidate, fraction, settings);
        accepts(bounds, children, candidate, settings)
            .then_some((candidate, children.0, children.1))
    })
}

/// Places a door across the wall shared by `a` and `b`.
///
/// The door slides along the longer side of the overlap, keeping one wall
/// width clear of its start and two of its end. Returns `None` when the
/// rooms do not overlap or the overlap is too short for the door.
#[must_use]
pub fn place_door(a: &Rect, b: &Rect, fraction: f32, settings: &GenerationSettings) -> Option<Rect> {
    let overlap = a.intersection(b)?;
    let wall = settings.wall_width;

    if overlap.width() > overlap.height() {
        if overlap.width() - wall * 2 < settings.door_width {
            return None;
        }
        let low = (overlap.x() + wall) as f32;
        let high = (overlap.x() + overlap.width() - wall * 2) as f32;
        let x = lerp(low, high, fraction).max(low).min(high) as i32;
        Some(Rect::new(
            x,
            overlap.y(),
            settings.door_width,
            settings.door_height,
        ))
    } else {
        if overlap.height() - wall * 2 < settings.door_height {
            return None;
        }
        let low = (overlap.y() + wall) as f32;
        let high = (overlap.y() + overlap.height() - wall * 2) as f32;
        let y = lerp(low, high, fraction).max(low).min(high) as i32;
        Some(Rect::new(
            overlap.x(),
            y,
            settings.door_width,
            settings.door_height,
        ))
    }
}

/// Incremental binary space partitioner.
#[derive(Clone, Debug)]
pub struct Partitioner {
    settings: GenerationSettings,
    floorplan: Floorplan,
    stack: Vec<RoomId>,
    axis: SplitAxis,
    total_area: i64,
    leaf_area: i64,
    splits: usize,
}

impl Partitioner {
    /// Seeds the work stack with one room covering the whole grid.
    #[must_use]
    pub fn new(settings: &GenerationSettings) -> Self {
        let bounds = Rect::new(0, 0, settings.grid_width, settings.grid_height);
        Self {
            settings: settings.clone(),
            floorplan: Floorplan::new(bounds),
            stack: vec![RoomId::new(0)],
            axis: SplitAxis::Vertical,
            total_area: bounds.area(),
            leaf_area: 0,
            splits: 0,
        }
    }

    /// Rooms produced so far.
    #[must_use]
    pub fn floorplan(&self) -> &Floorplan {
        &self.floorplan
    }

    /// Consumes the partitioner, yielding its rooms.
    #[must_use]
    pub fn into_floorplan(self) -> Floorplan {
        self.floorplan
    }

    /// Reports whether every room has been split or accepted as a leaf.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.stack.is_empty()
    }

    /// Number of accepted splits.
    #[must_use]
    pub fn splits(&self) -> usize {
        self.splits
    }

    /// Share of the bounding area already settled into leaf rooms.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.is_finished() || self.total_area <= 0 {
            return 1.0;
        }
        (self.leaf_area as f32 / self.total_area as f32).clamp(0.0, 1.0)
    }

    /// Pops one room off the work stack and tries to split it.
    pub fn step(&mut self, rng: &mut RandomSource) -> SplitStep {
        let Some(parent) = self.stack.pop() else {
            return SplitStep::Finished;
        };
        let Some(bounds) = self.floorplan.bounds(parent) else {
            return SplitStep::Leaf(parent);
        };

        let fraction = rng.next_fraction();
        let Some((axis, first_bounds, second_bounds)) =
            split_room(bounds, self.axis, fraction, &self.settings)
        else {
            self.leaf_area += bounds.area();
            return SplitStep::Leaf(parent);
        };

        let first = self.floorplan.push_room(first_bounds);
        let second = self.floorplan.push_room(second_bounds);
        self.try_link(rng, first, second);
        self.rewire(rng, parent, first, second);

        self.floorplan.retire(parent);
        for child in [first, second] {
            self.stack.push(child);
            self.floorplan.activate(child);
        }
        self.axis = self.axis.flipped();
        self.splits += 1;

        debug!(
            "split {:?} {:?} into {:?} and {:?}",
            bounds, axis, first_bounds, second_bounds
        );

        SplitStep::Split {
            parent,
            children: [first, second],
            axis,
        }
    }

    /// Attempts a door between `a` and `b`. A fraction is drawn even when the
    /// door does not fit.
    fn try_link(&mut self, rng: &mut RandomSource, a: RoomId, b: RoomId) {
        let fraction = rng.next_fraction();
        let (Some(a_bounds), Some(b_bounds)) = (self.floorplan.bounds(a), self.floorplan.bounds(b))
        else {
            return;
        };
        if let Some(door) = place_door(&a_bounds, &b_bounds, fraction, &self.settings) {
            self.floorplan.link(Door::new(door, a, b));
        }
    }

    /// Moves the doors of `parent` onto whichever children still touch the
    /// neighbour on the far side.
    fn rewire(&mut self, rng: &mut RandomSource, parent: RoomId, first: RoomId, second: RoomId) {
        for door in self.floorplan.take_doors(parent) {
            let neighbor = door.other_room(parent);
            let Some(neighbor_bounds) = self.floorplan.bounds(neighbor) else {
                continue;
            };

            for child in [first, second] {
                let touches = self
                    .floorplan
                    .bounds(child)
                    .is_some_and(|child_bounds| neighbor_bounds.intersects(&child_bounds));
                if touches {
                    self.try_link(rng, neighbor, child);
                }
            }

            self.floorplan.remove_door(neighbor, door.key());
        }
    }
}
