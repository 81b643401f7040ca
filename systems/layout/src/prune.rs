//! Removal of the smallest rooms without disconnecting the dungeon.

use log::debug;
use undercroft_core::RoomId;

use crate::floorplan::Floorplan;

/// Outcome of evaluating one pruning candidate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PruneStep {
    /// The room was removed and its doors cleared.
    Removed(RoomId),
    /// Removing the room would disconnect the dungeon, so it stays.
    Kept(RoomId),
    /// No candidates remain.
    Finished,
}

/// Incremental pruner working through rooms from smallest to largest.
///
/// Candidates are drawn while `cursor < len × percentage / 100`, where `len`
/// is the current length of the shrinking working list. A removal does not
/// advance the cursor. At 100 percent, passes repeat until one removes
/// nothing.
#[derive(Clone, Debug)]
pub struct Pruner {
    working: Vec<RoomId>,
    cursor: usize,
    percentage: f32,
    removed: usize,
    removed_this_pass: bool,
    finished: bool,
}

impl Pruner {
    /// Prepares a pruning pass over the active rooms of `floorplan`.
    #[must_use]
    pub fn new(floorplan: &Floorplan, percentage: f32) -> Self {
        let mut working = floorplan.active().to_vec();
        working.sort_by_key(|&id| floorplan.bounds(id).map_or(0, |bounds| bounds.area()));
        Self {
            working,
            cursor: 0,
            percentage,
            removed: 0,
            removed_this_pass: false,
            finished: false,
        }
    }

    /// Number of rooms removed so far.
    #[must_use]
    pub fn removed(&self) -> usize {
        self.removed
    }

    /// Reports whether pruning has completed.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Rough share of the current pass already evaluated.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.finished {
            return 1.0;
        }
        let bound = self.bound();
        if bound <= 0.0 {
            return 1.0;
        }
        (self.cursor as f32 / bound).clamp(0.0, 1.0)
    }

    fn bound(&self) -> f32 {
        self.working.len() as f32 * self.percentage / 100.0
    }

    fn repeats_passes(&self) -> bool {
        self.percentage >= 100.0
    }

    /// Evaluates the next candidate. Once finished, the floorplan's active
    /// list is replaced by the surviving rooms ordered by area.
    pub fn step(&mut self, floorplan: &mut Floorplan) -> PruneStep {
        loop {
            if self.finished {
                return PruneStep::Finished;
            }

            if (self.cursor as f32) >= self.bound() {
                if self.repeats_passes() && self.removed_this_pass {
                    self.cursor = 0;
                    self.removed_this_pass = false;
                    continue;
                }
                self.finished = true;
                floorplan.replace_active(self.working.clone());
                return PruneStep::Finished;
            }

            let candidate = self.working[self.cursor];
            if floorplan.can_remove(candidate, &self.working) {
                floorplan.clear_connections(candidate);
                let _ = self.working.remove(self.cursor);
                self.removed += 1;
                self.removed_this_pass = true;
                debug!("removed room {}", candidate.get());
                return PruneStep::Removed(candidate);
            }

            self.cursor += 1;
            debug!("kept room {}, removal would disconnect", candidate.get());
            return PruneStep::Kept(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{PruneStep, Pruner};
    use crate::floorplan::Floorplan;
    use undercroft_core::{Door, Rect, RoomId};

    /// Builds a floorplan whose active rooms have the given bounds, joined by
    /// doors between the listed index pairs.
    fn layout_of(rooms: &[Rect], doors: &[(usize, usize)]) -> (Floorplan, Vec<RoomId>) {
        let mut floorplan = Floorplan::new(Rect::new(0, 0, 100, 100));
        floorplan.retire(RoomId::new(0));
        let ids: Vec<RoomId> = rooms
            .iter()
            .map(|&bounds| {
                let id = floorplan.push_room(bounds);
                floorplan.activate(id);
                id
            })
            .collect();
        for &(a, b) in doors {
            floorplan.link(Door::new(Rect::new(0, 0, 1, 1), ids[a], ids[b]));
        }
        (floorplan, ids)
    }

    fn run(floorplan: &mut Floorplan, percentage: f32) -> Pruner {
        let mut pruner = Pruner::new(floorplan, percentage);
        while pruner.step(floorplan) != PruneStep::Finished {}
        pruner
    }

    #[test]
    fn zero_percent_keeps_every_room() {
        let (mut floorplan, ids) = layout_of(
            &[Rect::new(0, 0, 2, 2), Rect::new(0, 0, 10, 10)],
            &[(0, 1)],
        );

        let pruner = run(&mut floorplan, 0.0);

        assert_eq!(pruner.removed(), 0);
        assert_eq!(floorplan.active().len(), ids.len());
    }

    #[test]
    fn bridge_room_survives_full_pruning() {
        // big_a - bridge - big_b, the bridge being the smallest room.
        let (mut floorplan, ids) = layout_of(
            &[
                Rect::new(0, 0, 10, 10),
                Rect::new(10, 0, 2, 2),
                Rect::new(20, 0, 10, 10),
            ],
            &[(0, 1), (1, 2)],
        );
        let mut pruner = Pruner::new(&floorplan, 100.0);

        assert_eq!(pruner.step(&mut floorplan), PruneStep::Kept(ids[1]));
        assert_eq!(pruner.step(&mut floorplan), PruneStep::Removed(ids[0]));
        assert_eq!(pruner.step(&mut floorplan), PruneStep::Removed(ids[2]));
        while pruner.step(&mut floorplan) != PruneStep::Finished {}

        assert_eq!(floorplan.active(), &[ids[1]]);
        assert!(floorplan
            .room(ids[1])
            .is_some_and(|room| room.doors().is_empty()));
    }

    #[test]
    fn full_pruning_stops_when_every_removal_would_disconnect() {
        // A cycle of four rooms plus a tail hanging off the largest room.
        let (mut floorplan, _) = layout_of(
            &[
                Rect::new(0, 0, 3, 3),
                Rect::new(0, 0, 4, 4),
                Rect::new(0, 0, 5, 5),
                Rect::new(0, 0, 6, 6),
                Rect::new(0, 0, 2, 2),
            ],
            &[(0, 1), (1, 2), (2, 3), (3, 0), (3, 4)],
        );
        assert!(floorplan.is_connected());

        let _ = run(&mut floorplan, 100.0);

        assert!(floorplan.is_connected());
        let active = floorplan.active().to_vec();
        assert!(active.len() <= 1 || active.iter().all(|&id| !floorplan.can_remove(id, &active)));
    }

    #[test]
    fn candidates_that_would_strand_a_room_are_kept() {
        // The two smallest rooms only touch each other, the largest touches nothing.
        let (mut floorplan, _) = layout_of(
            &[
                Rect::new(0, 0, 2, 2),
                Rect::new(0, 0, 3, 3),
                Rect::new(0, 0, 4, 4),
            ],
            &[(0, 1)],
        );

        let pruner = run(&mut floorplan, 50.0);

        assert_eq!(pruner.removed(), 0);
        assert_eq!(floorplan.active().len(), 3);
    }

    #[test]
    fn surviving_rooms_are_ordered_by_area() {
        let (mut floorplan, ids) = layout_of(
            &[
                Rect::new(0, 0, 9, 9),
                Rect::new(0, 0, 3, 3),
                Rect::new(0, 0, 6, 6),
            ],
            &[(0, 1), (1, 2), (2, 0)],
        );

        let _ = run(&mut floorplan, 0.0);

        assert_eq!(floorplan.active(), &[ids[1], ids[2], ids[0]]);
    }
}
