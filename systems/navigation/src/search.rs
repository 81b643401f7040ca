//! Weighted best-first search shared by the tile and group searches.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::hash::Hash;

use glam::Vec2;

/// Multiplier applied to the distance between two nodes to get the step cost.
pub const COST_WEIGHT: f32 = 0.9;

/// Multiplier applied to the distance to the goal to get the heuristic.
///
/// It exceeds [`COST_WEIGHT`], so the heuristic may overestimate and paths are
/// not guaranteed to be shortest.
pub const HEURISTIC_WEIGHT: f32 = 1.1;

/// Cost of stepping from `from` to `to`.
#[must_use]
pub fn step_cost(from: Vec2, to: Vec2) -> f32 {
    COST_WEIGHT * from.distance(to)
}

/// Estimated remaining cost from `from` to `goal`.
#[must_use]
pub fn heuristic(from: Vec2, goal: Vec2) -> f32 {
    HEURISTIC_WEIGHT * from.distance(goal)
}

/// Open-set entry. The heap pops the lowest priority first and, among equal
/// priorities, the most recently pushed entry.
#[derive(Clone, Copy, Debug)]
struct Frontier<N> {
    priority: f32,
    sequence: u64,
    node: N,
}

impl<N> Ord for Frontier<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| self.sequence.cmp(&other.sequence))
    }
}

impl<N> PartialOrd for Frontier<N> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<N> PartialEq for Frontier<N> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<N> Eq for Frontier<N> {}

/// Searches from `start` to `goal`, returning the nodes of the path in order
/// with both ends included, or an empty vector when the goal is unreachable.
///
/// Nodes for which `passable` returns `false` are never entered. Each node is
/// expanded at most once.
pub(crate) fn best_first<N, P, I, F, W>(
    start: N,
    goal: N,
    position: P,
    mut neighbors: F,
    passable: W,
) -> Vec<N>
where
    N: Copy + Eq + Hash,
    P: Fn(N) -> Option<Vec2>,
    F: FnMut(N) -> I,
    I: IntoIterator<Item = N>,
    W: Fn(N) -> bool,
{
    if start == goal {
        return vec![start];
    }
    let Some(goal_position) = position(goal) else {
        return Vec::new();
    };

    let mut open = BinaryHeap::new();
    let mut closed = HashSet::new();
    let mut costs: HashMap<N, f32> = HashMap::new();
    let mut parents: HashMap<N, N> = HashMap::new();
    let mut sequence = 0_u64;

    let _ = costs.insert(start, 0.0);
    open.push(Frontier {
        priority: 0.0,
        sequence,
        node: start,
    });

    while let Some(Frontier { node, .. }) = open.pop() {
        if node == goal {
            return reconstruct(&parents, start, goal);
        }
        if !closed.insert(node) {
            continue;
        }
        let (Some(&base), Some(from)) = (costs.get(&node), position(node)) else {
            continue;
        };

        for next in neighbors(node) {
            if closed.contains(&next) || !passable(next) {
                continue;
            }
            let Some(to) = position(next) else {
                continue;
            };

            let cost = base + step_cost(from, to);
            if costs.get(&next).is_some_and(|&known| known <= cost) {
                continue;
            }
            let _ = costs.insert(next, cost);
            let _ = parents.insert(next, node);
            sequence += 1;
            open.push(Frontier {
                priority: cost + heuristic(to, goal_position),
                sequence,
                node: next,
            });
        }
    }

    Vec::new()
}

fn reconstruct<N: Copy + Eq + Hash>(parents: &HashMap<N, N>, start: N, goal: N) -> Vec<N> {
    let mut path = vec![goal];
    let mut current = goal;
    while current != start {
        match parents.get(&current) {
            Some(&parent) => {
                path.push(parent);
                current = parent;
            }
            None => return Vec::new(),
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::{best_first, Frontier};
    use glam::Vec2;
    use std::collections::BinaryHeap;

    fn line(node: u32) -> Option<Vec2> {
        Some(Vec2::new(node as f32, 0.0))
    }

    #[test]
    fn equal_priorities_pop_most_recent_first() {
        let mut heap = BinaryHeap::new();
        for (sequence, node) in [(0, 'a'), (1, 'b'), (2, 'c')] {
            heap.push(Frontier {
                priority: 1.0,
                sequence,
                node,
            });
        }
        heap.push(Frontier {
            priority: 0.5,
            sequence: 3,
            node: 'd',
        });

        let order: Vec<char> = std::iter::from_fn(|| heap.pop().map(|entry| entry.node)).collect();
        assert_eq!(order, vec!['d', 'c', 'b', 'a']);
    }

    #[test]
    fn walks_a_line_graph() {
        let path = best_first(
            0_u32,
            4,
            line,
            |node| [node.wrapping_sub(1), node + 1].into_iter().filter(|&n| n <= 6),
            |_| true,
        );

        assert_eq!(path, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn blocked_nodes_make_the_goal_unreachable() {
        let path = best_first(
            0_u32,
            4,
            line,
            |node| [node.wrapping_sub(1), node + 1].into_iter().filter(|&n| n <= 6),
            |node| node != 2,
        );

        assert!(path.is_empty());
    }

    #[test]
    fn start_equal_to_goal_is_a_single_node() {
        assert_eq!(best_first(3_u32, 3, line, |_| Vec::new(), |_| true), vec![3]);
    }
}
