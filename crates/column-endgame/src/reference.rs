//! Breadth-first shortest distances over the tracked-tile state space.
//!
//! No bound, no move ordering: this is the independent yardstick the
//! branch-and-bound results are checked against.

use std::collections::{HashSet, VecDeque};

use crate::pruning::LegalityFilter;
use crate::puzzle::{DirectionSet, SearchState};

/// Length of the shortest legal move sequence from `start` to the goal, or
/// `None` if the goal is not reachable within `max_depth` moves.
pub fn shortest_distance<F: LegalityFilter + ?Sized>(
    start: SearchState,
    filter: &F,
    max_depth: usize,
) -> Option<usize> {
    let mut visited: HashSet<SearchState> = HashSet::new();
    let mut queue: VecDeque<(SearchState, usize)> = VecDeque::new();
    visited.insert(start);
    queue.push_back((start, 0));

    while let Some((state, depth)) = queue.pop_front() {
        if state.is_goal() {
            return Some(depth);
        }
        if depth == max_depth {
            continue;
        }
        for direction in filter.filter(state.blank(), DirectionSet::ALL).iter() {
            if let Some(next) = state.apply(direction) {
                if visited.insert(next) {
                    queue.push_back((next, depth + 1));
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pruning::Region;

    #[test]
    fn test_goal_is_zero() {
        let start = SearchState::from_indices(2, 5, 4).unwrap();
        assert_eq!(shortest_distance(start, &Region::Full, 0), Some(0));
    }

    #[test]
    fn test_known_distances() {
        let start = SearchState::from_indices(2, 4, 5).unwrap();
        assert_eq!(shortest_distance(start, &Region::CornerCut, 10), Some(1));
        assert_eq!(shortest_distance(start, &Region::CornerCut, 0), None);

        // blank has to travel 0 -> 3 -> 6 -> 7 -> 8 -> 5 before sliding B over
        let start = SearchState::from_indices(2, 4, 0).unwrap();
        assert_eq!(shortest_distance(start, &Region::Full, 20), Some(6));
    }

    #[test]
    fn test_stranded_tile_is_unreachable() {
        // the blank can never enter column 0, so A stays put
        let start = SearchState::from_indices(3, 5, 4).unwrap();
        assert_eq!(shortest_distance(start, &Region::ColumnSolved, 40), None);
    }
}
