//! Move legality and search-space pruning rules.
//!
//! A `LegalityFilter` describes which cells the blank may visit. The three
//! `Region` variants encode the shapes the end-game leaves mobile; each one
//! carries its own hand-derived boundary conditions.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::puzzle::{Cell, Direction, DirectionSet, SearchState, StateError};

/// Decides which blank moves are permitted.
pub trait LegalityFilter {
    /// Whether the blank may occupy `cell`
    fn permits(&self, cell: Cell) -> bool;

    /// Drop every candidate that would take the blank off the frame or out
    /// of the permitted cells.
    fn filter(&self, blank: Cell, candidates: DirectionSet) -> DirectionSet {
        candidates
            .iter()
            .filter(|&direction| blank.step(direction).is_some_and(|target| self.permits(target)))
            .collect()
    }
}

/// Shape of the mobile part of the frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    /// All nine cells
    Full,
    /// Column 0 is already solved and closed to the blank
    ColumnSolved,
    /// Every cell except the bottom-right corner
    CornerCut,
}

impl Region {
    /// Cells the blank may occupy, ascending
    pub fn cells(self) -> impl Iterator<Item = Cell> {
        Cell::all().filter(move |&cell| self.permits(cell))
    }

    pub fn validate(self, state: &SearchState) -> Result<(), StateError> {
        if self.permits(state.blank()) {
            Ok(())
        } else {
            Err(StateError::BlankOutsideRegion {
                blank: state.blank(),
                region: self.to_string(),
            })
        }
    }

    /// Starts the table never queries: with the blank in the top-right corner
    /// and the pair stacked like this, the full board is left in a parity
    /// deadlock. Only the corner-cut frame produces them.
    pub fn is_trap(self, state: &SearchState) -> bool {
        self == Region::CornerCut
            && state.blank().index() == 2
            && (blocks_pair(state.a(), state.b()) || blocks_pair(state.b(), state.a()))
    }
}

fn blocks_pair(first: Cell, second: Cell) -> bool {
    first.index() == 1 && matches!(second.index(), 4 | 5)
}

impl LegalityFilter for Region {
    fn permits(&self, cell: Cell) -> bool {
        match self {
            Region::Full => true,
            Region::ColumnSolved => cell.col() != 0,
            Region::CornerCut => cell.index() != 8,
        }
    }

    fn filter(&self, blank: Cell, candidates: DirectionSet) -> DirectionSet {
        let z = blank.index();
        let col = blank.col();
        let (up, left, right, down) = match self {
            Region::Full => (z >= 3, col != 0, col != 2, z < 6),
            Region::ColumnSolved => (z >= 3 && col != 0, col == 2, col != 2, z < 6 && col != 0),
            Region::CornerCut => (z >= 3, col != 0, col != 2 && z != 7, z <= 4),
        };
        [
            (Direction::Up, up),
            (Direction::Left, left),
            (Direction::Right, right),
            (Direction::Down, down),
        ]
        .into_iter()
        .filter(|&(direction, legal)| legal && candidates.contains(direction))
        .map(|(direction, _)| direction)
        .collect()
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Region::Full => "full",
            Region::ColumnSolved => "column-solved",
            Region::CornerCut => "corner-cut",
        };
        write!(f, "{}", name)
    }
}

/// Whether the admissible bound still fits in `budget`
pub fn within_bound(state: &SearchState, budget: usize) -> bool {
    usize::from(state.lower_bound()) <= budget
}

/// Candidates for the move after `last`: everything but its immediate undo
pub fn next_candidates(last: Direction) -> DirectionSet {
    DirectionSet::ALL.without(last.opposite())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REGIONS: [Region; 3] = [Region::Full, Region::ColumnSolved, Region::CornerCut];

    /// Membership-derived filter, the reference for the hand-written ones
    struct Membership(Region);

    impl LegalityFilter for Membership {
        fn permits(&self, cell: Cell) -> bool {
            self.0.permits(cell)
        }
    }

    #[test]
    fn test_filter_matches_region_membership() {
        for region in REGIONS {
            for blank in Cell::all() {
                let expected: DirectionSet = Direction::ALL
                    .into_iter()
                    .filter(|&d| blank.step(d).is_some_and(|t| region.permits(t)))
                    .collect();
                assert_eq!(
                    region.filter(blank, DirectionSet::ALL),
                    expected,
                    "{} at blank {}",
                    region,
                    blank
                );
                assert_eq!(Membership(region).filter(blank, DirectionSet::ALL), expected);
            }
        }
    }

    #[test]
    fn test_filter_only_removes() {
        for region in REGIONS {
            for blank in Cell::all() {
                for removed in Direction::ALL {
                    let candidates = DirectionSet::ALL.without(removed);
                    let allowed = region.filter(blank, candidates);
                    assert!(!allowed.contains(removed));
                    assert_eq!(allowed, region.filter(blank, DirectionSet::ALL).without(removed));
                }
                assert!(region.filter(blank, DirectionSet::EMPTY).is_empty());
            }
        }
    }

    #[test]
    fn test_corner_cut_boundaries() {
        let region = Region::CornerCut;
        let at = |i| region.filter(Cell::new(i).unwrap(), DirectionSet::ALL);

        assert!(!at(5).contains(Direction::Down));
        assert!(!at(7).contains(Direction::Right));
        assert!(at(4).contains(Direction::Down));
        assert_eq!(region.cells().count(), 8);
    }

    #[test]
    fn test_column_solved_excludes_first_column() {
        let region = Region::ColumnSolved;
        assert_eq!(
            region.cells().map(Cell::index).collect::<Vec<_>>(),
            vec![1, 2, 4, 5, 7, 8]
        );
        let allowed = region.filter(Cell::new(4).unwrap(), DirectionSet::ALL);
        assert!(!allowed.contains(Direction::Left));
        assert_eq!(allowed.len(), 3);
    }

    #[test]
    fn test_traps() {
        let trap = SearchState::from_indices(1, 4, 2).unwrap();
        let mirrored = SearchState::from_indices(5, 1, 2).unwrap();
        let elsewhere = SearchState::from_indices(1, 4, 0).unwrap();

        assert!(Region::CornerCut.is_trap(&trap));
        assert!(Region::CornerCut.is_trap(&mirrored));
        assert!(!Region::CornerCut.is_trap(&elsewhere));
        assert!(!Region::Full.is_trap(&trap));
    }

    #[test]
    fn test_validate_blank() {
        let state = SearchState::from_indices(2, 4, 8).unwrap();
        assert!(Region::Full.validate(&state).is_ok());
        assert!(matches!(
            Region::CornerCut.validate(&state),
            Err(StateError::BlankOutsideRegion { .. })
        ));
    }

    #[test]
    fn test_next_candidates_excludes_undo() {
        for last in Direction::ALL {
            let next = next_candidates(last);
            assert_eq!(next.len(), 3);
            assert!(!next.contains(last.opposite()));
            assert!(next.contains(last));
        }
    }

    #[test]
    fn test_within_bound() {
        let state = SearchState::from_indices(0, 3, 1).unwrap();
        assert_eq!(state.lower_bound(), 4);
        assert!(within_bound(&state, 4));
        assert!(!within_bound(&state, 3));
    }
}
