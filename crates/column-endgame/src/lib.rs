//! Optimal move tables for the "last two cells of a column" end-game.
//!
//! This crate finds, for every start of a 3x3 frame, the shortest sequence
//! of blank moves that parks two tracked tiles on cells 2 and 5. The results
//! are meant to be embedded as a lookup table in a full sliding-puzzle solver.

pub mod executor;
pub mod pruning;
pub mod puzzle;
pub mod reference;
pub mod solver;
pub mod table;

// Re-export main types
pub use executor::{execute, verify_solution, ExecutionMetrics, ExecutionResult, ExecutionStatus};
pub use pruning::{LegalityFilter, Region};
pub use puzzle::{
    parse_letters, to_letters, Cell, Direction, DirectionSet, MoveSeq, SearchState, StateError,
    GOAL_A, GOAL_B,
};
pub use solver::{search_from, solve, SolverConfig, SolverResult, DEFAULT_BUDGET, MAX_BUDGET};
pub use table::{build_table, Preset, Table};
