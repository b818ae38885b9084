//! Replays move sequences against the tracked-tile model.
//!
//! Used to check search output and to verify sequences handed in on the
//! command line.

use serde::Serialize;

use crate::pruning::LegalityFilter;
use crate::puzzle::{Direction, DirectionSet, SearchState};

/// Result status of a replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionStatus {
    /// Both tracked tiles ended on their goal cells
    Solved,
    /// Every move was legal but the goal was not reached
    Unsolved,
    /// The filter rejected a move; replay stopped before it
    IllegalMove { step: usize, direction: Direction },
}

/// Metrics collected during a replay
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionMetrics {
    /// Moves applied
    pub steps: usize,
    /// Moves that immediately undid the previous one
    pub backtracks: usize,
    /// Moves that carried a tracked tile
    pub tracked_slides: usize,
}

/// Result of replaying a sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub metrics: ExecutionMetrics,
    pub final_state: SearchState,
    pub solved: bool,
}

/// Replay `moves` from `start`, stopping at the first illegal move
pub fn execute<F: LegalityFilter + ?Sized>(
    start: SearchState,
    filter: &F,
    moves: &[Direction],
) -> ExecutionResult {
    let mut state = start;
    let mut metrics = ExecutionMetrics::default();
    let mut previous: Option<Direction> = None;

    for (step, &direction) in moves.iter().enumerate() {
        let legal = filter
            .filter(state.blank(), DirectionSet::EMPTY.with(direction))
            .contains(direction);
        let next = match state.apply(direction) {
            Some(next) if legal => next,
            _ => {
                return ExecutionResult {
                    status: ExecutionStatus::IllegalMove { step, direction },
                    metrics,
                    final_state: state,
                    solved: false,
                };
            }
        };

        if previous == Some(direction.opposite()) {
            metrics.backtracks += 1;
        }
        if next.a() != state.a() || next.b() != state.b() {
            metrics.tracked_slides += 1;
        }
        metrics.steps += 1;
        previous = Some(direction);
        state = next;
    }

    let solved = state.is_goal();
    ExecutionResult {
        status: if solved {
            ExecutionStatus::Solved
        } else {
            ExecutionStatus::Unsolved
        },
        metrics,
        final_state: state,
        solved,
    }
}

/// Whether `moves` is a clean solution: every move legal, no immediate undo,
/// goal reached after the last move.
pub fn verify_solution<F: LegalityFilter + ?Sized>(
    start: SearchState,
    filter: &F,
    moves: &[Direction],
) -> bool {
    let result = execute(start, filter, moves);
    result.solved && result.metrics.backtracks == 0 && result.metrics.steps == moves.len()
}
