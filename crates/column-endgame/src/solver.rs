//! Branch-and-bound search for the shortest blank-move sequence that parks
//! tile A on cell 2 and tile B on cell 5.
//!
//! The search is a depth-first walk limited by a move budget. Once a child
//! reports a solution, the allowance handed to the remaining siblings drops
//! to one move short of it, so every later solution is strictly shorter.
//! Among equally short solutions the first in `Direction::ALL` order wins.

use log::{debug, trace};
use serde::Serialize;

use crate::pruning::{next_candidates, within_bound, LegalityFilter};
use crate::puzzle::{to_letters, Direction, DirectionSet, MoveSeq, SearchState};

/// Upper bound on the optimum for every start the tables query
pub const DEFAULT_BUDGET: usize = 19;

/// Deepest the search ever recurses. No start in any region needs more than
/// 22 moves, even with its first move restricted, so a larger budget only
/// adds dead branches.
pub const MAX_BUDGET: usize = 24;

/// Configuration for the solver
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Maximum number of moves a solution may use
    pub budget: usize,
    /// Cut subtrees whose Manhattan bound exceeds the remaining budget
    pub prune: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            budget: DEFAULT_BUDGET,
            prune: true,
        }
    }
}

/// Result of one search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolverResult {
    /// Whether the goal was reached within the budget
    pub solved: bool,
    /// Moves added on top of the history
    pub moves_used: usize,
    /// Budget left after the best solution
    pub budget_remaining: usize,
    /// History followed by the new moves; empty when unsolved
    pub moves: MoveSeq,
    /// Search nodes expanded, the goal check included
    pub nodes_visited: u64,
}

impl SolverResult {
    pub fn letters(&self) -> String {
        to_letters(&self.moves)
    }
}

struct SearchContext<'a, F: ?Sized> {
    filter: &'a F,
    prune: bool,
    nodes_visited: u64,
}

impl<F: LegalityFilter + ?Sized> SearchContext<'_, F> {
    /// Best sequence reaching the goal from `state` in at most `budget` more
    /// moves. `path` holds the moves leading here and is restored on return.
    fn expand(
        &mut self,
        state: SearchState,
        candidates: DirectionSet,
        budget: usize,
        path: &mut MoveSeq,
    ) -> Option<MoveSeq> {
        self.nodes_visited += 1;

        if state.is_goal() {
            return Some(path.clone());
        }
        if budget == 0 {
            return None;
        }
        if self.prune && !within_bound(&state, budget) {
            return None;
        }

        let depth = path.len();
        let mut best = None;
        let mut allowance = budget;

        for direction in self.filter.filter(state.blank(), candidates).iter() {
            if allowance == 0 {
                break;
            }
            let Some(next) = state.apply(direction) else {
                continue;
            };

            path.push(direction);
            let found = self.expand(next, next_candidates(direction), allowance - 1, path);
            path.pop();

            if let Some(moves) = found {
                // moves below this node, the step just taken included
                let used = moves.len() - depth;
                trace!("improved to {} moves below depth {}", used, depth);
                allowance = used - 1;
                best = Some(moves);
            }
        }

        best
    }
}

/// Search from `start` with every direction available and no history.
pub fn solve<F: LegalityFilter + ?Sized>(
    start: SearchState,
    filter: &F,
    config: &SolverConfig,
) -> SolverResult {
    search_from(start, filter, DirectionSet::ALL, &[], config)
}

/// Search from `start`, where `candidates` are the directions the previous
/// move left open and `history` is the path already taken. The history only
/// prefixes the returned sequence; it is never used for pruning. Budgets
/// above `MAX_BUDGET` are searched as `MAX_BUDGET`.
pub fn search_from<F: LegalityFilter + ?Sized>(
    start: SearchState,
    filter: &F,
    candidates: DirectionSet,
    history: &[Direction],
    config: &SolverConfig,
) -> SolverResult {
    let depth_limit = config.budget.min(MAX_BUDGET);
    debug!(
        "searching from {} with budget {} (depth limit {})",
        start, config.budget, depth_limit
    );

    let mut context = SearchContext {
        filter,
        prune: config.prune,
        nodes_visited: 0,
    };
    let mut path: MoveSeq = history.iter().copied().collect();
    let best = context.expand(start, candidates, depth_limit, &mut path);

    let result = match best {
        Some(moves) => {
            let moves_used = moves.len() - history.len();
            SolverResult {
                solved: true,
                moves_used,
                budget_remaining: config.budget - moves_used,
                moves,
                nodes_visited: context.nodes_visited,
            }
        }
        None => SolverResult {
            solved: false,
            moves_used: 0,
            budget_remaining: 0,
            moves: MoveSeq::new(),
            nodes_visited: context.nodes_visited,
        },
    };

    debug!(
        "{} from {}: {} moves ({}), {} nodes",
        if result.solved { "solved" } else { "no solution" },
        start,
        result.moves_used,
        result.letters(),
        result.nodes_visited
    );
    result
}
