//! Lookup-table enumeration.
//!
//! A `Preset` names one end-game situation: which frame shape is mobile,
//! which (A, B) placements can occur and the move ceiling known to cover
//! them. Building a table solves every start of the preset once.

use std::fmt;

use clap::ValueEnum;
use log::{info, warn};
use serde::Serialize;

use crate::pruning::Region;
use crate::puzzle::{Cell, SearchState, GOAL_A, GOAL_B, WIDTH};
use crate::reference::shortest_distance;
use crate::solver::{solve, SolverConfig};

/// End-game situations the tables are built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Pair still inside the top two rows of the corner-cut frame
    Upper,
    /// A already on its goal cell, B down in column 0
    Lower,
    /// Column 0 solved, pair anywhere in the remaining two columns
    Column,
}

impl Preset {
    pub fn region(self) -> Region {
        match self {
            Preset::Upper | Preset::Lower => Region::CornerCut,
            Preset::Column => Region::ColumnSolved,
        }
    }

    pub fn default_budget(self) -> usize {
        match self {
            Preset::Upper | Preset::Lower => 19,
            Preset::Column => 18,
        }
    }

    /// (A, B) placements to enumerate, in table order
    pub fn pairs(self) -> Vec<(Cell, Cell)> {
        let spread = |indices: &[u8]| -> Vec<(Cell, Cell)> {
            let cells: Vec<Cell> = indices.iter().filter_map(|&i| Cell::new(i).ok()).collect();
            let mut pairs = Vec::new();
            for &a in &cells {
                for &b in &cells {
                    if a != b && !(a == GOAL_A && b == GOAL_B) {
                        pairs.push((a, b));
                    }
                }
            }
            pairs
        };
        match self {
            Preset::Upper => spread(&[1, 2, 4, 5]),
            Preset::Lower => [(2, 3), (2, 6)]
                .into_iter()
                .filter_map(|(a, b)| Some((Cell::new(a).ok()?, Cell::new(b).ok()?)))
                .collect(),
            Preset::Column => spread(&[1, 2, 4, 5, 7, 8]),
        }
    }

    pub fn solver_config(self) -> SolverConfig {
        SolverConfig {
            budget: self.default_budget(),
            ..SolverConfig::default()
        }
    }
}

/// One solved start
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableEntry {
    pub a_label: u8,
    pub b_label: u8,
    pub start: SearchState,
    pub solved: bool,
    pub moves: String,
    pub move_count: usize,
}

/// Every start for one (A, B) placement
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairReport {
    pub a: Cell,
    pub b: Cell,
    pub entries: Vec<TableEntry>,
}

impl PairReport {
    /// Move counts laid out on the frame: the pair's cells are marked `a`
    /// and `b`, unsolved starts show `--`, cells never queried stay empty.
    pub fn render_grid(&self) -> String {
        let cell_text = |cell: Cell| -> String {
            if cell == self.a {
                return " a".to_string();
            }
            if cell == self.b {
                return " b".to_string();
            }
            match self.entries.iter().find(|e| e.start.blank() == cell) {
                Some(entry) if entry.solved => format!("{:>2}", entry.move_count),
                Some(_) => "--".to_string(),
                None => "  ".to_string(),
            }
        };

        let rows: Vec<String> = (0..WIDTH)
            .map(|row| {
                (0..WIDTH)
                    .filter_map(|col| Cell::new(row * WIDTH + col).ok())
                    .map(&cell_text)
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect();
        rows.join("\n---------\n")
    }
}

impl fmt::Display for PairReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "a={} b={}", self.a.board_label(), self.b.board_label())?;
        writeln!(f, "{}", self.render_grid())
    }
}

/// A start whose solved length disagrees with breadth-first search
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mismatch {
    pub start: SearchState,
    pub searched: Option<usize>,
    pub shortest: Option<usize>,
}

/// Solved lookup table for one preset
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub preset: Preset,
    pub region: Region,
    pub budget: usize,
    pub pairs: Vec<PairReport>,
}

impl Table {
    pub fn entries(&self) -> impl Iterator<Item = &TableEntry> {
        self.pairs.iter().flat_map(|pair| pair.entries.iter())
    }

    pub fn unsolved(&self) -> usize {
        self.entries().filter(|entry| !entry.solved).count()
    }

    /// One `(aLabel, bLabel, blank) moves` line per entry
    pub fn render_lookup(&self) -> String {
        self.entries()
            .map(|entry| {
                format!(
                    "({}, {}, {}) {}",
                    entry.a_label,
                    entry.b_label,
                    entry.start.blank(),
                    entry.moves
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Entries whose move count differs from breadth-first search within
    /// the table's budget
    pub fn mismatches(&self) -> Vec<Mismatch> {
        let region = self.region;
        self.entries()
            .filter_map(|entry| {
                let searched = entry.solved.then_some(entry.move_count);
                let shortest = shortest_distance(entry.start, &region, self.budget);
                if searched == shortest {
                    return None;
                }
                warn!(
                    "{}: search found {:?} moves, breadth-first {:?}",
                    entry.start, searched, shortest
                );
                Some(Mismatch {
                    start: entry.start,
                    searched,
                    shortest,
                })
            })
            .collect()
    }
}

/// Solve every start of `preset`. Starts the end-game can never present
/// (traps, or the blank outside the region) are skipped.
pub fn build_table(preset: Preset, config: &SolverConfig) -> Table {
    let region = preset.region();
    let pairs = preset
        .pairs()
        .into_iter()
        .map(|(a, b)| solve_pair(region, a, b, config))
        .collect();

    Table {
        preset,
        region,
        budget: config.budget,
        pairs,
    }
}

fn solve_pair(region: Region, a: Cell, b: Cell, config: &SolverConfig) -> PairReport {
    let mut entries = Vec::new();

    for blank in region.cells() {
        let Ok(start) = SearchState::new(a, b, blank) else {
            continue;
        };
        if region.is_trap(&start) {
            continue;
        }

        let result = solve(start, &region, config);
        entries.push(TableEntry {
            a_label: a.board_label(),
            b_label: b.board_label(),
            start,
            solved: result.solved,
            moves: result.letters(),
            move_count: result.moves_used,
        });
    }

    info!(
        "pair a={} b={}: {} starts, longest {} moves",
        a,
        b,
        entries.len(),
        entries.iter().map(|e| e.move_count).max().unwrap_or(0)
    );

    PairReport { a, b, entries }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::verify_solution;
    use crate::pruning::LegalityFilter;
    use crate::puzzle::parse_letters;

    #[test]
    fn test_preset_pairs() {
        let upper = Preset::Upper.pairs();
        assert_eq!(upper.len(), 11);
        assert!(!upper.contains(&(GOAL_A, GOAL_B)));
        assert_eq!(Preset::Lower.pairs().len(), 2);
        assert_eq!(Preset::Column.pairs().len(), 29);
        for preset in [Preset::Upper, Preset::Lower, Preset::Column] {
            for (a, b) in preset.pairs() {
                assert!(preset.region().permits(a));
                assert!(preset.region().permits(b));
            }
        }
    }

    #[test]
    fn test_upper_table() {
        let table = build_table(Preset::Upper, &Preset::Upper.solver_config());

        assert_eq!(table.entries().count(), 62);
        assert_eq!(table.unsolved(), 0);
        assert!(table.entries().all(|e| !table.region.is_trap(&e.start)));
        assert!(table.entries().all(|e| e.start.blank().index() != 8));
        for entry in table.entries() {
            let moves = parse_letters(&entry.moves).unwrap();
            assert_eq!(moves.len(), entry.move_count);
            assert!(verify_solution(entry.start, &table.region, &moves));
        }
        assert!(table.mismatches().is_empty());
    }

    #[test]
    fn test_upper_known_entry() {
        let table = build_table(Preset::Upper, &Preset::Upper.solver_config());
        let entry = table
            .entries()
            .find(|e| e.start == SearchState::from_indices(1, 2, 0).unwrap())
            .unwrap();
        assert_eq!((entry.a_label, entry.b_label), (0, 1));
        assert_eq!(entry.moves, "drrul");
        assert!(table.render_lookup().contains("(0, 1, 0) drrul"));
    }

    #[test]
    fn test_lower_table() {
        let table = build_table(Preset::Lower, &Preset::Lower.solver_config());
        assert_eq!(table.entries().count(), 12);
        assert_eq!(table.unsolved(), 0);

        let entry = table
            .entries()
            .find(|e| e.start == SearchState::from_indices(2, 3, 0).unwrap())
            .unwrap();
        assert_eq!(entry.moves, "rdruldlurrdl");
        assert_eq!(entry.move_count, 12);
    }

    #[test]
    fn test_column_table_matches_breadth_first() {
        let table = build_table(Preset::Column, &Preset::Column.solver_config());
        assert_eq!(table.entries().count(), 116);
        assert_eq!(table.unsolved(), 0);
        assert!(table.mismatches().is_empty());
    }

    #[test]
    fn test_render_grid() {
        let report = PairReport {
            a: Cell::new(1).unwrap(),
            b: Cell::new(4).unwrap(),
            entries: vec![TableEntry {
                a_label: 0,
                b_label: 2,
                start: SearchState::from_indices(1, 4, 0).unwrap(),
                solved: true,
                moves: "x".repeat(11),
                move_count: 11,
            }],
        };
        let expected = "11| a|  \n---------\n  | b|  \n---------\n  |  |  ";
        assert_eq!(report.render_grid(), expected);
        assert_eq!(report.to_string(), format!("a=0 b=2\n{}\n", expected));
    }

    #[test]
    fn test_table_json() {
        let table = build_table(Preset::Lower, &Preset::Lower.solver_config());
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["preset"], "lower");
        assert_eq!(json["region"], "corner-cut");
        assert_eq!(json["pairs"][0]["entries"][0]["moveCount"], 12);
    }
}
