//! CLI entry point for the column end-game tables.
//!
//! Usage:
//!   column-endgame table --preset <upper|lower|column> [options]
//!   column-endgame solve --a <cell> --b <cell> --blank <cell> [options]
//!   column-endgame replay --a <cell> --b <cell> --blank <cell> <MOVES>
//!
//! Options:
//!   -v                 Increase log verbosity (repeatable)
//!   --region <region>  full, column-solved or corner-cut (default: corner-cut)
//!   --budget <n>       Move ceiling, at most 24 (default: preset ceiling, 19 for solve)
//!   --no-prune         Disable the Manhattan bound
//!   --json             Print JSON instead of text
//!   --check            Cross-check a table against breadth-first search

use std::process;

use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use env_logger::TimestampPrecision;
use log::{info, LevelFilter};
use serde::Serialize;
use thiserror::Error;

use column_endgame::{
    build_table, execute, parse_letters, solve, Preset, Region, SearchState, SolverConfig,
    StateError, DEFAULT_BUDGET, MAX_BUDGET,
};

#[derive(Parser)]
#[command(name = "column-endgame")]
#[command(about = "Optimal move tables for parking two tiles in the last cells of a column")]
#[command(version)]
struct Cli {
    /// Increase logging verbosity (can be repeated)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    log_level: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve every start of a preset and print the lookup table
    Table {
        /// End-game situation to enumerate
        #[arg(long, value_enum)]
        preset: Preset,

        /// Move ceiling (defaults to the preset's ceiling)
        #[arg(long, value_parser = budget_parser())]
        budget: Option<usize>,

        /// Disable the Manhattan bound
        #[arg(long)]
        no_prune: bool,

        /// Print JSON instead of grids and lookup lines
        #[arg(long)]
        json: bool,

        /// Cross-check every entry against breadth-first search
        #[arg(long)]
        check: bool,
    },
    /// Solve a single start
    Solve {
        #[command(flatten)]
        start: StartArgs,

        /// Move ceiling
        #[arg(long, default_value_t = DEFAULT_BUDGET, value_parser = budget_parser())]
        budget: usize,

        /// Disable the Manhattan bound
        #[arg(long)]
        no_prune: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Replay a move string and report where the tiles end up
    Replay {
        #[command(flatten)]
        start: StartArgs,

        /// Moves as letters (u, l, r, d)
        #[arg(value_name = "MOVES")]
        moves: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn budget_parser() -> RangedU64ValueParser<usize> {
    RangedU64ValueParser::new().range(0..=MAX_BUDGET as u64)
}

#[derive(clap::Args)]
struct StartArgs {
    /// Cell of tile A (0-8)
    #[arg(long)]
    a: u8,

    /// Cell of tile B (0-8)
    #[arg(long)]
    b: u8,

    /// Cell of the blank (0-8)
    #[arg(long)]
    blank: u8,

    /// Mobile region of the frame
    #[arg(long, value_enum, default_value_t = Region::CornerCut)]
    region: Region,
}

impl StartArgs {
    fn resolve(&self) -> Result<(SearchState, Region), CliError> {
        let state = SearchState::from_indices(self.a, self.b, self.blank)?;
        self.region.validate(&state)?;
        Ok((state, self.region))
    }
}

#[derive(Error, Debug)]
enum CliError {
    #[error("invalid start: {0}")]
    State(#[from] StateError),
    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Output format for a single solve
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput {
    start: SearchState,
    region: Region,
    solved: bool,
    moves: String,
    move_count: usize,
    budget_remaining: usize,
    nodes_visited: u64,
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(match cli.log_level {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    match run(cli.command) {
        Ok(true) => process::exit(0),
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(2);
        }
    }
}

/// Returns whether the command succeeded in the puzzle sense: every table
/// entry solved, the start solved, or the replay reached the goal.
fn run(command: Commands) -> Result<bool, CliError> {
    match command {
        Commands::Table {
            preset,
            budget,
            no_prune,
            json,
            check,
        } => {
            let config = SolverConfig {
                budget: budget.unwrap_or(preset.default_budget()),
                prune: !no_prune,
            };
            info!("building {:?} table with budget {}", preset, config.budget);
            let table = build_table(preset, &config);

            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                for pair in &table.pairs {
                    println!("{}", pair);
                }
                println!("{}", table.render_lookup());
            }

            let mut ok = table.unsolved() == 0;
            if check {
                let mismatches = table.mismatches();
                eprintln!(
                    "checked {} entries against breadth-first search: {} mismatches",
                    table.entries().count(),
                    mismatches.len()
                );
                ok &= mismatches.is_empty();
            }
            Ok(ok)
        }
        Commands::Solve {
            start,
            budget,
            no_prune,
            json,
        } => {
            let (state, region) = start.resolve()?;
            let config = SolverConfig {
                budget,
                prune: !no_prune,
            };
            let result = solve(state, &region, &config);

            if json {
                let output = SolveOutput {
                    start: state,
                    region,
                    solved: result.solved,
                    moves: result.letters(),
                    move_count: result.moves_used,
                    budget_remaining: result.budget_remaining,
                    nodes_visited: result.nodes_visited,
                };
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else if result.solved {
                println!("{} {} ({} moves)", state, result.letters(), result.moves_used);
            } else {
                println!("{} no solution within {} moves", state, budget);
            }
            Ok(result.solved)
        }
        Commands::Replay { start, moves, json } => {
            let (state, region) = start.resolve()?;
            let moves = parse_letters(&moves)?;
            let result = execute(state, &region, &moves);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                println!(
                    "{:?} after {} moves at {} ({} tracked slides, {} backtracks)",
                    result.status,
                    result.metrics.steps,
                    result.final_state,
                    result.metrics.tracked_slides,
                    result.metrics.backtracks
                );
            }
            Ok(result.solved)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLVE: [&str; 8] = ["column-endgame", "solve", "--a", "3", "--b", "5", "--blank", "4"];

    fn parse_solve(extra: &[&'static str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(SOLVE.iter().chain(extra))
    }

    #[test]
    fn test_budget_flag_range() {
        let cli = parse_solve(&[]).unwrap();
        assert!(matches!(cli.command, Commands::Solve { budget: DEFAULT_BUDGET, .. }));

        let cli = parse_solve(&["--budget", "24"]).unwrap();
        assert!(matches!(cli.command, Commands::Solve { budget: 24, .. }));

        assert!(parse_solve(&["--budget", "25"]).is_err());
        assert!(parse_solve(&["--budget", "1000000"]).is_err());

        let table = ["column-endgame", "table", "--preset", "upper", "--budget", "25"];
        assert!(Cli::try_parse_from(table).is_err());
    }
}
