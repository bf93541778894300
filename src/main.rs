use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use rayon::prelude::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use weighted_sokoban::{
    replay, solve, Algorithm, Level, Outcome, Puzzle, SearchParams, SolveHandle,
};

const NOT_AVAILABLE: &str = "Not available";
const LINES_PER_ALGORITHM: usize = 3;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level file: stone weights on the first line, maze rows below
    level: PathBuf,

    /// Search strategy to run
    #[arg(short, long, value_enum, default_value_t = AlgorithmArg::Astar)]
    algorithm: AlgorithmArg,

    /// Depth-first search does not expand nodes deeper than this many moves
    #[arg(long, default_value_t = SearchParams::default().depth_limit)]
    depth_limit: u32,

    /// Cancel a search that runs longer than this
    #[arg(long, value_name = "ms")]
    timeout_ms: Option<u64>,

    /// Merge results into this file, one block per algorithm
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Replay every solution and fail unless it solves the level
    #[arg(long)]
    verify: bool,

    /// Search the maze exactly as written instead of walling off and
    /// cropping unreachable cells
    #[arg(long)]
    no_normalize: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum AlgorithmArg {
    Dfs,
    Bfs,
    Ucs,
    Astar,
    /// Every strategy, concurrently
    All,
}

impl AlgorithmArg {
    fn algorithms(self) -> Vec<Algorithm> {
        match self {
            AlgorithmArg::Dfs => vec![Algorithm::Dfs],
            AlgorithmArg::Bfs => vec![Algorithm::Bfs],
            AlgorithmArg::Ucs => vec![Algorithm::Ucs],
            AlgorithmArg::Astar => vec![Algorithm::AStar],
            AlgorithmArg::All => Algorithm::ALL.to_vec(),
        }
    }
}

fn load_level(path: &Path, normalize: bool) -> Result<Level> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let level: Level = text
        .parse()
        .with_context(|| format!("failed to parse {}", path.display()))?;
    level
        .validate()
        .with_context(|| format!("invalid level {}", path.display()))?;
    Ok(if normalize { level.normalize() } else { level })
}

fn run_one(
    puzzle: &Arc<Puzzle>,
    algorithm: Algorithm,
    params: SearchParams,
    timeout: Option<Duration>,
) -> io::Result<Outcome> {
    match timeout {
        Some(timeout) => {
            let handle = SolveHandle::spawn(Arc::clone(puzzle), algorithm, params)?;
            Ok(handle.wait_timeout(timeout))
        }
        None => Ok(solve(puzzle, algorithm, &params, None)),
    }
}

fn describe(outcome: &Outcome, params: &SearchParams) -> String {
    match outcome {
        Outcome::Solved(solution) => format!("{}\n{}", solution.report, solution.move_string()),
        Outcome::Exhausted => "No solution: every reachable state explored".to_owned(),
        Outcome::DepthLimited => format!(
            "No solution found within {} moves; deeper solutions may exist",
            params.depth_limit
        ),
        Outcome::Cancelled => "Cancelled before a solution was found".to_owned(),
    }
}

/// Merges `results` into the existing contents of a result file: a name
/// line, a statistics line and a move line per algorithm, in
/// [`Algorithm::ALL`] order.
fn merge_result_lines(existing: &str, results: &[(Algorithm, Outcome)]) -> String {
    let mut lines: Vec<String> = existing.split('\n').map(str::to_owned).collect();
    if existing.is_empty() {
        lines.clear();
    }
    lines.resize(
        Algorithm::ALL.len() * LINES_PER_ALGORITHM,
        NOT_AVAILABLE.to_owned(),
    );

    for (slot, algorithm) in Algorithm::ALL.iter().enumerate() {
        let base = slot * LINES_PER_ALGORITHM;
        lines[base] = algorithm.name().to_owned();
        let found = results.iter().find(|(a, _)| a == algorithm);
        if let Some((_, Outcome::Solved(solution))) = found {
            lines[base + 1] = solution.report.to_string();
            lines[base + 2] = solution.move_string();
        }
    }
    lines.join("\n")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let level = load_level(&args.level, !args.no_normalize)?;
    let puzzle = Arc::new(level.to_puzzle()?);
    let params = SearchParams {
        depth_limit: args.depth_limit,
        ..SearchParams::default()
    };
    let timeout = args.timeout_ms.map(Duration::from_millis);
    let algorithms = args.algorithm.algorithms();

    info!(
        "Loaded {} ({}x{}, {} stones)",
        args.level.display(),
        puzzle.grid().height(),
        puzzle.grid().width(),
        puzzle.start().stones().len()
    );

    // the grid is shared read-only; each run owns its own frontier
    let results = algorithms
        .par_iter()
        .map(|&algorithm| run_one(&puzzle, algorithm, params, timeout).map(|o| (algorithm, o)))
        .collect::<io::Result<Vec<_>>>()
        .context("failed to start search thread")?;

    for (algorithm, outcome) in &results {
        println!("{algorithm}");
        println!("{}\n", describe(outcome, &params));
    }

    if args.verify {
        for (algorithm, outcome) in &results {
            let Some(solution) = outcome.solution() else {
                continue;
            };
            let end = replay(puzzle.grid(), puzzle.start(), &solution.move_string())
                .with_context(|| format!("{algorithm} produced an illegal move sequence"))?;
            if !end.state.is_goal(puzzle.grid()) {
                bail!("{algorithm} solution does not cover every switch");
            }
            if end.push_weight() != solution.report.total_push_weight {
                bail!(
                    "{algorithm} reported push weight {} but replay gives {}",
                    solution.report.total_push_weight,
                    end.push_weight()
                );
            }
        }
        info!("All solutions verified");
    }

    if let Some(path) = &args.output {
        let existing = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()))
            }
        };
        if results.iter().all(|(_, o)| !o.is_solved()) {
            warn!("No solution to record in {}", path.display());
        }
        fs::write(path, merge_result_lines(&existing, &results))
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weighted_sokoban::{Report, Solution};

    fn solved(moves: &str, weight: u64) -> Outcome {
        Outcome::Solved(Solution {
            moves: moves
                .chars()
                .filter_map(weighted_sokoban::Move::from_char)
                .collect(),
            report: Report {
                step_count: moves.len(),
                total_push_weight: weight,
                nodes_expanded: 3,
                elapsed_ms: 0.5,
                memory_delta_mb: 0.0,
            },
        })
    }

    #[test]
    fn fresh_result_file_has_all_blocks() {
        let text = merge_result_lines("", &[(Algorithm::Ucs, solved("rR", 4))]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 12);
        assert_eq!(lines[0], "BFS");
        assert_eq!(lines[1], NOT_AVAILABLE);
        assert_eq!(lines[6], "UCS");
        assert_eq!(
            lines[7],
            "Steps: 2, Weight: 4, Node: 3, Time (ms): 0.50, Memory (MB): 0.00"
        );
        assert_eq!(lines[8], "rR");
        assert_eq!(lines[9], "A*");
    }

    #[test]
    fn merge_keeps_earlier_results() {
        let first = merge_result_lines("", &[(Algorithm::Bfs, solved("R", 9))]);
        let second = merge_result_lines(&first, &[(Algorithm::AStar, solved("uR", 1))]);
        let lines: Vec<&str> = second.lines().collect();
        assert_eq!(lines[2], "R");
        assert_eq!(lines[11], "uR");
    }

    #[test]
    fn unsolved_outcome_leaves_slot_untouched() {
        let text = merge_result_lines("", &[(Algorithm::Dfs, Outcome::DepthLimited)]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[3], "DFS");
        assert_eq!(lines[4], NOT_AVAILABLE);
    }

    #[test]
    fn cli_parses_algorithm_names() {
        let args = Args::parse_from(["weighted_sokoban", "lvl.txt", "-a", "all", "--verify"]);
        assert_eq!(args.algorithm, AlgorithmArg::All);
        assert_eq!(args.algorithm.algorithms().len(), 4);
        assert!(args.verify);
        assert_eq!(args.depth_limit, 1000);
    }
}
