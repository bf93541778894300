//! Search strategies over the shared grid/state model.
//!
//! Every strategy runs on its own [`SearchContext`] (node arena, expansion
//! counter, cancellation flag) and reports a [`Search`] verdict; [`solve`]
//! wraps that with timing and turns a goal node into a [`Solution`].

mod astar;
mod bfs;
mod dfs;
mod node;
mod ucs;

use log::{debug, info};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::grid::Grid;
use crate::metrics::{Report, Stopwatch};
use crate::movement::{format_moves, Move, STEP_COST};
use crate::puzzle::Puzzle;
use crate::state::State;

use self::node::{NodeArena, NodeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// Depth-bounded, stack-ordered; first goal found, not cheapest.
    Dfs,
    /// Queue-ordered; fewest moves, ignoring weight.
    Bfs,
    /// Cost-ordered; cheapest total cost.
    Ucs,
    /// Ordered by cost plus weighted-distance estimate; first goal found.
    AStar,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::Bfs,
        Algorithm::Dfs,
        Algorithm::Ucs,
        Algorithm::AStar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Dfs => "DFS",
            Algorithm::Bfs => "BFS",
            Algorithm::Ucs => "UCS",
            Algorithm::AStar => "A*",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Search parameters shared by all strategies.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Depth-first search does not expand nodes deeper than this many moves.
    pub depth_limit: u32,
    /// Expansions between polls of the cancellation flag.
    pub cancel_check_interval: u64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            depth_limit: 1000,
            cancel_check_interval: 1024,
        }
    }
}

/// A goal-reaching move sequence with its diagnostics.
#[derive(Clone, Debug, PartialEq)]
pub struct Solution {
    pub moves: Vec<Move>,
    pub report: Report,
}

impl Solution {
    /// `u/d/l/r` for walks, `U/D/L/R` for pushes.
    pub fn move_string(&self) -> String {
        format_moves(&self.moves)
    }

    pub fn total_cost(&self) -> u64 {
        self.report.total_push_weight + self.report.step_count as u64 * STEP_COST
    }
}

/// How a search ended.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Solved(Solution),
    /// The frontier emptied without reaching a goal.
    Exhausted,
    /// Depth-first search emptied its stack after pruning at least one branch
    /// beyond the depth limit, so a deeper solution may still exist.
    DepthLimited,
    /// The cancellation flag was raised.
    Cancelled,
}

impl Outcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Outcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn into_solution(self) -> Option<Solution> {
        match self {
            Outcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Solved(_))
    }
}

/// Strategy verdict before path reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Search {
    Found(NodeId),
    Exhausted,
    DepthLimited,
    Cancelled,
}

/// Per-run scratch owned by exactly one search.
pub(crate) struct SearchContext<'a> {
    pub grid: &'a Grid,
    pub params: SearchParams,
    pub arena: NodeArena,
    pub nodes_expanded: u64,
    canceled: Option<&'a AtomicBool>,
    seq: u64,
}

impl<'a> SearchContext<'a> {
    pub fn new(grid: &'a Grid, params: SearchParams, canceled: Option<&'a AtomicBool>) -> Self {
        Self {
            grid,
            params,
            arena: NodeArena::default(),
            nodes_expanded: 0,
            canceled,
            seq: 0,
        }
    }

    /// Counts one popped node. Returns `true` when the search must stop.
    pub fn note_expansion(&mut self) -> bool {
        self.nodes_expanded += 1;
        let interval = self.params.cancel_check_interval.max(1);
        if self.nodes_expanded % interval != 0 {
            return false;
        }
        self.canceled
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Monotonic counter for stable tie-breaking in priority frontiers.
    pub fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }
}

/// Runs `algorithm` on `puzzle`.
///
/// Blocks until a goal is found, the frontier runs dry, or `cancel` is seen
/// raised. Only depth-first search bounds its own work; the others may run
/// for a long time on large or unsolvable levels.
pub fn solve(
    puzzle: &Puzzle,
    algorithm: Algorithm,
    params: &SearchParams,
    cancel: Option<&AtomicBool>,
) -> Outcome {
    let watch = Stopwatch::start();
    let grid = puzzle.grid();
    let start = puzzle.start();
    debug!(
        "{algorithm}: {} stones, player at {}",
        start.stones().len(),
        start.player()
    );

    let mut ctx = SearchContext::new(grid, *params, cancel);
    let verdict = if start.is_goal(grid) {
        Search::Found(ctx.arena.root(start.clone()))
    } else {
        run(algorithm, &mut ctx, start)
    };

    match verdict {
        Search::Found(goal) => {
            let moves = ctx.arena.path_to(goal);
            let cost = ctx.arena[goal].g;
            let step_count = moves.len();
            debug_assert!(cost >= step_count as u64 * STEP_COST);
            let report = Report {
                step_count,
                total_push_weight: cost - step_count as u64 * STEP_COST,
                nodes_expanded: ctx.nodes_expanded,
                elapsed_ms: watch.elapsed_ms(),
                memory_delta_mb: watch.memory_delta_mb(),
            };
            debug!(
                "{algorithm}: solved in {step_count} moves, cost {cost}, {} nodes expanded, {} discovered",
                ctx.nodes_expanded,
                ctx.arena.len()
            );
            Outcome::Solved(Solution { moves, report })
        }
        Search::Exhausted => {
            debug!(
                "{algorithm}: no solution, frontier exhausted after {} expansions",
                ctx.nodes_expanded
            );
            Outcome::Exhausted
        }
        Search::DepthLimited => {
            debug!(
                "{algorithm}: gave up, branches cut at depth {} after {} expansions",
                params.depth_limit, ctx.nodes_expanded
            );
            Outcome::DepthLimited
        }
        Search::Cancelled => {
            info!(
                "{algorithm}: cancelled after {} expansions ({:.2} ms)",
                ctx.nodes_expanded,
                watch.elapsed_ms()
            );
            Outcome::Cancelled
        }
    }
}

fn run(algorithm: Algorithm, ctx: &mut SearchContext<'_>, start: &State) -> Search {
    match algorithm {
        Algorithm::Dfs => dfs::run(ctx, start),
        Algorithm::Bfs => bfs::run(ctx, start),
        Algorithm::Ucs => ucs::run(ctx, start),
        Algorithm::AStar => astar::run(ctx, start),
    }
}
