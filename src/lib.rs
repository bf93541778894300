//! # Weighted Sokoban solver
//!
//! Finds move sequences that put every stone of a weighted Sokoban level on
//! a switch. Walking costs one per move; pushing additionally costs the
//! weight of the pushed stone.
//!
//! ## Modules
//! - `grid`: static layout (walls, floor, switches), `Point` and `Direction`.
//! - `state`: player plus stones, with order-independent equality.
//! - `movement`: the transition function, move tokens and replay.
//! - `deadlock`, `heuristic`: pruning signal and cost estimate for A*.
//! - `search`: DFS, BFS, UCS and A* over the shared model.
//! - `level`: level file parsing and validation.
//! - `worker`: background solving with cooperative cancellation.
//!
//! ```
//! use weighted_sokoban::{solve, Algorithm, Puzzle, SearchParams};
//!
//! let puzzle = Puzzle::new(&[10], &["######", "#@$ .#", "######"]).unwrap();
//! let outcome = solve(&puzzle, Algorithm::Ucs, &SearchParams::default(), None);
//! let solution = outcome.solution().unwrap();
//! assert_eq!(solution.move_string(), "RR");
//! assert_eq!(solution.report.total_push_weight, 20);
//! ```

pub mod deadlock;
pub mod grid;
pub mod heuristic;
pub mod level;
pub mod metrics;
pub mod movement;
pub mod puzzle;
pub mod search;
pub mod state;
pub mod worker;

pub use grid::{CellKind, Direction, Grid, Point};
pub use level::{Level, LevelError};
pub use metrics::Report;
pub use movement::{apply, replay, Move, MoveKind, Transition};
pub use puzzle::Puzzle;
pub use search::{solve, Algorithm, Outcome, SearchParams, Solution};
pub use state::{State, Stone};
pub use worker::SolveHandle;
