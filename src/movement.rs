//! Push mechanics and move bookkeeping.

use arrayvec::ArrayVec;
use std::fmt;
use thiserror::Error;

use crate::grid::{Direction, Grid};
use crate::state::State;

/// Every move costs one step; a push also costs the stone's weight.
pub const STEP_COST: u64 = 1;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum MoveKind {
    Walk,
    Push,
}

/// One edge of a solution path.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Move {
    pub dir: Direction,
    pub kind: MoveKind,
}

impl Move {
    /// Upper-case for a push, lower-case for a walk.
    pub fn to_char(self) -> char {
        let ch = self.dir.to_char();
        match self.kind {
            MoveKind::Push => ch.to_ascii_uppercase(),
            MoveKind::Walk => ch,
        }
    }

    pub fn from_char(ch: char) -> Option<Self> {
        let dir = Direction::from_char(ch)?;
        let kind = if ch.is_ascii_uppercase() {
            MoveKind::Push
        } else {
            MoveKind::Walk
        };
        Some(Move { dir, kind })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

pub fn format_moves(moves: &[Move]) -> String {
    moves.iter().map(|m| m.to_char()).collect()
}

/// Result of a legal move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub state: State,
    pub kind: MoveKind,
    pub cost: u64,
}

/// Applies `dir` to `state`, or returns `None` when the move is blocked.
///
/// Walking back onto an earlier configuration still yields a fresh state;
/// filtering duplicates is up to the search.
pub fn apply(grid: &Grid, state: &State, dir: Direction) -> Option<Transition> {
    let target = state.player().step(dir);
    if grid.is_wall(target) {
        return None;
    }

    if let Some(index) = state.stone_index(target) {
        let beyond = target.step(dir);
        if grid.is_wall(beyond) || state.has_stone(beyond) {
            return None;
        }
        let weight = state.stones()[index].weight;
        return Some(Transition {
            state: state.with_push(index, beyond, target),
            kind: MoveKind::Push,
            cost: STEP_COST + u64::from(weight),
        });
    }

    Some(Transition {
        state: state.with_player(target),
        kind: MoveKind::Walk,
        cost: STEP_COST,
    })
}

/// All legal moves from `state` in [`Direction::ALL`] order.
pub fn successors(grid: &Grid, state: &State) -> ArrayVec<(Direction, Transition), 4> {
    Direction::ALL
        .iter()
        .filter_map(|&dir| apply(grid, state, dir).map(|t| (dir, t)))
        .collect()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("unknown move token '{token}' at position {index}")]
    UnknownToken { index: usize, token: char },
    #[error("move '{token}' at position {index} is blocked")]
    Blocked { index: usize, token: char },
    #[error("move '{token}' at position {index} is a {actual:?}, not a {claimed:?}")]
    KindMismatch {
        index: usize,
        token: char,
        claimed: MoveKind,
        actual: MoveKind,
    },
}

/// Final position and totals after replaying a move string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Replay {
    pub state: State,
    pub steps: usize,
    pub cost: u64,
}

impl Replay {
    pub fn push_weight(&self) -> u64 {
        self.cost - self.steps as u64 * STEP_COST
    }
}

/// Replays `moves` from `start`, checking each token's case against what
/// the move actually does.
pub fn replay(grid: &Grid, start: &State, moves: &str) -> Result<Replay, ReplayError> {
    let mut state = start.clone();
    let mut cost = 0;
    let mut steps = 0;
    for (index, token) in moves.chars().enumerate() {
        let claimed = Move::from_char(token).ok_or(ReplayError::UnknownToken { index, token })?;
        let t = apply(grid, &state, claimed.dir).ok_or(ReplayError::Blocked { index, token })?;
        if t.kind != claimed.kind {
            return Err(ReplayError::KindMismatch {
                index,
                token,
                claimed: claimed.kind,
                actual: t.kind,
            });
        }
        state = t.state;
        cost += t.cost;
        steps += 1;
    }
    Ok(Replay { state, steps, cost })
}
