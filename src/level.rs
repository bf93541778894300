//! Level files: parsing, validation and normalization.
//!
//! A level file holds the stone weights on its first line, separated by
//! whitespace, followed by the maze rows:
//!
//! ```text
//! 10 4
//! #######
//! #@ $ .#
//! #  $ .#
//! #######
//! ```
//!
//! The search engine assumes a validated level; [`Level::validate`] is the
//! gate in front of it.

use std::collections::VecDeque;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::grid::{
    Direction, Point, EMPTY, PLAYER, PLAYER_ON_SWITCH, STONE, STONE_ON_SWITCH, SWITCH, WALL,
};
use crate::puzzle::Puzzle;

pub const MIN_WEIGHT: u32 = 1;
pub const MAX_WEIGHT: u32 = 100;
/// Longest side a maze may have; coordinates are stored as `i16`.
pub const MAX_SIDE: usize = i16::MAX as usize;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LevelError {
    #[error("missing weight line")]
    MissingWeights,
    #[error("invalid weight '{0}'")]
    BadWeight(String),
    #[error("weight {0} is outside 1..=100")]
    WeightRange(u32),
    #[error("maze has no rows")]
    EmptyMaze,
    #[error("maze is {height}x{width}, sides are limited to 32767 cells")]
    TooLarge { height: usize, width: usize },
    #[error("row {row} has {len} cells, expected {expected}")]
    Ragged {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("unknown character '{ch}' at row {row}, column {col}")]
    UnknownCell { ch: char, row: usize, col: usize },
    #[error("there should be exactly one player, found {0}")]
    PlayerCount(usize),
    #[error("{stones} stones but {switches} switches")]
    StoneSwitchCount { stones: usize, switches: usize },
    #[error("there should be at least one stone")]
    NoStones,
    #[error("{stones} stones but {weights} weights")]
    WeightCount { stones: usize, weights: usize },
    #[error("maze should be surrounded by walls")]
    NotEnclosed,
    #[error("stone at {0} is unreachable")]
    UnreachableStone(Point),
    #[error("switch at {0} is unreachable")]
    UnreachableSwitch(Point),
}

/// Raw level as read from disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Level {
    pub weights: Vec<u32>,
    pub rows: Vec<Vec<u8>>,
}

impl FromStr for Level {
    type Err = LevelError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Level::parse(text)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let weights: Vec<String> = self.weights.iter().map(u32::to_string).collect();
        writeln!(f, "{}", weights.join(" "))?;
        for row in &self.rows {
            writeln!(f, "{}", String::from_utf8_lossy(row))?;
        }
        Ok(())
    }
}

impl Level {
    /// Splits a level file into weights and rows. Trailing blank lines are
    /// dropped; nothing else is checked.
    pub fn parse(text: &str) -> Result<Level, LevelError> {
        let mut lines = text.lines();
        let weight_line = lines.next().ok_or(LevelError::MissingWeights)?;
        let weights = weight_line
            .split_whitespace()
            .map(|w| w.parse().map_err(|_| LevelError::BadWeight(w.to_owned())))
            .collect::<Result<Vec<u32>, _>>()?;

        let mut rows: Vec<Vec<u8>> = lines
            .map(|l| l.trim_end_matches('\r').as_bytes().to_vec())
            .collect();
        while rows.last().is_some_and(|r| r.iter().all(u8::is_ascii_whitespace)) {
            rows.pop();
        }
        Ok(Level { weights, rows })
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Checks everything the search engine takes for granted.
    pub fn validate(&self) -> Result<(), LevelError> {
        if let Some(&w) = self
            .weights
            .iter()
            .find(|&&w| !(MIN_WEIGHT..=MAX_WEIGHT).contains(&w))
        {
            return Err(LevelError::WeightRange(w));
        }
        if self.rows.is_empty() {
            return Err(LevelError::EmptyMaze);
        }
        let longest = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        if self.height() > MAX_SIDE || longest > MAX_SIDE {
            return Err(LevelError::TooLarge {
                height: self.height(),
                width: longest,
            });
        }

        let width = self.width();
        let mut players = Vec::new();
        let (mut stones, mut switches) = (0, 0);
        for (row, line) in self.rows.iter().enumerate() {
            if line.len() != width {
                return Err(LevelError::Ragged {
                    row,
                    len: line.len(),
                    expected: width,
                });
            }
            for (col, &ch) in line.iter().enumerate() {
                match ch {
                    WALL | EMPTY => {}
                    STONE => stones += 1,
                    SWITCH => switches += 1,
                    STONE_ON_SWITCH => {
                        stones += 1;
                        switches += 1;
                    }
                    PLAYER => players.push(Point::new(row as i16, col as i16)),
                    PLAYER_ON_SWITCH => {
                        players.push(Point::new(row as i16, col as i16));
                        switches += 1;
                    }
                    _ => {
                        return Err(LevelError::UnknownCell {
                            ch: char_at(line, col),
                            row,
                            col,
                        })
                    }
                }
            }
        }

        let player = match players.as_slice() {
            [p] => *p,
            other => return Err(LevelError::PlayerCount(other.len())),
        };
        if stones != switches {
            return Err(LevelError::StoneSwitchCount { stones, switches });
        }
        if stones == 0 {
            return Err(LevelError::NoStones);
        }
        if stones != self.weights.len() {
            return Err(LevelError::WeightCount {
                stones,
                weights: self.weights.len(),
            });
        }

        let reach = self.reachable_from(player);
        let height = self.height();
        for (row, line) in self.rows.iter().enumerate() {
            for (col, &ch) in line.iter().enumerate() {
                let seen = reach[row * width + col];
                let border = row == 0 || row == height - 1 || col == 0 || col == width - 1;
                if seen && border {
                    return Err(LevelError::NotEnclosed);
                }
                let pos = Point::new(row as i16, col as i16);
                match ch {
                    STONE | STONE_ON_SWITCH if !seen => {
                        return Err(LevelError::UnreachableStone(pos))
                    }
                    SWITCH if !seen => return Err(LevelError::UnreachableSwitch(pos)),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Flood fill over non-wall cells, ignoring stones. Assumes a
    /// rectangular maze.
    fn reachable_from(&self, start: Point) -> Vec<bool> {
        let (height, width) = (self.height() as i16, self.width() as i16);
        let mut seen = vec![false; self.height() * self.width()];
        let idx = |p: Point| p.row as usize * width as usize + p.col as usize;

        let mut queue = VecDeque::with_capacity(64);
        seen[idx(start)] = true;
        queue.push_back(start);
        while let Some(cur) = queue.pop_front() {
            for dir in Direction::ALL {
                let next = cur.step(dir);
                if next.row < 0 || next.row >= height || next.col < 0 || next.col >= width {
                    continue;
                }
                if self.rows[next.row as usize][next.col as usize] == WALL || seen[idx(next)] {
                    continue;
                }
                seen[idx(next)] = true;
                queue.push_back(next);
            }
        }
        seen
    }

    /// Walls off every cell the player cannot reach and crops surplus wall
    /// rows and columns, leaving a one-cell wall border.
    ///
    /// Expects a level that passed [`Level::validate`]; anything without a
    /// single player is returned unchanged.
    pub fn normalize(&self) -> Level {
        let player = self.rows.iter().enumerate().find_map(|(r, line)| {
            line.iter()
                .position(|&c| c == PLAYER || c == PLAYER_ON_SWITCH)
                .map(|c| Point::new(r as i16, c as i16))
        });
        let Some(player) = player else {
            return self.clone();
        };

        let width = self.width();
        let reach = self.reachable_from(player);
        let walled: Vec<Vec<u8>> = self
            .rows
            .iter()
            .enumerate()
            .map(|(r, line)| {
                line.iter()
                    .enumerate()
                    .map(|(c, &ch)| if reach[r * width + c] { ch } else { WALL })
                    .collect()
            })
            .collect();

        let row_is_wall = |r: usize| walled[r].iter().all(|&c| c == WALL);
        let col_is_wall = |c: usize| walled.iter().all(|line| line[c] == WALL);

        // keep the innermost all-wall line on each side as the border
        let height = walled.len();
        let top = (0..height).take_while(|&r| row_is_wall(r)).last().unwrap_or(0);
        let bottom = (0..height)
            .rev()
            .take_while(|&r| row_is_wall(r))
            .last()
            .unwrap_or(height - 1);
        let left = (0..width).take_while(|&c| col_is_wall(c)).last().unwrap_or(0);
        let right = (0..width)
            .rev()
            .take_while(|&c| col_is_wall(c))
            .last()
            .unwrap_or(width - 1);

        let rows = walled[top..=bottom]
            .iter()
            .map(|line| line[left..=right].to_vec())
            .collect();
        Level {
            weights: self.weights.clone(),
            rows,
        }
    }

    pub fn to_puzzle(&self) -> Result<Puzzle, LevelError> {
        Puzzle::new(&self.weights, &self.rows)
    }
}

/// The character starting at byte `col`, decoding multi-byte UTF-8.
fn char_at(line: &[u8], col: usize) -> char {
    let rest = &line[col..];
    let len = rest.len().min(4);
    (1..=len)
        .find_map(|n| std::str::from_utf8(&rest[..n]).ok())
        .and_then(|s| s.chars().next())
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}
