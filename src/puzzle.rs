use crate::grid::Grid;
use crate::level::LevelError;
use crate::state::{Stone, State};

/// A static grid together with the starting occupancy.
///
/// `Puzzle` is `Sync`; several searches may share one by reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Puzzle {
    grid: Grid,
    start: State,
}

impl Puzzle {
    /// Builds a puzzle from stone weights and cell-code rows. Weight `i`
    /// belongs to the `i`-th stone in row-major order.
    ///
    /// Only the checks the engine cannot run without are done here; see
    /// [`Level::validate`](crate::level::Level::validate) for the rest.
    pub fn new<R: AsRef<[u8]>>(weights: &[u32], rows: &[R]) -> Result<Self, LevelError> {
        let (grid, occupancy) = Grid::from_rows(rows);
        let player = occupancy.player.ok_or(LevelError::PlayerCount(0))?;
        if occupancy.stones.len() != weights.len() {
            return Err(LevelError::WeightCount {
                stones: occupancy.stones.len(),
                weights: weights.len(),
            });
        }
        let stones = occupancy
            .stones
            .iter()
            .zip(weights)
            .map(|(&pos, &weight)| Stone::new(pos, weight));
        Ok(Puzzle {
            start: State::new(player, stones),
            grid,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn start(&self) -> &State {
        &self.start
    }
}
