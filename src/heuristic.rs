//! Remaining-cost estimate for best-first search.
//!
//! The estimate is weighted Manhattan distance and ignores walls and push
//! direction, so it can overestimate. Best-first search driven by it is a
//! greedy solver: the first goal it reaches is not guaranteed cheapest.

use smallvec::SmallVec;

use crate::deadlock;
use crate::grid::{Grid, Point};
use crate::state::State;

/// Estimate for a state with a deadlocked stone.
///
/// Finite so frontier ordering stays total; far above any cost reachable
/// on a playable grid (weights are at most 100).
pub const DEADLOCK_PENALTY: u64 = 10_000_000;

/// `min(player → stone) + Σ weight × (stone → nearest free switch)`.
pub fn estimate(grid: &Grid, state: &State) -> u64 {
    if state.is_goal(grid) {
        return 0;
    }
    if deadlock::any_deadlocked(grid, state) {
        return DEADLOCK_PENALTY;
    }

    let player = state.player();
    let player_to_stone = state
        .stones()
        .iter()
        .map(|s| player.manhattan(s.pos))
        .min()
        .unwrap_or(0);

    let free_switches: SmallVec<[Point; 20]> = grid
        .switches()
        .iter()
        .copied()
        .filter(|&sw| !state.has_stone(sw))
        .collect();

    let weighted: u64 = state
        .stones()
        .iter()
        .filter(|s| !grid.is_switch(s.pos))
        .map(|s| {
            let dist = free_switches
                .iter()
                .map(|&sw| s.pos.manhattan(sw))
                .min()
                .unwrap_or(0);
            u64::from(s.weight) * u64::from(dist)
        })
        .sum();

    u64::from(player_to_stone) + weighted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Stone;

    fn setup(rows: &[&str], weights: &[u32]) -> (Grid, State) {
        let (grid, occ) = Grid::from_rows(rows);
        let stones = occ
            .stones
            .iter()
            .zip(weights)
            .map(|(&pos, &w)| Stone::new(pos, w));
        (grid, State::new(occ.player.unwrap(), stones))
    }

    #[test]
    fn goal_is_zero() {
        let (grid, state) = setup(&["#####", "#@* #", "#####"], &[30]);
        assert_eq!(estimate(&grid, &state), 0);
    }

    #[test]
    fn weighted_distance_plus_player_term() {
        // player 2 from the stone, stone 2 from the switch, weight 10
        let (grid, state) = setup(&["#######", "#     #", "#@ $ .#", "#     #", "#######"], &[10]);
        assert_eq!(estimate(&grid, &state), 2 + 10 * 2);
    }

    #[test]
    fn satisfied_switch_is_not_a_target() {
        // the nearer switch is taken, so the free stone aims at the far one
        let (grid, state) = setup(
            &["########", "#      #", "# *$  .#", "#   @  #", "########"],
            &[5, 3],
        );
        assert_eq!(estimate(&grid, &state), 2 + 3 * 3);
    }

    #[test]
    fn deadlock_uses_sentinel() {
        let (grid, state) = setup(&["#####", "#$  #", "#  .#", "# @ #", "#####"], &[1]);
        assert_eq!(estimate(&grid, &state), DEADLOCK_PENALTY);
    }
}
