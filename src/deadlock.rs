//! Cheap static deadlock patterns.
//!
//! Only two patterns are recognised: a stone wedged into a wall corner, and
//! two side-by-side stones flush against the same wall. Neither counts when
//! the stone involved already sits on a switch.

use crate::grid::{Direction, Grid, Point};
use crate::state::State;

/// Whether the stone at `pos` can never reach a switch in `state`.
pub fn is_deadlocked(grid: &Grid, state: &State, pos: Point) -> bool {
    if grid.is_switch(pos) {
        return false;
    }
    is_corner(grid, pos) || is_wall_pair(grid, state, pos)
}

/// Any stone of `state` is deadlocked.
pub fn any_deadlocked(grid: &Grid, state: &State) -> bool {
    state
        .stones()
        .iter()
        .any(|s| is_deadlocked(grid, state, s.pos))
}

#[inline]
fn is_corner(grid: &Grid, pos: Point) -> bool {
    let v_wall = grid.is_wall(pos.step(Direction::Up)) || grid.is_wall(pos.step(Direction::Down));
    let h_wall =
        grid.is_wall(pos.step(Direction::Left)) || grid.is_wall(pos.step(Direction::Right));
    v_wall && h_wall
}

fn is_wall_pair(grid: &Grid, state: &State, pos: Point) -> bool {
    const AXES: [(Direction, [Direction; 2]); 2] = [
        // horizontal neighbour, walls above or below
        (Direction::Right, [Direction::Up, Direction::Down]),
        // vertical neighbour, walls left or right
        (Direction::Down, [Direction::Left, Direction::Right]),
    ];

    for (along, sides) in AXES {
        for other in [pos.step(along), pos.step(along.opposite())] {
            if !state.has_stone(other) || grid.is_switch(other) {
                continue;
            }
            let shared_wall = sides
                .iter()
                .any(|&side| grid.is_wall(pos.step(side)) && grid.is_wall(other.step(side)));
            if shared_wall {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Stone;

    fn setup(rows: &[&str]) -> (Grid, State) {
        let (grid, occ) = Grid::from_rows(rows);
        let stones = occ.stones.iter().map(|&pos| Stone::new(pos, 1));
        (grid, State::new(occ.player.unwrap(), stones))
    }

    #[test]
    fn corner_is_dead() {
        let (grid, state) = setup(&["#####", "#$  #", "#  @#", "#####"]);
        assert!(is_deadlocked(&grid, &state, Point::new(1, 1)));
        assert!(any_deadlocked(&grid, &state));
    }

    #[test]
    fn corner_on_switch_is_fine() {
        let (grid, state) = setup(&["#####", "#*  #", "#  @#", "#####"]);
        assert!(!is_deadlocked(&grid, &state, Point::new(1, 1)));
    }

    #[test]
    fn open_floor_is_fine() {
        let (grid, state) = setup(&["#####", "#   #", "# $ #", "#  @#", "#####"]);
        assert!(!any_deadlocked(&grid, &state));
    }

    #[test]
    fn single_stone_along_wall_is_not_a_pair() {
        let (grid, state) = setup(&["######", "#  $ #", "#    #", "# @  #", "######"]);
        assert!(!any_deadlocked(&grid, &state));
    }

    #[test]
    fn horizontal_pair_against_wall_is_dead() {
        let (grid, state) = setup(&["#######", "#  $$ #", "#     #", "#  @  #", "#######"]);
        assert!(is_deadlocked(&grid, &state, Point::new(1, 3)));
        assert!(is_deadlocked(&grid, &state, Point::new(1, 4)));
    }

    #[test]
    fn vertical_pair_against_wall_is_dead() {
        let (grid, state) = setup(&["#####", "#   #", "#$  #", "#$ @#", "#   #", "#####"]);
        assert!(is_deadlocked(&grid, &state, Point::new(2, 1)));
        assert!(is_deadlocked(&grid, &state, Point::new(3, 1)));
    }

    #[test]
    fn pair_with_partner_on_switch_is_fine() {
        let (grid, state) = setup(&["#######", "#  $* #", "#     #", "#  @ .#", "#######"]);
        assert!(!is_deadlocked(&grid, &state, Point::new(1, 3)));
    }
}
