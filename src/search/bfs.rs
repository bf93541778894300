use rustc_hash::FxHashSet;
use std::collections::VecDeque;

use super::{Search, SearchContext};
use crate::movement::{successors, Move};
use crate::state::State;

/// First-in-first-out search: the goal it returns has the fewest moves,
/// whatever the stones weigh.
pub(super) fn run(ctx: &mut SearchContext<'_>, start: &State) -> Search {
    let grid = ctx.grid;

    let mut seen: FxHashSet<State> =
        FxHashSet::with_capacity_and_hasher(1 << 12, Default::default());
    seen.insert(start.clone());
    let mut queue = VecDeque::from([ctx.arena.root(start.clone())]);

    while let Some(id) = queue.pop_front() {
        if ctx.note_expansion() {
            return Search::Cancelled;
        }
        if ctx.arena[id].state.is_goal(grid) {
            return Search::Found(id);
        }

        for (dir, t) in successors(grid, &ctx.arena[id].state) {
            if !seen.insert(t.state.clone()) {
                continue;
            }
            let step = Move { dir, kind: t.kind };
            queue.push_back(ctx.arena.child(id, step, t));
        }
    }

    Search::Exhausted
}

#[cfg(test)]
mod tests {
    use super::super::*;

    #[test]
    fn single_push_to_the_switch() {
        let p = Puzzle::new(
            &[90],
            &["#######", "#     #", "#@$.  #", "#     #", "#######"],
        )
        .unwrap();
        let solution = solve(&p, Algorithm::Bfs, &SearchParams::default(), None)
            .into_solution()
            .unwrap();
        assert_eq!(solution.move_string(), "R");
        assert_eq!(solution.report.total_push_weight, 90);
    }

    #[test]
    fn unsolvable_is_exhausted() {
        let p = Puzzle::new(&[5], &["######", "#$ @.#", "######"]).unwrap();
        assert_eq!(
            solve(&p, Algorithm::Bfs, &SearchParams::default(), None),
            Outcome::Exhausted
        );
    }
}
