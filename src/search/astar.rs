use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::BinaryHeap;

use super::node::{NodeId, Queued};
use super::{Search, SearchContext};
use crate::heuristic::estimate;
use crate::movement::{successors, Move};
use crate::state::State;

/// Best-first search on `f = g + h`.
///
/// `h` can overestimate, so the first goal popped is accepted without any
/// optimality guarantee. Deadlocked states keep a huge finite `h` and sink to
/// the bottom of the frontier rather than being dropped.
pub(super) fn run(ctx: &mut SearchContext<'_>, start: &State) -> Search {
    let grid = ctx.grid;

    // open entries: best f seen for the state and the node that holds it
    let mut open: FxHashMap<State, (u64, NodeId)> =
        FxHashMap::with_capacity_and_hasher(1 << 12, Default::default());
    let mut closed: FxHashSet<State> =
        FxHashSet::with_capacity_and_hasher(1 << 12, Default::default());
    let mut frontier = BinaryHeap::with_capacity(1 << 10);

    let root = ctx.arena.root(start.clone());
    let h = estimate(grid, start);
    open.insert(start.clone(), (h, root));
    frontier.push(Queued {
        priority: h,
        seq: ctx.next_seq(),
        id: root,
    });

    while let Some(entry) = frontier.pop() {
        let state = ctx.arena[entry.id].state.clone();
        // skip entries replaced by a better f; a closed state is never in `open`
        match open.get(&state) {
            Some(&(_, live)) if live == entry.id => {}
            _ => continue,
        }
        open.remove(&state);

        if ctx.note_expansion() {
            return Search::Cancelled;
        }
        if state.is_goal(grid) {
            return Search::Found(entry.id);
        }

        let g = ctx.arena[entry.id].g;
        let next = successors(grid, &state);
        closed.insert(state);

        for (dir, t) in next {
            if closed.contains(&t.state) {
                continue;
            }
            let f = g + t.cost + estimate(grid, &t.state);
            if open.get(&t.state).is_some_and(|&(best_f, _)| f >= best_f) {
                continue;
            }
            let key = t.state.clone();
            let step = Move { dir, kind: t.kind };
            let id = ctx.arena.child(entry.id, step, t);
            open.insert(key, (f, id));
            let seq = ctx.next_seq();
            frontier.push(Queued {
                priority: f,
                seq,
                id,
            });
        }
    }

    Search::Exhausted
}

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::movement::replay;

    #[test]
    fn solves_two_stone_level() {
        let p = Puzzle::new(
            &[4, 9],
            &[
                "#########",
                "#       #",
                "# $  .  #",
                "#  @    #",
                "#   $ . #",
                "#       #",
                "#########",
            ],
        )
        .unwrap();
        let solution = solve(&p, Algorithm::AStar, &SearchParams::default(), None)
            .into_solution()
            .unwrap();
        let end = replay(p.grid(), p.start(), &solution.move_string()).unwrap();
        assert!(end.state.is_goal(p.grid()));
        assert_eq!(end.push_weight(), solution.report.total_push_weight);
        assert!(solution.report.nodes_expanded > 0);
    }

    #[test]
    fn unsolvable_is_exhausted() {
        let p = Puzzle::new(&[5], &["######", "#$ @.#", "######"]).unwrap();
        assert_eq!(
            solve(&p, Algorithm::AStar, &SearchParams::default(), None),
            Outcome::Exhausted
        );
    }
}
