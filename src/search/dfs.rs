use log::trace;
use rustc_hash::FxHashSet;

use super::{Search, SearchContext};
use crate::movement::{successors, Move};
use crate::state::State;

/// Last-in-first-out search with a visited set.
///
/// A goal is accepted as soon as it is generated, so the result is whatever
/// the stack order stumbles on first. Nodes deeper than `depth_limit` are
/// not expanded; if that ever prunes a branch and the stack empties, the search
/// reports [`Search::DepthLimited`] instead of [`Search::Exhausted`].
pub(super) fn run(ctx: &mut SearchContext<'_>, start: &State) -> Search {
    let grid = ctx.grid;
    let depth_limit = ctx.params.depth_limit;

    let mut visited: FxHashSet<State> =
        FxHashSet::with_capacity_and_hasher(1 << 12, Default::default());
    let mut stack = vec![ctx.arena.root(start.clone())];
    let mut cut = false;

    while let Some(id) = stack.pop() {
        // a state cut here stays unvisited so a shallower route can expand it
        if ctx.arena[id].depth > depth_limit {
            if !cut {
                trace!("depth limit {depth_limit} reached, pruning");
            }
            cut = true;
            continue;
        }
        if !visited.insert(ctx.arena[id].state.clone()) {
            continue;
        }
        if ctx.note_expansion() {
            return Search::Cancelled;
        }

        let next = successors(grid, &ctx.arena[id].state);

        if let Some((dir, t)) = next.iter().find(|(_, t)| t.state.is_goal(grid)) {
            let step = Move {
                dir: *dir,
                kind: t.kind,
            };
            return Search::Found(ctx.arena.child(id, step, t.clone()));
        }

        for (dir, t) in next {
            if visited.contains(&t.state) {
                continue;
            }
            let step = Move { dir, kind: t.kind };
            stack.push(ctx.arena.child(id, step, t));
        }
    }

    if cut {
        Search::DepthLimited
    } else {
        Search::Exhausted
    }
}
