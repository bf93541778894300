use rustc_hash::FxHashMap;
use std::collections::BinaryHeap;

use super::node::Queued;
use super::{Search, SearchContext};
use crate::movement::{successors, Move};
use crate::state::State;

/// Cost-ordered search. With non-negative move costs the first goal popped
/// is a cheapest one.
pub(super) fn run(ctx: &mut SearchContext<'_>, start: &State) -> Search {
    let grid = ctx.grid;

    let mut best: FxHashMap<State, u64> =
        FxHashMap::with_capacity_and_hasher(1 << 12, Default::default());
    best.insert(start.clone(), 0);

    let mut frontier = BinaryHeap::with_capacity(1 << 10);
    frontier.push(Queued {
        priority: 0,
        seq: ctx.next_seq(),
        id: ctx.arena.root(start.clone()),
    });

    while let Some(entry) = frontier.pop() {
        let node = &ctx.arena[entry.id];
        let g = node.g;
        // superseded by a cheaper route found after this entry was queued
        if best.get(&node.state).is_some_and(|&b| g > b) {
            continue;
        }
        if ctx.note_expansion() {
            return Search::Cancelled;
        }
        if ctx.arena[entry.id].state.is_goal(grid) {
            return Search::Found(entry.id);
        }

        for (dir, t) in successors(grid, &ctx.arena[entry.id].state) {
            let next_g = g + t.cost;
            if best.get(&t.state).is_some_and(|&b| next_g >= b) {
                continue;
            }
            best.insert(t.state.clone(), next_g);
            let step = Move { dir, kind: t.kind };
            let id = ctx.arena.child(entry.id, step, t);
            let seq = ctx.next_seq();
            frontier.push(Queued {
                priority: next_g,
                seq,
                id,
            });
        }
    }

    Search::Exhausted
}
