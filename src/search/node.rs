use std::cmp::Ordering;
use std::ops::Index;

use crate::movement::{Move, Transition};
use crate::state::State;

/// Index of a node in its run's [`NodeArena`].
pub(crate) type NodeId = u32;

#[derive(Debug)]
pub(crate) struct Node {
    pub state: State,
    pub parent: Option<NodeId>,
    /// Edge taken from `parent`; `None` only at the root.
    pub step: Option<Move>,
    /// Accumulated cost from the root.
    pub g: u64,
    pub depth: u32,
}

/// Owns every node discovered during one search. Parents are arena indices,
/// so back-references never keep anything alive on their own.
#[derive(Debug, Default)]
pub(crate) struct NodeArena {
    nodes: Vec<Node>,
}

impl NodeArena {
    pub fn root(&mut self, state: State) -> NodeId {
        self.push(Node {
            state,
            parent: None,
            step: None,
            g: 0,
            depth: 0,
        })
    }

    pub fn child(&mut self, parent: NodeId, step: Move, transition: Transition) -> NodeId {
        let (g, depth) = {
            let p = &self[parent];
            (p.g + transition.cost, p.depth + 1)
        };
        self.push(Node {
            state: transition.state,
            parent: Some(parent),
            step: Some(step),
            g,
            depth,
        })
    }

    #[inline]
    fn push(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Moves from the root to `id`, in play order.
    pub fn path_to(&self, id: NodeId) -> Vec<Move> {
        let mut moves = Vec::with_capacity(self[id].depth as usize);
        let mut cursor = id;
        while let (Some(step), Some(parent)) = (self[cursor].step, self[cursor].parent) {
            moves.push(step);
            cursor = parent;
        }
        moves.reverse();
        moves
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    #[inline(always)]
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }
}

/// Priority frontier entry: lowest `priority` first, then insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Queued {
    pub priority: u64,
    pub seq: u64,
    pub id: NodeId,
}

impl Ord for Queued {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Queued {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Direction, Point};
    use crate::movement::MoveKind;
    use std::collections::BinaryHeap;

    fn walk(dir: Direction, to: Point) -> (Move, Transition) {
        (
            Move {
                dir,
                kind: MoveKind::Walk,
            },
            Transition {
                state: State::new(to, []),
                kind: MoveKind::Walk,
                cost: 1,
            },
        )
    }

    #[test]
    fn path_is_reported_root_first() {
        let mut arena = NodeArena::default();
        let root = arena.root(State::new(Point::new(1, 1), []));
        let (m1, t1) = walk(Direction::Right, Point::new(1, 2));
        let a = arena.child(root, m1, t1);
        let (m2, t2) = walk(Direction::Down, Point::new(2, 2));
        let b = arena.child(a, m2, t2);

        assert_eq!(arena.path_to(b), vec![m1, m2]);
        assert_eq!(arena[b].g, 2);
        assert_eq!(arena[b].depth, 2);
        assert!(arena.path_to(root).is_empty());
        assert_eq!(arena.len(), 3);
    }

    #[test]
    fn heap_pops_cheapest_then_oldest() {
        let mut heap = BinaryHeap::new();
        heap.push(Queued { priority: 5, seq: 0, id: 0 });
        heap.push(Queued { priority: 3, seq: 1, id: 1 });
        heap.push(Queued { priority: 3, seq: 2, id: 2 });
        heap.push(Queued { priority: 9, seq: 3, id: 3 });

        let order: Vec<_> = std::iter::from_fn(|| heap.pop()).map(|q| q.id).collect();
        assert_eq!(order, vec![1, 2, 0, 3]);
    }
}
