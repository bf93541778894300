use smallvec::SmallVec;

use crate::grid::{Grid, Point};

/// A movable stone and the weight it carries for the whole search.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Stone {
    pub pos: Point,
    pub weight: u32,
}

impl Stone {
    pub const fn new(pos: Point, weight: u32) -> Self {
        Stone { pos, weight }
    }
}

pub type StoneVec = SmallVec<[Stone; 20]>;

/// Player position plus stone layout.
///
/// Stones are kept sorted by `(pos, weight)`, so the derived equality and
/// hash are canonical: two states built from the same stones in any order
/// compare equal.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct State {
    player: Point,
    stones: StoneVec,
}

impl State {
    pub fn new<I>(player: Point, stones: I) -> Self
    where
        I: IntoIterator<Item = Stone>,
    {
        let mut stones: StoneVec = stones.into_iter().collect();
        stones.sort_unstable();
        State { player, stones }
    }

    #[inline(always)]
    pub fn player(&self) -> Point {
        self.player
    }

    #[inline(always)]
    pub fn stones(&self) -> &[Stone] {
        &self.stones
    }

    #[inline]
    pub fn stone_index(&self, pos: Point) -> Option<usize> {
        // positions are unique and the primary sort key
        self.stones.binary_search_by(|s| s.pos.cmp(&pos)).ok()
    }

    #[inline]
    pub fn stone_at(&self, pos: Point) -> Option<&Stone> {
        self.stone_index(pos).map(|i| &self.stones[i])
    }

    #[inline]
    pub fn has_stone(&self, pos: Point) -> bool {
        self.stone_index(pos).is_some()
    }

    /// Every stone sits on a switch.
    pub fn is_goal(&self, grid: &Grid) -> bool {
        self.stones.iter().all(|s| grid.is_switch(s.pos))
    }

    pub(crate) fn with_player(&self, player: Point) -> Self {
        State {
            player,
            stones: self.stones.clone(),
        }
    }

    /// Moves the stone at `index` to `to` and the player to `player`,
    /// restoring the sort order.
    pub(crate) fn with_push(&self, index: usize, to: Point, player: Point) -> Self {
        let mut stones = self.stones.clone();
        stones[index].pos = to;
        // only one element moved, so a single bubble pass restores order
        let mut i = index;
        while i > 0 && stones[i] < stones[i - 1] {
            stones.swap(i, i - 1);
            i -= 1;
        }
        while i + 1 < stones.len() && stones[i] > stones[i + 1] {
            stones.swap(i, i + 1);
            i += 1;
        }
        State { player, stones }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    fn stones() -> Vec<Stone> {
        vec![
            Stone::new(Point::new(3, 1), 7),
            Stone::new(Point::new(1, 4), 2),
            Stone::new(Point::new(2, 2), 50),
        ]
    }

    #[test]
    fn stone_order_does_not_affect_equality_or_hash() {
        let a = State::new(Point::new(1, 1), stones());
        let mut reversed = stones();
        reversed.reverse();
        let b = State::new(Point::new(1, 1), reversed);
        assert_eq!(a, b);

        let mut set = FxHashSet::default();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn weight_is_part_of_identity() {
        let a = State::new(Point::new(1, 1), [Stone::new(Point::new(2, 2), 3)]);
        let b = State::new(Point::new(1, 1), [Stone::new(Point::new(2, 2), 4)]);
        assert_ne!(a, b);
    }

    #[test]
    fn finds_stones_by_position() {
        let s = State::new(Point::new(1, 1), stones());
        assert_eq!(s.stone_at(Point::new(2, 2)).map(|s| s.weight), Some(50));
        assert_eq!(s.stone_at(Point::new(3, 1)).map(|s| s.weight), Some(7));
        assert!(!s.has_stone(Point::new(1, 1)));
        assert!(!s.has_stone(Point::new(9, 9)));
    }

    #[test]
    fn push_keeps_weight_with_its_stone_and_stays_sorted() {
        let s = State::new(Point::new(1, 1), stones());
        let idx = s.stone_index(Point::new(1, 4)).unwrap();
        let next = s.with_push(idx, Point::new(4, 4), Point::new(1, 3));

        assert_eq!(next.player(), Point::new(1, 3));
        assert_eq!(next.stone_at(Point::new(4, 4)).map(|s| s.weight), Some(2));
        assert!(next.stones().windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(
            next,
            State::new(
                Point::new(1, 3),
                [
                    Stone::new(Point::new(2, 2), 50),
                    Stone::new(Point::new(4, 4), 2),
                    Stone::new(Point::new(3, 1), 7),
                ]
            )
        );
    }
}
