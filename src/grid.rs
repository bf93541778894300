//! Static puzzle layout: walls, floor and switches.
//!
//! Occupancy (player and stones) is not stored here; it lives in
//! [`State`](crate::state::State) so one `Grid` can be shared read-only by
//! every search running on the same puzzle.

use smallvec::SmallVec;
use std::fmt;

pub const WALL: u8 = b'#';
pub const EMPTY: u8 = b' ';
pub const PLAYER: u8 = b'@';
pub const STONE: u8 = b'$';
pub const SWITCH: u8 = b'.';
pub const STONE_ON_SWITCH: u8 = b'*';
pub const PLAYER_ON_SWITCH: u8 = b'+';

const MAP_FLOOR: u8 = 0;
const MAP_WALL: u8 = 1;
const MAP_SWITCH: u8 = 2;

/// Compact cell coordinate.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Point {
    pub row: i16,
    pub col: i16,
}

impl Point {
    #[inline(always)]
    pub const fn new(row: i16, col: i16) -> Self {
        Point { row, col }
    }

    #[inline(always)]
    pub fn step(self, dir: Direction) -> Self {
        let (drow, dcol) = dir.offset();
        Point::new(self.row + drow, self.col + dcol)
    }

    #[inline(always)]
    pub fn manhattan(self, other: Point) -> u32 {
        (self.row - other.row).unsigned_abs() as u32 + (self.col - other.col).unsigned_abs() as u32
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One of the four cardinal moves, in the order successors are generated.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

const DIR_OFFSETS: [(i16, i16); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];
const DIR_CHARS: [char; 4] = ['u', 'd', 'l', 'r'];

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    #[inline(always)]
    pub fn offset(self) -> (i16, i16) {
        DIR_OFFSETS[self as usize]
    }

    /// Lower-case token for this direction.
    #[inline(always)]
    pub fn to_char(self) -> char {
        DIR_CHARS[self as usize]
    }

    /// Parses either case of `u`, `d`, `l`, `r`.
    pub fn from_char(ch: char) -> Option<Self> {
        match ch.to_ascii_lowercase() {
            'u' => Some(Direction::Up),
            'd' => Some(Direction::Down),
            'l' => Some(Direction::Left),
            'r' => Some(Direction::Right),
            _ => None,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

/// Static classification of a cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CellKind {
    Wall,
    Floor,
    Switch,
}

/// Immutable wall/floor/switch layout of one puzzle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: i16,
    height: i16,
    map: Vec<u8>,
    switches: SmallVec<[Point; 20]>,
}

/// Movable pieces found while scanning a layout, in row-major order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Occupancy {
    pub player: Option<Point>,
    pub stones: SmallVec<[Point; 20]>,
}

impl Grid {
    /// Builds the static layout from the seven-symbol cell codes and returns
    /// the player and stone positions found along the way.
    ///
    /// Short rows are padded with floor; unknown bytes are treated as floor.
    /// Rejecting malformed input is the job of [`Level::validate`](crate::level::Level::validate).
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> (Grid, Occupancy) {
        let longest = rows.iter().map(|r| r.as_ref().len()).max().unwrap_or(0);
        debug_assert!(
            rows.len() <= i16::MAX as usize && longest <= i16::MAX as usize,
            "maze sides are limited to i16::MAX cells"
        );
        let height = rows.len() as i16;
        let width = longest as i16;

        let size = width as usize * height as usize;
        let mut map = vec![MAP_FLOOR; size];
        let mut switches = SmallVec::new();
        let mut occupancy = Occupancy::default();

        for (row, line) in rows.iter().enumerate() {
            for (col, &ch) in line.as_ref().iter().enumerate() {
                let idx = row * width as usize + col;
                let pos = Point::new(row as i16, col as i16);
                map[idx] = match ch {
                    WALL => MAP_WALL,
                    SWITCH | PLAYER_ON_SWITCH | STONE_ON_SWITCH => {
                        switches.push(pos);
                        MAP_SWITCH
                    }
                    _ => MAP_FLOOR,
                };
                match ch {
                    PLAYER | PLAYER_ON_SWITCH => occupancy.player = Some(pos),
                    STONE | STONE_ON_SWITCH => occupancy.stones.push(pos),
                    _ => {}
                }
            }
        }

        let grid = Grid {
            width,
            height,
            map,
            switches,
        };
        (grid, occupancy)
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width as usize
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height as usize
    }

    #[inline(always)]
    pub fn switches(&self) -> &[Point] {
        &self.switches
    }

    #[inline(always)]
    pub fn in_bounds(&self, pos: Point) -> bool {
        pos.row >= 0 && pos.row < self.height && pos.col >= 0 && pos.col < self.width
    }

    #[inline(always)]
    fn to_idx(&self, pos: Point) -> usize {
        debug_assert!(self.in_bounds(pos), "{pos} is outside the grid");
        pos.row as usize * self.width as usize + pos.col as usize
    }

    /// Static kind of `pos`.
    ///
    /// Positions outside the grid read as walls; a validated level is
    /// wall-bordered so searches never get there.
    #[inline(always)]
    pub fn cell_kind(&self, pos: Point) -> CellKind {
        if !self.in_bounds(pos) {
            return CellKind::Wall;
        }
        match self.map[self.to_idx(pos)] {
            MAP_WALL => CellKind::Wall,
            MAP_SWITCH => CellKind::Switch,
            _ => CellKind::Floor,
        }
    }

    #[inline(always)]
    pub fn is_wall(&self, pos: Point) -> bool {
        self.cell_kind(pos) == CellKind::Wall
    }

    #[inline(always)]
    pub fn is_switch(&self, pos: Point) -> bool {
        self.cell_kind(pos) == CellKind::Switch
    }
}
