//! Grid geometry: tile positions, cardinal directions and integer rectangles

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A tile coordinate on the dungeon grid
///
/// Ordered by x, then y, so tile sets iterate column by column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    /// The 4 cardinal neighbor offsets
    pub const CARDINAL: [(i32, i32); 4] = [(0, 1), (0, -1), (-1, 0), (1, 0)];

    /// The 8 neighbor offsets (cardinal first, then diagonal)
    pub const NEIGHBORS_8: [(i32, i32); 8] = [
        (0, 1),
        (0, -1),
        (-1, 0),
        (1, 0),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Position shifted by (dx, dy)
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Position one tile along `dir`
    pub fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.delta();
        self.offset(dx, dy)
    }

    /// Squared Euclidean distance (same ordering as the real distance, no rounding)
    pub fn distance_sq(self, other: TilePos) -> i64 {
        let dx = i64::from(self.x - other.x);
        let dy = i64::from(self.y - other.y);
        dx * dx + dy * dy
    }

    /// Iterator over the 4 cardinal neighbors
    pub fn cardinal_neighbors(self) -> impl Iterator<Item = TilePos> {
        Self::CARDINAL.into_iter().map(move |(dx, dy)| self.offset(dx, dy))
    }

    /// Iterator over all 8 neighbors
    pub fn neighbors_8(self) -> impl Iterator<Item = TilePos> {
        Self::NEIGHBORS_8.into_iter().map(move |(dx, dy)| self.offset(dx, dy))
    }
}

impl std::fmt::Display for TilePos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cardinal corridor direction. `Up` increases y.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub const fn is_vertical(self) -> bool {
        matches!(self, Direction::Up | Direction::Down)
    }

    /// The two directions perpendicular to this one
    pub const fn perpendicular(self) -> [Direction; 2] {
        if self.is_vertical() {
            [Direction::Left, Direction::Right]
        } else {
            [Direction::Up, Direction::Down]
        }
    }

    /// Axis-aligned direction from `from` toward `to`
    ///
    /// Horizontal difference wins; equal positions give `Down`.
    pub fn toward(from: TilePos, to: TilePos) -> Direction {
        if from.x < to.x {
            Direction::Right
        } else if from.x > to.x {
            Direction::Left
        } else if from.y < to.y {
            Direction::Up
        } else {
            Direction::Down
        }
    }
}

/// An axis-aligned integer rectangle, half-open: covers `x..x+width`, `y..y+height`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub const fn x_max(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive top edge
    pub const fn y_max(&self) -> i32 {
        self.y + self.height
    }

    /// Number of tiles covered (0 for empty rectangles)
    pub fn area(&self) -> i64 {
        if self.is_empty() {
            0
        } else {
            i64::from(self.width) * i64::from(self.height)
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Center tile, rounding toward the origin corner
    pub const fn center(&self) -> TilePos {
        TilePos::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Check if a tile is inside this rectangle
    pub const fn contains(&self, pos: TilePos) -> bool {
        pos.x >= self.x && pos.x < self.x_max() && pos.y >= self.y && pos.y < self.y_max()
    }

    /// Check if this rectangle fully contains another
    pub const fn contains_rect(&self, other: &Rect) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.x_max() >= other.x_max()
            && self.y_max() >= other.y_max()
    }

    /// Check if two rectangles share at least one tile
    pub const fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.x_max()
            && other.x < self.x_max()
            && self.y < other.y_max()
            && other.y < self.y_max()
    }

    /// Shrink by `offset` tiles on every side
    ///
    /// The result may be empty; callers check `is_empty`.
    pub const fn shrink(&self, offset: i32) -> Rect {
        Rect::new(
            self.x + offset,
            self.y + offset,
            self.width - offset * 2,
            self.height - offset * 2,
        )
    }

    /// Iterator over every tile inside the rectangle
    pub fn tiles(&self) -> impl Iterator<Item = TilePos> {
        let r = *self;
        (r.x..r.x_max()).flat_map(move |x| (r.y..r.y_max()).map(move |y| TilePos::new(x, y)))
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {} {}x{}]", self.x, self.y, self.width, self.height)
    }
}
