use anyhow::{Result, ensure};

use super::direction::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in a direction
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

impl From<(i32, i32)> for Position {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Fixed playfield, origin at the top-left cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }
}

/// Which rule a collision broke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collision {
    /// Head ran into one of its own segments
    SelfCollision,
    /// Head left the grid
    Wall,
}

/// The snake: ordered body segments, head at index 0.
///
/// There is always at least one segment. A snake has no notion of being dead;
/// whoever owns it checks [`Snake::check_collision`] after each advance and
/// replaces it with a fresh one.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    segments: Vec<Position>,
    heading: Direction,
    grid: Grid,
}

impl Snake {
    /// A single segment at the grid center, heading right
    pub fn new(grid: Grid) -> Self {
        Self {
            segments: vec![grid.center()],
            heading: Direction::Right,
            grid,
        }
    }

    /// Build a snake from explicit segments, head first
    pub fn from_segments(
        grid: Grid,
        segments: impl IntoIterator<Item = Position>,
        heading: Direction,
    ) -> Result<Self> {
        let segments: Vec<Position> = segments.into_iter().collect();
        ensure!(!segments.is_empty(), "a snake needs at least one segment");
        Ok(Self {
            segments,
            heading,
            grid,
        })
    }

    /// Shift every segment into the place of the one in front of it, then
    /// step the head along the current heading.
    pub fn advance(&mut self) {
        let len = self.segments.len();
        self.segments.copy_within(..len - 1, 1);
        self.segments[0] = self.segments[0].moved_in_direction(self.heading);
    }

    /// Append a segment on top of the tail; it separates on the next advance.
    pub fn grow(&mut self) {
        let tail = self.tail();
        self.segments.push(tail);
    }

    pub fn check_collision(&self) -> bool {
        self.collision().is_some()
    }

    /// Self-collision is checked over segments 1..N before the boundary.
    pub fn collision(&self) -> Option<Collision> {
        let head = self.head();
        if self.segments[1..].contains(&head) {
            return Some(Collision::SelfCollision);
        }
        if !self.grid.contains(head) {
            return Some(Collision::Wall);
        }
        None
    }

    /// Apply a new heading unless it reverses the current one.
    ///
    /// Returns whether the request was accepted. Several calls between
    /// advances are allowed; the last accepted one wins.
    pub fn set_heading(&mut self, requested: Direction) -> bool {
        if self.heading.is_opposite(requested) {
            return false;
        }
        self.heading = requested;
        true
    }

    pub fn segments(&self) -> &[Position] {
        &self.segments
    }

    pub fn head(&self) -> Position {
        self.segments[0]
    }

    pub fn tail(&self) -> Position {
        self.segments[self.segments.len() - 1]
    }

    pub fn heading(&self) -> Direction {
        self.heading
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the snake is empty (should never happen in practice)
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
