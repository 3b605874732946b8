//! Grid coordinates.
//!
//! Positions are ordered row-major (smallest `y` first, then smallest `x`),
//! which is the canonical ordering used everywhere a set of cells is turned
//! into a deterministic sequence: neighbour lists, AI tie-breaks, snapshots.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::cmp::Ordering;

/// An (x, y) cell coordinate on the playing board.
///
/// `x` runs left to right, `y` top to bottom. Coordinates are signed so that
/// out-of-range values read from a snapshot can be represented (and then
/// rejected by validation) instead of wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a new position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The 4-adjacent neighbours clipped to a `width` x `height` grid.
    ///
    /// Returned in (y, x) order: up, left, right, down.
    #[must_use]
    pub fn neighbours(self, width: i32, height: i32) -> SmallVec<[Position; 4]> {
        let mut out = SmallVec::new();
        if self.y > 0 {
            out.push(Position::new(self.x, self.y - 1));
        }
        if self.x > 0 {
            out.push(Position::new(self.x - 1, self.y));
        }
        if self.x < width - 1 {
            out.push(Position::new(self.x + 1, self.y));
        }
        if self.y < height - 1 {
            out.push(Position::new(self.x, self.y + 1));
        }
        out
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}
