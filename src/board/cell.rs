//! Board cells: what a grid position currently is.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Die;

/// Colour of a jewel field group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JewelColor {
    Red,
    Yellow,
    Blue,
}

/// Colour of a puzzle field group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PuzzleColor {
    Green,
    Blue,
}

/// Colour pairing a key with its keyholes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyColor {
    Yellow,
    Blue,
}

/// The kind of a single cell.
///
/// `Keyhole { unlocked: false }` is the padlocked state; unlocking happens
/// per player at round resolution when that player placed on the matching
/// key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    Normal,
    NotReachable,
    Bomb,
    Crossed,
    Exploded,
    Flag,
    Jewel(JewelColor),
    Puzzle(PuzzleColor),
    Key(KeyColor),
    Keyhole { color: KeyColor, unlocked: bool },
    Planet,
    Rocket,
    DicePlaced,
}

impl CellKind {
    /// Whether a die could ever be placed on a cell of this kind.
    ///
    /// Excluded: crossed, unreachable, already holding a die, exploded,
    /// the planet (crossed via the rocket, never played directly) and
    /// locked keyholes.
    #[must_use]
    pub fn is_placeable(self) -> bool {
        !matches!(
            self,
            CellKind::NotReachable
                | CellKind::Crossed
                | CellKind::DicePlaced
                | CellKind::Exploded
                | CellKind::Planet
                | CellKind::Keyhole { unlocked: false, .. }
        )
    }
}

/// Reward schedule of a cell. At most four entries (the flag's tier table);
/// jewels and puzzles carry a single base value, most cells none.
pub type RewardPoints = SmallVec<[i32; 4]>;

/// One grid position's current kind, required die and reward schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub kind: CellKind,
    /// The face required to place here. Absent for cells that never take a
    /// die (unreachable, pre-crossed, planet) and for consumed cells.
    pub die: Option<Die>,
    pub points: RewardPoints,
}

impl Cell {
    /// A cell with a required die and no points.
    #[must_use]
    pub fn new(kind: CellKind, die: Option<Die>) -> Self {
        Self {
            kind,
            die,
            points: RewardPoints::new(),
        }
    }

    /// A cell with a required die and a reward schedule.
    #[must_use]
    pub fn with_points(kind: CellKind, die: Option<Die>, points: RewardPoints) -> Self {
        Self { kind, die, points }
    }

    /// The overlay state after a die is placed, crossed out or exploded:
    /// the prior die/points are discarded.
    #[must_use]
    pub fn consumed(kind: CellKind) -> Self {
        Self::new(kind, None)
    }

    /// Whether `die` can be placed on this cell: the kind must be placeable
    /// and the required face must match.
    #[must_use]
    pub fn accepts(&self, die: Die) -> bool {
        // `DicePlaced` cells are filtered out by neighbour eligibility, not
        // here.
        let kind_ok = !matches!(
            self.kind,
            CellKind::NotReachable
                | CellKind::Crossed
                | CellKind::Exploded
                | CellKind::Planet
                | CellKind::Keyhole { unlocked: false, .. }
        );
        kind_ok && self.die == Some(die)
    }
}
