//! Board model: cells, level descriptors and board construction.

pub mod builder;
pub mod cell;
pub mod level;

pub use builder::{Board, BonusLine, Orientation};
pub use cell::{Cell, CellKind, JewelColor, KeyColor, PuzzleColor, RewardPoints};
pub use level::{
    FieldGroup, FlagField, KeyGroup, LevelDescriptor, LevelProvider, LineGroup, LEVEL_COUNT,
};
