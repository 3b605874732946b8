//! Typed level descriptors.
//!
//! A `LevelDescriptor` is the validated input the engine consumes; the
//! bytes-on-disk loader that produces one lives outside the engine and is
//! abstracted behind [`LevelProvider`] so a restored game can rebuild its
//! board from a level number alone.

use serde::{Deserialize, Serialize};

use crate::core::Position;
use crate::error::GameError;

/// Number of shipped levels; level numbers are 1-based.
pub const LEVEL_COUNT: u8 = 3;

/// A group of same-valued special cells (jewels of one colour, all bombs,
/// one puzzle image).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldGroup {
    pub points: i32,
    pub positions: Vec<Position>,
}

/// One key and the keyholes it opens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyGroup {
    pub key: Position,
    pub keyholes: Vec<Position>,
}

/// The flag and its 4-tier arrival reward schedule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlagField {
    /// Points by arrival rank, best first (e.g. `[10, 6, 3, 1]`).
    pub points: Vec<i32>,
    pub position: Position,
}

/// A bonus line, described by its two endpoints on one row or column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineGroup {
    pub points: i32,
    /// Inclusive endpoints; both share a row (horizontal) or column
    /// (vertical).
    pub positions: [Position; 2],
}

/// Raw level content: the die grid plus the named special-field groups.
///
/// Grid entries: `None` = unreachable, `Some(0)` = pre-crossed starting
/// cell, `Some(1..=6)` = the face required to place there.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDescriptor {
    pub grid: Vec<Vec<Option<u8>>>,
    #[serde(default)]
    pub jewels: Vec<FieldGroup>,
    #[serde(default)]
    pub bombs: Option<FieldGroup>,
    #[serde(default)]
    pub puzzles: Vec<FieldGroup>,
    #[serde(default)]
    pub keys: Vec<KeyGroup>,
    #[serde(default)]
    pub flag: Option<FlagField>,
    #[serde(default)]
    pub rocket: Option<Position>,
    #[serde(default)]
    pub planet: Option<Position>,
    #[serde(default)]
    pub horizontal_lines: Vec<LineGroup>,
    #[serde(default)]
    pub vertical_lines: Vec<LineGroup>,
}

impl LevelDescriptor {
    /// Decode a descriptor from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        serde_json::from_str(json)
            .map_err(|e| GameError::level_format(format!("bad level JSON: {e}")))
    }
}

/// Source of level content, keyed by level number.
///
/// Implemented outside the engine by the real level loader; tests supply an
/// in-memory table.
pub trait LevelProvider {
    /// Return the descriptor for `level_no` (1-based), or a `LevelFormat`
    /// error if the level does not exist or cannot be read.
    fn level(&self, level_no: u8) -> Result<LevelDescriptor, GameError>;
}

impl LevelProvider for LevelDescriptor {
    /// A single descriptor acts as a provider for any valid level number,
    /// which keeps single-level tests short.
    fn level(&self, level_no: u8) -> Result<LevelDescriptor, GameError> {
        if level_no == 0 || level_no > LEVEL_COUNT {
            return Err(GameError::level_format(format!(
                "level {level_no} does not exist"
            )));
        }
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json_minimal() {
        let descriptor = LevelDescriptor::from_json(
            r#"{"grid": [[1, null], [0, 6]],
                "jewels": [{"points": 3, "positions": [{"x": 0, "y": 0}]}]}"#,
        )
        .unwrap();

        assert_eq!(descriptor.grid[0], vec![Some(1), None]);
        assert_eq!(descriptor.grid[1], vec![Some(0), Some(6)]);
        assert_eq!(descriptor.jewels.len(), 1);
        assert!(descriptor.flag.is_none());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            LevelDescriptor::from_json("{not json"),
            Err(GameError::LevelFormat(_))
        ));
    }

    #[test]
    fn test_descriptor_as_provider_checks_level_range() {
        let descriptor = LevelDescriptor::default();
        assert!(descriptor.level(1).is_ok());
        assert!(descriptor.level(LEVEL_COUNT).is_ok());
        assert!(descriptor.level(0).is_err());
        assert!(descriptor.level(LEVEL_COUNT + 1).is_err());
    }
}
