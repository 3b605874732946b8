//! Save-game data model.
//!
//! A snapshot is the minimal durable state of a running game: level number,
//! round, whose round it is, the shared pool and each player's position
//! sets. Boards are not serialized; restore rebuilds them from the level
//! and replays the sets onto fresh overlays. Validation happens on restore,
//! so a snapshot struct itself is just data.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::Position;
use crate::error::GameError;

/// One player's durable state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub active: bool,
    /// Crossed cells, starting cells included, sorted row-major.
    pub crossed: Vec<Position>,
    pub placed_this_turn: Vec<Position>,
    pub exploded: Vec<Position>,
    pub flag_rank: u8,
}

/// A complete saved game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub level_no: u8,
    /// Current round, 1-based.
    pub round: u32,
    /// Seat of the round's starting player.
    pub turn_of: u8,
    /// Pool faces, ascending.
    pub dice: Vec<u8>,
    /// Seat order: index 0 is the human.
    pub players: Vec<PlayerSnapshot>,
}

impl GameSnapshot {
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        serde_json::from_str(json)
            .map_err(|e| GameError::level_format(format!("bad save JSON: {e}")))
    }

    pub fn to_json(&self) -> String {
        // Serialization of plain data with string keys cannot fail.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Write the snapshot to `path` as JSON.
    pub fn save_to(&self, path: &Path) -> Result<(), GameError> {
        std::fs::write(path, self.to_json())?;
        Ok(())
    }

    /// Read a snapshot back from `path`. Content validation happens when
    /// the snapshot is turned into an engine.
    pub fn load_from(path: &Path) -> Result<Self, GameError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
