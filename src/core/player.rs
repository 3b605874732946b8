//! Player identification and per-player storage.
//!
//! Index 0 is always the human player; indices 1..=3 are computers.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Type-safe player index. 0 is the human, 1..=3 the computers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

/// The human player's fixed seat.
pub const HUMAN: PlayerId = PlayerId(0);

impl PlayerId {
    /// Create a player ID from a raw seat index.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// 0-based seat index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this is the human seat.
    #[must_use]
    pub const fn is_human(self) -> bool {
        self.0 == 0
    }

    /// All seats of a game with `count` players, in seating order.
    pub fn all(count: usize) -> impl Iterator<Item = PlayerId> {
        (0..count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_human() {
            write!(f, "Player")
        } else {
            write!(f, "C{}", self.0)
        }
    }
}

/// Per-player storage with O(1) access, one slot per seat.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    slots: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Build a map with one value per seat from a factory.
    pub fn new(count: usize, factory: impl FnMut(PlayerId) -> T) -> Self {
        let mut factory = factory;
        let slots = (0..count as u8).map(|i| factory(PlayerId(i))).collect();
        Self { slots }
    }

    /// Build a map from already-constructed values.
    #[must_use]
    pub fn from_vec(slots: Vec<T>) -> Self {
        Self { slots }
    }

    /// Number of seats.
    #[must_use]
    pub fn count(&self) -> usize {
        self.slots.len()
    }

    /// Iterate seats with their values.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// Iterate seats with mutable values.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (PlayerId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }

    /// All seat IDs.
    pub fn ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.slots.len())
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &T {
        &self.slots[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.slots[player.index()]
    }
}
