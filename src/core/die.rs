//! Dice: single die faces and the shared pool.
//!
//! The pool is the round's shared multiset of rollable dice. It is kept
//! ascending by face at all times so that every view of it (presenter,
//! snapshot, tests) sees the same canonical sequence.

use serde::{Deserialize, Serialize};

use super::rng::DiceRng;

/// A die face, 1–6.
///
/// Dice are equal iff their faces are equal and order by face value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Die(u8);

impl Die {
    /// Create a die showing `face`.
    ///
    /// Faces outside 1–6 only ever come from untrusted snapshot data, which
    /// is rejected by validation before a `Die` reaches the engine.
    #[must_use]
    pub const fn new(face: u8) -> Self {
        Self(face)
    }

    /// The face value.
    #[must_use]
    pub const fn face(self) -> u8 {
        self.0
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.0)
    }
}

/// The shared dice pool: an ordered multiset, ascending by face.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DicePool {
    dice: Vec<Die>,
}

impl DicePool {
    /// Round-start pool size by computer count: 1→7, 2→10, 3→13.
    #[must_use]
    pub fn size_for(num_computers: usize) -> usize {
        match num_computers {
            1 => 7,
            2 => 10,
            _ => 13,
        }
    }

    /// Roll `n` independent dice and return them ascending.
    #[must_use]
    pub fn roll(rng: &mut DiceRng, n: usize) -> Self {
        let mut dice: Vec<Die> = (0..n).map(|_| rng.roll_die()).collect();
        dice.sort();
        Self { dice }
    }

    /// Build a pool from known faces (restore path). Sorted on entry to
    /// re-establish the ascending invariant.
    #[must_use]
    pub fn from_faces(faces: &[u8]) -> Self {
        let mut dice: Vec<Die> = faces.iter().map(|&f| Die::new(f)).collect();
        dice.sort();
        Self { dice }
    }

    /// Re-roll every die in place, keeping the pool size.
    pub fn reroll(&mut self, rng: &mut DiceRng) {
        *self = Self::roll(rng, self.dice.len());
    }

    /// Remove the first die matching `die`. No-op if absent.
    ///
    /// Returns whether a die was removed.
    pub fn remove(&mut self, die: Die) -> bool {
        match self.dice.iter().position(|&d| d == die) {
            Some(idx) => {
                self.dice.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Insert a die, keeping the pool ascending.
    pub fn add(&mut self, die: Die) {
        let idx = self.dice.partition_point(|&d| d <= die);
        self.dice.insert(idx, die);
    }

    /// Whether the pool holds a die with this face.
    #[must_use]
    pub fn contains(&self, die: Die) -> bool {
        // Ascending order makes this a range membership test.
        self.dice.binary_search(&die).is_ok()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dice.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.dice.len()
    }

    /// The dice in ascending order.
    #[must_use]
    pub fn as_slice(&self) -> &[Die] {
        &self.dice
    }

    /// Face values in ascending order (snapshot form).
    #[must_use]
    pub fn faces(&self) -> Vec<u8> {
        self.dice.iter().map(|d| d.face()).collect()
    }
}
