//! Deterministic die rolling.
//!
//! All randomness in the engine flows through a single injected `DiceRng`.
//! Production wires real entropy, tests fix a seed and get reproducible
//! games end to end.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::die::Die;

/// Seedable random source for die rolls.
///
/// ChaCha8 keeps the sequence identical across platforms for a given seed.
#[derive(Clone, Debug)]
pub struct DiceRng {
    inner: ChaCha8Rng,
}

impl DiceRng {
    /// Create an RNG with a fixed seed. Same seed, same game.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Create an RNG seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }

    /// Roll a single die: a uniform face in 1..=6.
    pub fn roll_die(&mut self) -> Die {
        Die::new(self.inner.gen_range(1..=6))
    }
}
