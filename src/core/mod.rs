//! Core value types: positions, dice, RNG, player indexing.

pub mod die;
pub mod player;
pub mod position;
pub mod rng;

pub use die::{Die, DicePool};
pub use player::{PlayerId, PlayerMap, HUMAN};
pub use position::Position;
pub use rng::DiceRng;
