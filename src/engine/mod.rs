//! Game engine: player state, computer policy, scoring and the turn loop.

pub mod evaluator;
pub mod player;
pub mod scoring;
pub mod turn;

pub use evaluator::MoveEvaluator;
pub use player::{PlayerState, TurnState};
pub use turn::{max_rounds, LastMove, StepOutcome, TurnEngine, MAX_PLAYERS, MIN_PLAYERS};
