//! Deterministic rules engine for a competitive dice-placement board game.
//!
//! One human and one to three computer players share a pool of rolled dice
//! and claim cells on private copies of the same board. Dice chain outward
//! from crossed cells; rounds resolve bombs, padlocks, the rocket and the
//! flag race; highest score after the last round wins.
//!
//! The crate is UI-agnostic: all output flows through the
//! [`presenter::Presenter`] trait, and the human's decisions are fed into a
//! resumable [`engine::TurnEngine`]. Given a seed and the same sequence of
//! human inputs, a game replays identically.
//!
//! ```no_run
//! use dicetrail::board::LevelDescriptor;
//! use dicetrail::engine::{StepOutcome, TurnEngine};
//! use dicetrail::presenter::NullPresenter;
//!
//! # fn demo(level: LevelDescriptor) -> Result<(), dicetrail::error::GameError> {
//! let mut game = TurnEngine::new_game(1, 2, &level, 42, NullPresenter)?;
//! match game.run() {
//!     StepOutcome::AwaitingHuman => {
//!         let moves = game.eligible_moves(dicetrail::core::HUMAN);
//!         if let Some(&pos) = moves.first() {
//!             game.apply_human_move(pos);
//!         }
//!     }
//!     StepOutcome::GameOver => {}
//! }
//! # Ok(())
//! # }
//! ```

pub mod board;
pub mod core;
pub mod engine;
pub mod error;
pub mod presenter;
pub mod snapshot;

pub use board::{Board, LevelDescriptor, LevelProvider};
pub use core::{Die, PlayerId, Position, HUMAN};
pub use engine::{StepOutcome, TurnEngine};
pub use error::GameError;
pub use presenter::{NullPresenter, Presenter};
pub use snapshot::GameSnapshot;
