//! Error taxonomy for construction, restore and persistence.
//!
//! Runtime move rejections are deliberately *not* errors: `place_die` and
//! `put_die_back` return `false` and leave the state untouched, so callers
//! can re-query eligibility without unwinding the turn loop.

use thiserror::Error;

/// Fatal errors surfaced to the caller.
#[derive(Debug, Error)]
pub enum GameError {
    /// Malformed or out-of-range level or snapshot data.
    ///
    /// Aborts game construction/restore atomically; no partial engine is
    /// ever handed out.
    #[error("invalid level data: {0}")]
    LevelFormat(String),

    /// I/O failure while persisting a snapshot. The running game state is
    /// unaffected.
    #[error("failed to save game: {0}")]
    SaveIo(#[from] std::io::Error),
}

impl GameError {
    /// Shorthand for a `LevelFormat` error with a formatted message.
    pub fn level_format(msg: impl Into<String>) -> Self {
        GameError::LevelFormat(msg.into())
    }
}
