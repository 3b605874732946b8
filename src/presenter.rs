//! Output seam between the engine and a user interface.
//!
//! The engine never draws anything; it narrates state changes through a
//! [`Presenter`]. Every method has an empty default body so a UI implements
//! only what it renders, and [`NullPresenter`] runs games headless (tests,
//! simulations).

use crate::board::Cell;
use crate::core::{Die, PlayerId, Position};

/// What happened in one logged game event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogEvent {
    GameStarted,
    LoadedGame,
    /// A die landed on a cell with no special field: the "nothing else
    /// happened" placement event.
    PlacedDie,
    PuzzlePiece,
    DetonatedBomb,
    FlagReached,
    UnlockedPadlock,
    CollectedJewel,
    UsedRocket,
    RolledDice,
    Skipped,
    PutDieBack,
}

/// One entry of the game log: who did what, where, with which die.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogEntry {
    pub player: PlayerId,
    pub event: LogEvent,
    pub pos: Option<Position>,
    pub die: Option<Die>,
}

impl LogEntry {
    #[must_use]
    pub fn new(player: PlayerId, event: LogEvent) -> Self {
        Self {
            player,
            event,
            pos: None,
            die: None,
        }
    }

    #[must_use]
    pub fn at(mut self, pos: Position, die: Die) -> Self {
        self.pos = Some(pos);
        self.die = Some(die);
        self
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {:?}", self.player, self.event)?;
        if let (Some(pos), Some(die)) = (self.pos, self.die) {
            write!(f, " {die} at {pos}")?;
        }
        Ok(())
    }
}

/// Engine-to-UI notifications. All methods default to no-ops.
#[allow(unused_variables)]
pub trait Presenter {
    /// A cell on `player`'s board changed.
    fn show_cell(&mut self, player: PlayerId, pos: Position, cell: &Cell) {}

    /// Mark `pos` as an eligible move for the human.
    fn highlight(&mut self, pos: Position) {}

    /// Drop all placement highlights.
    fn clear_highlights(&mut self) {}

    /// The shared pool changed; `dice` is ascending.
    fn show_dice(&mut self, dice: &[Die]) {}

    /// `player` entered round `round` (1-based).
    fn show_round(&mut self, player: PlayerId, round: u32) {}

    /// Toggle `player`'s skipped marker.
    fn show_skipped(&mut self, player: PlayerId, skipped: bool) {}

    /// Points the *next* player to reach the flag would score.
    fn show_flag_tier(&mut self, points: i32) {}

    /// The human has no eligible move but unplayed dice remain; offer the
    /// re-roll-or-skip choice.
    fn await_roll_or_skip(&mut self) {}

    /// Append an entry to the visible game log.
    fn log_event(&mut self, entry: &LogEntry) {}

    /// Final scores by seat and the winner (`None` on an unbroken tie).
    fn announce_result(&mut self, scores: &[i32], winner: Option<PlayerId>) {}
}

/// Presenter that renders nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::HUMAN;

    #[test]
    fn test_log_entry_display() {
        let entry = LogEntry::new(HUMAN, LogEvent::CollectedJewel)
            .at(Position::new(2, 1), Die::new(5));
        assert_eq!(format!("{entry}"), "Player: CollectedJewel (5) at [2, 1]");

        let bare = LogEntry::new(PlayerId::new(2), LogEvent::Skipped);
        assert_eq!(format!("{bare}"), "C2: Skipped");
    }
}
