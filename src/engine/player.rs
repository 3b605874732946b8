//! Per-player turn state and move eligibility.

use rustc_hash::FxHashSet;

use crate::board::Board;
use crate::core::{DicePool, PlayerId, Position};

/// Where a player stands within the current round.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnState {
    /// May take a die from the pool on their next turn.
    CanPlace,
    /// Out of moves but still holds placed dice; may re-roll or skip.
    CannotPlace,
    /// Done for this round.
    Skipped,
}

/// One player's complete in-round state: their board overlay plus the
/// bookkeeping sets driving eligibility and scoring.
///
/// The overlay starts as a clone of the canonical board and diverges as dice
/// land (`DicePlaced`), rounds resolve (`Crossed`) and bombs go off
/// (`Exploded`). The canonical board stays untouched and is consulted
/// whenever the *original* kind of a position matters.
#[derive(Clone, Debug)]
pub struct PlayerState {
    pub id: PlayerId,
    pub active: bool,
    pub turn_state: TurnState,
    /// Permanently crossed cells, starting cells included.
    pub crossed: FxHashSet<Position>,
    /// Dice placed since this player's round began; merged into `crossed`
    /// at round resolution.
    pub placed_this_turn: FxHashSet<Position>,
    pub exploded: FxHashSet<Position>,
    /// 0 until this player reaches the flag, then their arrival rank 1..=4.
    pub flag_rank: u8,
    /// The round this player is currently playing, 1-based.
    pub current_round: u32,
    pub board: Board,
}

impl PlayerState {
    /// Fresh state at game start: overlay equals the canonical board,
    /// crossed holds the starting cells.
    #[must_use]
    pub fn new(id: PlayerId, canonical: &Board) -> Self {
        Self {
            id,
            active: true,
            turn_state: TurnState::CanPlace,
            crossed: canonical.starting_positions().iter().copied().collect(),
            placed_this_turn: FxHashSet::default(),
            exploded: FxHashSet::default(),
            flag_rank: 0,
            current_round: 1,
            board: canonical.clone(),
        }
    }

    pub fn set_skipped(&mut self) {
        self.turn_state = TurnState::Skipped;
        self.active = false;
    }

    /// Every position this player could legally place on right now, sorted
    /// row-major.
    ///
    /// Placement grows a connected chain: the first die of a round attaches
    /// to a crossed cell, later dice to already-placed ones. A human whose
    /// placed dice are all walled in may branch from crossed cells again;
    /// computers never re-branch mid-turn.
    #[must_use]
    pub fn eligible_moves(&self, pool: &DicePool) -> Vec<Position> {
        let from_crossed =
            self.placed_this_turn.is_empty() || (self.id.is_human() && self.is_caged());
        let sources: Vec<Position> = if from_crossed {
            self.crossed.iter().copied().collect()
        } else {
            self.placed_this_turn.iter().copied().collect()
        };

        let mut seen = FxHashSet::default();
        let mut moves = Vec::new();
        for source in sources {
            for pos in source.neighbours(self.board.width(), self.board.height()) {
                if !seen.insert(pos) {
                    continue;
                }
                let cell = self.board.cell(pos);
                if cell.kind.is_placeable()
                    && cell.die.is_some_and(|required| pool.contains(required))
                {
                    moves.push(pos);
                }
            }
        }
        moves.sort();
        moves
    }

    /// Whether every die placed this turn is walled in: no 4-neighbour of
    /// any placed die can ever take another die.
    #[must_use]
    pub fn is_caged(&self) -> bool {
        !self.placed_this_turn.is_empty()
            && self.placed_this_turn.iter().all(|&placed| {
                placed
                    .neighbours(self.board.width(), self.board.height())
                    .iter()
                    .all(|&n| !self.board.cell(n).kind.is_placeable())
            })
    }

    /// Cells this player has permanently used up. The game ends when this
    /// reaches the board's placeable-cell count.
    #[must_use]
    pub fn crossed_and_exploded_count(&self) -> usize {
        self.crossed.len() + self.exploded.len()
    }
}
