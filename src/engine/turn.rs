//! The turn engine: round loop, move application and round resolution.
//!
//! The engine is a resumable state machine. [`TurnEngine::run`] advances
//! computers and rounds until either the game ends or the human must act;
//! at that point it returns [`StepOutcome::AwaitingHuman`] and the caller
//! feeds the human's decision back through [`TurnEngine::apply_human_move`],
//! [`TurnEngine::apply_human_skip`] or [`TurnEngine::apply_human_reroll`],
//! each of which resumes the loop.
//!
//! All randomness flows through the seeded RNG handed to the constructor,
//! so a fixed seed plus a fixed sequence of human inputs replays the exact
//! same game.

use std::path::Path;

use crate::board::{Board, Cell, CellKind, LevelProvider};
use crate::core::{DicePool, DiceRng, Die, PlayerId, PlayerMap, Position, HUMAN};
use crate::engine::evaluator::MoveEvaluator;
use crate::engine::player::{PlayerState, TurnState};
use crate::engine::scoring;
use crate::error::GameError;
use crate::presenter::{LogEntry, LogEvent, Presenter};
use crate::snapshot::{GameSnapshot, PlayerSnapshot};

/// Smallest and largest table size, human included.
pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

/// Rounds in a game by computer count: 1→6, 2→4, 3→3.
#[must_use]
pub fn max_rounds(num_computers: usize) -> u32 {
    match num_computers {
        1 => 6,
        2 => 4,
        _ => 3,
    }
}

/// Why [`TurnEngine::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    /// The human must place, retract, re-roll or skip.
    AwaitingHuman,
    /// The game ended; the result has been announced.
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EnginePhase {
    Running,
    AwaitingHuman,
    Finished,
}

/// The most recent successful placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LastMove {
    pub player: PlayerId,
    pub pos: Position,
    pub die: Die,
}

/// A running game.
pub struct TurnEngine<P: Presenter> {
    presenter: P,
    rng: DiceRng,
    level_no: u8,
    board: Board,
    players: PlayerMap<PlayerState>,
    pool: DicePool,
    round: u32,
    max_rounds: u32,
    starting_player: u8,
    turn_cursor: usize,
    flag_ranks_assigned: u8,
    flag_arrivals_this_round: u8,
    last_move: Option<LastMove>,
    phase: EnginePhase,
}

impl<P: Presenter> TurnEngine<P> {
    /// Start a fresh game on `level_no` against `num_computers` opponents.
    pub fn new_game(
        level_no: u8,
        num_computers: usize,
        provider: &dyn LevelProvider,
        seed: u64,
        presenter: P,
    ) -> Result<Self, GameError> {
        let total = num_computers + 1;
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&total) {
            return Err(GameError::level_format(format!(
                "{num_computers} computer players, expected 1 to {}",
                MAX_PLAYERS - 1
            )));
        }
        let board = Board::from_level(&provider.level(level_no)?)?;
        let players = PlayerMap::new(total, |p| PlayerState::new(p, &board));
        let mut rng = DiceRng::new(seed);
        let pool = DicePool::roll(&mut rng, DicePool::size_for(num_computers));

        let mut engine = Self {
            presenter,
            rng,
            level_no,
            board,
            players,
            pool,
            round: 1,
            max_rounds: max_rounds(num_computers),
            starting_player: 0,
            turn_cursor: 0,
            flag_ranks_assigned: 0,
            flag_arrivals_this_round: 0,
            last_move: None,
            phase: EnginePhase::Running,
        };
        engine.log(LogEntry::new(HUMAN, LogEvent::GameStarted));
        engine.broadcast_round_start();
        Ok(engine)
    }

    /// Rebuild a game from a snapshot. Validates every field before any
    /// state is constructed; a bad snapshot never yields a partial engine.
    pub fn restore(
        snapshot: &GameSnapshot,
        provider: &dyn LevelProvider,
        seed: u64,
        presenter: P,
    ) -> Result<Self, GameError> {
        let board = Board::from_level(&provider.level(snapshot.level_no)?)?;
        let num_computers = validate_snapshot(snapshot, &board)?;

        let mut players = Vec::with_capacity(snapshot.players.len());
        for (i, saved) in snapshot.players.iter().enumerate() {
            let seat = PlayerId::new(i as u8);
            let mut state = PlayerState::new(seat, &board);
            state.active = saved.active;
            state.turn_state = if saved.active {
                TurnState::CanPlace
            } else {
                TurnState::Skipped
            };
            state.flag_rank = saved.flag_rank;
            // Seats up to and including the round's starting player have
            // begun the current round; seats after it are still finishing
            // the previous one.
            state.current_round = if i as u8 <= snapshot.turn_of {
                snapshot.round
            } else {
                snapshot.round.saturating_sub(1).max(1)
            };
            for &pos in &saved.crossed {
                state.crossed.insert(pos);
                state.board.replace(pos, Cell::consumed(CellKind::Crossed));
            }
            for &pos in &saved.placed_this_turn {
                state.placed_this_turn.insert(pos);
                state
                    .board
                    .replace(pos, Cell::consumed(CellKind::DicePlaced));
            }
            for &pos in &saved.exploded {
                state.exploded.insert(pos);
                state.board.replace(pos, Cell::consumed(CellKind::Exploded));
            }
            // A crossed key means its padlocks were opened in a past round.
            for &pos in &saved.crossed {
                if let CellKind::Key(color) = board.cell(pos).kind {
                    for &keyhole in board.keyholes_for(color) {
                        if let CellKind::Keyhole {
                            unlocked: false, ..
                        } = state.board.cell(keyhole).kind
                        {
                            let mut cell = board.cell(keyhole).clone();
                            cell.kind = CellKind::Keyhole {
                                color,
                                unlocked: true,
                            };
                            state.board.replace(keyhole, cell);
                        }
                    }
                }
            }
            players.push(state);
        }

        let flag_ranks_assigned = snapshot
            .players
            .iter()
            .filter(|p| p.flag_rank > 0)
            .count()
            .min(4) as u8;

        let mut engine = Self {
            presenter,
            rng: DiceRng::new(seed),
            level_no: snapshot.level_no,
            board,
            players: PlayerMap::from_vec(players),
            pool: DicePool::from_faces(&snapshot.dice),
            round: snapshot.round,
            max_rounds: max_rounds(num_computers),
            starting_player: snapshot.turn_of,
            turn_cursor: 0,
            flag_ranks_assigned,
            flag_arrivals_this_round: 0,
            last_move: None,
            phase: EnginePhase::Running,
        };
        engine.log(LogEntry::new(HUMAN, LogEvent::LoadedGame));
        engine.repaint();
        Ok(engine)
    }

    /// Advance the game until the human must act or the game ends.
    pub fn run(&mut self) -> StepOutcome {
        loop {
            if self.is_game_over() {
                let scores = scoring::final_scores(&self.board, &self.players);
                let winner = scoring::winner(&self.players, &scores);
                log::debug!("game over: scores {scores:?}, winner {winner:?}");
                self.presenter.announce_result(&scores, winner);
                self.phase = EnginePhase::Finished;
                return StepOutcome::GameOver;
            }
            while !self.round_over() {
                let seat = self.current_seat();
                self.turn_cursor += 1;
                if !self.players[seat].active {
                    continue;
                }
                if seat.is_human() {
                    self.prepare_human_turn();
                    self.phase = EnginePhase::AwaitingHuman;
                    return StepOutcome::AwaitingHuman;
                }
                self.computer_move(seat);
            }
            self.resolve_round();
        }
    }

    /// The human placed a die (in `CanPlace`) or retracted one (in
    /// `CannotPlace`) at `pos`. On success the engine resumes and the new
    /// outcome is returned; an illegal position changes nothing and yields
    /// `None`.
    pub fn apply_human_move(&mut self, pos: Position) -> Option<StepOutcome> {
        if self.phase != EnginePhase::AwaitingHuman {
            return None;
        }
        let accepted = match self.players[HUMAN].turn_state {
            TurnState::CanPlace => self.place_die(HUMAN, pos),
            TurnState::CannotPlace => self.put_die_back(HUMAN, pos),
            TurnState::Skipped => false,
        };
        if !accepted {
            return None;
        }
        self.phase = EnginePhase::Running;
        Some(self.run())
    }

    /// The human skips the rest of the round.
    pub fn apply_human_skip(&mut self) -> Option<StepOutcome> {
        if self.phase != EnginePhase::AwaitingHuman {
            return None;
        }
        self.skip(HUMAN);
        self.phase = EnginePhase::Running;
        Some(self.run())
    }

    /// The human re-rolls the remaining pool instead of skipping.
    ///
    /// Only offered while the human is out of moves (`CannotPlace`); with a
    /// placement available the request is refused. If the new roll still
    /// offers nothing and the human has not placed this round, the skip
    /// happens automatically. With dice already placed the human keeps the
    /// turn to retract them or give up.
    pub fn apply_human_reroll(&mut self) -> Option<StepOutcome> {
        if self.phase != EnginePhase::AwaitingHuman
            || self.players[HUMAN].turn_state != TurnState::CannotPlace
        {
            return None;
        }
        self.pool.reroll(&mut self.rng);
        self.presenter.show_dice(self.pool.as_slice());
        self.log(LogEntry::new(HUMAN, LogEvent::RolledDice));

        let eligible = self.players[HUMAN].eligible_moves(&self.pool);
        if eligible.is_empty() {
            if self.players[HUMAN].placed_this_turn.is_empty() {
                self.skip(HUMAN);
                self.phase = EnginePhase::Running;
                return Some(self.run());
            }
            self.players[HUMAN].turn_state = TurnState::CannotPlace;
            self.players[HUMAN].active = false;
            self.presenter.await_roll_or_skip();
        } else {
            self.presenter.clear_highlights();
            for &pos in &eligible {
                self.presenter.highlight(pos);
            }
            self.players[HUMAN].turn_state = TurnState::CanPlace;
        }
        Some(StepOutcome::AwaitingHuman)
    }

    /// Place a die from the pool onto `pos` for `player`. Returns whether
    /// the move was legal; an illegal move leaves all state untouched.
    pub fn place_die(&mut self, player: PlayerId, pos: Position) -> bool {
        let eligible = self.players[player].eligible_moves(&self.pool);
        if eligible.binary_search(&pos).is_err() {
            return false;
        }
        let cell = self.players[player].board.cell(pos).clone();
        let Some(die) = cell.die else {
            return false;
        };
        if !self.pool.contains(die) {
            return false;
        }

        let event = match cell.kind {
            CellKind::Flag => LogEvent::FlagReached,
            CellKind::Bomb => LogEvent::DetonatedBomb,
            CellKind::Puzzle(_) => LogEvent::PuzzlePiece,
            CellKind::Jewel(_) => LogEvent::CollectedJewel,
            CellKind::Rocket => LogEvent::UsedRocket,
            CellKind::Key(_) => LogEvent::UnlockedPadlock,
            _ => LogEvent::PlacedDie,
        };
        if cell.kind == CellKind::Flag && self.players[player].flag_rank == 0 {
            self.flag_arrivals_this_round += 1;
            self.players[player].flag_rank =
                (self.flag_ranks_assigned + self.flag_arrivals_this_round).min(4);
        }

        log::debug!("{player} places {die} at {pos}");
        self.last_move = Some(LastMove { player, pos, die });
        self.log(LogEntry::new(player, event).at(pos, die));

        self.players[player].placed_this_turn.insert(pos);
        self.players[player]
            .board
            .replace(pos, Cell::consumed(CellKind::DicePlaced));
        self.presenter
            .show_cell(player, pos, self.players[player].board.cell(pos));
        self.pool.remove(die);
        self.presenter.show_dice(self.pool.as_slice());

        // A sole remaining player gets one die per round tail, not a free
        // run of the whole pool.
        if self.sole_active(player) {
            self.skip(player);
        }
        true
    }

    /// Retract a die placed this round, returning it to the pool. Returns
    /// whether `pos` actually held a die placed this round.
    pub fn put_die_back(&mut self, player: PlayerId, pos: Position) -> bool {
        if !self.players[player].placed_this_turn.contains(&pos) {
            return false;
        }
        let canonical = self.board.cell(pos).clone();
        let Some(die) = canonical.die else {
            return false;
        };

        self.players[player].placed_this_turn.remove(&pos);
        self.players[player].board.replace(pos, canonical);
        self.presenter
            .show_cell(player, pos, self.players[player].board.cell(pos));
        self.pool.add(die);
        self.presenter.show_dice(self.pool.as_slice());
        self.log(LogEntry::new(player, LogEvent::PutDieBack).at(pos, die));

        if !self.players[player].eligible_moves(&self.pool).is_empty() {
            self.players[player].turn_state = TurnState::CanPlace;
            self.players[player].active = true;
        }
        if self.sole_active(player) {
            self.skip(player);
        }
        true
    }

    /// End of a round: everyone skipped or the pool ran dry.
    fn round_over(&self) -> bool {
        self.pool.is_empty() || !self.players.iter().any(|(_, s)| s.active)
    }

    fn is_game_over(&self) -> bool {
        self.round > self.max_rounds
            || self.players.iter().any(|(_, s)| {
                s.crossed_and_exploded_count() >= self.board.placeable_cell_count()
            })
    }

    fn current_seat(&self) -> PlayerId {
        let count = self.players.count();
        PlayerId::new(((self.starting_player as usize + self.turn_cursor) % count) as u8)
    }

    fn sole_active(&self, player: PlayerId) -> bool {
        self.players
            .iter()
            .all(|(p, s)| p == player || !s.active)
    }

    fn prepare_human_turn(&mut self) {
        self.presenter.clear_highlights();
        let eligible = self.players[HUMAN].eligible_moves(&self.pool);
        if eligible.is_empty() {
            self.players[HUMAN].turn_state = TurnState::CannotPlace;
            self.presenter.await_roll_or_skip();
        } else {
            for &pos in &eligible {
                self.presenter.highlight(pos);
            }
            self.players[HUMAN].turn_state = TurnState::CanPlace;
        }
    }

    fn computer_move(&mut self, seat: PlayerId) {
        let eligible = self.players[seat].eligible_moves(&self.pool);
        match MoveEvaluator::choose(&self.players[seat], &eligible) {
            Some(pos) => {
                self.place_die(seat, pos);
            }
            None => self.skip(seat),
        }
    }

    fn skip(&mut self, player: PlayerId) {
        log::debug!("{player} skips round {}", self.round);
        self.players[player].set_skipped();
        self.presenter.show_skipped(player, true);
        self.log(LogEntry::new(player, LogEvent::Skipped));
    }

    /// Settle the round: bombs, padlocks, rocket, flag tiers, then merge
    /// placements and deal the next round.
    fn resolve_round(&mut self) {
        log::debug!("resolving round {}", self.round);
        self.detonate_bombs();
        self.open_padlocks();
        self.launch_rockets();

        self.flag_ranks_assigned =
            (self.flag_ranks_assigned + self.flag_arrivals_this_round).min(4);
        self.flag_arrivals_this_round = 0;
        if self.board.flag().is_some() {
            let next_rank = (self.flag_ranks_assigned + 1).min(4);
            self.presenter
                .show_flag_tier(self.board.flag_points(next_rank));
        }

        for (seat, state) in self.players.iter_mut() {
            let mut placed: Vec<Position> = state.placed_this_turn.drain().collect();
            placed.sort();
            for pos in placed {
                state.crossed.insert(pos);
                state.board.replace(pos, Cell::consumed(CellKind::Crossed));
                self.presenter.show_cell(seat, pos, state.board.cell(pos));
            }
        }

        self.round += 1;
        self.starting_player = ((self.starting_player as usize + 1) % self.players.count()) as u8;
        self.turn_cursor = 0;
        let num_computers = self.players.count() - 1;
        self.pool = DicePool::roll(&mut self.rng, DicePool::size_for(num_computers));
        for (seat, state) in self.players.iter_mut() {
            state.active = true;
            state.turn_state = TurnState::CanPlace;
            state.current_round = self.round;
            self.presenter.show_skipped(seat, false);
            self.presenter.show_round(seat, self.round);
        }
        self.presenter.show_dice(self.pool.as_slice());
    }

    /// Every bomb someone sat on this round goes off: the sitters cross it,
    /// everyone else loses the cell.
    fn detonate_bombs(&mut self) {
        for &bomb in self.board.bombs() {
            let detonated = self
                .players
                .iter()
                .any(|(_, s)| s.placed_this_turn.contains(&bomb));
            if !detonated {
                continue;
            }
            log::debug!("bomb at {bomb} detonates");
            for (seat, state) in self.players.iter_mut() {
                if state.placed_this_turn.remove(&bomb) {
                    state.crossed.insert(bomb);
                    state.board.replace(bomb, Cell::consumed(CellKind::Crossed));
                } else {
                    state.exploded.insert(bomb);
                    state
                        .board
                        .replace(bomb, Cell::consumed(CellKind::Exploded));
                }
                self.presenter.show_cell(seat, bomb, state.board.cell(bomb));
            }
        }
    }

    /// A die on a key opens that colour's padlocks on the owner's board
    /// only.
    fn open_padlocks(&mut self) {
        for (seat, state) in self.players.iter_mut() {
            let mut placed: Vec<Position> = state.placed_this_turn.iter().copied().collect();
            placed.sort();
            for pos in placed {
                let CellKind::Key(color) = self.board.cell(pos).kind else {
                    continue;
                };
                for &keyhole in self.board.keyholes_for(color) {
                    let mut cell = self.board.cell(keyhole).clone();
                    cell.kind = CellKind::Keyhole {
                        color,
                        unlocked: true,
                    };
                    state.board.replace(keyhole, cell);
                    self.presenter
                        .show_cell(seat, keyhole, state.board.cell(keyhole));
                }
            }
        }
    }

    /// A die on the rocket crosses the planet for its owner.
    fn launch_rockets(&mut self) {
        let Some(rocket) = self.board.rocket() else {
            return;
        };
        let Some(planet) = self.board.planet() else {
            return;
        };
        for (seat, state) in self.players.iter_mut() {
            if state.placed_this_turn.contains(&rocket) {
                state.crossed.insert(planet);
                state
                    .board
                    .replace(planet, Cell::consumed(CellKind::Crossed));
                self.presenter
                    .show_cell(seat, planet, state.board.cell(planet));
            }
        }
    }

    fn broadcast_round_start(&mut self) {
        for seat in self.players.ids() {
            self.presenter.show_round(seat, self.round);
        }
        self.presenter.show_dice(self.pool.as_slice());
        if self.board.flag().is_some() {
            let next_rank = (self.flag_ranks_assigned + 1).min(4);
            self.presenter
                .show_flag_tier(self.board.flag_points(next_rank));
        }
    }

    /// Repaint every player's full board plus the shared state (restore).
    fn repaint(&mut self) {
        for seat in self.players.ids().collect::<Vec<_>>() {
            for y in 0..self.board.height() {
                for x in 0..self.board.width() {
                    let pos = Position::new(x, y);
                    let cell = self.players[seat].board.cell(pos).clone();
                    self.presenter.show_cell(seat, pos, &cell);
                }
            }
            let round = self.players[seat].current_round;
            self.presenter.show_round(seat, round);
            let skipped = !self.players[seat].active;
            self.presenter.show_skipped(seat, skipped);
        }
        self.presenter.show_dice(self.pool.as_slice());
        if self.board.flag().is_some() {
            let next_rank = (self.flag_ranks_assigned + 1).min(4);
            self.presenter
                .show_flag_tier(self.board.flag_points(next_rank));
        }
    }

    fn log(&mut self, entry: LogEntry) {
        log::debug!("{entry}");
        self.presenter.log_event(&entry);
    }

    /// Capture the durable state of the game.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        let players = self
            .players
            .iter()
            .map(|(_, state)| {
                let mut crossed: Vec<Position> = state.crossed.iter().copied().collect();
                crossed.sort();
                let mut placed: Vec<Position> =
                    state.placed_this_turn.iter().copied().collect();
                placed.sort();
                let mut exploded: Vec<Position> = state.exploded.iter().copied().collect();
                exploded.sort();
                PlayerSnapshot {
                    active: state.active,
                    crossed,
                    placed_this_turn: placed,
                    exploded,
                    flag_rank: state.flag_rank,
                }
            })
            .collect();
        GameSnapshot {
            level_no: self.level_no,
            round: self.round,
            turn_of: self.starting_player,
            dice: self.pool.faces(),
            players,
        }
    }

    /// Snapshot the game and write it to `path`.
    pub fn save(&self, path: &Path) -> Result<(), GameError> {
        self.snapshot().save_to(path)
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &PlayerState {
        &self.players[id]
    }

    #[must_use]
    pub fn num_players(&self) -> usize {
        self.players.count()
    }

    #[must_use]
    pub fn pool(&self) -> &DicePool {
        &self.pool
    }

    /// Current round, 1-based.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn level_no(&self) -> u8 {
        self.level_no
    }

    #[must_use]
    pub fn last_move(&self) -> Option<LastMove> {
        self.last_move
    }

    /// The human's current options, sorted row-major.
    #[must_use]
    pub fn eligible_moves(&self, player: PlayerId) -> Vec<Position> {
        self.players[player].eligible_moves(&self.pool)
    }

    #[must_use]
    pub fn scores(&self) -> Vec<i32> {
        scoring::final_scores(&self.board, &self.players)
    }

    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }
}

/// Check every snapshot field against the board and table limits. Returns
/// the computer count.
fn validate_snapshot(snapshot: &GameSnapshot, board: &Board) -> Result<usize, GameError> {
    let total = snapshot.players.len();
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&total) {
        return Err(GameError::level_format(format!(
            "saved game has {total} players, expected {MIN_PLAYERS} to {MAX_PLAYERS}"
        )));
    }
    let num_computers = total - 1;
    if snapshot.round > max_rounds(num_computers) {
        return Err(GameError::level_format(format!(
            "saved round {} past the last round {}",
            snapshot.round,
            max_rounds(num_computers)
        )));
    }
    if snapshot.turn_of as usize >= total {
        return Err(GameError::level_format(format!(
            "saved starting player {} is not a seat",
            snapshot.turn_of
        )));
    }
    if let Some(&face) = snapshot.dice.iter().find(|&&f| !(1..=6).contains(&f)) {
        return Err(GameError::level_format(format!(
            "saved die face {face} out of range"
        )));
    }
    for (i, player) in snapshot.players.iter().enumerate() {
        if player.flag_rank > 4 {
            return Err(GameError::level_format(format!(
                "player {i} flag rank {} out of range",
                player.flag_rank
            )));
        }
        for pos in player
            .crossed
            .iter()
            .chain(&player.placed_this_turn)
            .chain(&player.exploded)
        {
            if !board.in_bounds(*pos) {
                return Err(GameError::level_format(format!(
                    "player {i} position {pos} outside the board"
                )));
            }
        }
    }
    Ok(num_computers)
}
