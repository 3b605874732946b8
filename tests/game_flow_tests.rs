//! Full game-flow tests: the resumable turn loop, human move application,
//! round resolution and scoring, driven through the public API.
//!
//! Scenarios needing exact dice are set up through snapshot restore, which
//! fixes the pool; everything else runs on seeded rolls and asserts
//! roll-independent facts.

use dicetrail::board::{FieldGroup, FlagField, LevelDescriptor};
use dicetrail::core::{PlayerId, Position, HUMAN};
use dicetrail::engine::{StepOutcome, TurnEngine};
use dicetrail::presenter::{LogEntry, LogEvent, NullPresenter, Presenter};
use dicetrail::snapshot::{GameSnapshot, PlayerSnapshot};

fn pos(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

/// 3x3 board, starting cell in the centre:
/// ```text
///   1 2 3
///   4 0 6
///   1 2 3
/// ```
fn plain_level() -> LevelDescriptor {
    LevelDescriptor {
        grid: vec![
            vec![Some(1), Some(2), Some(3)],
            vec![Some(4), Some(0), Some(6)],
            vec![Some(1), Some(2), Some(3)],
        ],
        ..LevelDescriptor::default()
    }
}

fn bomb_level() -> LevelDescriptor {
    LevelDescriptor {
        bombs: Some(FieldGroup {
            points: 2,
            positions: vec![pos(1, 0)],
        }),
        ..plain_level()
    }
}

fn flag_level() -> LevelDescriptor {
    LevelDescriptor {
        flag: Some(FlagField {
            points: vec![10, 6, 3, 1],
            position: pos(1, 0),
        }),
        ..plain_level()
    }
}

fn seat(active: bool, crossed: Vec<Position>, placed: Vec<Position>) -> PlayerSnapshot {
    PlayerSnapshot {
        active,
        crossed,
        placed_this_turn: placed,
        exploded: vec![],
        flag_rank: 0,
    }
}

/// A two-player snapshot at round 1 with the human to act.
fn two_player_snapshot(dice: Vec<u8>, human: PlayerSnapshot, computer: PlayerSnapshot) -> GameSnapshot {
    GameSnapshot {
        level_no: 1,
        round: 1,
        turn_of: 0,
        dice,
        players: vec![human, computer],
    }
}

/// Presenter recording what the engine reports.
#[derive(Default)]
struct Recording {
    events: Vec<LogEvent>,
    flag_tiers: Vec<i32>,
    result: Option<(Vec<i32>, Option<PlayerId>)>,
}

impl Presenter for Recording {
    fn show_flag_tier(&mut self, points: i32) {
        self.flag_tiers.push(points);
    }

    fn log_event(&mut self, entry: &LogEntry) {
        self.events.push(entry.event);
    }

    fn announce_result(&mut self, scores: &[i32], winner: Option<PlayerId>) {
        self.result = Some((scores.to_vec(), winner));
    }
}

/// Drive a game to the end: the human always plays the first eligible cell,
/// skipping when out of moves.
fn play_greedily<P: Presenter>(game: &mut TurnEngine<P>) {
    let mut outcome = game.run();
    let mut guard = 0;
    while outcome == StepOutcome::AwaitingHuman {
        guard += 1;
        assert!(guard < 10_000, "game failed to terminate");
        let moves = game.eligible_moves(HUMAN);
        outcome = match moves.first() {
            Some(&pos) => game.apply_human_move(pos).expect("eligible move rejected"),
            None => game.apply_human_skip().expect("skip rejected"),
        };
    }
}

#[test]
fn test_new_game_rejects_bad_computer_count() {
    let level = plain_level();
    assert!(TurnEngine::new_game(1, 0, &level, 1, NullPresenter).is_err());
    assert!(TurnEngine::new_game(1, 4, &level, 1, NullPresenter).is_err());
}

#[test]
fn test_new_game_pool_size_scales_with_computers() {
    let level = plain_level();
    for (computers, dice) in [(1, 7), (2, 10), (3, 13)] {
        let game = TurnEngine::new_game(1, computers, &level, 1, NullPresenter).unwrap();
        assert_eq!(game.pool().len(), dice);
        assert_eq!(game.num_players(), computers + 1);
        assert_eq!(game.round(), 1);
    }
}

#[test]
fn test_first_stop_is_the_human_turn() {
    let level = plain_level();
    let mut game = TurnEngine::new_game(1, 1, &level, 7, NullPresenter).unwrap();
    // The human opens the first round, whatever was rolled.
    assert_eq!(game.run(), StepOutcome::AwaitingHuman);
}

#[test]
fn test_game_runs_to_completion_and_announces() {
    let level = plain_level();
    let mut game = TurnEngine::new_game(1, 2, &level, 11, Recording::default()).unwrap();
    play_greedily(&mut game);

    let (scores, _) = game
        .presenter()
        .result
        .as_ref()
        .expect("result never announced");
    assert_eq!(scores.len(), 3);
    assert_eq!(game.scores(), *scores);
}

#[test]
fn test_same_seed_same_game() {
    let level = plain_level();
    let mut first = TurnEngine::new_game(1, 2, &level, 99, NullPresenter).unwrap();
    let mut second = TurnEngine::new_game(1, 2, &level, 99, NullPresenter).unwrap();

    play_greedily(&mut first);
    play_greedily(&mut second);

    assert_eq!(first.snapshot(), second.snapshot());
    assert_eq!(first.scores(), second.scores());
}

#[test]
fn test_human_placement_flows_into_computer_turn() {
    let snapshot = two_player_snapshot(
        vec![2, 4],
        seat(true, vec![pos(1, 1)], vec![]),
        seat(true, vec![pos(1, 1)], vec![]),
    );
    let mut game = TurnEngine::restore(&snapshot, &plain_level(), 3, NullPresenter).unwrap();

    assert_eq!(game.run(), StepOutcome::AwaitingHuman);
    assert_eq!(
        game.eligible_moves(HUMAN),
        vec![pos(1, 0), pos(0, 1), pos(1, 2)]
    );

    // Human takes the 2 at (1, 0); the computer takes the remaining 4,
    // draining the pool and resolving the round.
    let outcome = game.apply_human_move(pos(1, 0));
    assert_eq!(outcome, Some(StepOutcome::AwaitingHuman));
    assert_eq!(game.round(), 2);
    assert!(game.player(HUMAN).crossed.contains(&pos(1, 0)));
    assert!(game.player(PlayerId::new(1)).crossed.contains(&pos(0, 1)));
}

#[test]
fn test_illegal_human_move_is_rejected_without_side_effects() {
    let snapshot = two_player_snapshot(
        vec![2, 4],
        seat(true, vec![pos(1, 1)], vec![]),
        seat(true, vec![pos(1, 1)], vec![]),
    );
    let mut game = TurnEngine::restore(&snapshot, &plain_level(), 3, NullPresenter).unwrap();
    game.run();

    // (2, 1) needs a 6, which the pool does not hold.
    assert_eq!(game.apply_human_move(pos(2, 1)), None);
    assert_eq!(game.pool().faces(), vec![2, 4]);
    assert!(game.player(HUMAN).placed_this_turn.is_empty());

    // The game is still waiting; a legal move goes through.
    assert!(game.apply_human_move(pos(1, 0)).is_some());
}

#[test]
fn test_put_die_back_reopens_the_turn() {
    // Human holds a die at (1, 0) but the pool's lone 6 fits nowhere next
    // to it.
    let snapshot = two_player_snapshot(
        vec![6],
        seat(true, vec![pos(1, 1)], vec![pos(1, 0)]),
        seat(true, vec![pos(1, 1)], vec![]),
    );
    let mut game = TurnEngine::restore(&snapshot, &plain_level(), 3, Recording::default()).unwrap();

    assert_eq!(game.run(), StepOutcome::AwaitingHuman);
    assert!(game.eligible_moves(HUMAN).is_empty());

    // Retracting the die returns its face (a 2) to the pool. The computer
    // then grabs (1, 0) itself, leaving the human the 6 at (2, 1).
    let outcome = game.apply_human_move(pos(1, 0));
    assert_eq!(outcome, Some(StepOutcome::AwaitingHuman));
    assert!(game.player(HUMAN).placed_this_turn.is_empty());
    assert!(!game.player(HUMAN).crossed.contains(&pos(1, 0)));
    assert!(game.presenter().events.contains(&LogEvent::PutDieBack));
    assert_eq!(game.eligible_moves(HUMAN), vec![pos(2, 1)]);
}

#[test]
fn test_reroll_keeps_pool_size_and_is_logged() {
    // A 3 fits nowhere around the starting cell, so the human is offered
    // the re-roll.
    let snapshot = two_player_snapshot(
        vec![3],
        seat(true, vec![pos(1, 1)], vec![]),
        seat(true, vec![pos(1, 1)], vec![]),
    );
    let mut game = TurnEngine::restore(&snapshot, &plain_level(), 3, Recording::default()).unwrap();

    assert_eq!(game.run(), StepOutcome::AwaitingHuman);
    assert!(game.eligible_moves(HUMAN).is_empty());

    // Whatever the new face, the engine either resumes or waits again.
    assert!(game.apply_human_reroll().is_some());
    assert!(game.presenter().events.contains(&LogEvent::RolledDice));
}

#[test]
fn test_reroll_refused_while_a_move_is_available() {
    let snapshot = two_player_snapshot(
        vec![2, 4],
        seat(true, vec![pos(1, 1)], vec![]),
        seat(true, vec![pos(1, 1)], vec![]),
    );
    let mut game = TurnEngine::restore(&snapshot, &plain_level(), 3, NullPresenter).unwrap();

    assert_eq!(game.run(), StepOutcome::AwaitingHuman);
    assert!(!game.eligible_moves(HUMAN).is_empty());

    // No fishing for better faces while a placement exists.
    assert_eq!(game.apply_human_reroll(), None);
    assert_eq!(game.pool().faces(), vec![2, 4]);
}

#[test]
fn test_sole_active_player_is_stopped_after_one_die() {
    let snapshot = two_player_snapshot(
        vec![2, 4],
        seat(true, vec![pos(1, 1)], vec![]),
        seat(false, vec![pos(1, 1)], vec![]),
    );
    let mut game = TurnEngine::restore(&snapshot, &plain_level(), 3, Recording::default()).unwrap();
    game.run();

    // The computer already skipped: one placement and the round is over,
    // dice left in the pool or not.
    let outcome = game.apply_human_move(pos(1, 0));
    assert_eq!(outcome, Some(StepOutcome::AwaitingHuman));
    assert_eq!(game.round(), 2);
    assert!(game.player(HUMAN).crossed.contains(&pos(1, 0)));
    assert!(game.presenter().events.contains(&LogEvent::Skipped));
}

#[test]
fn test_bomb_resolution_crosses_sitters_and_burns_the_rest() {
    // Pool empty: restore resolves the round immediately. The human sat on
    // the bomb, the computer did not.
    let snapshot = two_player_snapshot(
        vec![],
        seat(true, vec![pos(1, 1)], vec![pos(1, 0)]),
        seat(true, vec![pos(1, 1)], vec![]),
    );
    let mut game = TurnEngine::restore(&snapshot, &bomb_level(), 3, NullPresenter).unwrap();

    assert_eq!(game.run(), StepOutcome::AwaitingHuman);
    assert_eq!(game.round(), 2);
    assert!(game.player(HUMAN).crossed.contains(&pos(1, 0)));
    assert!(game.player(HUMAN).exploded.is_empty());
    assert!(game
        .player(PlayerId::new(1))
        .exploded
        .contains(&pos(1, 0)));
    assert_eq!(game.scores(), vec![0, -2]);
}

#[test]
fn test_first_to_the_flag_takes_the_top_tier() {
    let snapshot = two_player_snapshot(
        vec![2],
        seat(true, vec![pos(1, 1)], vec![]),
        seat(true, vec![pos(1, 1)], vec![]),
    );
    let mut game = TurnEngine::restore(&snapshot, &flag_level(), 3, Recording::default()).unwrap();
    game.run();

    assert!(game.apply_human_move(pos(1, 0)).is_some());
    assert_eq!(game.player(HUMAN).flag_rank, 1);
    assert_eq!(game.scores()[0], 10);
    assert!(game.presenter().events.contains(&LogEvent::FlagReached));
    // After the round resolves, the next arrival is worth the second tier.
    assert!(game.presenter().flag_tiers.contains(&6));
}

#[test]
fn test_last_move_records_the_placement() {
    let snapshot = two_player_snapshot(
        vec![2, 4],
        seat(true, vec![pos(1, 1)], vec![]),
        seat(true, vec![pos(1, 1)], vec![]),
    );
    let mut game = TurnEngine::restore(&snapshot, &plain_level(), 3, NullPresenter).unwrap();
    game.run();

    assert_eq!(game.last_move(), None);
    assert!(game.place_die(HUMAN, pos(1, 0)));
    let last = game.last_move().expect("move not recorded");
    assert_eq!(last.player, HUMAN);
    assert_eq!(last.pos, pos(1, 0));
    assert_eq!(last.die.face(), 2);
}
