//! Final scoring and winner selection.

use crate::board::Board;
use crate::core::{PlayerId, PlayerMap};
use crate::engine::player::PlayerState;

/// Points lost per exploded bomb cell.
pub const BOMB_PENALTY: i32 = 2;

/// One player's final score.
///
/// Puzzle groups and bonus lines pay out only when fully crossed; jewels pay
/// per crossed cell; every exploded bomb costs [`BOMB_PENALTY`]; the flag
/// pays by arrival rank.
#[must_use]
pub fn score(board: &Board, state: &PlayerState) -> i32 {
    let mut total = 0;

    for group in board.puzzle_groups() {
        if group.positions.iter().all(|pos| state.crossed.contains(pos)) {
            total += group.points;
        }
    }
    for group in board.jewel_groups() {
        let crossed = group
            .positions
            .iter()
            .filter(|pos| state.crossed.contains(pos))
            .count();
        total += group.points * crossed as i32;
    }
    total -= BOMB_PENALTY * state.exploded.len() as i32;
    total += board.flag_points(state.flag_rank);
    for line in board.bonus_lines() {
        if line.cells.iter().all(|pos| state.crossed.contains(pos)) {
            total += line.points;
        }
    }
    total
}

/// Scores for every seat, in seating order.
#[must_use]
pub fn final_scores(board: &Board, players: &PlayerMap<PlayerState>) -> Vec<i32> {
    players.iter().map(|(_, state)| score(board, state)).collect()
}

/// The winning seat: highest score, ties broken by fewest crossed cells.
/// `None` when even the tie-break ties.
#[must_use]
pub fn winner(players: &PlayerMap<PlayerState>, scores: &[i32]) -> Option<PlayerId> {
    let best_score = *scores.iter().max()?;
    let mut leaders = players
        .ids()
        .filter(|p| scores[p.index()] == best_score);

    let first = leaders.next()?;
    let mut best = first;
    let mut best_crossed = players[first].crossed.len();
    let mut contested = false;
    for player in leaders {
        let crossed = players[player].crossed.len();
        if crossed < best_crossed {
            best = player;
            best_crossed = crossed;
            contested = false;
        } else if crossed == best_crossed {
            contested = true;
        }
    }
    if contested {
        None
    } else {
        Some(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{FieldGroup, FlagField, LevelDescriptor, LineGroup};
    use crate::core::Position;

    fn pos(x: i32, y: i32) -> Position {
        Position::new(x, y)
    }

    fn board() -> Board {
        let level = LevelDescriptor {
            grid: vec![
                vec![Some(1), Some(2), Some(3)],
                vec![Some(4), Some(0), Some(6)],
                vec![Some(1), Some(2), Some(3)],
            ],
            jewels: vec![FieldGroup {
                points: 3,
                positions: vec![pos(0, 0), pos(2, 0)],
            }],
            bombs: Some(FieldGroup {
                points: 2,
                positions: vec![pos(0, 2), pos(2, 2)],
            }),
            puzzles: vec![FieldGroup {
                points: 10,
                positions: vec![pos(1, 0), pos(0, 1)],
            }],
            flag: Some(FlagField {
                points: vec![10, 6, 3, 1],
                position: pos(2, 1),
            }),
            horizontal_lines: vec![LineGroup {
                points: 5,
                positions: [pos(0, 1), pos(2, 1)],
            }],
            ..LevelDescriptor::default()
        };
        Board::from_level(&level).unwrap()
    }

    #[test]
    fn test_score_sums_all_sources() {
        let board = board();
        let mut state = PlayerState::new(PlayerId::new(0), &board);

        // Full puzzle group, two exploded bombs, first at the flag:
        // 10 - 4 + 10 = 16.
        state.crossed.insert(pos(1, 0));
        state.crossed.insert(pos(0, 1));
        state.exploded.insert(pos(0, 2));
        state.exploded.insert(pos(2, 2));
        state.flag_rank = 1;
        assert_eq!(score(&board, &state), 16);
    }

    #[test]
    fn test_partial_puzzle_scores_nothing_but_jewels_pay_per_cell() {
        let board = board();
        let mut state = PlayerState::new(PlayerId::new(0), &board);

        state.crossed.insert(pos(1, 0)); // half the puzzle
        state.crossed.insert(pos(0, 0)); // one of two jewels
        assert_eq!(score(&board, &state), 3);
    }

    #[test]
    fn test_full_line_pays_out() {
        let board = board();
        let mut state = PlayerState::new(PlayerId::new(0), &board);

        // (1, 1) is a starting cell, already crossed.
        state.crossed.insert(pos(0, 1));
        state.crossed.insert(pos(2, 1));
        // Line 5 + half puzzle 0 + flag 0.
        assert_eq!(score(&board, &state), 5);
    }

    #[test]
    fn test_flag_rank_tiers() {
        let board = board();
        let mut state = PlayerState::new(PlayerId::new(0), &board);
        for (rank, expected) in [(0u8, 0), (1, 10), (2, 6), (3, 3), (4, 1)] {
            state.flag_rank = rank;
            assert_eq!(score(&board, &state), expected);
        }
    }

    #[test]
    fn test_winner_highest_score() {
        let board = board();
        let players = PlayerMap::new(2, |p| PlayerState::new(p, &board));
        assert_eq!(winner(&players, &[4, 9]), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_winner_tie_broken_by_fewest_crossed() {
        let board = board();
        let mut players = PlayerMap::new(2, |p| PlayerState::new(p, &board));
        players[PlayerId::new(0)].crossed.insert(pos(0, 0));
        assert_eq!(winner(&players, &[7, 7]), Some(PlayerId::new(1)));
    }

    #[test]
    fn test_unbreakable_tie_has_no_winner() {
        let board = board();
        let players = PlayerMap::new(2, |p| PlayerState::new(p, &board));
        assert_eq!(winner(&players, &[7, 7]), None);
    }
}
