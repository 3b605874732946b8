//! Computer move selection.
//!
//! A fixed greedy policy: walk a priority list of cell categories and take
//! the first eligible cell that matches, preferring the row-major smallest
//! within a category. Below the special fields comes line completion, then
//! plain "take the first eligible cell". Deterministic by construction so a
//! replayed seed reproduces the whole game.

use rustc_hash::FxHashSet;

use crate::board::{BonusLine, CellKind, JewelColor, Orientation};
use crate::core::Position;
use crate::engine::player::PlayerState;

/// Chooses moves for computer players.
pub struct MoveEvaluator;

fn is_puzzle(kind: CellKind) -> bool {
    matches!(kind, CellKind::Puzzle(_))
}

fn is_flag(kind: CellKind) -> bool {
    kind == CellKind::Flag
}

fn is_red_jewel(kind: CellKind) -> bool {
    kind == CellKind::Jewel(JewelColor::Red)
}

fn is_yellow_jewel(kind: CellKind) -> bool {
    kind == CellKind::Jewel(JewelColor::Yellow)
}

fn is_blue_jewel(kind: CellKind) -> bool {
    kind == CellKind::Jewel(JewelColor::Blue)
}

fn is_rocket(kind: CellKind) -> bool {
    kind == CellKind::Rocket
}

fn is_bomb(kind: CellKind) -> bool {
    kind == CellKind::Bomb
}

fn is_key(kind: CellKind) -> bool {
    matches!(kind, CellKind::Key(_))
}

fn is_open_keyhole(kind: CellKind) -> bool {
    matches!(kind, CellKind::Keyhole { unlocked: true, .. })
}

/// Category order, most wanted first.
const PRIORITIES: &[fn(CellKind) -> bool] = &[
    is_puzzle,
    is_flag,
    is_red_jewel,
    is_yellow_jewel,
    is_blue_jewel,
    is_rocket,
    is_bomb,
    is_key,
    is_open_keyhole,
];

impl MoveEvaluator {
    /// Pick the computer's move among `eligible` (sorted row-major), or
    /// `None` when there is nothing to play.
    #[must_use]
    pub fn choose(state: &PlayerState, eligible: &[Position]) -> Option<Position> {
        if eligible.is_empty() {
            return None;
        }
        for matches_category in PRIORITIES {
            let hit = eligible
                .iter()
                .copied()
                .find(|&pos| matches_category(state.board.cell(pos).kind));
            if hit.is_some() {
                return hit;
            }
        }
        if let Some(pos) = Self::line_completion(state, eligible) {
            return Some(pos);
        }
        eligible.first().copied()
    }

    /// A cell that completes a bonus line, if any line is one cell short
    /// and that cell is playable right now.
    fn line_completion(state: &PlayerState, eligible: &[Position]) -> Option<Position> {
        let used: FxHashSet<Position> = state
            .crossed
            .iter()
            .chain(state.placed_this_turn.iter())
            .copied()
            .collect();

        let horizontal = Self::candidate(state, Orientation::Horizontal, &used);
        let vertical = Self::candidate(state, Orientation::Vertical, &used);
        let missing = match (horizontal, vertical) {
            (Some((h_pos, h_points)), Some((v_pos, v_points))) => {
                if v_points >= h_points {
                    v_pos
                } else {
                    h_pos
                }
            }
            (Some((pos, _)), None) | (None, Some((pos, _))) => pos,
            (None, None) => return None,
        };
        eligible.binary_search(&missing).ok().map(|_| missing)
    }

    /// Cheapest line of `orientation` missing exactly one cell, as
    /// (missing cell, line points).
    fn candidate(
        state: &PlayerState,
        orientation: Orientation,
        used: &FxHashSet<Position>,
    ) -> Option<(Position, i32)> {
        let mut lines: Vec<&BonusLine> = state
            .board
            .bonus_lines()
            .iter()
            .filter(|line| line.orientation == orientation)
            .collect();
        lines.sort_by_key(|line| line.points);

        for line in lines {
            let mut missing = line.cells.iter().filter(|pos| !used.contains(pos));
            if let (Some(&pos), None) = (missing.next(), missing.next()) {
                return Some((pos, line.points));
            }
        }
        None
    }
}
