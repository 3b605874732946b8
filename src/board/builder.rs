//! Board construction from a level descriptor.
//!
//! `Board::from_level` validates the descriptor and produces the canonical
//! board: every cell resolved to its kind, plus the derived indexes the
//! engine queries during play (bomb positions, scoring groups, bonus lines,
//! placeable-cell count). Each player then plays on a mutable clone of the
//! canonical board; the canonical copy is the round-resolution reference for
//! what a position originally was.

use smallvec::{smallvec, SmallVec};

use crate::board::cell::{Cell, CellKind, JewelColor, KeyColor, PuzzleColor, RewardPoints};
use crate::board::level::{FieldGroup, LevelDescriptor, LineGroup};
use crate::core::{Die, Position};
use crate::error::GameError;

/// Direction of a bonus line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// A bonus line expanded from its endpoints into every cell it covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BonusLine {
    pub points: i32,
    pub cells: Vec<Position>,
    pub orientation: Orientation,
}

/// The playing board: a rectangular grid of cells plus derived indexes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
    bombs: Vec<Position>,
    starting: Vec<Position>,
    jewel_groups: Vec<FieldGroup>,
    puzzle_groups: Vec<FieldGroup>,
    keyholes: Vec<(KeyColor, Vec<Position>)>,
    lines: Vec<BonusLine>,
    flag: Option<Position>,
    rocket: Option<Position>,
    planet: Option<Position>,
    placeable_cell_count: usize,
}

impl Board {
    /// Build the canonical board from a validated descriptor.
    pub fn from_level(level: &LevelDescriptor) -> Result<Self, GameError> {
        let height = level.grid.len() as i32;
        let width = level.grid.first().map_or(0, |row| row.len()) as i32;
        if width == 0 || height == 0 {
            return Err(GameError::level_format("empty grid"));
        }
        for (y, row) in level.grid.iter().enumerate() {
            if row.len() as i32 != width {
                return Err(GameError::level_format(format!(
                    "grid row {y} has {} cells, expected {width}",
                    row.len()
                )));
            }
        }

        // Base layer: unreachable holes and face-carrying cells.
        let cells = level
            .grid
            .iter()
            .flat_map(|row| row.iter())
            .map(|entry| match entry {
                None => Cell::new(CellKind::NotReachable, None),
                Some(face) => Cell::new(CellKind::Normal, Some(Die::new(*face))),
            })
            .collect();

        let mut board = Self {
            width,
            height,
            cells,
            bombs: Vec::new(),
            starting: Vec::new(),
            jewel_groups: level.jewels.clone(),
            puzzle_groups: level.puzzles.clone(),
            keyholes: Vec::new(),
            lines: Vec::new(),
            flag: level.flag.as_ref().map(|f| f.position),
            rocket: level.rocket,
            planet: level.planet,
            placeable_cell_count: 0,
        };
        board.stamp_special_fields(level)?;
        board.cross_zero_cells();
        board.index_derived();
        board.lines = expand_lines(level, width, height)?;
        Ok(board)
    }

    /// Overwrite the base cell at each special position. Order matters:
    /// later groups win overlapping positions.
    fn stamp_special_fields(&mut self, level: &LevelDescriptor) -> Result<(), GameError> {
        for (i, group) in level.jewels.iter().enumerate() {
            let color = match i {
                0 => JewelColor::Red,
                1 => JewelColor::Yellow,
                _ => JewelColor::Blue,
            };
            for &pos in &group.positions {
                self.stamp(pos, CellKind::Jewel(color), smallvec![group.points], "jewel")?;
            }
        }
        if let Some(bombs) = &level.bombs {
            for &pos in &bombs.positions {
                self.stamp(pos, CellKind::Bomb, smallvec![bombs.points], "bomb")?;
            }
        }
        for (i, group) in level.puzzles.iter().enumerate() {
            let color = if i == 0 {
                PuzzleColor::Green
            } else {
                PuzzleColor::Blue
            };
            for &pos in &group.positions {
                self.stamp(pos, CellKind::Puzzle(color), smallvec![group.points], "puzzle")?;
            }
        }
        for (i, group) in level.keys.iter().enumerate() {
            let color = if i == 0 { KeyColor::Yellow } else { KeyColor::Blue };
            self.stamp(group.key, CellKind::Key(color), RewardPoints::new(), "key")?;
            for &pos in &group.keyholes {
                self.stamp(
                    pos,
                    CellKind::Keyhole {
                        color,
                        unlocked: false,
                    },
                    RewardPoints::new(),
                    "keyhole",
                )?;
            }
            self.keyholes.push((color, group.keyholes.clone()));
        }
        if let Some(flag) = &level.flag {
            let points: RewardPoints = SmallVec::from_slice(&flag.points);
            self.stamp(flag.position, CellKind::Flag, points, "flag")?;
        }
        if let Some(pos) = level.rocket {
            self.stamp(pos, CellKind::Rocket, RewardPoints::new(), "rocket")?;
        }
        if let Some(pos) = level.planet {
            self.stamp(pos, CellKind::Planet, RewardPoints::new(), "planet")?;
            // The planet is never played directly; it carries no face.
            self.cells[index_of(pos, self.width)].die = None;
        }
        Ok(())
    }

    fn stamp(
        &mut self,
        pos: Position,
        kind: CellKind,
        points: RewardPoints,
        what: &str,
    ) -> Result<(), GameError> {
        if !self.in_bounds(pos) {
            return Err(GameError::level_format(format!(
                "{what} at {pos} outside the {}x{} grid",
                self.width, self.height
            )));
        }
        let cell = &mut self.cells[index_of(pos, self.width)];
        if cell.kind == CellKind::NotReachable {
            return Err(GameError::level_format(format!(
                "{what} at {pos} sits on an unreachable cell"
            )));
        }
        cell.kind = kind;
        cell.points = points;
        Ok(())
    }

    /// Plain cells whose grid face is 0 are pre-crossed starting cells.
    fn cross_zero_cells(&mut self) {
        for cell in &mut self.cells {
            if cell.kind == CellKind::Normal && cell.die == Some(Die::new(0)) {
                *cell = Cell::consumed(CellKind::Crossed);
            }
        }
    }

    fn index_derived(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let pos = Position::new(x, y);
                match self.cell(pos).kind {
                    CellKind::Bomb => self.bombs.push(pos),
                    CellKind::Crossed => self.starting.push(pos),
                    _ => {}
                }
            }
        }
        self.placeable_cell_count = self
            .cells
            .iter()
            .filter(|c| !matches!(c.kind, CellKind::NotReachable | CellKind::Planet))
            .count();
    }

    #[must_use]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[must_use]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    /// The cell at `pos`. Callers guarantee bounds; every position the engine
    /// handles is produced by `neighbours` or validated on restore.
    #[must_use]
    pub fn cell(&self, pos: Position) -> &Cell {
        &self.cells[index_of(pos, self.width)]
    }

    /// Replace the cell at `pos` (overlay mutation).
    pub fn replace(&mut self, pos: Position, cell: Cell) {
        self.cells[index_of(pos, self.width)] = cell;
    }

    /// Bomb positions in row-major order.
    #[must_use]
    pub fn bombs(&self) -> &[Position] {
        &self.bombs
    }

    /// Pre-crossed starting positions in row-major order.
    #[must_use]
    pub fn starting_positions(&self) -> &[Position] {
        &self.starting
    }

    #[must_use]
    pub fn jewel_groups(&self) -> &[FieldGroup] {
        &self.jewel_groups
    }

    #[must_use]
    pub fn puzzle_groups(&self) -> &[FieldGroup] {
        &self.puzzle_groups
    }

    /// Keyhole positions opened by the key of `color`.
    #[must_use]
    pub fn keyholes_for(&self, color: KeyColor) -> &[Position] {
        self.keyholes
            .iter()
            .find(|(c, _)| *c == color)
            .map_or(&[], |(_, positions)| positions.as_slice())
    }

    #[must_use]
    pub fn bonus_lines(&self) -> &[BonusLine] {
        &self.lines
    }

    #[must_use]
    pub fn flag(&self) -> Option<Position> {
        self.flag
    }

    /// The flag's reward for arrival `rank` (1-based); 0 for rank 0 or past
    /// the tier table.
    #[must_use]
    pub fn flag_points(&self, rank: u8) -> i32 {
        let Some(flag) = self.flag else { return 0 };
        if rank == 0 {
            return 0;
        }
        self.cell(flag)
            .points
            .get(rank as usize - 1)
            .copied()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn rocket(&self) -> Option<Position> {
        self.rocket
    }

    #[must_use]
    pub fn planet(&self) -> Option<Position> {
        self.planet
    }

    /// Cells a player can ever fill: everything except holes and the planet.
    /// A board is full, and the game over, once a player has crossed or
    /// exploded this many cells.
    #[must_use]
    pub fn placeable_cell_count(&self) -> usize {
        self.placeable_cell_count
    }
}

fn index_of(pos: Position, width: i32) -> usize {
    (pos.y * width + pos.x) as usize
}

fn expand_lines(
    level: &LevelDescriptor,
    width: i32,
    height: i32,
) -> Result<Vec<BonusLine>, GameError> {
    let mut lines = Vec::new();
    for group in &level.horizontal_lines {
        lines.push(expand_line(group, Orientation::Horizontal, width, height)?);
    }
    for group in &level.vertical_lines {
        lines.push(expand_line(group, Orientation::Vertical, width, height)?);
    }
    Ok(lines)
}

fn expand_line(
    group: &LineGroup,
    orientation: Orientation,
    width: i32,
    height: i32,
) -> Result<BonusLine, GameError> {
    let [a, b] = group.positions;
    for pos in [a, b] {
        if pos.x < 0 || pos.x >= width || pos.y < 0 || pos.y >= height {
            return Err(GameError::level_format(format!(
                "line endpoint {pos} outside the {width}x{height} grid"
            )));
        }
    }
    let cells = match orientation {
        Orientation::Horizontal => {
            if a.y != b.y {
                return Err(GameError::level_format(format!(
                    "horizontal line endpoints {a} and {b} not on one row"
                )));
            }
            let (lo, hi) = (a.x.min(b.x), a.x.max(b.x));
            (lo..=hi).map(|x| Position::new(x, a.y)).collect()
        }
        Orientation::Vertical => {
            if a.x != b.x {
                return Err(GameError::level_format(format!(
                    "vertical line endpoints {a} and {b} not on one column"
                )));
            }
            let (lo, hi) = (a.y.min(b.y), a.y.max(b.y));
            (lo..=hi).map(|y| Position::new(a.x, y)).collect()
        }
    };
    Ok(BonusLine {
        points: group.points,
        cells,
        orientation,
    })
}
