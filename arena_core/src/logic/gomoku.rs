//! Free-style gomoku on a 15x15 board: five or more in a row wins.

#![allow(clippy::indexing_slicing)]

use crate::engine::difficulty::{Difficulty, DifficultyProfile};
use crate::engine::eval::gomoku::GomokuEvaluator;
use crate::engine::tactics;
use crate::engine::zobrist::ZobristKeys;
use crate::engine::SearchLimit;
use crate::logic::board::{Position, Side, AXES};
use crate::logic::game::{Game, GameStatus};
use crate::logic::placement::Placement;
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;
use std::sync::OnceLock;

pub const BLACK: Side = Side::First;
pub const WHITE: Side = Side::Second;

pub const SIZE: usize = 15;
const CELLS: usize = SIZE * SIZE;
pub const WIN_LENGTH: usize = 5;

fn keys() -> &'static ZobristKeys {
    static KEYS: OnceLock<ZobristKeys> = OnceLock::new();
    KEYS.get_or_init(|| ZobristKeys::new(2, CELLS, 0x0060_3C0F_11E5))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GomokuBoard {
    #[serde(with = "BigArray")]
    cells: [Option<Side>; CELLS],
    stones: usize,
    winner: Option<Side>,
    hash: u64,
}

impl Default for GomokuBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl GomokuBoard {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cells: [None; CELLS],
            stones: 0,
            winner: None,
            hash: 0,
        }
    }

    pub fn position(&self, row: usize, col: usize) -> Option<Position> {
        Position::within(
            i32::try_from(row).ok()?,
            i32::try_from(col).ok()?,
            SIZE,
            SIZE,
        )
    }

    pub const fn contains(&self, pos: Position) -> bool {
        (pos.row as usize) < SIZE && (pos.col as usize) < SIZE
    }

    pub const fn center() -> Position {
        #[allow(clippy::cast_possible_truncation)]
        let mid = (SIZE / 2) as u8;
        Position { row: mid, col: mid }
    }

    pub fn get(&self, pos: Position) -> Option<Side> {
        self.cells.get(pos.index(SIZE)).copied().flatten()
    }

    /// Drops a stone. Occupied or off-board cells are a caller bug.
    pub fn place(&mut self, pos: Position, side: Side) {
        assert!(self.contains(pos), "position {pos} is off the gomoku board");
        let idx = pos.index(SIZE);
        assert!(self.cells[idx].is_none(), "cell {pos} is already occupied");

        self.cells[idx] = Some(side);
        self.stones += 1;
        self.hash ^= keys().piece_key(side.index(), idx);

        if self.winner.is_none()
            && AXES
                .iter()
                .any(|&(dr, dc)| self.line_length(pos, side, dr, dc) >= WIN_LENGTH)
        {
            self.winner = Some(side);
        }
    }

    /// Consecutive `side` stones next to `pos` walking `(dr, dc)`, not counting `pos`.
    pub fn run(&self, pos: Position, side: Side, dr: i32, dc: i32) -> usize {
        let mut count = 0;
        let mut cur = pos;
        while let Some(next) = cur.offset(dr, dc, SIZE, SIZE) {
            if self.get(next) != Some(side) {
                break;
            }
            count += 1;
            cur = next;
        }
        count
    }

    /// Length of the `side` line through `pos` along an axis, counting `pos`.
    pub fn line_length(&self, pos: Position, side: Side, dr: i32, dc: i32) -> usize {
        1 + self.run(pos, side, dr, dc) + self.run(pos, side, -dr, -dc)
    }

    pub const fn stones(&self) -> usize {
        self.stones
    }

    pub const fn is_full(&self) -> bool {
        self.stones == CELLS
    }

    pub const fn winner(&self) -> Option<Side> {
        self.winner
    }

    pub const fn hash(&self) -> u64 {
        self.hash
    }

    pub fn occupied(&self) -> impl Iterator<Item = (Position, Side)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(idx, cell)| cell.map(|s| (Position::from_index(idx, SIZE), s)))
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(idx, _)| Position::from_index(idx, SIZE))
    }

    /// Empty cells within `radius` (Chebyshev) of any stone, in row-major
    /// order. The centre alone on an empty board.
    pub fn neighbourhood(&self, radius: i32) -> Vec<Position> {
        if self.stones == 0 {
            return vec![Self::center()];
        }
        let mut marked = [false; CELLS];
        for (pos, _) in self.occupied() {
            for dr in -radius..=radius {
                for dc in -radius..=radius {
                    if let Some(near) = pos.offset(dr, dc, SIZE, SIZE) {
                        marked[near.index(SIZE)] = true;
                    }
                }
            }
        }
        marked
            .iter()
            .enumerate()
            .filter(|&(idx, &m)| m && self.cells[idx].is_none())
            .map(|(idx, _)| Position::from_index(idx, SIZE))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Gomoku {
    /// Upper bound on moves the search expands per node.
    pub max_candidates: usize,
    /// Chebyshev distance from existing stones that candidate cells may lie at.
    pub candidate_radius: i32,
}

impl Default for Gomoku {
    fn default() -> Self {
        Self {
            max_candidates: 15,
            candidate_radius: 2,
        }
    }
}

impl Game for Gomoku {
    type Board = GomokuBoard;
    type Move = Placement;
    type Eval = GomokuEvaluator;

    const NAME: &'static str = "gomoku";
    const WIN_SCORE: i32 = 1_000_000;

    fn initial_board(&self) -> GomokuBoard {
        GomokuBoard::new()
    }

    fn legal_moves(&self, board: &GomokuBoard, side: Side) -> Vec<Placement> {
        if board.winner().is_some() {
            return Vec::new();
        }
        board.empty_cells().map(|pos| Placement::new(pos, side)).collect()
    }

    /// Cells near existing stones, strongest first by the quick pattern score,
    /// capped at `max_candidates`.
    fn search_moves(&self, board: &GomokuBoard, side: Side) -> Vec<Placement> {
        if board.winner().is_some() {
            return Vec::new();
        }
        let mut scored: Vec<(i32, Position)> = board
            .neighbourhood(self.candidate_radius)
            .into_iter()
            .map(|pos| (tactics::cell_score(board, pos, side), pos))
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored.truncate(self.max_candidates.max(1));
        scored
            .into_iter()
            .map(|(_, pos)| Placement::new(pos, side))
            .collect()
    }

    fn apply(&self, board: &GomokuBoard, mv: &Placement) -> GomokuBoard {
        let mut next = board.clone();
        next.place(mv.pos, mv.side);
        next
    }

    fn status(&self, board: &GomokuBoard, _side_to_move: Side) -> GameStatus {
        match board.winner() {
            Some(side) => GameStatus::Win(side),
            None if board.is_full() => GameStatus::Draw,
            None => GameStatus::Ongoing,
        }
    }

    fn hash(&self, board: &GomokuBoard, side_to_move: Side) -> u64 {
        match side_to_move {
            Side::First => board.hash(),
            Side::Second => board.hash() ^ keys().side_key(),
        }
    }

    fn move_index(&self, mv: &Placement) -> usize {
        mv.pos.index(SIZE)
    }

    fn move_index_space(&self) -> usize {
        CELLS
    }

    fn forced_move(&self, board: &GomokuBoard, side: Side) -> Option<Placement> {
        tactics::forced_move(board, side)
    }

    fn evaluator(&self) -> GomokuEvaluator {
        GomokuEvaluator::default()
    }

    fn profile(&self, difficulty: Difficulty) -> DifficultyProfile {
        match difficulty {
            Difficulty::Easy => DifficultyProfile::heuristic(0),
            Difficulty::Medium => DifficultyProfile::search(SearchLimit::fixed_depth(2)),
            Difficulty::Hard => DifficultyProfile::search(SearchLimit::depth(8).with_time(2000)),
        }
    }
}
