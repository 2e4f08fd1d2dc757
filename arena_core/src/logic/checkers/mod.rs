//! English draughts on an 8x8 board.
//!
//! Red starts on rows 5-7 and moves toward row 0; black starts on rows 0-2
//! and moves toward row 7. Only dark squares (`(row + col)` odd) are used.

#![allow(clippy::indexing_slicing)]

use crate::engine::difficulty::{Difficulty, DifficultyProfile};
use crate::engine::eval::checkers::{CheckersEvaluator, CheckersWeights};
use crate::engine::zobrist::ZobristKeys;
use crate::engine::SearchLimit;
use crate::logic::board::{Position, Side};
use crate::logic::game::{Game, GameStatus};
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;
use std::sync::OnceLock;

pub mod rules;

pub const RED: Side = Side::First;
pub const BLACK: Side = Side::Second;

pub const SIZE: usize = 8;
const CELLS: usize = SIZE * SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rank {
    Man,
    King,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub side: Side,
    pub rank: Rank,
}

impl Piece {
    pub const fn man(side: Side) -> Self {
        Self {
            side,
            rank: Rank::Man,
        }
    }

    pub const fn king(side: Side) -> Self {
        Self {
            side,
            rank: Rank::King,
        }
    }

    pub const fn is_king(self) -> bool {
        matches!(self.rank, Rank::King)
    }

    const fn zobrist_kind(self) -> usize {
        let rank = match self.rank {
            Rank::Man => 0,
            Rank::King => 1,
        };
        self.side.index() * 2 + rank
    }
}

fn keys() -> &'static ZobristKeys {
    static KEYS: OnceLock<ZobristKeys> = OnceLock::new();
    KEYS.get_or_init(|| ZobristKeys::new(4, CELLS, 0x00C4_EC4E_A5D0))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckersBoard {
    #[serde(with = "BigArray")]
    cells: [Option<Piece>; CELLS],
    hash: u64,
}

impl Default for CheckersBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckersBoard {
    /// Standard opening position.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        for row in 0..SIZE {
            for col in 0..SIZE {
                let Some(pos) = board.position(row, col) else {
                    continue;
                };
                if !Self::is_dark(pos) {
                    continue;
                }
                if row < 3 {
                    board.set(pos, Some(Piece::man(BLACK)));
                } else if row > 4 {
                    board.set(pos, Some(Piece::man(RED)));
                }
            }
        }
        board
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            cells: [None; CELLS],
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

    pub const fn is_dark(pos: Position) -> bool {
        (pos.row + pos.col) % 2 == 1
    }

    pub fn get(&self, pos: Position) -> Option<Piece> {
        self.cells.get(pos.index(SIZE)).copied().flatten()
    }

    /// Places or removes a piece. Positions outside the board are a caller bug.
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        assert!(self.contains(pos), "position {pos} is off the checkers board");
        let idx = pos.index(SIZE);
        if let Some(old) = self.cells[idx] {
            self.hash ^= keys().piece_key(old.zobrist_kind(), idx);
        }
        if let Some(new) = piece {
            self.hash ^= keys().piece_key(new.zobrist_kind(), idx);
        }
        self.cells[idx] = piece;
    }

    pub fn pieces(&self, side: Side) -> impl Iterator<Item = (Position, Piece)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(idx, cell)| {
            cell.filter(|p| p.side == side)
                .map(|p| (Position::from_index(idx, SIZE), p))
        })
    }

    pub fn count(&self, side: Side) -> usize {
        self.pieces(side).count()
    }

    pub fn total_pieces(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub const fn hash(&self) -> u64 {
        self.hash
    }
}

/// A move or a complete capture chain. `captures` lists jumped pieces in
/// order; empty for a simple step.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CheckersMove {
    pub from: Position,
    pub to: Position,
    pub captures: Vec<Position>,
}

impl CheckersMove {
    pub fn is_capture(&self) -> bool {
        !self.captures.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Checkers {
    pub weights: CheckersWeights,
}

impl Checkers {
    pub const fn with_weights(weights: CheckersWeights) -> Self {
        Self { weights }
    }
}

impl Game for Checkers {
    type Board = CheckersBoard;
    type Move = CheckersMove;
    type Eval = CheckersEvaluator;

    const NAME: &'static str = "checkers";
    const WIN_SCORE: i32 = 30_000;

    fn initial_board(&self) -> CheckersBoard {
        CheckersBoard::new()
    }

    fn legal_moves(&self, board: &CheckersBoard, side: Side) -> Vec<CheckersMove> {
        rules::legal_moves(board, side)
    }

    fn apply(&self, board: &CheckersBoard, mv: &CheckersMove) -> CheckersBoard {
        rules::apply(board, mv)
    }

    fn status(&self, board: &CheckersBoard, side_to_move: Side) -> GameStatus {
        if board.count(side_to_move) == 0 || !rules::has_legal_move(board, side_to_move) {
            return GameStatus::Win(side_to_move.opposite());
        }
        if board.count(side_to_move.opposite()) == 0 {
            return GameStatus::Win(side_to_move);
        }
        GameStatus::Ongoing
    }

    fn hash(&self, board: &CheckersBoard, side_to_move: Side) -> u64 {
        match side_to_move {
            Side::First => board.hash(),
            Side::Second => board.hash() ^ keys().side_key(),
        }
    }

    fn move_index(&self, mv: &CheckersMove) -> usize {
        mv.from.index(SIZE) * CELLS + mv.to.index(SIZE)
    }

    fn move_index_space(&self) -> usize {
        CELLS * CELLS
    }

    fn evaluator(&self) -> CheckersEvaluator {
        CheckersEvaluator::new(self.weights.clone())
    }

    fn profile(&self, difficulty: Difficulty) -> DifficultyProfile {
        match difficulty {
            Difficulty::Easy => DifficultyProfile::heuristic(4),
            Difficulty::Medium => DifficultyProfile::search(SearchLimit::fixed_depth(4)),
            Difficulty::Hard => DifficultyProfile::search(SearchLimit::depth(20).with_time(1500)),
        }
    }
}
