//! Chinese chess on a 10x9 board. Red holds rows 0-4 and moves first; the
//! river runs between rows 4 and 5.

#![allow(clippy::indexing_slicing)]

use crate::engine::difficulty::{Difficulty, DifficultyProfile};
use crate::engine::eval::xiangqi::XiangqiEvaluator;
use crate::engine::zobrist::ZobristKeys;
use crate::engine::SearchLimit;
use crate::logic::board::{Position, Side};
use crate::logic::game::{Game, GameStatus};
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;
use std::fmt;
use std::sync::OnceLock;

pub mod rules;

pub const RED: Side = Side::First;
pub const BLACK: Side = Side::Second;

pub const ROWS: usize = 10;
pub const COLS: usize = 9;
const CELLS: usize = ROWS * COLS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    General = 0,
    Advisor = 1,
    Elephant = 2,
    Horse = 3,
    Chariot = 4,
    Cannon = 5,
    Soldier = 6,
}

impl PieceKind {
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

impl Piece {
    pub const fn new(kind: PieceKind, side: Side) -> Self {
        Self { kind, side }
    }

    const fn zobrist_kind(self) -> usize {
        self.side.index() * 7 + self.kind.index()
    }
}

fn keys() -> &'static ZobristKeys {
    static KEYS: OnceLock<ZobristKeys> = OnceLock::new();
    KEYS.get_or_init(|| ZobristKeys::new(14, CELLS, 0x0C07_0A56_7E11))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XiangqiBoard {
    #[serde(with = "BigArray")]
    cells: [Option<Piece>; CELLS],
    hash: u64,
}

impl Default for XiangqiBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl XiangqiBoard {
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_pieces(RED, 0, 2, 3);
        board.setup_pieces(BLACK, 9, 7, 6);
        board
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            cells: [None; CELLS],
            hash: 0,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn setup_pieces(&mut self, side: Side, back_row: u8, cannon_row: u8, soldier_row: u8) {
        let back = [
            PieceKind::Chariot,
            PieceKind::Horse,
            PieceKind::Elephant,
            PieceKind::Advisor,
            PieceKind::General,
            PieceKind::Advisor,
            PieceKind::Elephant,
            PieceKind::Horse,
            PieceKind::Chariot,
        ];
        for (col, &kind) in back.iter().enumerate() {
            self.set(
                Position {
                    row: back_row,
                    col: col as u8,
                },
                Some(Piece::new(kind, side)),
            );
        }
        for col in [1, 7] {
            self.set(
                Position {
                    row: cannon_row,
                    col,
                },
                Some(Piece::new(PieceKind::Cannon, side)),
            );
        }
        for col in (0..9).step_by(2) {
            self.set(
                Position {
                    row: soldier_row,
                    col,
                },
                Some(Piece::new(PieceKind::Soldier, side)),
            );
        }
    }

    pub fn position(&self, row: usize, col: usize) -> Option<Position> {
        Position::within(
            i32::try_from(row).ok()?,
            i32::try_from(col).ok()?,
            ROWS,
            COLS,
        )
    }

    pub const fn contains(&self, pos: Position) -> bool {
        (pos.row as usize) < ROWS && (pos.col as usize) < COLS
    }

    pub fn get(&self, pos: Position) -> Option<Piece> {
        if !self.contains(pos) {
            return None;
        }
        self.cells[pos.index(COLS)]
    }

    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        assert!(self.contains(pos), "position {pos} is off the xiangqi board");
        let idx = pos.index(COLS);
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
                .map(|p| (Position::from_index(idx, COLS), p))
        })
    }

    pub fn general(&self, side: Side) -> Option<Position> {
        self.pieces(side)
            .find(|(_, p)| p.kind == PieceKind::General)
            .map(|(pos, _)| pos)
    }

    pub const fn hash(&self) -> u64 {
        self.hash
    }
}

impl fmt::Display for XiangqiBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (0..ROWS).rev() {
            for col in 0..COLS {
                let ch = self.cells[row * COLS + col].map_or('.', |p| {
                    let ch = match p.kind {
                        PieceKind::General => 'k',
                        PieceKind::Advisor => 'a',
                        PieceKind::Elephant => 'b',
                        PieceKind::Horse => 'n',
                        PieceKind::Chariot => 'r',
                        PieceKind::Cannon => 'c',
                        PieceKind::Soldier => 'p',
                    };
                    if p.side == RED {
                        ch.to_ascii_uppercase()
                    } else {
                        ch
                    }
                });
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct XiangqiMove {
    pub from: Position,
    pub to: Position,
    pub captured: Option<Piece>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Xiangqi;

impl Game for Xiangqi {
    type Board = XiangqiBoard;
    type Move = XiangqiMove;
    type Eval = XiangqiEvaluator;

    const NAME: &'static str = "xiangqi";
    const WIN_SCORE: i32 = 30_000;

    fn initial_board(&self) -> XiangqiBoard {
        XiangqiBoard::new()
    }

    fn legal_moves(&self, board: &XiangqiBoard, side: Side) -> Vec<XiangqiMove> {
        rules::legal_moves(board, side)
    }

    fn apply(&self, board: &XiangqiBoard, mv: &XiangqiMove) -> XiangqiBoard {
        rules::apply(board, mv)
    }

    /// Checkmate and stalemate both lose for the side to move.
    fn status(&self, board: &XiangqiBoard, side_to_move: Side) -> GameStatus {
        if board.general(side_to_move).is_none() || !rules::has_legal_move(board, side_to_move) {
            return GameStatus::Win(side_to_move.opposite());
        }
        GameStatus::Ongoing
    }

    fn hash(&self, board: &XiangqiBoard, side_to_move: Side) -> u64 {
        match side_to_move {
            Side::First => board.hash(),
            Side::Second => board.hash() ^ keys().side_key(),
        }
    }

    fn move_index(&self, mv: &XiangqiMove) -> usize {
        mv.from.index(COLS) * CELLS + mv.to.index(COLS)
    }

    fn move_index_space(&self) -> usize {
        CELLS * CELLS
    }

    fn evaluator(&self) -> XiangqiEvaluator {
        XiangqiEvaluator::default()
    }

    fn profile(&self, difficulty: Difficulty) -> DifficultyProfile {
        match difficulty {
            Difficulty::Easy => DifficultyProfile::heuristic(3),
            Difficulty::Medium => DifficultyProfile::search(SearchLimit::fixed_depth(3)),
            Difficulty::Hard => DifficultyProfile::search(SearchLimit::depth(12).with_time(3000)),
        }
    }
}
