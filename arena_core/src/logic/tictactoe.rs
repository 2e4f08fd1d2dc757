#![allow(clippy::indexing_slicing)]

use crate::engine::difficulty::{Difficulty, DifficultyProfile};
use crate::engine::eval::tictactoe::TicTacToeEvaluator;
use crate::engine::zobrist::ZobristKeys;
use crate::engine::SearchLimit;
use crate::logic::board::{Position, Side};
use crate::logic::game::{winning_move, Game, GameStatus};
use crate::logic::placement::Placement;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

pub const X: Side = Side::First;
pub const O: Side = Side::Second;

pub const SIZE: usize = 3;
const CELLS: usize = SIZE * SIZE;

/// Rows, columns and both diagonals as cell indices.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

fn keys() -> &'static ZobristKeys {
    static KEYS: OnceLock<ZobristKeys> = OnceLock::new();
    KEYS.get_or_init(|| ZobristKeys::new(2, CELLS, 0x0000_7AC7_0E00))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicTacToeBoard {
    cells: [Option<Side>; CELLS],
    hash: u64,
}

impl TicTacToeBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
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

    pub fn get(&self, pos: Position) -> Option<Side> {
        self.cells.get(pos.index(SIZE)).copied().flatten()
    }

    pub const fn cell(&self, index: usize) -> Option<Side> {
        self.cells[index]
    }

    pub fn place(&mut self, pos: Position, side: Side) {
        assert!(self.contains(pos), "position {pos} is off the tic-tac-toe board");
        let idx = pos.index(SIZE);
        assert!(self.cells[idx].is_none(), "cell {pos} is already occupied");
        self.cells[idx] = Some(side);
        self.hash ^= keys().piece_key(side.index(), idx);
    }

    pub fn winner(&self) -> Option<Side> {
        LINES.iter().find_map(|line| {
            let first = self.cells[line[0]]?;
            line.iter()
                .all(|&i| self.cells[i] == Some(first))
                .then_some(first)
        })
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub const fn hash(&self) -> u64 {
        self.hash
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToe;

impl Game for TicTacToe {
    type Board = TicTacToeBoard;
    type Move = Placement;
    type Eval = TicTacToeEvaluator;

    const NAME: &'static str = "tictactoe";
    const WIN_SCORE: i32 = 1_000;

    fn initial_board(&self) -> TicTacToeBoard {
        TicTacToeBoard::new()
    }

    fn legal_moves(&self, board: &TicTacToeBoard, side: Side) -> Vec<Placement> {
        if board.winner().is_some() {
            return Vec::new();
        }
        (0..CELLS)
            .filter(|&i| board.cell(i).is_none())
            .map(|i| Placement::new(Position::from_index(i, SIZE), side))
            .collect()
    }

    fn apply(&self, board: &TicTacToeBoard, mv: &Placement) -> TicTacToeBoard {
        let mut next = board.clone();
        next.place(mv.pos, mv.side);
        next
    }

    fn status(&self, board: &TicTacToeBoard, _side_to_move: Side) -> GameStatus {
        match board.winner() {
            Some(side) => GameStatus::Win(side),
            None if board.is_full() => GameStatus::Draw,
            None => GameStatus::Ongoing,
        }
    }

    fn hash(&self, board: &TicTacToeBoard, side_to_move: Side) -> u64 {
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

    /// Completes a line if possible, otherwise blocks the opponent's.
    fn forced_move(&self, board: &TicTacToeBoard, side: Side) -> Option<Placement> {
        let moves = self.legal_moves(board, side);
        if let Some(mv) = winning_move(self, board, side, &moves) {
            return Some(mv);
        }
        let replies = self.legal_moves(board, side.opposite());
        winning_move(self, board, side.opposite(), &replies)
            .map(|threat| Placement::new(threat.pos, side))
    }

    fn evaluator(&self) -> TicTacToeEvaluator {
        TicTacToeEvaluator
    }

    fn profile(&self, difficulty: Difficulty) -> DifficultyProfile {
        match difficulty {
            Difficulty::Easy => DifficultyProfile::heuristic(0),
            Difficulty::Medium => DifficultyProfile::search(SearchLimit::fixed_depth(2)),
            Difficulty::Hard => DifficultyProfile::search(SearchLimit::depth(9)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn board_from(rows: [&str; 3]) -> TicTacToeBoard {
        let mut board = TicTacToeBoard::new();
        for (r, line) in rows.iter().enumerate() {
            for (c, ch) in line.chars().enumerate() {
                let pos = board.position(r, c).unwrap();
                match ch {
                    'X' => board.place(pos, X),
                    'O' => board.place(pos, O),
                    _ => {}
                }
            }
        }
        board
    }

    #[test]
    fn test_status() {
        let game = TicTacToe;
        assert_eq!(game.status(&board_from(["XXX", "OO.", "..."]), O), GameStatus::Win(X));
        assert_eq!(game.status(&board_from(["O.X", ".OX", "X.O"]), X), GameStatus::Win(O));
        assert_eq!(game.status(&board_from(["XOX", "XOO", "OXX"]), X), GameStatus::Draw);
        assert_eq!(game.status(&board_from(["X..", "...", "..."]), O), GameStatus::Ongoing);
    }

    #[test]
    fn test_forced_move_prefers_win() {
        let game = TicTacToe;
        let board = board_from(["XX.", "OO.", "..."]);
        let mv = game.forced_move(&board, O).unwrap();
        assert_eq!(mv, Placement::new(Position { row: 1, col: 2 }, O));
        let mv = game.forced_move(&board, X).unwrap();
        assert_eq!(mv.pos, Position { row: 0, col: 2 });
    }

    #[test]
    fn test_forced_move_blocks() {
        let game = TicTacToe;
        let board = board_from(["X..", ".X.", "O.."]);
        let mv = game.forced_move(&board, O).unwrap();
        assert_eq!(mv, Placement::new(Position { row: 2, col: 2 }, O));
    }

    #[test]
    fn test_no_moves_after_win() {
        let game = TicTacToe;
        assert!(game.legal_moves(&board_from(["XXX", "OO.", "..."]), O).is_empty());
        assert_eq!(game.legal_moves(&TicTacToeBoard::new(), X).len(), 9);
    }
}
