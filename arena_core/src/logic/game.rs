use crate::engine::difficulty::{Difficulty, DifficultyProfile};
use crate::engine::Evaluator;
use crate::logic::board::Side;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Ongoing,
    Win(Side), // Winner
    Draw,
}

impl GameStatus {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Ongoing)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("the game is already over")]
    GameOver,
    #[error("move is not legal for the side to move")]
    Illegal,
}

/// Rules of one two-player board game: move generation, move application and
/// terminal detection, plus the hooks the search engine needs (hashing,
/// move indexing, tactical shortcuts, difficulty tuning).
///
/// Boards are treated as values. `apply` never mutates its input.
pub trait Game: Sized {
    type Board: Clone + Debug;
    type Move: Clone + PartialEq + Debug;
    type Eval: Evaluator<Self>;

    const NAME: &'static str;
    /// Score of a win at the root. Heuristic scores stay well below
    /// `WIN_SCORE - MAX_PLY` so proven results are distinguishable.
    const WIN_SCORE: i32;

    fn initial_board(&self) -> Self::Board;

    fn legal_moves(&self, board: &Self::Board, side: Side) -> Vec<Self::Move>;

    /// Moves the search should consider. Defaults to every legal move; games
    /// with huge branching factors narrow this to plausible candidates.
    fn search_moves(&self, board: &Self::Board, side: Side) -> Vec<Self::Move> {
        self.legal_moves(board, side)
    }

    /// Returns the successor board. Passing a move that was not produced by
    /// `legal_moves` for this board is a contract violation and panics.
    fn apply(&self, board: &Self::Board, mv: &Self::Move) -> Self::Board;

    fn status(&self, board: &Self::Board, side_to_move: Side) -> GameStatus;

    fn hash(&self, board: &Self::Board, side_to_move: Side) -> u64;

    /// Dense index of a move for the history table, `< move_index_space()`.
    fn move_index(&self, mv: &Self::Move) -> usize;

    fn move_index_space(&self) -> usize;

    /// Immediate-tactics pass run before any search. The default only looks
    /// for a move that wins on the spot.
    fn forced_move(&self, board: &Self::Board, side: Side) -> Option<Self::Move> {
        winning_move(self, board, side, &self.search_moves(board, side))
    }

    fn evaluator(&self) -> Self::Eval;

    fn profile(&self, difficulty: Difficulty) -> DifficultyProfile;
}

/// First move among `moves` that ends the game in `side`'s favour.
pub fn winning_move<G: Game>(
    game: &G,
    board: &G::Board,
    side: Side,
    moves: &[G::Move],
) -> Option<G::Move> {
    moves
        .iter()
        .find(|mv| {
            let next = game.apply(board, mv);
            game.status(&next, side.opposite()) == GameStatus::Win(side)
        })
        .cloned()
}

/// Validates a caller-supplied move against the generator before applying it.
pub fn try_apply<G: Game>(
    game: &G,
    board: &G::Board,
    side: Side,
    mv: &G::Move,
) -> Result<G::Board, MoveError> {
    if game.status(board, side).is_terminal() {
        return Err(MoveError::GameOver);
    }
    if !game.legal_moves(board, side).contains(mv) {
        return Err(MoveError::Illegal);
    }
    Ok(game.apply(board, mv))
}
