//! Rules and computer opponents for checkers, xiangqi, gomoku and
//! tic-tac-toe behind one [`Game`] trait and one alpha-beta engine.

pub mod engine;
pub mod logic;
pub mod worker;

pub use engine::config::EngineConfig;
pub use engine::difficulty::{AiPlayer, Difficulty};
pub use logic::board::{Position, Side};
pub use logic::game::{try_apply, Game, GameStatus, MoveError};

/// Every move `side` may play on `board`. Empty once the game is over.
pub fn legal_moves<G: Game>(game: &G, board: &G::Board, side: Side) -> Vec<G::Move> {
    if game.status(board, side).is_terminal() {
        return Vec::new();
    }
    game.legal_moves(board, side)
}

/// One-shot move choice with a fresh player. Keep an [`AiPlayer`] around
/// instead to reuse its transposition table between moves.
pub fn choose_ai_move<G: Game>(
    game: &G,
    board: &G::Board,
    side: Side,
    difficulty: Difficulty,
) -> Option<G::Move> {
    if game.status(board, side).is_terminal() {
        return None;
    }
    AiPlayer::new(game, difficulty).choose_move(board, side)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logic::gomoku::{Gomoku, GomokuBoard, BLACK, WHITE};

    #[test]
    fn test_no_moves_after_five() {
        let game = Gomoku::default();
        let mut board = GomokuBoard::new();
        for col in 0..5 {
            board.place(Position { row: 0, col }, BLACK);
        }
        assert!(legal_moves(&game, &board, WHITE).is_empty());
        assert_eq!(choose_ai_move(&game, &board, WHITE, Difficulty::Hard), None);
    }

    #[test]
    fn test_first_gomoku_move_is_central() {
        let game = Gomoku::default();
        let board = GomokuBoard::new();
        let mv = choose_ai_move(&game, &board, BLACK, Difficulty::Medium).unwrap();
        assert_eq!(mv.pos, Position { row: 7, col: 7 });
    }
}
