#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

#[cfg(test)]
mod tests {
    use arena_core::engine::config::EngineConfig;
    use arena_core::engine::search::{AlphaBetaEngine, SearchContext};
    use arena_core::engine::{SearchLimit, Searcher};
    use arena_core::logic::checkers::{Checkers, CheckersBoard, Piece, BLACK, RED};
    use arena_core::logic::gomoku::{self, Gomoku, GomokuBoard, WHITE};
    use arena_core::logic::tictactoe::{TicTacToe, TicTacToeBoard, O, X};
    use arena_core::{choose_ai_move, legal_moves, Difficulty, Game, GameStatus, Position, Side};
    use std::sync::Arc;

    const TIERS: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    fn pos(row: u8, col: u8) -> Position {
        Position { row, col }
    }

    fn open_four() -> GomokuBoard {
        let mut board = GomokuBoard::new();
        for col in 4..=7 {
            board.place(pos(7, col), gomoku::BLACK);
        }
        // White's replies, kept away from the row.
        for col in [0, 2, 4] {
            board.place(pos(0, col), WHITE);
        }
        board
    }

    #[test]
    fn test_gomoku_completes_open_four() {
        let game = Gomoku::default();
        let board = open_four();
        for difficulty in TIERS {
            let mv = choose_ai_move(&game, &board, gomoku::BLACK, difficulty).unwrap();
            assert!(
                mv.pos == pos(7, 3) || mv.pos == pos(7, 8),
                "{difficulty}: {}",
                mv.pos
            );
            let next = game.apply(&board, &mv);
            assert_eq!(game.status(&next, WHITE), GameStatus::Win(gomoku::BLACK));
        }
    }

    #[test]
    fn test_gomoku_blocks_open_four() {
        let game = Gomoku::default();
        let board = open_four();
        for difficulty in TIERS {
            let mv = choose_ai_move(&game, &board, WHITE, difficulty).unwrap();
            assert!(
                mv.pos == pos(7, 3) || mv.pos == pos(7, 8),
                "{difficulty}: {}",
                mv.pos
            );
        }
    }

    #[test]
    fn test_checkers_single_capture_is_forced() {
        let mut board = CheckersBoard::empty();
        board.set(pos(5, 2), Some(Piece::man(RED)));
        board.set(pos(7, 0), Some(Piece::man(RED)));
        board.set(pos(4, 3), Some(Piece::man(BLACK)));
        board.set(pos(0, 7), Some(Piece::man(BLACK)));

        let moves = legal_moves(&Checkers::default(), &board, RED);
        assert_eq!(moves.len(), 1);
        let mv = &moves[0];
        assert_eq!(mv.from, pos(5, 2));
        assert_eq!(mv.to, pos(3, 4));
        assert_eq!(mv.captures, vec![pos(4, 3)]);
    }

    #[test]
    fn test_checkers_promotion_grants_backward_moves() {
        let game = Checkers::default();
        let mut board = CheckersBoard::empty();
        board.set(pos(1, 2), Some(Piece::man(RED)));
        board.set(pos(2, 7), Some(Piece::man(BLACK)));

        let mv = game
            .legal_moves(&board, RED)
            .into_iter()
            .find(|m| m.to == pos(0, 1))
            .unwrap();
        let board = game.apply(&board, &mv);
        assert_eq!(board.get(pos(0, 1)), Some(Piece::king(RED)));

        let targets: Vec<Position> = game
            .legal_moves(&board, RED)
            .into_iter()
            .map(|m| m.to)
            .collect();
        assert!(targets.contains(&pos(1, 0)));
        assert!(targets.contains(&pos(1, 2)));
    }

    /// Plays every human reply against the engine and returns the worst
    /// result seen from the engine's point of view.
    fn worst_outcome(board: &TicTacToeBoard, to_move: Side, engine_side: Side) -> i32 {
        let game = TicTacToe;
        match game.status(board, to_move) {
            GameStatus::Win(winner) => return if winner == engine_side { 1 } else { -1 },
            GameStatus::Draw => return 0,
            GameStatus::Ongoing => {}
        }
        if to_move == engine_side {
            let mv = choose_ai_move(&game, board, to_move, Difficulty::Hard).unwrap();
            worst_outcome(&game.apply(board, &mv), to_move.opposite(), engine_side)
        } else {
            game.legal_moves(board, to_move)
                .iter()
                .map(|mv| worst_outcome(&game.apply(board, mv), to_move.opposite(), engine_side))
                .min()
                .unwrap_or(0)
        }
    }

    #[test]
    fn test_tictactoe_hard_never_loses() {
        let board = TicTacToeBoard::new();
        assert!(worst_outcome(&board, X, X) >= 0);
        assert!(worst_outcome(&board, X, O) >= 0);
    }

    #[test]
    fn test_warm_table_agrees_with_fresh_table() {
        let game = TicTacToe;
        let mut board = TicTacToeBoard::new();
        board.place(pos(0, 0), O);
        board.place(pos(1, 2), X);
        let limit = SearchLimit::fixed_depth(7);
        let config = Arc::new(EngineConfig::default());

        let mut engine = AlphaBetaEngine::new(&game, Arc::clone(&config));
        let mut fresh = SearchContext::new(&game, &config);
        let (cold_move, cold) = engine.search(&mut fresh, &board, X, limit).unwrap();
        let (warm_move, warm) = engine.search(&mut fresh, &board, X, limit).unwrap();

        let mut other = SearchContext::new(&game, &config);
        let (again_move, again) = engine.search(&mut other, &board, X, limit).unwrap();

        // Only the corner wins outright.
        assert_eq!(cold_move.pos, pos(0, 2));
        assert_eq!(warm_move, cold_move);
        assert_eq!(again_move, cold_move);
        assert_eq!(warm.score, cold.score);
        assert_eq!(again.score, cold.score);
        assert!(cold.score >= AlphaBetaEngine::<TicTacToe>::forced_win_threshold());
    }

    #[test]
    fn test_checkers_warm_table_keeps_score() {
        let game = Checkers::default();
        let board = game.initial_board();
        let limit = SearchLimit::fixed_depth(3);
        let config = Arc::new(EngineConfig::default());

        let mut engine = AlphaBetaEngine::new(&game, Arc::clone(&config));
        let mut ctx = SearchContext::new(&game, &config);
        let (_, cold) = engine.search(&mut ctx, &board, RED, limit).unwrap();
        let (warm_move, warm) = engine.search(&mut ctx, &board, RED, limit).unwrap();

        assert_eq!(warm.score, cold.score);
        assert!(game.legal_moves(&board, RED).contains(&warm_move));
    }
}
