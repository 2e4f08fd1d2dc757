#![allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]

#[cfg(test)]
mod tests {
    use arena_core::engine::config::EngineConfig;
    use arena_core::engine::search::{AlphaBetaEngine, SearchContext};
    use arena_core::engine::{Evaluator, SearchLimit, SearchStats, Searcher};
    use arena_core::logic::checkers::{Checkers, CheckersBoard, Piece, BLACK, RED};
    use arena_core::logic::gomoku::Gomoku;
    use arena_core::logic::tictactoe::{TicTacToe, TicTacToeBoard, O, X};
    use arena_core::{choose_ai_move, Difficulty, Game, GameStatus, Position, Side};
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;
    use std::sync::Arc;

    fn pos(row: u8, col: u8) -> Position {
        Position { row, col }
    }

    /// Full-width negamax over `search_moves` with no pruning and no table.
    /// Leaves and terminal nodes are scored exactly as the engine scores them.
    fn minimax<G: Game>(
        game: &G,
        eval: &G::Eval,
        board: &G::Board,
        side: Side,
        depth: u8,
        ply: usize,
    ) -> i32 {
        let mate = G::WIN_SCORE - i32::try_from(ply).unwrap();
        match game.status(board, side) {
            GameStatus::Win(winner) => return if winner == side { mate } else { -mate },
            GameStatus::Draw => return 0,
            GameStatus::Ongoing => {}
        }
        if depth == 0 {
            let bound = AlphaBetaEngine::<G>::forced_win_threshold() - 1;
            return eval.evaluate(board, side).clamp(-bound, bound);
        }
        game.search_moves(board, side)
            .iter()
            .map(|mv| {
                let child = game.apply(board, mv);
                -minimax(game, eval, &child, side.opposite(), depth - 1, ply + 1)
            })
            .max()
            .unwrap_or(-mate)
    }

    fn search<G: Game>(
        game: &G,
        board: &G::Board,
        side: Side,
        limit: SearchLimit,
    ) -> (G::Move, SearchStats) {
        let config = Arc::new(EngineConfig::default());
        let mut ctx = SearchContext::new(game, &config);
        AlphaBetaEngine::new(game, config)
            .search(&mut ctx, board, side, limit)
            .expect("position has moves")
    }

    /// Positions met during seeded random play where the engine really
    /// searches: the game is on, there is a choice, and nothing wins at once.
    fn sample<G: Game>(
        game: &G,
        seeds: &[u64],
        plies: usize,
        keep: impl Fn(&G::Board) -> bool,
    ) -> Vec<(G::Board, Side)> {
        let mut positions = Vec::new();
        for &seed in seeds {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut board = game.initial_board();
            let mut side = Side::First;
            for _ in 0..plies {
                if game.status(&board, side).is_terminal() {
                    break;
                }
                if game.search_moves(&board, side).len() > 1
                    && game.forced_move(&board, side).is_none()
                    && keep(&board)
                {
                    positions.push((board.clone(), side));
                }
                let moves = game.legal_moves(&board, side);
                let Some(mv) = moves.choose(&mut rng) else {
                    break;
                };
                board = game.apply(&board, mv);
                side = side.opposite();
            }
        }
        positions
    }

    fn assert_agrees_with_minimax<G: Game>(game: &G, positions: &[(G::Board, Side)], depth: u8) {
        let eval = game.evaluator();
        for (board, side) in positions {
            let (mv, stats) = search(game, board, *side, SearchLimit::fixed_depth(depth));
            let expected = minimax(game, &eval, board, *side, depth, 0);
            assert_eq!(stats.score, expected, "{} score differs on {board:?}", G::NAME);

            let child = game.apply(board, &mv);
            let reached = -minimax(game, &eval, &child, side.opposite(), depth - 1, 1);
            assert_eq!(reached, expected, "{} chose {mv:?} on {board:?}", G::NAME);
        }
    }

    #[test]
    fn test_checkers_search_matches_minimax() {
        let game = Checkers::default();
        // Men only ever advance, so no position repeats at a different depth.
        let positions = sample(&game, &[1, 7, 42], 40, |board: &CheckersBoard| {
            board
                .pieces(RED)
                .chain(board.pieces(BLACK))
                .all(|(_, piece)| !piece.is_king())
        });
        assert!(positions.len() >= 10, "only {} positions", positions.len());
        assert_agrees_with_minimax(&game, &positions, 4);
    }

    #[test]
    fn test_gomoku_search_matches_minimax() {
        let game = Gomoku::default();
        let positions: Vec<_> = sample(&game, &[3, 11], 12, |_| true)
            .into_iter()
            .step_by(2)
            .collect();
        assert!(positions.len() >= 5, "only {} positions", positions.len());
        assert_agrees_with_minimax(&game, &positions, 3);
    }

    fn tictactoe(xs: &[(u8, u8)], os: &[(u8, u8)]) -> TicTacToeBoard {
        let mut board = TicTacToeBoard::new();
        for &(r, c) in xs {
            board.place(pos(r, c), X);
        }
        for &(r, c) in os {
            board.place(pos(r, c), O);
        }
        board
    }

    #[test]
    fn test_faster_win_scores_higher() {
        let game = TicTacToe;

        // (0, 0) forks the top row and the left column.
        let fork = tictactoe(&[(0, 2), (1, 0)], &[(1, 1), (1, 2)]);
        let (mv, stats) = search(&game, &fork, X, SearchLimit::fixed_depth(9));
        assert_eq!(mv.pos, pos(0, 0));
        assert_eq!(stats.score, TicTacToe::WIN_SCORE - 3);

        let slow = tictactoe(&[(2, 2)], &[(2, 1)]);
        let (_, slow_stats) = search(&game, &slow, X, SearchLimit::fixed_depth(9));
        assert_eq!(slow_stats.score, TicTacToe::WIN_SCORE - 5);
        assert!(stats.score > slow_stats.score);

        // Iterative deepening stops at the first proven win with the same distance.
        let (_, deepened) = search(&game, &fork, X, SearchLimit::depth(9));
        assert_eq!(deepened.score, stats.score);
        assert_eq!(deepened.depth, 3);
    }

    /// Red gives up a man on (5, 4) so black's only move opens a recapture,
    /// after which black has nothing left that can survive.
    fn sacrifice_shot() -> CheckersBoard {
        let mut board = CheckersBoard::empty();
        for (r, c) in [(3, 4), (6, 5), (7, 6)] {
            board.set(pos(r, c), Some(Piece::man(RED)));
        }
        for (r, c) in [(1, 4), (4, 3)] {
            board.set(pos(r, c), Some(Piece::man(BLACK)));
        }
        board
    }

    #[test]
    fn test_checkers_shot_solved_at_hard() {
        let game = Checkers::default();
        let board = sacrifice_shot();
        assert!(game.legal_moves(&board, RED).iter().all(|m| !m.is_capture()));

        let mv = choose_ai_move(&game, &board, RED, Difficulty::Hard).unwrap();
        assert_eq!((mv.from, mv.to), (pos(6, 5), pos(5, 4)));

        let (_, stats) = search(&game, &board, RED, SearchLimit::depth(20));
        assert_eq!(stats.score, Checkers::WIN_SCORE - 5);

        let reply = game.legal_moves(&game.apply(&board, &mv), BLACK);
        assert_eq!(reply.len(), 1);
        assert!(reply[0].is_capture());
    }
}
