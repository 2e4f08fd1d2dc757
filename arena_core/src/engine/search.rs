use crate::engine::config::EngineConfig;
use crate::engine::ordering::MoveOrderer;
use crate::engine::tt::{TTFlag, TranspositionTable};
use crate::engine::{Evaluator, SearchLimit, SearchStats, Searcher, INFINITY, MAX_PLY};
use crate::logic::board::Side;
use crate::logic::game::{Game, GameStatus};
use log::{debug, info, trace};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Mutable state of a search that the caller owns: the transposition table
/// and the killer/history tables. One context per concurrent search.
pub struct SearchContext<M> {
    tt: TranspositionTable<M>,
    orderer: MoveOrderer<M>,
}

impl<M: Clone + PartialEq> SearchContext<M> {
    pub fn new<G: Game<Move = M>>(game: &G, config: &EngineConfig) -> Self {
        Self {
            tt: TranspositionTable::new(config.tt_size_mb),
            orderer: MoveOrderer::new(game.move_index_space()),
        }
    }

    /// Drops every cached result and heuristic score.
    pub fn reset(&mut self) {
        self.tt.clear();
        self.orderer.clear();
    }
}

/// Iterative-deepening negamax with alpha-beta pruning, principal variation
/// search, a transposition table, and killer/history move ordering.
pub struct AlphaBetaEngine<'g, G: Game> {
    game: &'g G,
    evaluator: G::Eval,
    config: Arc<EngineConfig>,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'g, G: Game> AlphaBetaEngine<'g, G> {
    pub fn new(game: &'g G, config: Arc<EngineConfig>) -> Self {
        Self {
            game,
            evaluator: game.evaluator(),
            config,
            cancel: None,
        }
    }

    /// Polls `flag` alongside the clock; once set, the search returns the
    /// best move of the deepest completed iteration.
    #[must_use]
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Score threshold above which a result is a proven win.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub const fn forced_win_threshold() -> i32 {
        G::WIN_SCORE - MAX_PLY as i32
    }
}

fn score_to_tt(score: i32, ply: usize, threshold: i32) -> i32 {
    let ply = i32::try_from(ply).unwrap_or(0);
    if score >= threshold {
        score + ply
    } else if score <= -threshold {
        score - ply
    } else {
        score
    }
}

fn score_from_tt(score: i32, ply: usize, threshold: i32) -> i32 {
    let ply = i32::try_from(ply).unwrap_or(0);
    if score >= threshold {
        score - ply
    } else if score <= -threshold {
        score + ply
    } else {
        score
    }
}

struct Run<'a, 'g, G: Game> {
    engine: &'a AlphaBetaEngine<'g, G>,
    ctx: &'a mut SearchContext<G::Move>,
    nodes: u64,
    deadline: Option<Instant>,
    stoppable: bool,
    stopped: bool,
}

impl<G: Game> Run<'_, '_, G> {
    fn should_stop(&mut self, poll_clock: bool) -> bool {
        if !self.stoppable {
            return false;
        }
        if self.stopped {
            return true;
        }
        if self
            .engine
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            self.stopped = true;
        } else if let Some(deadline) = self.deadline {
            if (poll_clock || self.nodes % self.engine.config.time_check_interval == 0)
                && Instant::now() >= deadline
            {
                self.stopped = true;
            }
        }
        self.stopped
    }

    fn static_eval(&self, board: &G::Board, side: Side) -> i32 {
        let bound = AlphaBetaEngine::<G>::forced_win_threshold() - 1;
        self.engine.evaluator.evaluate(board, side).clamp(-bound, bound)
    }

    fn order(
        &self,
        board: &G::Board,
        moves: Vec<G::Move>,
        ply: usize,
        hash_move: Option<&G::Move>,
    ) -> Vec<G::Move> {
        self.ctx.orderer.order(
            self.engine.game,
            &self.engine.evaluator,
            &self.engine.config,
            board,
            moves,
            ply,
            hash_move,
        )
    }

    /// One full-width pass over the root moves. `None` when the pass was
    /// interrupted and must be discarded.
    fn search_root(
        &mut self,
        board: &G::Board,
        side: Side,
        moves: &[G::Move],
        depth: u8,
    ) -> Option<(G::Move, i32)> {
        let game = self.engine.game;
        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best: Option<(G::Move, i32)> = None;

        for (i, mv) in moves.iter().enumerate() {
            if i > 0 && self.should_stop(true) {
                return None;
            }
            let child = game.apply(board, mv);
            let score = if i == 0 {
                -self.negamax(&child, side.opposite(), depth - 1, -beta, -alpha, 1)?
            } else {
                // Root PVS
                let s = -self.negamax(&child, side.opposite(), depth - 1, -alpha - 1, -alpha, 1)?;
                if s > alpha {
                    -self.negamax(&child, side.opposite(), depth - 1, -beta, -alpha, 1)?
                } else {
                    s
                }
            };

            if best.as_ref().map_or(true, |(_, b)| score > *b) {
                best = Some((mv.clone(), score));
            }
            alpha = alpha.max(score);
        }
        best
    }

    fn negamax(
        &mut self,
        board: &G::Board,
        side: Side,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        ply: usize,
    ) -> Option<i32> {
        self.nodes += 1;
        if self.should_stop(false) {
            return None;
        }

        let game = self.engine.game;
        let threshold = AlphaBetaEngine::<G>::forced_win_threshold();
        #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
        let mate = G::WIN_SCORE - ply as i32;

        match game.status(board, side) {
            GameStatus::Win(winner) => return Some(if winner == side { mate } else { -mate }),
            GameStatus::Draw => return Some(0),
            GameStatus::Ongoing => {}
        }

        if depth == 0 || ply >= MAX_PLY - 1 {
            return Some(self.static_eval(board, side));
        }

        // TT Probe
        let key = game.hash(board, side);
        let cached = self
            .ctx
            .tt
            .probe(key)
            .map(|e| (e.best_move.clone(), e.score, e.depth, e.flag));
        let mut hash_move = None;
        if let Some((best_move, score, entry_depth, flag)) = cached {
            hash_move = best_move;
            if entry_depth >= depth {
                let score = score_from_tt(score, ply, threshold);
                match flag {
                    TTFlag::Exact => return Some(score),
                    TTFlag::LowerBound => alpha = alpha.max(score),
                    TTFlag::UpperBound => beta = beta.min(score),
                }
                if alpha >= beta {
                    return Some(score);
                }
            }
        }

        let moves = game.search_moves(board, side);
        if moves.is_empty() {
            return Some(-mate);
        }
        let moves = self.order(board, moves, ply, hash_move.as_ref());

        let alpha_orig = alpha;
        let mut best_score = -INFINITY;
        let mut best_move = None;

        for (moves_searched, mv) in moves.iter().enumerate() {
            let child = game.apply(board, mv);

            // PVS (Principal Variation Search)
            let score = if moves_searched == 0 {
                -self.negamax(&child, side.opposite(), depth - 1, -beta, -alpha, ply + 1)?
            } else {
                let s = -self.negamax(
                    &child,
                    side.opposite(),
                    depth - 1,
                    -alpha - 1,
                    -alpha,
                    ply + 1,
                )?;
                if s > alpha && s < beta {
                    // Fail high: re-search with the full window
                    -self.negamax(&child, side.opposite(), depth - 1, -beta, -alpha, ply + 1)?
                } else {
                    s
                }
            };

            if score > best_score {
                best_score = score;
                best_move = Some(mv.clone());
            }
            if score > alpha {
                alpha = score;
            }

            if alpha >= beta {
                if !self.engine.evaluator.move_features(board, mv).is_capture() {
                    self.ctx
                        .orderer
                        .record_cutoff(mv, game.move_index(mv), ply, depth);
                }
                break;
            }
        }

        let flag = if best_score <= alpha_orig {
            TTFlag::UpperBound
        } else if best_score >= beta {
            TTFlag::LowerBound
        } else {
            TTFlag::Exact
        };
        self.ctx.tt.store(
            key,
            best_move,
            score_to_tt(best_score, ply, threshold),
            depth,
            flag,
        );

        Some(best_score)
    }
}

impl<G: Game> Searcher<G> for AlphaBetaEngine<'_, G> {
    fn search(
        &mut self,
        ctx: &mut SearchContext<G::Move>,
        board: &G::Board,
        side: Side,
        limit: SearchLimit,
    ) -> Option<(G::Move, SearchStats)> {
        let start = Instant::now();
        let game = self.game;

        let moves = game.search_moves(board, side);
        if moves.is_empty() {
            debug!("{}: no legal moves for {side:?}", G::NAME);
            return None;
        }
        if moves.len() == 1 {
            return moves
                .into_iter()
                .next()
                .map(|mv| (mv, SearchStats::default()));
        }
        if let Some(mv) = game.forced_move(board, side) {
            trace!("{}: immediate tactic {mv:?}", G::NAME);
            return Some((mv, SearchStats::default()));
        }

        ctx.orderer.clear();
        ctx.tt.new_search();

        let deadline = limit.time_ms.map(|ms| start + Duration::from_millis(ms));
        #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let soft_deadline = limit.time_ms.map(|ms| {
            let soft = (ms as f64 * f64::from(self.config.soft_time_ratio)) as u64;
            start + Duration::from_millis(soft)
        });

        let threshold = Self::forced_win_threshold();
        let root_key = game.hash(board, side);
        let max_depth = limit.capped_depth();
        let first_depth = if limit.iterative { 1 } else { max_depth };

        let mut run = Run {
            engine: &*self,
            ctx,
            nodes: 0,
            deadline,
            stoppable: false,
            stopped: false,
        };

        let mut best: Option<(G::Move, i32)> = None;
        let mut final_depth = 0;

        for depth in first_depth..=max_depth {
            if best.is_some() {
                // Check soft limit before starting a new depth
                if soft_deadline.is_some_and(|sl| Instant::now() >= sl) || run.should_stop(true) {
                    break;
                }
            }

            let hash_move = best
                .as_ref()
                .map(|(mv, _)| mv.clone())
                .or_else(|| run.ctx.tt.get_move(root_key));
            let ordered = run.order(board, moves.clone(), 0, hash_move.as_ref());

            // The first completed iteration is never interrupted.
            run.stoppable = best.is_some();

            let Some((mv, score)) = run.search_root(board, side, &ordered, depth) else {
                debug!("{}: depth {depth} interrupted, keeping depth {final_depth}", G::NAME);
                break;
            };

            debug!(
                "{}: depth {depth} score {score} nodes {} best {mv:?} hashfull {}",
                G::NAME,
                run.nodes,
                run.ctx.tt.hashfull()
            );
            run.ctx.tt.store(
                root_key,
                Some(mv.clone()),
                score_to_tt(score, 0, threshold),
                depth,
                TTFlag::Exact,
            );
            best = Some((mv, score));
            final_depth = depth;

            if score.abs() >= threshold {
                break;
            }
        }

        let nodes = run.nodes;
        #[allow(clippy::cast_possible_truncation)]
        let time_ms = start.elapsed().as_millis() as u64;
        best.map(|(mv, score)| {
            info!(
                "{}: chose {mv:?} (depth {final_depth}, score {score}, {nodes} nodes, {time_ms} ms)",
                G::NAME
            );
            (
                mv,
                SearchStats {
                    depth: final_depth,
                    nodes,
                    time_ms,
                    score,
                },
            )
        })
    }
}
