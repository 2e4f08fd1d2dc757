use crate::engine::config::EngineConfig;
use crate::engine::search::{AlphaBetaEngine, SearchContext};
use crate::engine::{Evaluator, SearchLimit, SearchStats, Searcher};
use crate::logic::board::Side;
use crate::logic::game::{winning_move, Game};
use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use thiserror::Error;

/// Seed of the heuristic tier until [`AiPlayer::with_seed`] overrides it.
pub const DEFAULT_SEED: u64 = 0x5EED_2024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown difficulty `{0}` (expected easy, medium or hard)")]
pub struct ParseDifficultyError(String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ParseDifficultyError(s.to_owned())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strategy {
    /// Weighted random choice after an immediate win/block check.
    Heuristic,
    Search(SearchLimit),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub strategy: Strategy,
    /// Extra weight given to capturing moves by the heuristic tier.
    pub capture_bias: u32,
}

impl DifficultyProfile {
    pub const fn heuristic(capture_bias: u32) -> Self {
        Self {
            strategy: Strategy::Heuristic,
            capture_bias,
        }
    }

    pub const fn search(limit: SearchLimit) -> Self {
        Self {
            strategy: Strategy::Search(limit),
            capture_bias: 0,
        }
    }
}

/// A chosen move plus what the search reported about it. Heuristic choices
/// carry default stats.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision<M> {
    pub mv: M,
    pub stats: SearchStats,
}

/// Computer opponent for one game at one difficulty tier. Owns its search
/// context, so reusing a player keeps the transposition table warm.
pub struct AiPlayer<'g, G: Game> {
    game: &'g G,
    profile: DifficultyProfile,
    engine: AlphaBetaEngine<'g, G>,
    ctx: SearchContext<G::Move>,
    rng: StdRng,
}

impl<'g, G: Game> AiPlayer<'g, G> {
    pub fn new(game: &'g G, difficulty: Difficulty) -> Self {
        Self::with_config(game, difficulty, Arc::new(EngineConfig::default()))
    }

    pub fn with_config(game: &'g G, difficulty: Difficulty, config: Arc<EngineConfig>) -> Self {
        Self::with_profile(game, game.profile(difficulty), config)
    }

    pub fn with_profile(game: &'g G, profile: DifficultyProfile, config: Arc<EngineConfig>) -> Self {
        let ctx = SearchContext::new(game, &config);
        Self {
            game,
            profile,
            engine: AlphaBetaEngine::new(game, config),
            ctx,
            rng: StdRng::seed_from_u64(DEFAULT_SEED),
        }
    }

    /// Fixes the seed of the heuristic tier.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.engine = self.engine.with_cancel(flag);
        self
    }

    pub const fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn reset(&mut self) {
        self.ctx.reset();
    }

    pub fn choose_move(&mut self, board: &G::Board, side: Side) -> Option<G::Move> {
        self.decide(board, side).map(|d| d.mv)
    }

    pub fn decide(&mut self, board: &G::Board, side: Side) -> Option<Decision<G::Move>> {
        match self.profile.strategy {
            Strategy::Heuristic => self.heuristic_move(board, side).map(|mv| Decision {
                mv,
                stats: SearchStats::default(),
            }),
            Strategy::Search(limit) => self
                .engine
                .search(&mut self.ctx, board, side, limit)
                .map(|(mv, stats)| Decision { mv, stats }),
        }
    }

    fn heuristic_move(&mut self, board: &G::Board, side: Side) -> Option<G::Move> {
        let game = self.game;
        let moves = game.search_moves(board, side);
        if moves.len() <= 1 {
            return moves.into_iter().next();
        }
        if let Some(mv) = game.forced_move(board, side) {
            return Some(mv);
        }

        // Avoid handing the opponent a win on the next move when possible.
        let safe: Vec<G::Move> = moves
            .iter()
            .filter(|mv| {
                let next = game.apply(board, mv);
                let replies = game.search_moves(&next, side.opposite());
                winning_move(game, &next, side.opposite(), &replies).is_none()
            })
            .cloned()
            .collect();
        let pool = if safe.is_empty() { moves } else { safe };

        let evaluator = game.evaluator();
        let weights: Vec<u32> = pool
            .iter()
            .map(|mv| {
                let features = evaluator.move_features(board, mv);
                let mut weight = 1;
                if features.is_capture() {
                    weight += self.profile.capture_bias;
                }
                if features.promotion {
                    weight += self.profile.capture_bias / 2;
                }
                weight
            })
            .collect();

        let dist = WeightedIndex::new(&weights).ok()?;
        let idx = dist.sample(&mut self.rng);
        debug!("{}: heuristic pick {idx} of {}", G::NAME, pool.len());
        pool.into_iter().nth(idx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_difficulty() {
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" easy ".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert!("brutal".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Medium.to_string(), "medium");
    }

    #[test]
    fn test_easy_tier_is_reproducible_without_a_seed() {
        use crate::logic::checkers::{Checkers, RED};

        let game = Checkers::default();
        let board = game.initial_board();
        let once = crate::choose_ai_move(&game, &board, RED, Difficulty::Easy);
        assert!(once.is_some());
        assert_eq!(once, crate::choose_ai_move(&game, &board, RED, Difficulty::Easy));

        let mut first = AiPlayer::new(&game, Difficulty::Easy);
        let mut second = AiPlayer::new(&game, Difficulty::Easy);
        for _ in 0..5 {
            assert_eq!(first.choose_move(&board, RED), second.choose_move(&board, RED));
        }
        let reseeded = AiPlayer::new(&game, Difficulty::Easy)
            .with_seed(DEFAULT_SEED)
            .choose_move(&board, RED);
        assert_eq!(reseeded, once);
    }
}
