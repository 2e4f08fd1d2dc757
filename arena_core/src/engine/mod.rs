use crate::logic::board::Side;
use crate::logic::game::Game;
use serde::{Deserialize, Serialize};

pub mod config;
pub mod difficulty;
pub mod eval;
pub mod ordering;
pub mod search;
pub mod tactics;
pub mod tt;
pub mod zobrist;

/// Deepest ply the search will ever reach; sizes the killer table.
pub const MAX_PLY: usize = 64;

/// Larger than any score the search can produce, still safe to negate.
pub const INFINITY: i32 = 1_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimit {
    pub max_depth: u8,
    pub time_ms: Option<u64>, // milliseconds
    /// `false` runs a single pass at `max_depth`.
    pub iterative: bool,
}

impl SearchLimit {
    #[allow(clippy::cast_possible_truncation)]
    const DEPTH_CAP: u8 = (MAX_PLY - 1) as u8;

    /// Iterative deepening up to `depth`, no clock.
    pub const fn depth(depth: u8) -> Self {
        Self {
            max_depth: depth,
            time_ms: None,
            iterative: true,
        }
    }

    /// One pass at exactly `depth`.
    pub const fn fixed_depth(depth: u8) -> Self {
        Self {
            max_depth: depth,
            time_ms: None,
            iterative: false,
        }
    }

    /// Iterative deepening until the clock runs out.
    pub const fn time(ms: u64) -> Self {
        Self {
            max_depth: Self::DEPTH_CAP,
            time_ms: Some(ms),
            iterative: true,
        }
    }

    #[must_use]
    pub const fn with_time(mut self, ms: u64) -> Self {
        self.time_ms = Some(ms);
        self
    }

    pub fn capped_depth(&self) -> u8 {
        self.max_depth.clamp(1, Self::DEPTH_CAP)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStats {
    pub depth: u8,
    pub nodes: u64,
    pub time_ms: u64,
    pub score: i32,
}

/// Per-move facts the move orderer uses. Produced by the evaluator because
/// capture values and positional tables are evaluation knowledge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveFeatures {
    pub capture_value: i32,
    pub promotion: bool,
    pub positional_delta: i32,
}

impl MoveFeatures {
    pub const fn is_capture(&self) -> bool {
        self.capture_value > 0
    }
}

/// Static evaluation of a non-terminal board. Positive favours `side`, and
/// `evaluate(b, s) == -evaluate(b, s.opposite())` for every board.
pub trait Evaluator<G: Game> {
    fn evaluate(&self, board: &G::Board, side: Side) -> i32;

    fn move_features(&self, _board: &G::Board, _mv: &G::Move) -> MoveFeatures {
        MoveFeatures::default()
    }
}

pub trait Searcher<G: Game> {
    fn search(
        &mut self,
        ctx: &mut search::SearchContext<G::Move>,
        board: &G::Board,
        side: Side,
        limit: SearchLimit,
    ) -> Option<(G::Move, SearchStats)>;
}
