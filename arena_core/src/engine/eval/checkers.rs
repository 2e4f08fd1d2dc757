#![allow(clippy::indexing_slicing)]

use crate::engine::config::{apply_scale, ConfigError};
use crate::engine::{Evaluator, MoveFeatures};
use crate::logic::board::{Position, Side};
use crate::logic::checkers::rules::{self, promotion_row};
use crate::logic::checkers::{Checkers, CheckersBoard, CheckersMove, Piece, Rank, BLACK, RED};
use serde::{Deserialize, Serialize};

// Man table indexed by [advance][col] as seen from the owner's side of the
// board, advance 0 = own back rank.
#[rustfmt::skip]
const PST_MAN: [[i32; 8]; 8] = [
    [  4,   0,   4,   0,   4,   0,   4,   0], // Back rank guard
    [  0,   3,   0,   3,   0,   3,   0,   2],
    [  2,   0,   5,   0,   5,   0,   3,   0],
    [  0,   4,   0,   7,   0,   6,   0,   2],
    [  3,   0,   8,   0,   8,   0,   5,   0],
    [  0,   6,   0,   9,   0,   7,   0,   4],
    [  6,   0,  10,   0,  10,   0,   8,   0],
    [  0,   0,   0,   0,   0,   0,   0,   0], // Crowning row
];

#[rustfmt::skip]
const PST_KING: [[i32; 8]; 8] = [
    [ -4,  -2,  -2,  -2,  -2,  -2,  -2,  -4],
    [ -2,   0,   0,   0,   0,   0,   0,  -2],
    [ -2,   0,   4,   4,   4,   4,   0,  -2],
    [ -2,   0,   4,   8,   8,   4,   0,  -2],
    [ -2,   0,   4,   8,   8,   4,   0,  -2],
    [ -2,   0,   4,   4,   4,   4,   0,  -2],
    [ -2,   0,   0,   0,   0,   0,   0,  -2],
    [ -4,  -2,  -2,  -2,  -2,  -2,  -2,  -4],
];

/// Tunable checkers evaluation weights.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckersWeights {
    pub man: i32,
    pub king: i32,
    /// Per row, for men within two rows of crowning.
    pub promotion_proximity: i32,
    /// Per friendly diagonal neighbour.
    pub protection: i32,
    /// Per enemy piece that can be jumped immediately.
    pub threat: i32,
    pub edge_penalty: i32,
    /// Per legal move of difference.
    pub mobility: i32,
    pub center_control: i32,
    pub king_activity: i32,
    pub edge_driving: i32,
    /// At or above this many pieces the opening terms apply.
    pub opening_threshold: usize,
    /// At or below this many pieces the endgame terms apply.
    pub endgame_threshold: usize,
}

impl Default for CheckersWeights {
    fn default() -> Self {
        Self {
            man: 100,
            king: 160,
            promotion_proximity: 8,
            protection: 4,
            threat: 6,
            edge_penalty: 5,
            mobility: 2,
            center_control: 6,
            king_activity: 4,
            edge_driving: 5,
            opening_threshold: 20,
            endgame_threshold: 8,
        }
    }
}

#[derive(Deserialize)]
struct CheckersWeightsJson {
    man: Option<f32>,
    king: Option<f32>,
    promotion_proximity: Option<f32>,
    protection: Option<f32>,
    threat: Option<f32>,
    edge_penalty: Option<f32>,
    mobility: Option<f32>,
    center_control: Option<f32>,
    king_activity: Option<f32>,
    edge_driving: Option<f32>,
    opening_threshold: Option<usize>,
    endgame_threshold: Option<usize>,
}

impl CheckersWeights {
    /// Weights are multipliers of the defaults, thresholds are absolute.
    pub fn load_from_json(json_str: &str) -> Result<Self, ConfigError> {
        let json: CheckersWeightsJson = serde_json::from_str(json_str)?;
        let d = Self::default();
        let weights = Self {
            man: apply_scale(d.man, json.man),
            king: apply_scale(d.king, json.king),
            promotion_proximity: apply_scale(d.promotion_proximity, json.promotion_proximity),
            protection: apply_scale(d.protection, json.protection),
            threat: apply_scale(d.threat, json.threat),
            edge_penalty: apply_scale(d.edge_penalty, json.edge_penalty),
            mobility: apply_scale(d.mobility, json.mobility),
            center_control: apply_scale(d.center_control, json.center_control),
            king_activity: apply_scale(d.king_activity, json.king_activity),
            edge_driving: apply_scale(d.edge_driving, json.edge_driving),
            opening_threshold: json.opening_threshold.unwrap_or(d.opening_threshold),
            endgame_threshold: json.endgame_threshold.unwrap_or(d.endgame_threshold),
        };
        if weights.endgame_threshold >= weights.opening_threshold {
            return Err(ConfigError::Invalid {
                field: "endgame_threshold",
                reason: "must be below opening_threshold",
            });
        }
        Ok(weights)
    }
}

#[derive(Debug, Clone, Default)]
pub struct CheckersEvaluator {
    weights: CheckersWeights,
}

/// `(advance, col)` of `pos` seen from `side`'s end of the board. Black's
/// view is the red view rotated by 180 degrees.
const fn view(side: Side, pos: Position) -> (usize, usize) {
    match side {
        Side::First => (7 - pos.row as usize, pos.col as usize),
        Side::Second => (pos.row as usize, 7 - pos.col as usize),
    }
}

const fn pst(piece: Piece, pos: Position) -> i32 {
    match piece.rank {
        Rank::Man => {
            let (advance, col) = view(piece.side, pos);
            PST_MAN[advance][col]
        }
        Rank::King => PST_KING[pos.row as usize][pos.col as usize],
    }
}

const fn is_edge(pos: Position) -> bool {
    pos.col == 0 || pos.col == 7
}

/// Chebyshev-style distance to the four centre squares, 0..=3.
const fn center_distance(pos: Position) -> i32 {
    let dr = (2 * pos.row as i32 - 7).abs() / 2;
    let dc = (2 * pos.col as i32 - 7).abs() / 2;
    if dr > dc {
        dr
    } else {
        dc
    }
}

impl CheckersEvaluator {
    pub const fn new(weights: CheckersWeights) -> Self {
        Self { weights }
    }

    const fn base_value(&self, piece: Piece) -> i32 {
        match piece.rank {
            Rank::Man => self.weights.man,
            Rank::King => self.weights.king,
        }
    }

    fn protectors(board: &CheckersBoard, pos: Position, side: Side) -> i32 {
        let mut count = 0;
        for (dr, dc) in [(-1, -1), (-1, 1), (1, -1), (1, 1)] {
            if pos
                .offset(dr, dc, 8, 8)
                .and_then(|p| board.get(p))
                .is_some_and(|p| p.side == side)
            {
                count += 1;
            }
        }
        count
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    fn side_total(&self, board: &CheckersBoard, side: Side, total_pieces: usize) -> i32 {
        let w = &self.weights;
        let opening = total_pieces >= w.opening_threshold;
        let endgame = total_pieces <= w.endgame_threshold;
        let mut score = 0;

        for (pos, piece) in board.pieces(side) {
            score += self.base_value(piece) + pst(piece, pos);

            if piece.rank == Rank::Man {
                let to_go = 7 - view(side, pos).0 as i32;
                if to_go <= 2 {
                    score += w.promotion_proximity * (3 - to_go);
                }
            }
            score += w.protection * Self::protectors(board, pos, side);
            score += w.threat * rules::jump_targets(board, pos, piece) as i32;
            if is_edge(pos) {
                score -= w.edge_penalty;
            }

            if opening && center_distance(pos) <= 1 {
                score += w.center_control;
            }
            if endgame && piece.is_king() {
                score += w.king_activity * (3 - center_distance(pos));
            }
        }

        // A material lead in the endgame wants the loser pushed to the edge.
        if endgame {
            let own = board.count(side);
            let theirs = board.count(side.opposite());
            if own > theirs {
                let cornered = board
                    .pieces(side.opposite())
                    .filter(|&(p, _)| is_edge(p) || p.row == 0 || p.row == 7)
                    .count();
                score += w.edge_driving * cornered as i32;
            }
        }

        score += w.mobility * rules::legal_moves(board, side).len() as i32;
        score
    }
}

impl Evaluator<Checkers> for CheckersEvaluator {
    fn evaluate(&self, board: &CheckersBoard, side: Side) -> i32 {
        let total = board.total_pieces();
        let red = self.side_total(board, RED, total);
        let black = self.side_total(board, BLACK, total);
        if side == RED {
            red - black
        } else {
            black - red
        }
    }

    fn move_features(&self, board: &CheckersBoard, mv: &CheckersMove) -> MoveFeatures {
        let Some(piece) = board.get(mv.from) else {
            return MoveFeatures::default();
        };
        let capture_value = mv
            .captures
            .iter()
            .filter_map(|&p| board.get(p))
            .map(|victim| self.base_value(victim))
            .sum();
        let promotion = piece.rank == Rank::Man && mv.to.row == promotion_row(piece.side);
        MoveFeatures {
            capture_value,
            promotion,
            positional_delta: pst(piece, mv.to) - pst(piece, mv.from),
        }
    }
}
