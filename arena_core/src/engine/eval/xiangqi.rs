use crate::engine::{Evaluator, MoveFeatures};
use crate::logic::board::{Position, Side};
use crate::logic::xiangqi::rules::slider_mobility;
use crate::logic::xiangqi::{Piece, PieceKind, Xiangqi, XiangqiBoard, XiangqiMove, RED};

// Piece Values
pub const VAL_SOLDIER: i32 = 100;
pub const VAL_ADVISOR: i32 = 200;
pub const VAL_ELEPHANT: i32 = 200;
pub const VAL_HORSE: i32 = 400;
pub const VAL_CANNON: i32 = 450;
pub const VAL_CHARIOT: i32 = 900;
pub const VAL_GENERAL: i32 = 10000;

pub const WEIGHT_MOBILITY_CHARIOT: i32 = 2;
pub const WEIGHT_MOBILITY_CANNON: i32 = 1;

// Piece-square tables from red's side, row 0 = red's back rank. Black reads
// them mirrored vertically.

#[rustfmt::skip]
const PST_SOLDIER: [[i32; 9]; 10] = [
    [  0,   0,   0,   0,   0,   0,   0,   0,   0],
    [  0,   0,   0,   0,   0,   0,   0,   0,   0],
    [  0,   0,   0,   0,   0,   0,   0,   0,   0],
    [  0,   0,  -2,   0,   4,   0,  -2,   0,   0], // Starting row
    [  2,   0,   8,   0,   8,   0,   8,   0,   2], // River bank
    [  6,  12,  18,  18,  20,  18,  18,  12,   6], // Crossed
    [ 10,  20,  30,  34,  40,  34,  30,  20,  10],
    [ 14,  26,  42,  60,  80,  60,  42,  26,  14],
    [ 18,  36,  56,  80, 120,  80,  56,  36,  18],
    [  0,   3,   6,   9,  12,   9,   6,   3,   0], // Last rank
];

#[rustfmt::skip]
const PST_HORSE: [[i32; 9]; 10] = [
    [  0, -10,   0,   0,   0,   0,   0, -10,   0],
    [  0,   5,  15,   5,   5,   5,  15,   5,   0],
    [  5,   5,  10,  10,  10,  10,  10,   5,   5],
    [  5,  10,  15,  20,  20,  20,  15,  10,   5],
    [  5,  10,  15,  20,  20,  20,  15,  10,   5],
    [  5,  10,  20,  25,  25,  25,  20,  10,   5],
    [  5,  10,  20,  25,  25,  25,  20,  10,   5],
    [  5,  10,  10,  10,  10,  10,  10,  10,   5],
    [  0,   5,   5,   5,   5,   5,   5,   5,   0],
    [  0, -10,   0,   0,   0,   0,   0, -10,   0],
];

#[rustfmt::skip]
const PST_CHARIOT: [[i32; 9]; 10] = [
    [ -2,  10,   6,  14,  12,  14,   6,  10,  -2],
    [  8,   4,   8,  16,   8,  16,   8,   4,   8],
    [  4,   8,   6,  14,  12,  14,   6,   8,   4],
    [  6,  10,   8,  14,  14,  14,   8,  10,   6],
    [ 12,  16,  14,  20,  20,  20,  14,  16,  12],
    [ 12,  14,  12,  18,  18,  18,  12,  14,  12],
    [ 12,  18,  16,  22,  22,  22,  16,  18,  12],
    [ 12,  12,  12,  18,  18,  18,  12,  12,  12],
    [ 16,  20,  18,  24,  26,  24,  18,  20,  16], // Control back rank
    [ 14,  14,  12,  18,  16,  18,  12,  14,  14],
];

#[rustfmt::skip]
const PST_CANNON: [[i32; 9]; 10] = [
    [  0,   0,   2,   6,   6,   6,   2,   0,   0],
    [  0,   2,   4,   6,   6,   6,   4,   2,   0],
    [  4,   0,   8,   6,  10,   6,   8,   0,   4], // Cannon row
    [  0,   0,   0,   2,   4,   2,   0,   0,   0],
    [ -2,   0,   4,   2,   6,   2,   4,   0,  -2],
    [  0,   0,   0,   2,   8,   2,   0,   0,   0],
    [  0,   0,  -2,   4,  10,   4,  -2,   0,   0],
    [  2,   2,   0, -10,  -8, -10,   0,   2,   2],
    [  2,   2,   0,  -4, -14,  -4,   0,   2,   2],
    [  6,   4,   0, -10, -12, -10,   0,   4,   6],
];

pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::General => VAL_GENERAL,
        PieceKind::Advisor => VAL_ADVISOR,
        PieceKind::Elephant => VAL_ELEPHANT,
        PieceKind::Horse => VAL_HORSE,
        PieceKind::Chariot => VAL_CHARIOT,
        PieceKind::Cannon => VAL_CANNON,
        PieceKind::Soldier => VAL_SOLDIER,
    }
}

pub fn pst_value(piece: Piece, pos: Position) -> i32 {
    let row = if piece.side == RED {
        pos.row as usize
    } else {
        9 - pos.row as usize
    };
    let col = pos.col as usize;
    let table = match piece.kind {
        PieceKind::Soldier => &PST_SOLDIER,
        PieceKind::Horse => &PST_HORSE,
        PieceKind::Chariot => &PST_CHARIOT,
        PieceKind::Cannon => &PST_CANNON,
        PieceKind::General | PieceKind::Advisor | PieceKind::Elephant => return 0,
    };
    table
        .get(row)
        .and_then(|r| r.get(col))
        .copied()
        .unwrap_or(0)
}

/// Attacker bonus for MVV-LVA: cheaper attackers sort first among equal victims.
const fn lva_bonus(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Soldier => 6,
        PieceKind::Advisor | PieceKind::Elephant => 5,
        PieceKind::Horse => 4,
        PieceKind::Cannon => 3,
        PieceKind::Chariot => 2,
        PieceKind::General => 1,
    }
}

/// Material, piece-square tables and chariot/cannon mobility.
#[derive(Debug, Clone, Copy, Default)]
pub struct XiangqiEvaluator;

impl XiangqiEvaluator {
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    fn side_total(board: &XiangqiBoard, side: Side) -> i32 {
        let mut score = 0;
        for (pos, piece) in board.pieces(side) {
            score += piece_value(piece.kind) + pst_value(piece, pos);
            match piece.kind {
                PieceKind::Chariot => {
                    score += slider_mobility(board, pos, piece) as i32 * WEIGHT_MOBILITY_CHARIOT;
                }
                PieceKind::Cannon => {
                    score += slider_mobility(board, pos, piece) as i32 * WEIGHT_MOBILITY_CANNON;
                }
                _ => {}
            }
        }
        score
    }
}

impl Evaluator<Xiangqi> for XiangqiEvaluator {
    fn evaluate(&self, board: &XiangqiBoard, side: Side) -> i32 {
        Self::side_total(board, side) - Self::side_total(board, side.opposite())
    }

    fn move_features(&self, board: &XiangqiBoard, mv: &XiangqiMove) -> MoveFeatures {
        let Some(piece) = board.get(mv.from) else {
            return MoveFeatures::default();
        };
        let capture_value = mv.captured.map_or(0, |victim| {
            piece_value(victim.kind) * 10 + lva_bonus(piece.kind)
        });
        MoveFeatures {
            capture_value,
            promotion: false,
            positional_delta: pst_value(piece, mv.to) - pst_value(piece, mv.from),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logic::game::Game;
    use crate::logic::xiangqi::BLACK;

    #[test]
    fn test_initial_position_is_balanced() {
        let eval = XiangqiEvaluator;
        assert_eq!(eval.evaluate(&XiangqiBoard::new(), RED), 0);
    }

    #[test]
    fn test_material_swing() {
        let eval = XiangqiEvaluator;
        let mut board = XiangqiBoard::new();
        board.set(Position { row: 9, col: 0 }, None);
        let score = eval.evaluate(&board, RED);
        assert!(score > VAL_CHARIOT - 100, "score {score}");
        assert_eq!(eval.evaluate(&board, BLACK), -score);
    }

    #[test]
    fn test_capture_ordering_prefers_cheap_attacker() {
        let game = Xiangqi;
        let eval = game.evaluator();
        let mut board = XiangqiBoard::empty();
        board.set(Position { row: 0, col: 4 }, Some(Piece::new(PieceKind::General, RED)));
        board.set(Position { row: 9, col: 3 }, Some(Piece::new(PieceKind::General, BLACK)));
        board.set(Position { row: 5, col: 4 }, Some(Piece::new(PieceKind::Horse, BLACK)));
        board.set(Position { row: 4, col: 4 }, Some(Piece::new(PieceKind::Soldier, RED)));
        board.set(Position { row: 5, col: 0 }, Some(Piece::new(PieceKind::Chariot, RED)));

        let moves = game.legal_moves(&board, RED);
        let by_soldier = moves
            .iter()
            .find(|m| m.from == Position { row: 4, col: 4 } && m.captured.is_some())
            .unwrap();
        let by_chariot = moves
            .iter()
            .find(|m| m.from == Position { row: 5, col: 0 } && m.captured.is_some())
            .unwrap();
        let soldier = eval.move_features(&board, by_soldier).capture_value;
        let chariot = eval.move_features(&board, by_chariot).capture_value;
        assert!(soldier > chariot);
        assert!(chariot > 0);
    }
}
