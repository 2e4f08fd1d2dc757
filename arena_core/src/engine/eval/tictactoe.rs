#![allow(clippy::indexing_slicing)]

use crate::engine::{Evaluator, MoveFeatures};
use crate::logic::board::Side;
use crate::logic::placement::Placement;
use crate::logic::tictactoe::{TicTacToe, TicTacToeBoard, LINES, SIZE};

/// Value of a line holding only one side's marks, by mark count.
const LINE_VALUE: [i32; 3] = [0, 1, 10];

/// Extra ordering weight for the centre and the corners.
const CELL_BONUS: [i32; 9] = [2, 0, 2, 0, 3, 0, 2, 0, 2];

/// Counts lines still open to one side only.
#[derive(Debug, Clone, Copy, Default)]
pub struct TicTacToeEvaluator;

impl Evaluator<TicTacToe> for TicTacToeEvaluator {
    fn evaluate(&self, board: &TicTacToeBoard, side: Side) -> i32 {
        let mut score = 0;
        for line in &LINES {
            let own = line.iter().filter(|&&i| board.cell(i) == Some(side)).count();
            let theirs = line
                .iter()
                .filter(|&&i| board.cell(i) == Some(side.opposite()))
                .count();
            match (own, theirs) {
                (n, 0) if n < 3 => score += LINE_VALUE[n],
                (0, n) if n < 3 => score -= LINE_VALUE[n],
                _ => {}
            }
        }
        score
    }

    fn move_features(&self, _board: &TicTacToeBoard, mv: &Placement) -> MoveFeatures {
        MoveFeatures {
            positional_delta: CELL_BONUS[mv.pos.index(SIZE)],
            ..MoveFeatures::default()
        }
    }
}
