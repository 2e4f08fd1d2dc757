use crate::engine::{tactics, Evaluator, MoveFeatures};
use crate::logic::board::{Position, Side, AXES};
use crate::logic::gomoku::{Gomoku, GomokuBoard, SIZE, WIN_LENGTH};
use crate::logic::placement::Placement;

/// Shape of a contiguous run of one colour together with its two ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinePattern {
    Five,
    OpenFour,
    ClosedFour,
    OpenThree,
    ClosedThree,
    OpenTwo,
    ClosedTwo,
    None,
}

/// Point values per pattern.
pub struct PatternScore;

impl PatternScore {
    pub const FIVE: i32 = 100_000;
    pub const OPEN_FOUR: i32 = 10_000;
    pub const CLOSED_FOUR: i32 = 1_000;
    pub const OPEN_THREE: i32 = 1_000;
    pub const CLOSED_THREE: i32 = 100;
    pub const OPEN_TWO: i32 = 100;
    pub const CLOSED_TWO: i32 = 10;
}

impl LinePattern {
    pub const fn score(self) -> i32 {
        match self {
            Self::Five => PatternScore::FIVE,
            Self::OpenFour => PatternScore::OPEN_FOUR,
            Self::ClosedFour => PatternScore::CLOSED_FOUR,
            Self::OpenThree => PatternScore::OPEN_THREE,
            Self::ClosedThree => PatternScore::CLOSED_THREE,
            Self::OpenTwo => PatternScore::OPEN_TWO,
            Self::ClosedTwo => PatternScore::CLOSED_TWO,
            Self::None => 0,
        }
    }

    pub const fn is_four(self) -> bool {
        matches!(self, Self::OpenFour | Self::ClosedFour)
    }
}

/// Classifies a run of `count` stones with `open_ends` (0..=2) empty in-bounds
/// cells beyond it. A run with both ends blocked can never grow to five and
/// scores nothing unless it already is five.
pub const fn classify_line(count: usize, open_ends: u8) -> LinePattern {
    if count >= WIN_LENGTH {
        return LinePattern::Five;
    }
    match (count, open_ends) {
        (_, 0) => LinePattern::None,
        (4, 2) => LinePattern::OpenFour,
        (4, _) => LinePattern::ClosedFour,
        (3, 2) => LinePattern::OpenThree,
        (3, _) => LinePattern::ClosedThree,
        (2, 2) => LinePattern::OpenTwo,
        (2, _) => LinePattern::ClosedTwo,
        _ => LinePattern::None,
    }
}

/// Weight of a stone's distance to the centre.
const CENTER_WEIGHT: i32 = 2;

#[derive(Debug, Clone, Copy, Default)]
pub struct GomokuEvaluator;

impl GomokuEvaluator {
    /// Sum of pattern scores for every run of `side`, each run counted once
    /// from its first stone, plus the centre term.
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn side_score(board: &GomokuBoard, side: Side) -> i32 {
        let mut score = 0;
        for (pos, owner) in board.occupied() {
            if owner != side {
                continue;
            }
            score += CENTER_WEIGHT * center_closeness(pos);

            for &(dr, dc) in &AXES {
                let before = pos.offset(-dr, -dc, SIZE, SIZE);
                if before.is_some_and(|p| board.get(p) == Some(side)) {
                    continue;
                }
                let count = 1 + board.run(pos, side, dr, dc);
                let after = pos.offset(dr * count as i32, dc * count as i32, SIZE, SIZE);
                let open_ends = u8::from(before.is_some_and(|p| board.get(p).is_none()))
                    + u8::from(after.is_some_and(|p| board.get(p).is_none()));
                score += classify_line(count, open_ends).score();
            }
        }
        score
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn center_closeness(pos: Position) -> i32 {
    let mid = (SIZE / 2) as i32;
    let dr = (pos.row as i32 - mid).abs();
    let dc = (pos.col as i32 - mid).abs();
    mid - if dr > dc { dr } else { dc }
}

impl Evaluator<Gomoku> for GomokuEvaluator {
    fn evaluate(&self, board: &GomokuBoard, side: Side) -> i32 {
        Self::side_score(board, side) - Self::side_score(board, side.opposite())
    }

    fn move_features(&self, board: &GomokuBoard, mv: &Placement) -> MoveFeatures {
        MoveFeatures {
            positional_delta: tactics::cell_score(board, mv.pos, mv.side),
            ..MoveFeatures::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logic::gomoku::{BLACK, WHITE};

    fn pos(row: u8, col: u8) -> Position {
        Position { row, col }
    }

    #[test]
    fn test_classify_line() {
        assert_eq!(classify_line(5, 0), LinePattern::Five);
        assert_eq!(classify_line(6, 1), LinePattern::Five);
        assert_eq!(classify_line(4, 2), LinePattern::OpenFour);
        assert_eq!(classify_line(4, 1), LinePattern::ClosedFour);
        assert_eq!(classify_line(4, 0), LinePattern::None);
        assert_eq!(classify_line(3, 2), LinePattern::OpenThree);
        assert_eq!(classify_line(2, 1), LinePattern::ClosedTwo);
        assert_eq!(classify_line(1, 2), LinePattern::None);
    }

    #[test]
    fn test_pattern_ordering() {
        assert!(PatternScore::FIVE > PatternScore::OPEN_FOUR);
        assert!(PatternScore::OPEN_FOUR > PatternScore::CLOSED_FOUR);
        assert!(PatternScore::OPEN_THREE > PatternScore::CLOSED_THREE);
        assert!(PatternScore::OPEN_TWO > PatternScore::CLOSED_TWO);
    }

    #[test]
    fn test_open_three_counted_once() {
        let mut board = GomokuBoard::new();
        for col in [6, 7, 8] {
            board.place(pos(7, col), BLACK);
        }
        let score = GomokuEvaluator::side_score(&board, BLACK);
        // One open three plus the vertical/diagonal singletons (none score)
        // plus the centre term.
        let centre = CENTER_WEIGHT * (6 + 7 + 6);
        assert_eq!(score, PatternScore::OPEN_THREE + centre);
    }

    #[test]
    fn test_edge_blocks_run() {
        let mut board = GomokuBoard::new();
        for col in 0..4 {
            board.place(pos(0, col), WHITE);
        }
        let score = GomokuEvaluator::side_score(&board, WHITE);
        assert!(score >= PatternScore::CLOSED_FOUR);
        assert!(score < PatternScore::OPEN_FOUR);
    }

    #[test]
    fn test_symmetry() {
        let eval = GomokuEvaluator;
        let mut board = GomokuBoard::new();
        board.place(pos(7, 7), BLACK);
        board.place(pos(7, 8), WHITE);
        board.place(pos(8, 8), BLACK);
        board.place(pos(6, 6), BLACK);
        assert_eq!(eval.evaluate(&board, BLACK), -eval.evaluate(&board, WHITE));
        assert!(eval.evaluate(&board, BLACK) > 0);
    }
}
