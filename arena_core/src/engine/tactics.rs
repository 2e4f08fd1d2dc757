//! Gomoku immediate tactics: pattern probes for a hypothetical stone and the
//! forced-move pass that runs before any search.

use crate::engine::eval::gomoku::{classify_line, LinePattern};
use crate::logic::board::{Position, Side, AXES};
use crate::logic::gomoku::{GomokuBoard, SIZE};
use crate::logic::placement::Placement;
use log::trace;

/// Pattern `side` would form along `(dr, dc)` by playing the empty cell `pos`.
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub fn line_pattern(
    board: &GomokuBoard,
    pos: Position,
    side: Side,
    dr: i32,
    dc: i32,
) -> LinePattern {
    let forward = board.run(pos, side, dr, dc);
    let backward = board.run(pos, side, -dr, -dc);
    let open = |steps: usize, dr: i32, dc: i32| {
        pos.offset(dr * steps as i32, dc * steps as i32, SIZE, SIZE)
            .is_some_and(|p| board.get(p).is_none())
    };
    let open_ends = u8::from(open(forward + 1, dr, dc)) + u8::from(open(backward + 1, -dr, -dc));
    classify_line(forward + backward + 1, open_ends)
}

/// Patterns along all four axes for a stone of `side` on `pos`.
pub fn patterns_at(board: &GomokuBoard, pos: Position, side: Side) -> [LinePattern; 4] {
    AXES.map(|(dr, dc)| line_pattern(board, pos, side, dr, dc))
}

/// Quick value of an empty cell: what `side` builds there plus what it takes
/// away from the opponent.
pub fn cell_score(board: &GomokuBoard, pos: Position, side: Side) -> i32 {
    let attack: i32 = patterns_at(board, pos, side).iter().map(|p| p.score()).sum();
    let defence: i32 = patterns_at(board, pos, side.opposite())
        .iter()
        .map(|p| p.score())
        .sum();
    attack + defence
}

fn makes(board: &GomokuBoard, pos: Position, side: Side, pattern: LinePattern) -> bool {
    patterns_at(board, pos, side).contains(&pattern)
}

fn is_double_threat(patterns: &[LinePattern; 4]) -> bool {
    let open_threes = patterns
        .iter()
        .filter(|&&p| p == LinePattern::OpenThree)
        .count();
    let fours = patterns.iter().filter(|p| p.is_four()).count();
    open_threes >= 2 || fours >= 2 || (fours >= 1 && open_threes >= 1)
}

/// Moves that must or should be played without searching, in priority
/// order: win now, block the opponent's five, make an open four, make a
/// double threat the opponent can't answer with a four of their own.
pub fn forced_move(board: &GomokuBoard, side: Side) -> Option<Placement> {
    if board.winner().is_some() {
        return None;
    }
    let opponent = side.opposite();
    let candidates = board.neighbourhood(1);

    if let Some(&pos) = candidates
        .iter()
        .find(|&&pos| makes(board, pos, side, LinePattern::Five))
    {
        trace!("gomoku: winning stone at {pos}");
        return Some(Placement::new(pos, side));
    }
    if let Some(&pos) = candidates
        .iter()
        .find(|&&pos| makes(board, pos, opponent, LinePattern::Five))
    {
        trace!("gomoku: blocking five at {pos}");
        return Some(Placement::new(pos, side));
    }
    if let Some(&pos) = candidates
        .iter()
        .find(|&&pos| makes(board, pos, side, LinePattern::OpenFour))
    {
        trace!("gomoku: open four at {pos}");
        return Some(Placement::new(pos, side));
    }

    let opponent_has_four = candidates
        .iter()
        .any(|&pos| patterns_at(board, pos, opponent).iter().any(|p| p.is_four()));
    if !opponent_has_four {
        if let Some(&pos) = candidates
            .iter()
            .find(|&&pos| is_double_threat(&patterns_at(board, pos, side)))
        {
            trace!("gomoku: double threat at {pos}");
            return Some(Placement::new(pos, side));
        }
    }
    None
}
