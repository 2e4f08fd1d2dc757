use super::{CheckersBoard, CheckersMove, Piece, Rank, SIZE};
use crate::logic::board::{Position, Side};

const MAN_RED_DIRS: [(i32, i32); 2] = [(-1, -1), (-1, 1)];
const MAN_BLACK_DIRS: [(i32, i32); 2] = [(1, -1), (1, 1)];
const KING_DIRS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

pub const fn directions(piece: Piece) -> &'static [(i32, i32)] {
    match (piece.rank, piece.side) {
        (Rank::King, _) => &KING_DIRS,
        (Rank::Man, Side::First) => &MAN_RED_DIRS,
        (Rank::Man, Side::Second) => &MAN_BLACK_DIRS,
    }
}

/// Row on which `side`'s men are crowned.
#[allow(clippy::cast_possible_truncation)]
pub const fn promotion_row(side: Side) -> u8 {
    match side {
        Side::First => 0,
        Side::Second => (SIZE - 1) as u8,
    }
}

fn step(pos: Position, dr: i32, dc: i32) -> Option<Position> {
    pos.offset(dr, dc, SIZE, SIZE)
}

/// All legal moves for `side`. Captures are mandatory: if any piece can jump,
/// only complete capture chains are returned.
pub fn legal_moves(board: &CheckersBoard, side: Side) -> Vec<CheckersMove> {
    let mut captures = Vec::new();
    for (from, piece) in board.pieces(side) {
        jump_chains(board, from, piece, &mut captures);
    }
    if !captures.is_empty() {
        return captures;
    }

    let mut moves = Vec::new();
    for (from, piece) in board.pieces(side) {
        for &(dr, dc) in directions(piece) {
            if let Some(to) = step(from, dr, dc) {
                if board.get(to).is_none() {
                    moves.push(CheckersMove {
                        from,
                        to,
                        captures: Vec::new(),
                    });
                }
            }
        }
    }
    moves
}

pub fn has_legal_move(board: &CheckersBoard, side: Side) -> bool {
    board.pieces(side).any(|(from, piece)| {
        directions(piece).iter().any(|&(dr, dc)| {
            let Some(to) = step(from, dr, dc) else {
                return false;
            };
            match board.get(to) {
                None => true,
                Some(victim) => {
                    victim.side != side
                        && step(to, dr, dc).is_some_and(|land| board.get(land).is_none())
                }
            }
        })
    })
}

/// Enemy pieces `piece` standing on `from` could jump right now.
pub fn jump_targets(board: &CheckersBoard, from: Position, piece: Piece) -> usize {
    directions(piece)
        .iter()
        .filter(|&&(dr, dc)| {
            step(from, dr, dc).is_some_and(|over| {
                board.get(over).is_some_and(|v| v.side != piece.side)
                    && step(over, dr, dc).is_some_and(|land| board.get(land).is_none())
            })
        })
        .count()
}

struct Chain {
    at: Position,
    captured: Vec<Position>,
}

/// Expands every maximal capture chain starting at `from` with an explicit
/// stack. Jumped pieces stay on the board until the move is applied, so they
/// block landing but can't be jumped twice. A man that reaches the crowning
/// row ends its move there.
fn jump_chains(board: &CheckersBoard, from: Position, piece: Piece, out: &mut Vec<CheckersMove>) {
    let mut stack = vec![Chain {
        at: from,
        captured: Vec::new(),
    }];

    while let Some(chain) = stack.pop() {
        let mut extended = false;
        let crowned = piece.rank == Rank::Man
            && !chain.captured.is_empty()
            && chain.at.row == promotion_row(piece.side);

        if !crowned {
            for &(dr, dc) in directions(piece) {
                let Some(over) = step(chain.at, dr, dc) else {
                    continue;
                };
                let Some(land) = step(over, dr, dc) else {
                    continue;
                };
                let is_enemy = board.get(over).is_some_and(|v| v.side != piece.side);
                // The origin square is vacated by the moving piece.
                let land_free = land == from || board.get(land).is_none();
                if !is_enemy || !land_free || chain.captured.contains(&over) {
                    continue;
                }

                let mut captured = chain.captured.clone();
                captured.push(over);
                stack.push(Chain { at: land, captured });
                extended = true;
            }
        }

        if !extended && !chain.captured.is_empty() {
            out.push(CheckersMove {
                from,
                to: chain.at,
                captures: chain.captured,
            });
        }
    }
}

/// Returns the board after `mv`. Panics if `mv.from` holds no piece.
pub fn apply(board: &CheckersBoard, mv: &CheckersMove) -> CheckersBoard {
    let mut next = board.clone();
    let Some(mut piece) = next.get(mv.from) else {
        panic!("no piece on {} for checkers move {mv:?}", mv.from);
    };
    next.set(mv.from, None);
    assert!(
        next.get(mv.to).is_none(),
        "destination {} is occupied for checkers move {mv:?}",
        mv.to
    );
    for &victim in &mv.captures {
        next.set(victim, None);
    }
    if piece.rank == Rank::Man && mv.to.row == promotion_row(piece.side) {
        piece = Piece::king(piece.side);
    }
    next.set(mv.to, Some(piece));
    next
}
