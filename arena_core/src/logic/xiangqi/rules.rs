use super::{Piece, PieceKind, XiangqiBoard, XiangqiMove, COLS, ROWS};
use crate::logic::board::{Position, Side};

const ORTHOGONAL: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i32, i32); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const HORSE_JUMPS: [(i32, i32); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

fn step(pos: Position, dr: i32, dc: i32) -> Option<Position> {
    pos.offset(dr, dc, ROWS, COLS)
}

/// Row direction `side`'s soldiers advance in.
pub const fn forward(side: Side) -> i32 {
    match side {
        Side::First => 1,
        Side::Second => -1,
    }
}

pub const fn in_palace(side: Side, pos: Position) -> bool {
    let rows_ok = match side {
        Side::First => pos.row <= 2,
        Side::Second => pos.row >= 7,
    };
    rows_ok && pos.col >= 3 && pos.col <= 5
}

/// Whether `pos` lies on `side`'s side of the river.
pub const fn own_half(side: Side, pos: Position) -> bool {
    match side {
        Side::First => pos.row <= 4,
        Side::Second => pos.row >= 5,
    }
}

/// Square a horse jumping by `(dr, dc)` must find empty.
const fn horse_leg(dr: i32, dc: i32) -> (i32, i32) {
    if dr.abs() == 2 {
        (dr / 2, 0)
    } else {
        (0, dc / 2)
    }
}

fn push_if_not_own(
    board: &XiangqiBoard,
    from: Position,
    to: Position,
    side: Side,
    moves: &mut Vec<XiangqiMove>,
) {
    let target = board.get(to);
    if target.map_or(true, |p| p.side != side) {
        moves.push(XiangqiMove {
            from,
            to,
            captured: target,
        });
    }
}

fn gen_slider(
    board: &XiangqiBoard,
    from: Position,
    side: Side,
    cannon: bool,
    moves: &mut Vec<XiangqiMove>,
) {
    for (dr, dc) in ORTHOGONAL {
        let mut cur = from;
        let mut screened = false;
        while let Some(next) = step(cur, dr, dc) {
            cur = next;
            match (board.get(next), screened) {
                (None, false) => moves.push(XiangqiMove {
                    from,
                    to: next,
                    captured: None,
                }),
                (None, true) => {}
                (Some(_), false) if cannon => screened = true,
                (Some(p), _) => {
                    if p.side != side {
                        moves.push(XiangqiMove {
                            from,
                            to: next,
                            captured: Some(p),
                        });
                    }
                    break;
                }
            }
        }
    }
}

fn gen_piece(board: &XiangqiBoard, from: Position, piece: Piece, moves: &mut Vec<XiangqiMove>) {
    let side = piece.side;
    match piece.kind {
        PieceKind::General => {
            for (dr, dc) in ORTHOGONAL {
                if let Some(to) = step(from, dr, dc).filter(|&to| in_palace(side, to)) {
                    push_if_not_own(board, from, to, side, moves);
                }
            }
        }
        PieceKind::Advisor => {
            for (dr, dc) in DIAGONAL {
                if let Some(to) = step(from, dr, dc).filter(|&to| in_palace(side, to)) {
                    push_if_not_own(board, from, to, side, moves);
                }
            }
        }
        PieceKind::Elephant => {
            for (dr, dc) in DIAGONAL {
                let Some(eye) = step(from, dr, dc) else {
                    continue;
                };
                if board.get(eye).is_some() {
                    continue;
                }
                if let Some(to) = step(from, 2 * dr, 2 * dc).filter(|&to| own_half(side, to)) {
                    push_if_not_own(board, from, to, side, moves);
                }
            }
        }
        PieceKind::Horse => {
            for (dr, dc) in HORSE_JUMPS {
                let (lr, lc) = horse_leg(dr, dc);
                if step(from, lr, lc).map_or(true, |leg| board.get(leg).is_some()) {
                    continue;
                }
                if let Some(to) = step(from, dr, dc) {
                    push_if_not_own(board, from, to, side, moves);
                }
            }
        }
        PieceKind::Chariot => gen_slider(board, from, side, false, moves),
        PieceKind::Cannon => gen_slider(board, from, side, true, moves),
        PieceKind::Soldier => {
            if let Some(to) = step(from, forward(side), 0) {
                push_if_not_own(board, from, to, side, moves);
            }
            if !own_half(side, from) {
                for dc in [-1, 1] {
                    if let Some(to) = step(from, 0, dc) {
                        push_if_not_own(board, from, to, side, moves);
                    }
                }
            }
        }
    }
}

/// Moves that follow piece movement rules, before the self-check filter.
pub fn pseudo_legal_moves(board: &XiangqiBoard, side: Side) -> Vec<XiangqiMove> {
    let mut moves = Vec::with_capacity(64);
    for (from, piece) in board.pieces(side) {
        gen_piece(board, from, piece, &mut moves);
    }
    moves
}

/// Whether any piece of `by` attacks `target`. Generals facing each other are
/// handled by [`generals_facing`].
pub fn is_attacked(board: &XiangqiBoard, target: Position, by: Side) -> bool {
    let is = |pos: Option<Position>, kind: PieceKind| {
        pos.and_then(|p| board.get(p)) == Some(Piece::new(kind, by))
    };

    // Chariots and cannons along the four lines.
    for (dr, dc) in ORTHOGONAL {
        let mut cur = target;
        let mut screened = false;
        while let Some(next) = step(cur, dr, dc) {
            cur = next;
            let Some(p) = board.get(next) else {
                continue;
            };
            if !screened {
                if p == Piece::new(PieceKind::Chariot, by) {
                    return true;
                }
                screened = true;
            } else if p == Piece::new(PieceKind::Cannon, by) {
                return true;
            } else {
                break;
            }
        }
    }

    // Horses: the leg sits next to the horse, toward the target.
    for (dr, dc) in HORSE_JUMPS {
        if !is(step(target, dr, dc), PieceKind::Horse) {
            continue;
        }
        let leg = if dr.abs() == 2 {
            step(target, dr / 2, dc)
        } else {
            step(target, dr, dc / 2)
        };
        if leg.is_some_and(|l| board.get(l).is_none()) {
            return true;
        }
    }

    // Soldiers strike forward, and sideways once across the river.
    if is(step(target, -forward(by), 0), PieceKind::Soldier) {
        return true;
    }
    for dc in [-1, 1] {
        let from = step(target, 0, dc);
        if is(from, PieceKind::Soldier) && from.is_some_and(|p| !own_half(by, p)) {
            return true;
        }
    }
    false
}

pub fn is_in_check(board: &XiangqiBoard, side: Side) -> bool {
    board
        .general(side)
        .map_or(true, |pos| is_attacked(board, pos, side.opposite()))
}

/// Both generals on one file with nothing between them.
pub fn generals_facing(board: &XiangqiBoard) -> bool {
    let (Some(red), Some(black)) = (board.general(Side::First), board.general(Side::Second))
    else {
        return false;
    };
    if red.col != black.col {
        return false;
    }
    let (lo, hi) = (red.row.min(black.row), red.row.max(black.row));
    (lo + 1..hi).all(|row| {
        board
            .get(Position {
                row,
                col: red.col,
            })
            .is_none()
    })
}

fn leaves_king_safe(board: &XiangqiBoard, mv: &XiangqiMove, side: Side) -> bool {
    let next = apply(board, mv);
    !is_in_check(&next, side) && !generals_facing(&next)
}

pub fn legal_moves(board: &XiangqiBoard, side: Side) -> Vec<XiangqiMove> {
    pseudo_legal_moves(board, side)
        .into_iter()
        .filter(|mv| leaves_king_safe(board, mv, side))
        .collect()
}

pub fn has_legal_move(board: &XiangqiBoard, side: Side) -> bool {
    pseudo_legal_moves(board, side)
        .iter()
        .any(|mv| leaves_king_safe(board, mv, side))
}

/// Squares a chariot or cannon on `from` can reach or hit.
pub fn slider_mobility(board: &XiangqiBoard, from: Position, piece: Piece) -> usize {
    let mut moves = Vec::new();
    gen_slider(
        board,
        from,
        piece.side,
        piece.kind == PieceKind::Cannon,
        &mut moves,
    );
    moves.len()
}

/// Returns the board after `mv`. Panics if `mv.from` is empty.
pub fn apply(board: &XiangqiBoard, mv: &XiangqiMove) -> XiangqiBoard {
    let mut next = board.clone();
    let Some(piece) = next.get(mv.from) else {
        panic!("no piece on {} for xiangqi move {mv:?}", mv.from);
    };
    assert!(
        next.get(mv.to).map_or(true, |p| p.side != piece.side),
        "xiangqi move {mv:?} lands on its own piece"
    );
    next.set(mv.from, None);
    next.set(mv.to, Some(piece));
    next
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::logic::xiangqi::{BLACK, RED};

    fn pos(row: u8, col: u8) -> Position {
        Position { row, col }
    }

    fn board_with(pieces: &[(u8, u8, PieceKind, Side)]) -> XiangqiBoard {
        let mut board = XiangqiBoard::empty();
        for &(r, c, kind, side) in pieces {
            board.set(pos(r, c), Some(Piece::new(kind, side)));
        }
        board
    }

    #[test]
    fn test_opening_move_count() {
        let board = XiangqiBoard::new();
        assert_eq!(legal_moves(&board, RED).len(), 44);
        assert_eq!(legal_moves(&board, BLACK).len(), 44);
    }

    #[test]
    fn test_horse_leg_blocks() {
        let board = XiangqiBoard::new();
        let horse_moves: Vec<_> = legal_moves(&board, RED)
            .into_iter()
            .filter(|m| m.from == pos(0, 1))
            .collect();
        // (1, 3) needs the leg at (0, 2), occupied by the elephant.
        assert_eq!(horse_moves.len(), 2);
        assert!(horse_moves.iter().all(|m| m.to != pos(1, 3)));
    }

    #[test]
    fn test_cannon_needs_screen() {
        let board = XiangqiBoard::new();
        let captures: Vec<_> = legal_moves(&board, RED)
            .into_iter()
            .filter(|m| m.from == pos(2, 1) && m.captured.is_some())
            .collect();
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].to, pos(9, 1));
    }

    #[test]
    fn test_elephant_stays_home() {
        let board = board_with(&[
            (0, 4, PieceKind::General, RED),
            (9, 3, PieceKind::General, BLACK),
            (4, 2, PieceKind::Elephant, RED),
        ]);
        let moves: Vec<_> = legal_moves(&board, RED)
            .into_iter()
            .filter(|m| m.from == pos(4, 2))
            .collect();
        assert_eq!(moves.len(), 2);
        assert!(moves.iter().all(|m| own_half(RED, m.to)));
    }

    #[test]
    fn test_soldier_crosses_river() {
        let board = board_with(&[
            (0, 4, PieceKind::General, RED),
            (9, 3, PieceKind::General, BLACK),
            (3, 0, PieceKind::Soldier, RED),
            (5, 6, PieceKind::Soldier, RED),
        ]);
        let moves = legal_moves(&board, RED);
        let before: Vec<_> = moves.iter().filter(|m| m.from == pos(3, 0)).collect();
        let after: Vec<_> = moves.iter().filter(|m| m.from == pos(5, 6)).collect();
        assert_eq!(before.len(), 1);
        assert_eq!(after.len(), 3);
    }

    #[test]
    fn test_flying_general_is_illegal() {
        let board = board_with(&[
            (0, 4, PieceKind::General, RED),
            (9, 4, PieceKind::General, BLACK),
            (5, 4, PieceKind::Chariot, RED),
        ]);
        // The chariot is the only screen between the generals.
        let chariot: Vec<_> = legal_moves(&board, RED)
            .into_iter()
            .filter(|m| m.from == pos(5, 4))
            .collect();
        assert_eq!(chariot.len(), 8);
        assert!(chariot.iter().all(|m| m.to.col == 4));
    }

    #[test]
    fn test_check_detection() {
        let board = board_with(&[
            (0, 4, PieceKind::General, RED),
            (9, 3, PieceKind::General, BLACK),
            (2, 3, PieceKind::Horse, BLACK),
        ]);
        assert!(is_in_check(&board, RED));

        let blocked = board_with(&[
            (0, 4, PieceKind::General, RED),
            (9, 3, PieceKind::General, BLACK),
            (2, 3, PieceKind::Horse, BLACK),
            (1, 3, PieceKind::Advisor, RED),
        ]);
        assert!(!is_in_check(&blocked, RED));

        let cannon = board_with(&[
            (0, 4, PieceKind::General, RED),
            (9, 3, PieceKind::General, BLACK),
            (1, 4, PieceKind::Advisor, RED),
            (6, 4, PieceKind::Cannon, BLACK),
        ]);
        assert!(is_in_check(&cannon, RED));
    }

    #[test]
    fn test_soldier_attacks_sideways_after_river() {
        let board = board_with(&[
            (9, 4, PieceKind::General, BLACK),
            (0, 3, PieceKind::General, RED),
            (9, 3, PieceKind::Soldier, RED),
        ]);
        assert!(is_in_check(&board, BLACK));
    }

    #[test]
    fn test_stalemate_has_no_moves() {
        // Black's general is boxed in by red chariots without being in check.
        let board = board_with(&[
            (9, 4, PieceKind::General, BLACK),
            (0, 3, PieceKind::General, RED),
            (8, 0, PieceKind::Chariot, RED),
            (0, 5, PieceKind::Chariot, RED),
            (1, 3, PieceKind::Chariot, RED),
        ]);
        assert!(!is_in_check(&board, BLACK));
        assert!(!has_legal_move(&board, BLACK));
    }
}
