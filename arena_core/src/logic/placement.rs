use crate::logic::board::{Position, Side};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A stone or mark dropped on an empty cell. Shared by the placement games
/// (gomoku, tic-tac-toe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Placement {
    pub pos: Position,
    pub side: Side,
}

impl Placement {
    pub const fn new(pos: Position, side: Side) -> Self {
        Self { pos, side }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}", self.side, self.pos)
    }
}
