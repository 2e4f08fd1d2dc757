use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the two players. `First` always moves first from the initial position.
///
/// Each game names its sides through constants (`checkers::RED`,
/// `gomoku::BLACK`, ...) so callers rarely need the raw variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    First,
    Second,
}

impl Side {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::First => 0,
            Self::Second => 1,
        }
    }
}

/// A (row, column) pair. Only meaningful together with the board that
/// produced it; boards hand out positions through their own bounds-checked
/// `position` constructors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: u8,
    pub col: u8,
}

impl Position {
    /// Builds a position inside a `rows` x `cols` grid, or `None` when out of range.
    #[must_use]
    pub fn within(row: i32, col: i32, rows: usize, cols: usize) -> Option<Self> {
        let r = usize::try_from(row).ok()?;
        let c = usize::try_from(col).ok()?;
        if r < rows && c < cols {
            Some(Self {
                row: u8::try_from(r).ok()?,
                col: u8::try_from(c).ok()?,
            })
        } else {
            None
        }
    }

    /// Steps by `(dr, dc)` and bounds-checks the result against the grid size.
    #[must_use]
    pub fn offset(self, dr: i32, dc: i32, rows: usize, cols: usize) -> Option<Self> {
        Self::within(i32::from(self.row) + dr, i32::from(self.col) + dc, rows, cols)
    }

    pub const fn index(self, cols: usize) -> usize {
        self.row as usize * cols + self.col as usize
    }

    pub const fn from_index(index: usize, cols: usize) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        Self {
            row: (index / cols) as u8,
            col: (index % cols) as u8,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Horizontal, vertical and both diagonals. Each axis appears once; scans walk
/// both ways along it.
pub const AXES: [(i32, i32); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opposite() {
        assert_eq!(Side::First.opposite(), Side::Second);
        assert_eq!(Side::Second.opposite().opposite(), Side::Second);
    }

    #[test]
    fn test_position_bounds() {
        assert!(Position::within(0, 0, 3, 3).is_some());
        assert!(Position::within(3, 0, 3, 3).is_none());
        assert!(Position::within(-1, 2, 3, 3).is_none());
        let pos = Position { row: 9, col: 8 };
        assert_eq!(pos.offset(1, 0, 10, 9), None);
        assert_eq!(pos.offset(-1, -1, 10, 9), Some(Position { row: 8, col: 7 }));
    }

    #[test]
    fn test_index_round_trip() {
        let pos = Position { row: 7, col: 4 };
        assert_eq!(Position::from_index(pos.index(15), 15), pos);
    }
}
