//! Static evaluators, one per game. Every evaluator scores a board from the
//! point of view of the side passed in and is exactly antisymmetric.

pub mod checkers;
pub mod gomoku;
pub mod tictactoe;
pub mod xiangqi;
