pub mod board;
pub mod checkers;
pub mod game;
pub mod gomoku;
pub mod placement;
pub mod tictactoe;
pub mod xiangqi;
