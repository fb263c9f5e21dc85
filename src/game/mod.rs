//! Game Rules
//!
//! Deterministic board and choice logic shared by the proof layer.

pub mod board;
pub mod choice;

pub use board::{Board, Board3, Board5, CellOwner};
pub use choice::Choice;
