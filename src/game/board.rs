//! Board Codec
//!
//! An N×N grid packed into a single `u64` commitment: the occupancy
//! plane occupies bits `0..N²`, the owner plane bits `N²..2N²`, cells
//! in row-major order (`index = y*N + x`). Downstream consumers (event
//! decoders, off-chain UIs) depend on this exact layout, so it must not
//! change.
//!
//! The encoding is canonical: an owner bit is only ever set on an
//! occupied cell, which makes `encode` injective over valid boards.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Which player holds a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellOwner {
    /// First player (turn flag true).
    PlayerOne,
    /// Second player (turn flag false).
    PlayerTwo,
}

/// N×N game board with per-cell occupancy and ownership.
///
/// `N` is 3 or 5 in the supported games; the commitment needs
/// `2·N²` bits, so `N <= 5` keeps it inside a `u64`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board<const N: usize> {
    /// Occupancy plane, one bit per cell.
    occupied: u32,
    /// Owner plane, one bit per cell; set bit = player one.
    owner: u32,
}

/// Standard 3×3 board (tic-tac-toe).
pub type Board3 = Board<3>;

/// Extended 5×5 board.
pub type Board5 = Board<5>;

impl<const N: usize> Board<N> {
    /// Number of cells on the board.
    pub const CELLS: usize = N * N;

    /// Create an empty board.
    pub fn new() -> Self {
        debug_assert!(2 * Self::CELLS <= 64, "board does not fit a u64 commitment");
        Self {
            occupied: 0,
            owner: 0,
        }
    }

    fn index(x: u8, y: u8) -> usize {
        y as usize * N + x as usize
    }

    fn in_range(x: u8, y: u8) -> bool {
        (x as usize) < N && (y as usize) < N
    }

    /// Pack the board into its fixed-width commitment.
    ///
    /// Deterministic and injective over valid boards; the empty board
    /// encodes to 0.
    pub fn encode(&self) -> u64 {
        self.occupied as u64 | ((self.owner as u64) << Self::CELLS)
    }

    /// Decode a commitment back into a board.
    ///
    /// Rejects any bit above `2·N²` and any owner bit on an unoccupied
    /// cell, so only canonical encodings round-trip.
    pub fn decode(commitment: u64) -> Result<Self, GameError> {
        let width = 2 * Self::CELLS;
        if width < 64 && commitment >> width != 0 {
            return Err(GameError::MalformedBoard(commitment));
        }

        let plane_mask = (1u64 << Self::CELLS) - 1;
        let occupied = (commitment & plane_mask) as u32;
        let owner = ((commitment >> Self::CELLS) & plane_mask) as u32;

        if owner & !occupied != 0 {
            return Err(GameError::MalformedBoard(commitment));
        }

        Ok(Self { occupied, owner })
    }

    /// Whether the cell at `(x, y)` holds a mark.
    pub fn is_occupied(&self, x: u8, y: u8) -> bool {
        Self::in_range(x, y) && self.occupied & (1 << Self::index(x, y)) != 0
    }

    /// Owner of the cell at `(x, y)`, if occupied.
    pub fn get(&self, x: u8, y: u8) -> Option<CellOwner> {
        if !self.is_occupied(x, y) {
            return None;
        }
        if self.owner & (1 << Self::index(x, y)) != 0 {
            Some(CellOwner::PlayerOne)
        } else {
            Some(CellOwner::PlayerTwo)
        }
    }

    /// Number of occupied cells.
    pub fn move_count(&self) -> u32 {
        self.occupied.count_ones()
    }

    /// Place a mark on an empty cell.
    ///
    /// Flips exactly one occupancy bit; fails on out-of-range
    /// coordinates or an occupied cell without touching the board.
    pub fn update(&mut self, x: u8, y: u8, owner: CellOwner) -> Result<(), GameError> {
        if !Self::in_range(x, y) {
            return Err(GameError::OutOfRange { x, y });
        }
        let bit = 1u32 << Self::index(x, y);
        if self.occupied & bit != 0 {
            return Err(GameError::CellOccupied { x, y });
        }

        self.occupied |= bit;
        if owner == CellOwner::PlayerOne {
            self.owner |= bit;
        }
        Ok(())
    }

    /// Check one line of N cells for a uniform, fully occupied owner.
    fn line_winner(&self, cells: impl Iterator<Item = usize>) -> Option<CellOwner> {
        let mut line_occupied = true;
        let mut all_p1 = true;
        let mut all_p2 = true;

        for idx in cells {
            let bit = 1u32 << idx;
            line_occupied &= self.occupied & bit != 0;
            all_p1 &= self.owner & bit != 0;
            all_p2 &= self.owner & bit == 0;
        }

        match (line_occupied, all_p1, all_p2) {
            (true, true, _) => Some(CellOwner::PlayerOne),
            (true, _, true) => Some(CellOwner::PlayerTwo),
            _ => None,
        }
    }

    /// Winner of the board, if any row, column, or diagonal is complete.
    ///
    /// All `2N + 2` lines are checked; at most one player can own a
    /// completed line in a legally built board.
    pub fn winner(&self) -> Option<CellOwner> {
        for y in 0..N {
            if let Some(w) = self.line_winner((0..N).map(|x| y * N + x)) {
                return Some(w);
            }
        }
        for x in 0..N {
            if let Some(w) = self.line_winner((0..N).map(|y| y * N + x)) {
                return Some(w);
            }
        }
        if let Some(w) = self.line_winner((0..N).map(|i| i * N + i)) {
            return Some(w);
        }
        self.line_winner((0..N).map(|i| i * N + (N - 1 - i)))
    }

    /// Convenience win predicate: true iff some line is complete.
    pub fn check_winner(&self) -> bool {
        self.winner().is_some()
    }
}
