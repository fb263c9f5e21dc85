//! Hidden-Choice Domain
//!
//! The fixed three-value domain for simultaneous hidden-choice games,
//! with its total-order outcome table. The domain must stay small: the
//! reveal step recovers a choice by enumerating every value.

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// A choice in the fixed {1, 2, 3} domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum Choice {
    /// Rock (1). Beats scissors.
    Rock = 1,
    /// Paper (2). Beats rock.
    Paper = 2,
    /// Scissors (3). Beats paper.
    Scissors = 3,
}

impl Choice {
    /// Every value in the domain, in commitment order.
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    /// Parse a wire index into the domain.
    pub fn from_index(index: u8) -> Result<Self, GameError> {
        match index {
            1 => Ok(Choice::Rock),
            2 => Ok(Choice::Paper),
            3 => Ok(Choice::Scissors),
            other => Err(GameError::InvalidChoice(other)),
        }
    }

    /// Wire index of this choice.
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Fixed outcome table: rock > scissors > paper > rock.
    pub fn beats(self, other: Choice) -> bool {
        matches!(
            (self, other),
            (Choice::Rock, Choice::Scissors)
                | (Choice::Paper, Choice::Rock)
                | (Choice::Scissors, Choice::Paper)
        )
    }
}
