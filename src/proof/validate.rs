//! Terminal Rule Validator
//!
//! Consumes terminal proofs, applies the fixed outcome rules, and
//! settles the game: counters move, a `GameDone` record is emitted, and
//! the game id is retired so the same proofs cannot be replayed.
//!
//! This is the only component that mutates externally visible counters.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::hash::Digest;
use crate::error::GameError;
use crate::game::board::{Board, CellOwner};
use crate::proof::chain::ChainPublicOutput;
use crate::proof::reveal::RevealPublicOutput;
use crate::proof::system::{Proof, ProofBackend};

/// Outcome of a settled game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Both parties tied.
    Draw,
    /// The first party won.
    FirstWins,
    /// The second party won.
    SecondWins,
}

/// Settlement record broadcast to external indexers.
///
/// For board games the party fields are the player commitments; for
/// commit-reveal games they are the two choice commitments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameDone {
    /// Who won.
    pub winner: Outcome,
    /// First party's commitment.
    pub player1: Digest,
    /// Second party's commitment.
    pub player2: Digest,
    /// The settled game instance.
    pub game_id: u64,
}

/// Validator over terminal proofs.
///
/// Holds the settled-game counters and the retired game-id set.
pub struct RuleValidator<B> {
    backend: B,
    game_count: u32,
    draw_count: u32,
    settled: BTreeSet<u64>,
}

impl<B: ProofBackend> RuleValidator<B> {
    /// Create a validator over the given backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            game_count: 0,
            draw_count: 0,
            settled: BTreeSet::new(),
        }
    }

    /// Total settled games.
    pub fn game_count(&self) -> u32 {
        self.game_count
    }

    /// Settled games that ended in a draw.
    pub fn draw_count(&self) -> u32 {
        self.draw_count
    }

    /// Whether a game id has already been settled.
    pub fn is_settled(&self, game_id: u64) -> bool {
        self.settled.contains(&game_id)
    }

    fn retire(&mut self, game_id: u64) -> Result<(), GameError> {
        if !self.settled.insert(game_id) {
            return Err(GameError::GameAlreadySettled(game_id));
        }
        Ok(())
    }

    /// Settle a turn-chain board game from its latest proof.
    ///
    /// The proof must verify and the board must hold a completed line;
    /// the winner is the player who made the last move (the one the
    /// flipped turn flag does not select).
    pub fn settle_board<const N: usize>(
        &mut self,
        proof: &Proof<ChainPublicOutput>,
    ) -> Result<GameDone, GameError> {
        if !proof.verify(&self.backend) {
            return Err(GameError::ChainBroken);
        }
        let output = &proof.output;
        if self.is_settled(output.game_id) {
            return Err(GameError::GameAlreadySettled(output.game_id));
        }

        let board = Board::<N>::decode(output.board)?;
        let winner = match board.winner() {
            Some(CellOwner::PlayerOne) => Outcome::FirstWins,
            Some(CellOwner::PlayerTwo) => Outcome::SecondWins,
            None => return Err(GameError::NoWinner),
        };

        self.retire(output.game_id)?;
        self.game_count += 1;

        let done = GameDone {
            winner,
            player1: output.player1,
            player2: output.player2,
            game_id: output.game_id,
        };
        info!(game_id = output.game_id, ?winner, "board game settled");
        Ok(done)
    }

    /// Settle a commit-reveal game from the two revealed proofs.
    pub fn settle_reveal(
        &mut self,
        first: &Proof<RevealPublicOutput>,
        second: &Proof<RevealPublicOutput>,
    ) -> Result<GameDone, GameError> {
        if !first.verify(&self.backend) || !second.verify(&self.backend) {
            return Err(GameError::ChainBroken);
        }
        let (p1, p2) = (&first.output, &second.output);

        if p1.game_id != p2.game_id {
            return Err(GameError::GameIdMismatch {
                first: p1.game_id,
                second: p2.game_id,
            });
        }
        if self.is_settled(p1.game_id) {
            return Err(GameError::GameAlreadySettled(p1.game_id));
        }

        let (c1, c2) = match (p1.revealed_choice, p2.revealed_choice) {
            (Some(c1), Some(c2)) if p1.revealed && p2.revealed => (c1, c2),
            _ => return Err(GameError::NotRevealed),
        };

        let winner = if c1 == c2 {
            Outcome::Draw
        } else if c1.beats(c2) {
            Outcome::FirstWins
        } else {
            Outcome::SecondWins
        };

        self.retire(p1.game_id)?;
        self.game_count += 1;
        if winner == Outcome::Draw {
            self.draw_count += 1;
        }

        let done = GameDone {
            winner,
            player1: p1.hashed_choice,
            player2: p2.hashed_choice,
            game_id: p1.game_id,
        };
        info!(game_id = p1.game_id, ?winner, "reveal game settled");
        Ok(done)
    }
}
