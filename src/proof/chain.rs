//! Recursive Move Chain
//!
//! Two untrusted parties alternately extend a game's history; each step
//! verifies the previous proof and applies exactly one move. A verifier
//! holding only the latest proof is convinced of the entire history, so
//! verification cost stays O(1) in the chain length.
//!
//! All violations are hard rejections. The prover never retries; a
//! caller that loses a race regenerates its move from the last accepted
//! proof.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::hash::{player_commitment, Digest};
use crate::error::GameError;
use crate::game::board::{Board, CellOwner};
use crate::proof::system::{ProgramId, Proof, ProofBackend};

/// Public output of one chain step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainPublicOutput {
    /// Player one's commitment, `H(H(secret1) || game_id)`.
    pub player1: Digest,
    /// Player two's commitment, `H(H(secret2) || game_id)`.
    pub player2: Digest,
    /// Nonce scoping the whole chain to one game instance.
    pub game_id: u64,
    /// Turn flag; true means player one moves next. Strictly alternates.
    pub next_is_player1: bool,
    /// Board commitment after this step.
    pub board: u64,
}

/// Prover for the recursive move-chain program.
///
/// `N` is the board dimension (3 or 5).
pub struct MoveChain<B, const N: usize = 3> {
    backend: B,
}

impl<B: ProofBackend, const N: usize> MoveChain<B, N> {
    /// Create a prover over the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Base case: both players committed, empty board, player one first.
    pub fn start(
        &self,
        player1: Digest,
        player2: Digest,
        game_id: u64,
    ) -> Proof<ChainPublicOutput> {
        let output = ChainPublicOutput {
            player1,
            player2,
            game_id,
            next_is_player1: true,
            board: Board::<N>::new().encode(),
        };
        debug!(game_id, "chain started");
        Proof::attested(&self.backend, ProgramId::MoveChain, output)
    }

    /// Inductive case: verify the previous proof, apply one move.
    ///
    /// The mover proves its identity by recomputing the commitment the
    /// turn flag selects; the board gains exactly one cell; the flag
    /// flips. Any failure leaves the previous proof as the last
    /// accepted state.
    pub fn apply_move(
        &self,
        secret: u64,
        x: u8,
        y: u8,
        previous: &Proof<ChainPublicOutput>,
    ) -> Result<Proof<ChainPublicOutput>, GameError> {
        if !previous.verify(&self.backend) {
            return Err(GameError::ChainBroken);
        }
        let prev = &previous.output;

        // The turn flag decides which commitment the mover must match.
        let expected = if prev.next_is_player1 {
            prev.player1
        } else {
            prev.player2
        };
        if player_commitment(secret, prev.game_id) != expected {
            return Err(GameError::WrongTurnOrIdentity);
        }

        let owner = if prev.next_is_player1 {
            CellOwner::PlayerOne
        } else {
            CellOwner::PlayerTwo
        };

        let mut board = Board::<N>::decode(prev.board)?;
        board.update(x, y, owner)?;

        let output = ChainPublicOutput {
            player1: prev.player1,
            player2: prev.player2,
            game_id: prev.game_id,
            next_is_player1: !prev.next_is_player1,
            board: board.encode(),
        };
        debug!(
            game_id = prev.game_id,
            x,
            y,
            moves = board.move_count(),
            "move accepted"
        );
        Ok(Proof::attested(&self.backend, ProgramId::MoveChain, output))
    }
}
