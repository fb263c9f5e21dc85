//! Commit-Reveal Protocol
//!
//! Two-phase protocol for simultaneous hidden choices: commit publishes
//! `H(choice || secret || game_id)`, reveal recovers the choice by
//! recomputing the commitment for every domain value. The brute-force
//! match is only sound because the domain is small and fixed.
//!
//! Both operations are pure; they produce public outputs and touch no
//! external state.

use serde::{Deserialize, Serialize};

use crate::core::hash::{choice_commitment, Digest};
use crate::error::GameError;
use crate::game::choice::Choice;
use crate::proof::system::{ProgramId, Proof, ProofBackend};

/// Public output of a commit or reveal step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealPublicOutput {
    /// The published choice commitment.
    pub hashed_choice: Digest,
    /// Whether the choice has been opened.
    pub revealed: bool,
    /// The recovered choice; `None` until revealed.
    pub revealed_choice: Option<Choice>,
    /// Nonce scoping the commitment to one game instance.
    pub game_id: u64,
}

/// Prover for the commit-reveal program.
pub struct CommitReveal<B> {
    backend: B,
}

impl<B: ProofBackend> CommitReveal<B> {
    /// Create a prover over the given backend.
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Commit to a choice without revealing it.
    ///
    /// The domain precondition holds by construction of `Choice`; wire
    /// inputs go through [`Choice::from_index`] first.
    pub fn commit(&self, choice: Choice, secret: u64, game_id: u64) -> Proof<RevealPublicOutput> {
        let output = RevealPublicOutput {
            hashed_choice: choice_commitment(choice.index(), secret, game_id),
            revealed: false,
            revealed_choice: None,
            game_id,
        };
        Proof::attested(&self.backend, ProgramId::CommitReveal, output)
    }

    /// Open a commitment. The revealer only needs its secret; the
    /// choice is recovered by enumerating the domain.
    pub fn reveal(
        &self,
        hashed_choice: Digest,
        secret: u64,
        game_id: u64,
    ) -> Result<Proof<RevealPublicOutput>, GameError> {
        let recovered = Choice::ALL
            .into_iter()
            .find(|c| choice_commitment(c.index(), secret, game_id) == hashed_choice)
            .ok_or(GameError::RevealMismatch)?;

        let output = RevealPublicOutput {
            hashed_choice,
            revealed: true,
            revealed_choice: Some(recovered),
            game_id,
        };
        Ok(Proof::attested(&self.backend, ProgramId::CommitReveal, output))
    }
}
