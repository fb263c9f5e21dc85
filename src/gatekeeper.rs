//! Gatekeeper
//!
//! The thin persistent-state holder. It owns every single-slot field
//! (authority keys, store root, counters, solution hash, event log),
//! sequences calls into the codec/prover/validator/store components,
//! and enforces the two global rules:
//!
//! - authority keys are settable at most once;
//! - every mutating call declares the state it expects to see and is
//!   rejected when that precondition no longer holds (optimistic
//!   concurrency — exactly one of two racing callers succeeds, the
//!   other regenerates against the new state).
//!
//! All precondition checks run before any slot is written; a rejected
//! call has no effect.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::hash::{solution_commitment, Digest};
use crate::core::signature::{self, Signature, VerifyingKey, SOLUTION_SET_DOMAIN};
use crate::error::GameError;
use crate::proof::chain::ChainPublicOutput;
use crate::proof::reveal::RevealPublicOutput;
use crate::proof::system::{Proof, ProofBackend};
use crate::proof::validate::{GameDone, RuleValidator};
use crate::store::merkle::MerkleWitness;
use crate::store::update::{AuthenticatedStore, PlayerRecord, UpdateEntry};

/// A write-once slot with an explicit unset/set state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OneTime<T> {
    value: Option<T>,
}

impl<T> Default for OneTime<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T> OneTime<T> {
    /// Write the slot; fails permanently once set.
    pub fn set(&mut self, slot: &'static str, value: T) -> Result<(), GameError> {
        if self.value.is_some() {
            return Err(GameError::AlreadySet(slot));
        }
        self.value = Some(value);
        Ok(())
    }

    /// Read the slot if set.
    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Read the slot, rejecting callers that need it before setup.
    pub fn require(&self, slot: &'static str) -> Result<&T, GameError> {
        self.value.as_ref().ok_or(GameError::AuthorityUnset(slot))
    }
}

/// Append-only event visible to external indexers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A game was settled.
    GameDone(GameDone),
    /// A puzzle was solved.
    Solved {
        /// Commitment identifying the solver.
        solver: Digest,
        /// Hash of the solved puzzle's solution.
        puzzle_hash: Digest,
    },
}

/// Persistent-state holder sequencing all mutating calls.
pub struct Gatekeeper<B> {
    validator: RuleValidator<B>,
    store: AuthenticatedStore,
    admin_key: OneTime<VerifyingKey>,
    storage_key: OneTime<VerifyingKey>,
    solution_hash: Option<Digest>,
    events: Vec<GameEvent>,
}

impl<B: ProofBackend> Gatekeeper<B> {
    /// Create a gatekeeper with empty slots over the given backend.
    pub fn new(backend: B) -> Self {
        Self {
            validator: RuleValidator::new(backend),
            store: AuthenticatedStore::new(),
            admin_key: OneTime::default(),
            storage_key: OneTime::default(),
            solution_hash: None,
            events: Vec::new(),
        }
    }

    // --- one-time setup ---

    /// Register the admin key. Permanent after the first call.
    pub fn set_admin_key(&mut self, key: VerifyingKey) -> Result<(), GameError> {
        self.admin_key.set("admin", key)?;
        info!("admin key registered");
        Ok(())
    }

    /// Register the storage-server key. Permanent after the first call.
    pub fn set_storage_key(&mut self, key: VerifyingKey) -> Result<(), GameError> {
        self.storage_key.set("storage", key)?;
        info!("storage key registered");
        Ok(())
    }

    // --- settlement ---

    /// Settle a board game from its latest chain proof.
    ///
    /// `expected_game_count` is the caller's precondition on the settled
    /// counter; a mismatch means another settlement was ordered first.
    pub fn settle_board_game<const N: usize>(
        &mut self,
        expected_game_count: u32,
        proof: &Proof<ChainPublicOutput>,
    ) -> Result<GameDone, GameError> {
        self.check_game_count(expected_game_count)?;
        let done = self.validator.settle_board::<N>(proof)?;
        self.events.push(GameEvent::GameDone(done));
        Ok(done)
    }

    /// Settle a commit-reveal game from the two revealed proofs.
    pub fn settle_reveal_game(
        &mut self,
        expected_game_count: u32,
        first: &Proof<RevealPublicOutput>,
        second: &Proof<RevealPublicOutput>,
    ) -> Result<GameDone, GameError> {
        self.check_game_count(expected_game_count)?;
        let done = self.validator.settle_reveal(first, second)?;
        self.events.push(GameEvent::GameDone(done));
        Ok(done)
    }

    fn check_game_count(&self, expected: u32) -> Result<(), GameError> {
        let got = self.validator.game_count();
        if expected != got {
            return Err(GameError::StalePrecondition { expected, got });
        }
        Ok(())
    }

    // --- authenticated store ---

    /// Award one point to a player record, admin-signed over the key.
    ///
    /// The witness doubles as the optimistic precondition: it only
    /// proves the old record under the currently committed root.
    pub fn add_point(
        &mut self,
        key: u64,
        record: &PlayerRecord,
        witness: &MerkleWitness,
        signature: &Signature,
    ) -> Result<PlayerRecord, GameError> {
        let admin = *self.admin_key.require("admin")?;
        let updated = record.add_points(1);
        self.store.apply_admin_update(
            key,
            record.value_hash(),
            updated.value_hash(),
            witness,
            signature,
            &admin,
        )?;
        Ok(updated)
    }

    /// Award the first point to a key whose leaf is still empty.
    pub fn add_first_point(
        &mut self,
        key: u64,
        record: &PlayerRecord,
        witness: &MerkleWitness,
        signature: &Signature,
    ) -> Result<PlayerRecord, GameError> {
        let admin = *self.admin_key.require("admin")?;
        let updated = record.add_points(1);
        self.store.apply_admin_update(
            key,
            crate::store::merkle::EMPTY_LEAF,
            updated.value_hash(),
            witness,
            signature,
            &admin,
        )?;
        Ok(updated)
    }

    /// Apply a batched server envelope against the committed root.
    pub fn apply_storage_update(
        &mut self,
        entries: &[UpdateEntry],
        old_root: Digest,
        new_root: Digest,
        version: u64,
        signature: &Signature,
    ) -> Result<(), GameError> {
        let server = *self.storage_key.require("storage")?;
        self.store
            .apply_server_update(entries, old_root, new_root, version, signature, &server)
    }

    // --- puzzle ---

    /// Install (or rotate) the puzzle solution hash, admin-signed.
    pub fn set_solution(
        &mut self,
        solution_hash: Digest,
        signature: &Signature,
    ) -> Result<(), GameError> {
        let admin = self.admin_key.require("admin")?;
        if !signature::verify_message(admin, SOLUTION_SET_DOMAIN, &[&solution_hash], signature) {
            return Err(GameError::SignatureInvalid);
        }
        self.solution_hash = Some(solution_hash);
        info!(puzzle = %hex::encode(solution_hash), "solution installed");
        Ok(())
    }

    /// Submit a puzzle solution; emits `Solved` on a hash match.
    pub fn submit_solution(
        &mut self,
        solver: Digest,
        parts: &[u64; 3],
    ) -> Result<(), GameError> {
        let puzzle_hash = *self
            .solution_hash
            .as_ref()
            .ok_or(GameError::AuthorityUnset("solution"))?;
        if solution_commitment(parts) != puzzle_hash {
            return Err(GameError::WrongSolution);
        }
        self.events.push(GameEvent::Solved {
            solver,
            puzzle_hash,
        });
        info!(solver = %hex::encode(solver), "puzzle solved");
        Ok(())
    }

    // --- readable state ---

    /// Append-only event log.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Total settled games.
    pub fn game_count(&self) -> u32 {
        self.validator.game_count()
    }

    /// Settled games that ended in a draw.
    pub fn draw_count(&self) -> u32 {
        self.validator.draw_count()
    }

    /// Currently committed store root.
    pub fn store_root(&self) -> Digest {
        self.store.root()
    }

    /// Last committed storage envelope version.
    pub fn storage_version(&self) -> u64 {
        self.store.version()
    }

    /// Registered admin key, if set.
    pub fn admin_key(&self) -> Option<&VerifyingKey> {
        self.admin_key.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hash::player_commitment;
    use crate::core::signature::{sign_message, SigningKey, ADMIN_UPDATE_DOMAIN};
    use crate::game::choice::Choice;
    use crate::proof::chain::MoveChain;
    use crate::proof::reveal::CommitReveal;
    use crate::proof::system::HashBackend;
    use crate::store::merkle::SparseTree;

    fn admin() -> SigningKey {
        SigningKey::from_bytes(&[11; 32])
    }

    fn keeper() -> Gatekeeper<HashBackend> {
        Gatekeeper::new(HashBackend)
    }

    #[test]
    fn test_one_time_key_setup() {
        let mut keeper = keeper();
        let key = admin().verifying_key();
        keeper.set_admin_key(key).unwrap();
        assert_eq!(
            keeper.set_admin_key(key),
            Err(GameError::AlreadySet("admin"))
        );
        assert_eq!(keeper.admin_key(), Some(&key));
    }

    fn won_proof(game_id: u64) -> Proof<ChainPublicOutput> {
        let chain: MoveChain<HashBackend, 3> = MoveChain::new(HashBackend);
        let mut proof = chain.start(
            player_commitment(1, game_id),
            player_commitment(2, game_id),
            game_id,
        );
        for (secret, x, y) in [(1, 0, 0), (2, 0, 1), (1, 1, 1), (2, 0, 2), (1, 2, 2)] {
            proof = chain.apply_move(secret, x, y, &proof).unwrap();
        }
        proof
    }

    #[test]
    fn test_settlement_records_event() {
        let mut keeper = keeper();
        let done = keeper.settle_board_game::<3>(0, &won_proof(7)).unwrap();
        assert_eq!(keeper.events(), &[GameEvent::GameDone(done)]);
        assert_eq!(keeper.game_count(), 1);
    }

    #[test]
    fn test_stale_counter_precondition_rejected() {
        let mut keeper = keeper();
        keeper.settle_board_game::<3>(0, &won_proof(7)).unwrap();

        // A second caller still expecting count 0 lost the race.
        let err = keeper.settle_board_game::<3>(0, &won_proof(8)).unwrap_err();
        assert_eq!(err, GameError::StalePrecondition { expected: 0, got: 1 });
        assert!(err.retryable());
        assert_eq!(keeper.game_count(), 1);

        // Retried against refreshed state it succeeds.
        keeper.settle_board_game::<3>(1, &won_proof(8)).unwrap();
    }

    #[test]
    fn test_reveal_settlement_through_gatekeeper() {
        let mut keeper = keeper();
        let prover = CommitReveal::new(HashBackend);
        let commit1 = prover.commit(Choice::Rock, 1, 3);
        let commit2 = prover.commit(Choice::Scissors, 2, 3);
        let p1 = prover.reveal(commit1.output.hashed_choice, 1, 3).unwrap();
        let p2 = prover.reveal(commit2.output.hashed_choice, 2, 3).unwrap();

        let done = keeper.settle_reveal_game(0, &p1, &p2).unwrap();
        assert_eq!(done.winner, crate::proof::validate::Outcome::FirstWins);
        assert_eq!(keeper.draw_count(), 0);
    }

    #[test]
    fn test_add_point_requires_admin_setup() {
        let mut keeper = keeper();
        let tree = SparseTree::new();
        let witness = tree.witness(1).unwrap();
        let record = PlayerRecord {
            public_key: [5; 32],
            points: 0,
        };
        let signature = sign_message(&admin(), ADMIN_UPDATE_DOMAIN, &[&1u64.to_le_bytes()]);

        assert_eq!(
            keeper.add_first_point(1, &record, &witness, &signature),
            Err(GameError::AuthorityUnset("admin"))
        );
    }

    #[test]
    fn test_leaderboard_flow() {
        let admin = admin();
        let mut keeper = keeper();
        keeper.set_admin_key(admin.verifying_key()).unwrap();

        let mut tree = SparseTree::new();
        let record = PlayerRecord {
            public_key: [5; 32],
            points: 0,
        };
        let signature = sign_message(&admin, ADMIN_UPDATE_DOMAIN, &[&1u64.to_le_bytes()]);

        let updated = keeper
            .add_first_point(1, &record, &tree.witness(1).unwrap(), &signature)
            .unwrap();
        assert_eq!(updated.points, 1);

        // Mirror the change off-chain and award another point.
        tree.set(1, updated.value_hash());
        assert_eq!(keeper.store_root(), tree.root());

        let again = keeper
            .add_point(1, &updated, &tree.witness(1).unwrap(), &signature)
            .unwrap();
        assert_eq!(again.points, 2);
    }

    #[test]
    fn test_solution_flow() {
        let admin = admin();
        let mut keeper = keeper();
        keeper.set_admin_key(admin.verifying_key()).unwrap();

        let parts = [3, 1, 4];
        let hash = solution_commitment(&parts);
        let signature = sign_message(&admin, SOLUTION_SET_DOMAIN, &[&hash]);
        keeper.set_solution(hash, &signature).unwrap();

        assert_eq!(
            keeper.submit_solution([7; 32], &[1, 2, 3]),
            Err(GameError::WrongSolution)
        );
        keeper.submit_solution([7; 32], &parts).unwrap();
        assert_eq!(
            keeper.events(),
            &[GameEvent::Solved {
                solver: [7; 32],
                puzzle_hash: hash
            }]
        );
    }

    #[test]
    fn test_solution_install_requires_admin_signature() {
        let admin = admin();
        let mut keeper = keeper();
        keeper.set_admin_key(admin.verifying_key()).unwrap();

        let hash = solution_commitment(&[1, 2, 3]);
        let forged = sign_message(
            &SigningKey::from_bytes(&[99; 32]),
            SOLUTION_SET_DOMAIN,
            &[&hash],
        );
        assert_eq!(
            keeper.set_solution(hash, &forged),
            Err(GameError::SignatureInvalid)
        );
    }
}
