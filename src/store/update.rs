//! Authenticated Store Updates
//!
//! Signature-gated, Merkle-witnessed updates to a persisted root. Two
//! update paths exist:
//!
//! - **Admin path**: one key at a time, the witness proves the old value
//!   under the committed root and yields the new root directly.
//! - **Server path**: batched envelopes computed off-chain; the store
//!   verifies only the authority signature and strict version/value
//!   monotonicity, which rules out rollbacks without recomputing roots.
//!
//! Every check runs before the root is written; a rejected update has
//! no effect.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::hash::{Digest, GameHasher};
use crate::core::signature::{
    self, Signature, VerifyingKey, ADMIN_UPDATE_DOMAIN, STORAGE_UPDATE_DOMAIN,
};
use crate::error::GameError;
use crate::store::merkle::{empty_root, MerkleWitness};

/// Domain separator for leaderboard entry value hashes.
const PLAYER_RECORD_DOMAIN: &[u8] = b"GAMECHAIN_PLAYER_RECORD_V1";

/// A leaderboard entry: a player's public key bound to a point total.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    /// The player's public key bytes.
    pub public_key: [u8; 32],
    /// Accumulated points.
    pub points: u32,
}

impl PlayerRecord {
    /// Hash this record into its leaf value.
    pub fn value_hash(&self) -> Digest {
        let mut hasher = GameHasher::new(PLAYER_RECORD_DOMAIN);
        hasher.update_bytes(&self.public_key);
        hasher.update_u32(self.points);
        hasher.finalize()
    }

    /// The same record with points added.
    pub fn add_points(&self, points: u32) -> Self {
        Self {
            public_key: self.public_key,
            points: self.points + points,
        }
    }
}

/// One leaf change inside a batched server envelope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateEntry {
    /// Leaf key.
    pub key: u64,
    /// Value hash the server claims was current.
    pub old_value_hash: Digest,
    /// Replacement value hash; must strictly increase.
    pub new_value_hash: Digest,
}

/// Merkle-witnessed key→value root with signature-gated updates.
///
/// The root (and, for the server path, the envelope version) is the
/// only persisted quantity; entries are reconstructed on demand from
/// fresh witnesses supplied by callers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedStore {
    root: Digest,
    version: u64,
}

impl Default for AuthenticatedStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthenticatedStore {
    /// Create a store committed to the empty tree.
    pub fn new() -> Self {
        Self {
            root: empty_root(),
            version: 0,
        }
    }

    /// Currently committed root.
    pub fn root(&self) -> Digest {
        self.root
    }

    /// Last committed envelope version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Apply a single witnessed update authorized by the admin key.
    ///
    /// The witness must prove `(key, old_value_hash)` under the
    /// committed root; the new root is recomputed from the same path
    /// with the new value.
    pub fn apply_admin_update(
        &mut self,
        key: u64,
        old_value_hash: Digest,
        new_value_hash: Digest,
        witness: &MerkleWitness,
        signature: &Signature,
        admin: &VerifyingKey,
    ) -> Result<(), GameError> {
        if !signature::verify_message(admin, ADMIN_UPDATE_DOMAIN, &[&key.to_le_bytes()], signature)
        {
            return Err(GameError::SignatureInvalid);
        }
        if witness.key() != key {
            return Err(GameError::KeyMismatch {
                expected: key,
                got: witness.key(),
            });
        }
        if witness.compute_root(old_value_hash) != self.root {
            return Err(GameError::StaleWitness);
        }

        self.root = witness.compute_root(new_value_hash);
        debug!(key, root = %hex::encode(self.root), "admin update committed");
        Ok(())
    }

    /// Apply a batched, server-relayed envelope.
    ///
    /// The store trusts the authority's off-chain root computation but
    /// cannot be rolled back: the envelope version and every leaf value
    /// must strictly increase, and the signature covers
    /// `(new_root, version)`.
    pub fn apply_server_update(
        &mut self,
        entries: &[UpdateEntry],
        old_root: Digest,
        new_root: Digest,
        version: u64,
        signature: &Signature,
        server: &VerifyingKey,
    ) -> Result<(), GameError> {
        if old_root != self.root {
            return Err(GameError::StaleWitness);
        }
        if version <= self.version {
            return Err(GameError::VersionNotMonotonic {
                last: self.version,
                got: version,
            });
        }
        for entry in entries {
            if entry.new_value_hash <= entry.old_value_hash {
                return Err(GameError::ValueNotMonotonic { key: entry.key });
            }
        }
        if !signature::verify_message(
            server,
            STORAGE_UPDATE_DOMAIN,
            &[&new_root, &version.to_le_bytes()],
            signature,
        ) {
            return Err(GameError::SignatureInvalid);
        }

        self.root = new_root;
        self.version = version;
        debug!(version, root = %hex::encode(self.root), "server envelope committed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::signature::{sign_message, SigningKey};
    use crate::store::merkle::{SparseTree, EMPTY_LEAF};

    fn admin() -> SigningKey {
        SigningKey::from_bytes(&[11; 32])
    }

    fn server() -> SigningKey {
        SigningKey::from_bytes(&[22; 32])
    }

    fn sign_key(key: u64, signer: &SigningKey) -> Signature {
        sign_message(signer, ADMIN_UPDATE_DOMAIN, &[&key.to_le_bytes()])
    }

    fn sign_envelope(root: &Digest, version: u64, signer: &SigningKey) -> Signature {
        sign_message(signer, STORAGE_UPDATE_DOMAIN, &[root, &version.to_le_bytes()])
    }

    #[test]
    fn test_admin_update_from_empty_root() {
        // First point for key 1, witnessed against the empty tree.
        let admin = admin();
        let mut store = AuthenticatedStore::new();
        let mut tree = SparseTree::new();

        let record = PlayerRecord {
            public_key: [5; 32],
            points: 0,
        };
        let updated = record.add_points(1);
        let witness = tree.witness(1).unwrap();

        store
            .apply_admin_update(
                1,
                EMPTY_LEAF,
                updated.value_hash(),
                &witness,
                &sign_key(1, &admin),
                &admin.verifying_key(),
            )
            .unwrap();

        tree.set(1, updated.value_hash());
        assert_eq!(store.root(), tree.root());
    }

    #[test]
    fn test_non_admin_signature_rejected() {
        let mut store = AuthenticatedStore::new();
        let tree = SparseTree::new();
        let witness = tree.witness(1).unwrap();
        let intruder = SigningKey::from_bytes(&[99; 32]);

        let err = store
            .apply_admin_update(
                1,
                EMPTY_LEAF,
                [1; 32],
                &witness,
                &sign_key(1, &intruder),
                &admin().verifying_key(),
            )
            .unwrap_err();
        assert_eq!(err, GameError::SignatureInvalid);
        assert_eq!(store.root(), empty_root(), "rejected update must not commit");
    }

    #[test]
    fn test_stale_witness_rejected() {
        let admin = admin();
        let mut store = AuthenticatedStore::new();
        let tree = SparseTree::new();
        let witness = tree.witness(1).unwrap();

        // Wrong old value: the witness no longer proves the root.
        let err = store
            .apply_admin_update(
                1,
                [9; 32],
                [1; 32],
                &witness,
                &sign_key(1, &admin),
                &admin.verifying_key(),
            )
            .unwrap_err();
        assert_eq!(err, GameError::StaleWitness);
    }

    #[test]
    fn test_witness_key_mismatch_rejected() {
        let admin = admin();
        let mut store = AuthenticatedStore::new();
        let tree = SparseTree::new();
        let witness = tree.witness(2).unwrap();

        let err = store
            .apply_admin_update(
                1,
                EMPTY_LEAF,
                [1; 32],
                &witness,
                &sign_key(1, &admin),
                &admin.verifying_key(),
            )
            .unwrap_err();
        assert_eq!(err, GameError::KeyMismatch { expected: 1, got: 2 });
    }

    fn entry(key: u64, old: u8, new: u8) -> UpdateEntry {
        UpdateEntry {
            key,
            old_value_hash: [old; 32],
            new_value_hash: [new; 32],
        }
    }

    #[test]
    fn test_server_envelope_commits() {
        let server = server();
        let mut store = AuthenticatedStore::new();
        let old_root = store.root();
        let new_root = [42; 32];

        store
            .apply_server_update(
                &[entry(1, 0, 1), entry(2, 3, 4)],
                old_root,
                new_root,
                1,
                &sign_envelope(&new_root, 1, &server),
                &server.verifying_key(),
            )
            .unwrap();
        assert_eq!(store.root(), new_root);
        assert_eq!(store.version(), 1);
    }

    #[test]
    fn test_version_must_strictly_increase() {
        let server = server();
        let mut store = AuthenticatedStore::new();
        let root1 = [42; 32];
        store
            .apply_server_update(
                &[],
                store.root(),
                root1,
                3,
                &sign_envelope(&root1, 3, &server),
                &server.verifying_key(),
            )
            .unwrap();

        for stale in [0, 2, 3] {
            let err = store
                .apply_server_update(
                    &[],
                    store.root(),
                    [43; 32],
                    stale,
                    &sign_envelope(&[43; 32], stale, &server),
                    &server.verifying_key(),
                )
                .unwrap_err();
            assert_eq!(err, GameError::VersionNotMonotonic { last: 3, got: stale });
        }
    }

    #[test]
    fn test_leaf_values_must_strictly_increase() {
        let server = server();
        let mut store = AuthenticatedStore::new();
        let new_root = [42; 32];

        let err = store
            .apply_server_update(
                &[entry(7, 5, 5)],
                store.root(),
                new_root,
                1,
                &sign_envelope(&new_root, 1, &server),
                &server.verifying_key(),
            )
            .unwrap_err();
        assert_eq!(err, GameError::ValueNotMonotonic { key: 7 });
    }

    #[test]
    fn test_old_root_precondition() {
        let server = server();
        let mut store = AuthenticatedStore::new();
        let err = store
            .apply_server_update(
                &[],
                [1; 32],
                [2; 32],
                1,
                &sign_envelope(&[2; 32], 1, &server),
                &server.verifying_key(),
            )
            .unwrap_err();
        assert_eq!(err, GameError::StaleWitness);
    }

    #[test]
    fn test_envelope_signature_covers_root_and_version() {
        let server = server();
        let mut store = AuthenticatedStore::new();
        // Signature over a different version must not authorize this one.
        let err = store
            .apply_server_update(
                &[],
                store.root(),
                [2; 32],
                2,
                &sign_envelope(&[2; 32], 1, &server),
                &server.verifying_key(),
            )
            .unwrap_err();
        assert_eq!(err, GameError::SignatureInvalid);
    }
}
