//! Commitment Hashing
//!
//! Domain-separated SHA-256 over the engine's integer and digest inputs.
//! Every hash in the system goes through `GameHasher` so that material
//! from one protocol (player identity, hidden choice, proof attestation,
//! Merkle node) can never collide with another.
//!
//! Order of updates is critical for determinism.

use sha2::{Digest as Sha2Digest, Sha256};

/// Hash output type (256 bits / 32 bytes).
pub type Digest = [u8; 32];

/// Domain separator for hashed player secrets.
const SECRET_DOMAIN: &[u8] = b"GAMECHAIN_SECRET_V1";

/// Domain separator for player commitments (secret hash bound to a game).
const PLAYER_DOMAIN: &[u8] = b"GAMECHAIN_PLAYER_V1";

/// Domain separator for hidden-choice commitments.
const CHOICE_DOMAIN: &[u8] = b"GAMECHAIN_CHOICE_V1";

/// Domain separator for puzzle solution hashes.
const SOLUTION_DOMAIN: &[u8] = b"GAMECHAIN_SOLUTION_V1";

/// Deterministic hasher for commitments.
///
/// Wraps SHA-256 with helpers for the engine's scalar types.
pub struct GameHasher {
    hasher: Sha256,
}

impl GameHasher {
    /// Create a new hasher with a domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Update with raw bytes.
    #[inline]
    pub fn update_bytes(&mut self, bytes: &[u8]) {
        self.hasher.update(bytes);
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a digest.
    #[inline]
    pub fn update_digest(&mut self, digest: &Digest) {
        self.hasher.update(digest);
    }

    /// Finalize and return the hash.
    pub fn finalize(self) -> Digest {
        self.hasher.finalize().into()
    }
}

/// Compute hash with a domain separator over raw bytes.
pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Digest {
    let mut hasher = GameHasher::new(domain);
    hasher.update_bytes(data);
    hasher.finalize()
}

/// One-way hash of a player's private secret.
pub fn hash_secret(secret: u64) -> Digest {
    let mut hasher = GameHasher::new(SECRET_DOMAIN);
    hasher.update_u64(secret);
    hasher.finalize()
}

/// Player commitment: the hashed secret bound to one game instance.
///
/// `H(H(secret) || game_id)` — established once at game start and used
/// to check whose turn it is without revealing the secret.
pub fn player_commitment(secret: u64, game_id: u64) -> Digest {
    let mut hasher = GameHasher::new(PLAYER_DOMAIN);
    hasher.update_digest(&hash_secret(secret));
    hasher.update_u64(game_id);
    hasher.finalize()
}

/// Hidden-choice commitment: `H(choice || secret || game_id)`.
pub fn choice_commitment(choice: u8, secret: u64, game_id: u64) -> Digest {
    let mut hasher = GameHasher::new(CHOICE_DOMAIN);
    hasher.update_u8(choice);
    hasher.update_u64(secret);
    hasher.update_u64(game_id);
    hasher.finalize()
}

/// Hash of a three-part puzzle submission.
pub fn solution_commitment(parts: &[u64; 3]) -> Digest {
    let mut hasher = GameHasher::new(SOLUTION_DOMAIN);
    for part in parts {
        hasher.update_u64(*part);
    }
    hasher.finalize()
}
