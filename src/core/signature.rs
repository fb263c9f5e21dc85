//! Authority Signatures
//!
//! Thin ed25519 wrappers for signature-gated updates. Messages are the
//! domain separator followed by the parts in order, so a signature over
//! one update type can never be replayed as another.
//!
//! Private keys live with their owners; the engine only ever sees
//! verifying keys and signatures.

pub use ed25519_dalek::{Signature, SigningKey, VerifyingKey};
use ed25519_dalek::{Signer, Verifier};

/// Domain separator for admin point updates (signed over the leaf key).
pub const ADMIN_UPDATE_DOMAIN: &[u8] = b"GAMECHAIN_ADMIN_UPDATE_V1";

/// Domain separator for server root envelopes (signed over root + version).
pub const STORAGE_UPDATE_DOMAIN: &[u8] = b"GAMECHAIN_STORAGE_UPDATE_V1";

/// Domain separator for installing a puzzle solution hash.
pub const SOLUTION_SET_DOMAIN: &[u8] = b"GAMECHAIN_SOLUTION_SET_V1";

/// Assemble the signed message: domain followed by each part.
fn message(domain: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(domain.len() + parts.iter().map(|p| p.len()).sum::<usize>());
    bytes.extend_from_slice(domain);
    for part in parts {
        bytes.extend_from_slice(part);
    }
    bytes
}

/// Sign `parts` under `domain` with the given key.
pub fn sign_message(key: &SigningKey, domain: &[u8], parts: &[&[u8]]) -> Signature {
    key.sign(&message(domain, parts))
}

/// Verify a signature over `parts` under `domain`.
pub fn verify_message(
    key: &VerifyingKey,
    domain: &[u8],
    parts: &[&[u8]],
    signature: &Signature,
) -> bool {
    key.verify(&message(domain, parts), signature).is_ok()
}
