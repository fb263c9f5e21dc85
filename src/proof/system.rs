//! Proof-System Capability
//!
//! The engine treats succinct proving as an opaque capability: "attest
//! to a declared public output" and "verify an attestation against it".
//! `ProofBackend` is the seam where a real prover binds in; `HashBackend`
//! is the default stand-in that binds attestations to claims with a
//! domain-separated hash.
//!
//! A `Proof<T>` carries its public output in the clear. Verifiers act on
//! the output only after `verify` passes.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::hash::{Digest, GameHasher};

/// Domain separator for hash-bound attestations.
const ATTEST_DOMAIN: &[u8] = b"GAMECHAIN_ATTEST_V1";

/// Declared computation a proof attests to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProgramId {
    /// Recursive move-chain program (start + move steps).
    MoveChain,
    /// Commit-reveal program for hidden choices.
    CommitReveal,
}

impl ProgramId {
    /// Stable tag mixed into every attestation.
    pub fn tag(self) -> &'static str {
        match self {
            ProgramId::MoveChain => "gamechain.move-chain.v1",
            ProgramId::CommitReveal => "gamechain.commit-reveal.v1",
        }
    }
}

/// External proving capability.
///
/// Implementations must be deterministic and side-effect-free; the
/// engine assumes attestations cannot be forged for a claim that was
/// never proven.
pub trait ProofBackend {
    /// Produce an attestation for a program's claim bytes.
    fn attest(&self, program: ProgramId, claim: &[u8]) -> Digest;

    /// Check an attestation against a program's claim bytes.
    fn verify(&self, program: ProgramId, claim: &[u8], attestation: &Digest) -> bool;
}

/// Default backend: attestations are domain-separated hashes of the
/// claim. Stands in for an external succinct prover.
#[derive(Clone, Copy, Debug, Default)]
pub struct HashBackend;

impl ProofBackend for HashBackend {
    fn attest(&self, program: ProgramId, claim: &[u8]) -> Digest {
        let mut hasher = GameHasher::new(ATTEST_DOMAIN);
        hasher.update_bytes(program.tag().as_bytes());
        hasher.update_u64(claim.len() as u64);
        hasher.update_bytes(claim);
        hasher.finalize()
    }

    fn verify(&self, program: ProgramId, claim: &[u8], attestation: &Digest) -> bool {
        self.attest(program, claim) == *attestation
    }
}

/// A proof: a public output plus the attestation binding it to the
/// program that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof<T> {
    /// The declared public output.
    pub output: T,
    program: ProgramId,
    attestation: Digest,
}

/// Canonical claim bytes for a public output.
///
/// bincode of plain derive structs cannot fail to serialize.
fn claim_bytes<T: Serialize>(output: &T) -> Vec<u8> {
    bincode::serialize(output).expect("public outputs serialize infallibly")
}

impl<T: Serialize + DeserializeOwned> Proof<T> {
    /// Attest to a freshly computed public output.
    pub(crate) fn attested<B: ProofBackend>(backend: &B, program: ProgramId, output: T) -> Self {
        let attestation = backend.attest(program, &claim_bytes(&output));
        Self {
            output,
            program,
            attestation,
        }
    }

    /// Verify this proof against its declared public output.
    pub fn verify<B: ProofBackend>(&self, backend: &B) -> bool {
        backend.verify(self.program, &claim_bytes(&self.output), &self.attestation)
    }

    /// Program this proof claims to come from.
    pub fn program(&self) -> ProgramId {
        self.program
    }
}
