//! # Gamechain Core
//!
//! Provable state-transition engine for authenticated multi-party games.
//! Every transition is either signed by an authorized party or carried
//! by a proof that it followed fixed rules from a previously accepted
//! state, so no trusted server is needed.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      GAMECHAIN CORE                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/            - Deterministic primitives                 │
//! │  ├── hash.rs      - Domain-separated commitment hashing      │
//! │  └── signature.rs - Authority signatures (ed25519)           │
//! │                                                              │
//! │  game/            - Game rules                               │
//! │  ├── board.rs     - N×N board ↔ fixed-width commitment       │
//! │  └── choice.rs    - Hidden-choice domain + outcome table     │
//! │                                                              │
//! │  proof/           - Proof protocols                          │
//! │  ├── system.rs    - Opaque prove/verify capability           │
//! │  ├── chain.rs     - Recursive move chain                     │
//! │  ├── reveal.rs    - Commit-reveal protocol                   │
//! │  └── validate.rs  - Terminal validation + counters           │
//! │                                                              │
//! │  store/           - Authenticated storage                    │
//! │  ├── merkle.rs    - Sparse tree + inclusion witnesses        │
//! │  └── update.rs    - Signature-gated root updates             │
//! │                                                              │
//! │  gatekeeper.rs    - Persistent slots, preconditions, events  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Trust model
//!
//! Proof generation/verification is an opaque capability behind
//! [`proof::ProofBackend`]; signatures and hashes are the only other
//! cryptographic inputs. The engine never stores secrets — only
//! commitments, hashes, and signatures derived from them. State is
//! advanced optimistically: every mutating call declares the state it
//! expects, and exactly one of two racing callers wins.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod game;
pub mod gatekeeper;
pub mod proof;
pub mod store;

// Re-export commonly used types
pub use crate::core::hash::{choice_commitment, player_commitment, solution_commitment, Digest};
pub use error::{ErrorKind, GameError};
pub use game::{Board, Board3, Board5, CellOwner, Choice};
pub use gatekeeper::{GameEvent, Gatekeeper, OneTime};
pub use proof::{
    ChainPublicOutput, CommitReveal, GameDone, HashBackend, MoveChain, Outcome, Proof,
    ProofBackend, RevealPublicOutput, RuleValidator,
};
pub use store::{AuthenticatedStore, MerkleWitness, PlayerRecord, SparseTree, UpdateEntry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
