//! Authenticated Storage
//!
//! A sparse Merkle map whose root is the only persisted quantity, plus
//! the signature-gated update protocols that advance it.

pub mod merkle;
pub mod update;

pub use merkle::{empty_root, MerkleWitness, SparseTree, EMPTY_LEAF, TREE_DEPTH, TREE_LEAVES};
pub use update::{AuthenticatedStore, PlayerRecord, UpdateEntry};
