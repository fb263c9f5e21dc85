//! Deterministic Primitives
//!
//! Hashing and signature capabilities consumed by every protocol layer.

pub mod hash;
pub mod signature;

pub use hash::{Digest, GameHasher};
