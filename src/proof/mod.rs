//! Proof Protocols
//!
//! The provable layer of the engine:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     PROOF PROTOCOLS                         │
//! ├─────────────────────────────────────────────────────────────┤
//! │  system.rs   - Opaque prove/verify capability + Proof<T>    │
//! │  chain.rs    - Recursive move chain (base + inductive case) │
//! │  reveal.rs   - Commit-reveal for hidden choices             │
//! │  validate.rs - Terminal validation, outcomes, counters      │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod chain;
pub mod reveal;
pub mod system;
pub mod validate;

pub use chain::{ChainPublicOutput, MoveChain};
pub use reveal::{CommitReveal, RevealPublicOutput};
pub use system::{HashBackend, ProgramId, Proof, ProofBackend};
pub use validate::{GameDone, Outcome, RuleValidator};
