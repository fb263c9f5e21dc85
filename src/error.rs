//! Error Types
//!
//! A single error enum for the whole engine, grouped into four kinds.
//! Only consistency failures are worth retrying: the caller regenerates
//! its input against refreshed state. Everything else is a hard
//! rejection of the input itself.

use thiserror::Error;

/// Coarse classification of a [`GameError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input violates a game rule or encoding.
    Validation,
    /// The caller is not who (or whose turn) it claims.
    Authorization,
    /// The declared state no longer matches persistent state.
    Consistency,
    /// A write-once slot was misused.
    OneTimeSetup,
}

/// Any rejection the engine can produce.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GameError {
    // --- validation ---
    /// Coordinates fall outside the board.
    #[error("coordinates ({x}, {y}) are outside the board")]
    OutOfRange {
        /// Column.
        x: u8,
        /// Row.
        y: u8,
    },

    /// The targeted cell already holds a mark.
    #[error("cell ({x}, {y}) is already occupied")]
    CellOccupied {
        /// Column.
        x: u8,
        /// Row.
        y: u8,
    },

    /// The commitment is not a canonical board encoding.
    #[error("malformed board commitment {0:#x}")]
    MalformedBoard(u64),

    /// The value is outside the hidden-choice domain.
    #[error("invalid choice index {0}, expected 1..=3")]
    InvalidChoice(u8),

    /// A commitment was submitted for settlement before being opened.
    #[error("choice commitment has not been revealed")]
    NotRevealed,

    /// The board holds no completed line.
    #[error("game has no winner yet")]
    NoWinner,

    /// The submitted solution does not hash to the installed puzzle.
    #[error("solution does not match the puzzle")]
    WrongSolution,

    // --- authorization ---
    /// A signature failed verification against the authority key.
    #[error("signature verification failed")]
    SignatureInvalid,

    /// The mover's secret does not match the commitment its turn selects.
    #[error("secret does not match the commitment whose turn it is")]
    WrongTurnOrIdentity,

    /// An operation needs an authority slot that was never set.
    #[error("{0} authority has not been registered")]
    AuthorityUnset(&'static str),

    /// No domain value reproduces the commitment under this secret.
    #[error("no choice matches the commitment under this secret")]
    RevealMismatch,

    // --- consistency ---
    /// A prior proof failed verification.
    #[error("previous proof does not verify")]
    ChainBroken,

    /// Two terminal proofs belong to different game instances.
    #[error("game id mismatch: first proof has {first}, second has {second}")]
    GameIdMismatch {
        /// Game id in the first proof.
        first: u64,
        /// Game id in the second proof.
        second: u64,
    },

    /// The witness proves a root that is no longer committed.
    #[error("witness does not bind to the committed root")]
    StaleWitness,

    /// The witness path addresses a different key.
    #[error("witness addresses key {got}, expected {expected}")]
    KeyMismatch {
        /// Key the caller declared.
        expected: u64,
        /// Key the witness path actually addresses.
        got: u64,
    },

    /// The envelope version does not strictly increase.
    #[error("envelope version {got} does not exceed committed version {last}")]
    VersionNotMonotonic {
        /// Last committed version.
        last: u64,
        /// Version the envelope declares.
        got: u64,
    },

    /// A leaf value does not strictly increase.
    #[error("value for key {key} does not strictly increase")]
    ValueNotMonotonic {
        /// Offending leaf key.
        key: u64,
    },

    /// The game id was already settled.
    #[error("game {0} has already been settled")]
    GameAlreadySettled(u64),

    /// The caller's declared counter no longer matches.
    #[error("stale precondition: expected count {expected}, found {got}")]
    StalePrecondition {
        /// Counter value the caller declared.
        expected: u32,
        /// Counter value actually committed.
        got: u32,
    },

    // --- one-time setup ---
    /// A write-once slot was written twice.
    #[error("{0} slot has already been set")]
    AlreadySet(&'static str),
}

impl GameError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GameError::OutOfRange { .. }
            | GameError::CellOccupied { .. }
            | GameError::MalformedBoard(_)
            | GameError::InvalidChoice(_)
            | GameError::NotRevealed
            | GameError::NoWinner
            | GameError::WrongSolution => ErrorKind::Validation,

            GameError::SignatureInvalid
            | GameError::WrongTurnOrIdentity
            | GameError::AuthorityUnset(_)
            | GameError::RevealMismatch => ErrorKind::Authorization,

            GameError::ChainBroken
            | GameError::GameIdMismatch { .. }
            | GameError::StaleWitness
            | GameError::KeyMismatch { .. }
            | GameError::VersionNotMonotonic { .. }
            | GameError::ValueNotMonotonic { .. }
            | GameError::GameAlreadySettled(_)
            | GameError::StalePrecondition { .. } => ErrorKind::Consistency,

            GameError::AlreadySet(_) => ErrorKind::OneTimeSetup,
        }
    }

    /// Whether retrying against refreshed state can succeed.
    ///
    /// Only consistency failures are transient; every other kind
    /// rejects the input itself.
    pub fn retryable(&self) -> bool {
        self.kind() == ErrorKind::Consistency
    }
}
