//! # Error Types: Structured Error Hierarchy
//!
//! Errors shared by every UIMS crate. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Parsing errors carry the offending input so callers can report it.
//! - Clock failures are their own type: a scheduler that cannot read the
//!   time must stop, never guess.

use thiserror::Error;

/// Top-level error type for the core primitives.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// An account identifier could not be parsed.
    #[error("invalid account id {input:?}: {reason}")]
    InvalidAccountId {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A record identifier could not be parsed.
    #[error("invalid identifier {input:?}: {reason}")]
    InvalidIdentifier {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A timestamp could not be parsed or is out of range.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Reading the host clock failed.
    #[error(transparent)]
    Clock(#[from] ClockError),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations: {0}")]
    FloatRejected(f64),

    /// A length-prefixed field exceeds the u32 length prefix.
    #[error("field too long for canonical encoding: {len} bytes")]
    FieldTooLong {
        /// Byte length of the offending field.
        len: usize,
    },

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error reading the host clock.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    /// The clock source could not produce a time.
    #[error("clock source unavailable: {0}")]
    Unavailable(String),
}
