//! # Cryptographic Error Types
//!
//! Structured errors for the signing and recovery ports.

use thiserror::Error;

/// Errors from key handling and encoding.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Hex decoding error.
    #[error("hex decode error: {0}")]
    HexDecode(String),

    /// Key material is malformed.
    #[error("invalid signing key: {0}")]
    InvalidSigningKey(String),
}

/// Outcome of a signing request that did not produce a signature.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    /// The wallet or its user declined to sign.
    #[error("signing rejected: {reason}")]
    Rejected {
        /// Why the wallet declined.
        reason: String,
    },

    /// The signer failed for a reason other than a user decision.
    #[error("signer failed: {0}")]
    Failed(String),
}

/// Failure to recover an account from a signature.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecoveryError {
    /// The signature bytes cannot be parsed under the scheme.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// The signature parses but does not sign this digest.
    #[error("no signer recoverable: {0}")]
    Unrecoverable(String),
}
