//! # uims-crypto: Signing Ports and Signature Verification
//!
//! The credential engine never holds private keys. It talks to the
//! cryptographic layer through two ports:
//!
//! - [`SigningPort`]: signs a credential digest on behalf of an account.
//!   Asynchronous: a wallet may wait on user interaction, decline, or fail.
//! - [`AccountRecoveryPort`]: recovers the signing account from a
//!   `(digest, signature)` pair without a public-key lookup.
//!
//! [`SignatureVerifier`] combines recovery with a normalized comparison
//! against the claimed issuer and reports the outcome as data.
//!
//! ## Reference Scheme
//!
//! [`ed25519`] implements both ports over Ed25519. The signature embeds the
//! signer's public key, so recovery is "parse key, verify, derive account".
//! Signing and recovery must always use the same scheme; mixing schemes is a
//! configuration error, not a runtime case.
//!
//! ## Crate Policy
//!
//! - Depends only on `uims-core` internally.
//! - Tests use real Ed25519 keys and real digests, never mocked crypto.

pub mod ed25519;
pub mod error;
pub mod ports;
pub mod verifier;

pub use ed25519::{account_for_key, Ed25519Recovery, LocalWallet};
pub use error::{CryptoError, RecoveryError, SigningError};
pub use ports::{AccountRecoveryPort, AccountSignature, SigningPort};
pub use verifier::{SignatureCheck, SignatureVerifier};
