//! # uims-core: Foundational Types for UIMS
//!
//! This crate is the leaf of the UIMS workspace. It defines the primitives
//! every other crate builds on: how a credential becomes bytes, how those
//! bytes become a digest, how accounts and records are identified, and how
//! the host supplies time and network context.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** All digest computation flows through
//!    `CanonicalBytes`, which can only be produced by the JCS pipeline
//!    (`CanonicalBytes::new()`) or by a finished `CanonicalEncoder`. The
//!    hasher accepts nothing else.
//!
//! 2. **Versioned, domain-separated digests.** The credential digest is
//!    SHA-256 over a fixed domain tag followed by the encoded message. The
//!    encoder writes its own version byte, so a change of field order is a
//!    visible version bump rather than a silent signature break.
//!
//! 3. **Newtype identifiers.** `AccountId`, `CredentialId`, `CapsuleId`:
//!    no bare strings. `AccountId` is normalized at construction, so
//!    equality is always case/format-insensitive.
//!
//! 4. **Host ports.** `ClockSource` and `NetworkContext` are traits; the
//!    core never reads the wall clock or chain context directly.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `uims-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod clock;
pub mod digest;
pub mod error;
pub mod identity;
pub mod network;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::{CanonicalBytes, CanonicalEncoder, ENCODING_VERSION};
pub use clock::{ClockSource, ManualClock, SystemClock};
pub use digest::{
    credential_digest, sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm,
    CREDENTIAL_DIGEST_DOMAIN,
};
pub use error::{CanonicalizationError, ClockError, CoreError};
pub use identity::{AccountId, CapsuleId, CredentialId};
pub use network::{NetworkContext, StaticNetwork};
pub use temporal::Timestamp;
