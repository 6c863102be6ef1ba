//! # Content Digest: The Value That Gets Signed
//!
//! Defines `ContentDigest` and `DigestAlgorithm`, and the two digest paths:
//!
//! - [`credential_digest()`]: SHA-256 over a fixed domain tag followed by the
//!   canonical credential message. This is the exact value handed to the
//!   signing port and recomputed during verification; there is no further
//!   hashing or wrapping here. Any "personal message" prefix belongs to the
//!   signing scheme, not to this module.
//! - [`sha256_digest()`]: plain SHA-256 for content addressing.
//!
//! ## Security Invariant
//!
//! Both functions accept only `&CanonicalBytes`, so no code path can digest
//! bytes that skipped canonicalization.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// Domain tag prepended to the canonical message before hashing.
///
/// The trailing NUL terminates the tag so no message prefix can extend it.
pub const CREDENTIAL_DIGEST_DOMAIN: &[u8] = b"UIMS-DIGEST-V1\0";

/// The hash construction that produced a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// Plain SHA-256.
    Sha256,
    /// SHA-256 over [`CREDENTIAL_DIGEST_DOMAIN`] `||` message.
    Sha256DomainV1,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha256DomainV1 => "sha256-uims-v1",
        }
    }
}

impl std::fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 32-byte digest with its algorithm tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The hash construction that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Create a new content digest from raw bytes and algorithm.
    pub fn new(algorithm: DigestAlgorithm, bytes: [u8; 32]) -> Self {
        Self { algorithm, bytes }
    }

    /// Return the raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// Compute the domain-separated credential digest.
pub fn credential_digest(message: &CanonicalBytes) -> ContentDigest {
    let mut hasher = Sha256::new();
    hasher.update(CREDENTIAL_DIGEST_DOMAIN);
    hasher.update(message.as_bytes());
    ContentDigest::new(DigestAlgorithm::Sha256DomainV1, hasher.finalize().into())
}

/// Compute a plain SHA-256 content digest from canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    ContentDigest::new(DigestAlgorithm::Sha256, hash.into())
}

/// Compute a SHA-256 hex string from canonical bytes.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}
