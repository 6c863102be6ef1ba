//! # Signing and Recovery Ports
//!
//! Interfaces supplied by an external wallet / key-management layer.
//!
//! ## Serde
//!
//! `AccountSignature` serializes as a lowercase hex string. The bytes are
//! opaque to the engine; only the recovery port interprets them.

use std::future::Future;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uims_core::{AccountId, ContentDigest};

use crate::error::{CryptoError, RecoveryError, SigningError};

/// Opaque, scheme-specific signature bytes.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct AccountSignature(Vec<u8>);

impl AccountSignature {
    /// Wrap raw signature bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The raw signature bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Whether the signature is empty (credential not yet signed).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as lowercase hex.
    pub fn to_hex(&self) -> String {
        bytes_to_hex(&self.0)
    }

    /// Parse from hex, with or without a `0x` prefix.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let trimmed = hex.trim();
        let body = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        hex_to_bytes(body).map(Self)
    }
}

impl Serialize for AccountSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for AccountSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Self::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Debug for AccountSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.0.iter().take(4).map(|b| format!("{b:02x}")).collect();
        write!(f, "AccountSignature({prefix}..., {} bytes)", self.0.len())
    }
}

/// Signs digests on behalf of accounts the implementation controls.
///
/// The returned future is the single suspension point of credential
/// creation. It may take arbitrary wall-clock time and may resolve to a
/// rejection; callers must not commit any state until it resolves `Ok`.
pub trait SigningPort: Send + Sync {
    /// Sign `digest` as `account`.
    fn sign(
        &self,
        account: &AccountId,
        digest: &ContentDigest,
    ) -> impl Future<Output = Result<AccountSignature, SigningError>> + Send;
}

/// Recovers the signing account from a digest and signature.
pub trait AccountRecoveryPort: Send + Sync {
    /// Recover the account that produced `signature` over `digest`.
    ///
    /// # Errors
    ///
    /// `RecoveryError::MalformedSignature` when the bytes cannot be parsed,
    /// `RecoveryError::Unrecoverable` when they parse but do not sign
    /// `digest`.
    fn recover(
        &self,
        digest: &ContentDigest,
        signature: &AccountSignature,
    ) -> Result<AccountId, RecoveryError>;
}

impl<R: AccountRecoveryPort + ?Sized> AccountRecoveryPort for &R {
    fn recover(
        &self,
        digest: &ContentDigest,
        signature: &AccountSignature,
    ) -> Result<AccountId, RecoveryError> {
        (**self).recover(digest, signature)
    }
}

// ---------------------------------------------------------------------------
// Hex utilities (no external hex crate dependency)
// ---------------------------------------------------------------------------

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

pub(crate) fn hex_to_bytes(hex: &str) -> Result<Vec<u8>, CryptoError> {
    if hex.len() % 2 != 0 {
        return Err(CryptoError::HexDecode(
            "hex string must have even length".to_string(),
        ));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| CryptoError::HexDecode(format!("invalid hex at position {i}")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_hex_roundtrip() {
        let sig = AccountSignature::from_bytes(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(sig.to_hex(), "deadbeef");
        assert_eq!(AccountSignature::from_hex("0xDEADBEEF").unwrap(), sig);
    }

    #[test]
    fn signature_serde_is_hex_string() {
        let sig = AccountSignature::from_bytes(vec![1, 2]);
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json, "\"0102\"");
        let back: AccountSignature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sig);
    }

    #[test]
    fn signature_invalid_hex() {
        assert!(AccountSignature::from_hex("abc").is_err());
        assert!(AccountSignature::from_hex("zz").is_err());
        assert!(AccountSignature::from_hex("é0").is_err());
    }

    #[test]
    fn empty_signature() {
        assert!(AccountSignature::default().is_empty());
        assert!(AccountSignature::from_hex("").unwrap().is_empty());
    }

    #[test]
    fn debug_shows_prefix_and_length() {
        let sig = AccountSignature::from_bytes(vec![0xab; 96]);
        assert_eq!(format!("{sig:?}"), "AccountSignature(abababab..., 96 bytes)");
    }
}
