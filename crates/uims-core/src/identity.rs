//! # Identity Newtypes
//!
//! Newtype wrappers for every identifier in UIMS. You cannot pass a
//! `CapsuleId` where a `CredentialId` is expected.
//!
//! ## Account Normalization
//!
//! `AccountId` is a fixed-width 20-byte account address. Inputs are accepted
//! with or without a `0x`/`0X` prefix and in any hex case; the stored form is
//! always lowercase `0x` + 40 hex characters. Equality on `AccountId` is
//! therefore equality on the normalized form.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use crate::error::CoreError;

/// Number of hex characters in an account address body.
const ACCOUNT_HEX_LEN: usize = 40;

/// A 20-byte account address in canonical lowercase `0x…` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(String);

impl AccountId {
    /// Parse and normalize an account address.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidAccountId` if the input is not 40 hex
    /// characters after stripping whitespace and an optional `0x` prefix.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let trimmed = input.trim();
        let body = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if body.len() != ACCOUNT_HEX_LEN {
            return Err(CoreError::InvalidAccountId {
                input: input.to_string(),
                reason: format!("expected {ACCOUNT_HEX_LEN} hex chars, got {}", body.len()),
            });
        }
        if !body.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(CoreError::InvalidAccountId {
                input: input.to_string(),
                reason: "contains non-hex characters".to_string(),
            });
        }
        Ok(Self(format!("0x{}", body.to_ascii_lowercase())))
    }

    /// Build an account id from its 20 raw bytes.
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        Self(format!("0x{hex}"))
    }

    /// The canonical `0x`-prefixed lowercase form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for AccountId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for AccountId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for AccountId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Unique identifier for a credential, generated at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CredentialId(pub Uuid);

/// Unique identifier for a time capsule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CapsuleId(pub Uuid);

impl CredentialId {
    /// Generate a new random credential identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a hyphenated UUID string.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        Uuid::parse_str(input.trim())
            .map(Self)
            .map_err(|e| CoreError::InvalidIdentifier {
                input: input.to_string(),
                reason: e.to_string(),
            })
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// The hyphenated lowercase form that enters the credential digest.
    pub fn canonical_string(&self) -> String {
        self.0.hyphenated().to_string()
    }
}

impl Default for CredentialId {
    fn default() -> Self {
        Self::new()
    }
}

impl CapsuleId {
    /// Generate a new random capsule identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a hyphenated UUID string.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        Uuid::parse_str(input.trim())
            .map(Self)
            .map_err(|e| CoreError::InvalidIdentifier {
                input: input.to_string(),
                reason: e.to_string(),
            })
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CapsuleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CredentialId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "credential:{}", self.0)
    }
}

impl std::fmt::Display for CapsuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "capsule:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = "0xAbCdEf0123456789AbCdEf0123456789AbCdEf01";

    #[test]
    fn account_normalizes_case() {
        let a = AccountId::parse(MIXED).unwrap();
        assert_eq!(a.as_str(), "0xabcdef0123456789abcdef0123456789abcdef01");
    }

    #[test]
    fn account_accepts_missing_and_upper_prefix() {
        let bare = AccountId::parse("abcdef0123456789abcdef0123456789abcdef01").unwrap();
        let upper = AccountId::parse("0XABCDEF0123456789ABCDEF0123456789ABCDEF01").unwrap();
        assert_eq!(bare, upper);
        assert_eq!(bare, AccountId::parse(MIXED).unwrap());
    }

    #[test]
    fn account_rejects_bad_input() {
        assert!(AccountId::parse("0x").is_err());
        assert!(AccountId::parse("0x123").is_err());
        assert!(AccountId::parse("0xGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGGG").is_err());
        assert!(AccountId::parse("").is_err());
    }

    #[test]
    fn account_from_bytes() {
        let a = AccountId::from_bytes([0xab; 20]);
        assert_eq!(a.as_str(), format!("0x{}", "ab".repeat(20)));
    }

    #[test]
    fn account_serde_normalizes() {
        let json = format!("\"{MIXED}\"");
        let a: AccountId = serde_json::from_str(&json).unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), format!("\"{}\"", MIXED.to_lowercase()));
    }

    #[test]
    fn account_serde_rejects_invalid() {
        assert!(serde_json::from_str::<AccountId>("\"0x12\"").is_err());
    }

    #[test]
    fn credential_id_display_and_parse() {
        let id = CredentialId::new();
        assert!(format!("{id}").starts_with("credential:"));
        assert_eq!(CredentialId::parse(&id.canonical_string()).unwrap(), id);
        assert!(CredentialId::parse("nope").is_err());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(CredentialId::new(), CredentialId::new());
        assert_ne!(CapsuleId::new(), CapsuleId::new());
    }

    #[test]
    fn capsule_id_serde_is_bare_uuid() {
        let id = CapsuleId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", id.0));
    }
}
