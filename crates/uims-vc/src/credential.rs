//! # Credential Structure
//!
//! A credential binds an issuer, a holder, and a typed payload to a
//! validity window, and carries the issuer's signature over its digest.
//!
//! ## Hashed Fields
//!
//! The credential message is built by [`Credential::message()`] in a fixed
//! field order:
//!
//! ```text
//! id, issuer, holder, credentialType, title, expiryDate, issuanceDate,
//! payload, createdAtMillis, networkId
//! ```
//!
//! where `payload` is the JCS serialization of
//! `{category, data, description, mediaReference, tags}`. Every hashed field
//! is write-once: the store hands out shared references only. A credential
//! edited outside the store (for example in an exported JSON file) fails
//! verification.
//!
//! `data` is an opaque, pre-serialized blob. It is hashed verbatim and never
//! parsed.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uims_core::{
    credential_digest, AccountId, CanonicalBytes, CanonicalEncoder, ContentDigest, CredentialId,
};
use uims_crypto::AccountSignature;

use crate::error::VcError;
use crate::status::VerificationStatus;

/// Domain string written into every credential message header.
pub const CREDENTIAL_MESSAGE_DOMAIN: &str = "uims.credential";

// ─── Credential Type ─────────────────────────────────────────────────

/// The kind of attestation a credential makes.
///
/// The verification algorithm never branches on the type; `Custom` keeps the
/// set open without touching the engine. Every value is normalized at
/// construction, so the tag a credential was signed with is the tag it
/// parses back to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CredentialType {
    Academic,
    Professional,
    Certification,
    Identity,
    Membership,
    Custom(CustomTag),
}

/// A custom type tag: trimmed, non-empty, and not a known tag in any case.
///
/// Only [`CredentialType::custom()`] and [`CredentialType::parse()`] build
/// one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomTag(String);

impl CustomTag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl CredentialType {
    /// The tag string that is hashed and serialized.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Academic => "academic",
            Self::Professional => "professional",
            Self::Certification => "certification",
            Self::Identity => "identity",
            Self::Membership => "membership",
            Self::Custom(tag) => tag.as_str(),
        }
    }

    /// Parse a tag. Surrounding whitespace is dropped and known tags are
    /// matched case-insensitively; anything else becomes `Custom`.
    ///
    /// # Errors
    ///
    /// `MissingRequiredField` for an empty or blank tag.
    pub fn parse(tag: &str) -> Result<Self, VcError> {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return Err(VcError::MissingRequiredField {
                field: "credentialType",
            });
        }
        Ok(match trimmed.to_ascii_lowercase().as_str() {
            "academic" => Self::Academic,
            "professional" => Self::Professional,
            "certification" => Self::Certification,
            "identity" => Self::Identity,
            "membership" => Self::Membership,
            _ => Self::Custom(CustomTag(trimmed.to_string())),
        })
    }

    /// Build a custom type. Same normalization as [`parse()`](Self::parse),
    /// so `custom("Academic")` is `Academic`.
    pub fn custom(tag: impl AsRef<str>) -> Result<Self, VcError> {
        Self::parse(tag.as_ref())
    }
}

impl std::fmt::Display for CredentialType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CredentialType {
    type Err = VcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CredentialType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for CredentialType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

// ─── Draft ───────────────────────────────────────────────────────────

/// Caller-supplied fields for a new credential.
///
/// Required fields are optional here so that absence is reported as
/// [`VcError::MissingRequiredField`] rather than being unrepresentable at
/// the edge (CLI flags, JSON requests).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CredentialDraft {
    pub issuer: Option<AccountId>,
    pub holder: Option<AccountId>,
    pub credential_type: Option<CredentialType>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: BTreeSet<String>,
    pub media_reference: Option<String>,
    pub data: String,
    pub issuance_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
}

/// A draft that passed creation-time validation.
#[derive(Debug, Clone)]
pub(crate) struct ValidatedDraft {
    pub issuer: AccountId,
    pub holder: AccountId,
    pub credential_type: CredentialType,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: BTreeSet<String>,
    pub media_reference: Option<String>,
    pub data: String,
    pub issuance_date: NaiveDate,
    pub expiry_date: NaiveDate,
}

impl CredentialDraft {
    /// Check required fields and the validity window.
    ///
    /// Runs before any hashing or signing. `holder` defaults to `issuer`
    /// (self-issued credential) when absent.
    pub(crate) fn validate(self) -> Result<ValidatedDraft, VcError> {
        let issuer = self
            .issuer
            .ok_or(VcError::MissingRequiredField { field: "issuer" })?;
        let credential_type = self.credential_type.ok_or(VcError::MissingRequiredField {
            field: "credentialType",
        })?;
        if self.title.trim().is_empty() {
            return Err(VcError::MissingRequiredField { field: "title" });
        }
        let issuance_date = self.issuance_date.ok_or(VcError::MissingRequiredField {
            field: "issuanceDate",
        })?;
        let expiry_date = self.expiry_date.ok_or(VcError::MissingRequiredField {
            field: "expiryDate",
        })?;
        if expiry_date <= issuance_date {
            return Err(VcError::InvalidValidityWindow {
                issuance_date,
                expiry_date,
            });
        }
        Ok(ValidatedDraft {
            holder: self.holder.unwrap_or_else(|| issuer.clone()),
            issuer,
            credential_type,
            title: self.title,
            description: self.description,
            category: self.category,
            tags: self.tags,
            media_reference: self.media_reference,
            data: self.data,
            issuance_date,
            expiry_date,
        })
    }
}

// ─── Credential ──────────────────────────────────────────────────────

/// A signed credential and its verification state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub id: CredentialId,
    pub issuer: AccountId,
    pub holder: AccountId,
    pub credential_type: CredentialType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub media_reference: Option<String>,
    #[serde(default)]
    pub data: String,
    pub issuance_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub network_id: u64,
    pub created_at_millis: i64,
    #[serde(default)]
    pub signature: AccountSignature,
    #[serde(default)]
    pub verification_status: VerificationStatus,
    #[serde(default)]
    pub last_verified_at_millis: Option<i64>,
    #[serde(default)]
    pub verification_count: u64,
}

/// The JCS-serialized composite payload. Field names are part of the
/// message format.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PayloadView<'a> {
    category: &'a str,
    data: &'a str,
    description: &'a str,
    media_reference: Option<&'a str>,
    tags: &'a BTreeSet<String>,
}

impl Credential {
    /// Assemble an unsigned credential from a validated draft.
    pub(crate) fn unsigned(
        draft: ValidatedDraft,
        id: CredentialId,
        network_id: u64,
        created_at_millis: i64,
    ) -> Self {
        Self {
            id,
            issuer: draft.issuer,
            holder: draft.holder,
            credential_type: draft.credential_type,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            tags: draft.tags,
            media_reference: draft.media_reference,
            data: draft.data,
            issuance_date: draft.issuance_date,
            expiry_date: draft.expiry_date,
            network_id,
            created_at_millis,
            signature: AccountSignature::default(),
            verification_status: VerificationStatus::Unverified,
            last_verified_at_millis: None,
            verification_count: 0,
        }
    }

    /// Canonical payload bytes (JCS).
    fn payload(&self) -> Result<CanonicalBytes, VcError> {
        let view = PayloadView {
            category: &self.category,
            data: &self.data,
            description: &self.description,
            media_reference: self.media_reference.as_deref(),
            tags: &self.tags,
        };
        Ok(CanonicalBytes::new(&view)?)
    }

    /// The canonical credential message.
    ///
    /// Depends only on hashed fields; signature and verification state are
    /// never part of it.
    pub fn message(&self) -> Result<CanonicalBytes, VcError> {
        let payload = self.payload()?;
        let mut enc = CanonicalEncoder::new(CREDENTIAL_MESSAGE_DOMAIN)?;
        enc.string(&self.id.canonical_string())?
            .string(self.issuer.as_str())?
            .string(self.holder.as_str())?
            .string(self.credential_type.as_str())?
            .string(&self.title)?
            .date(self.expiry_date)?
            .date(self.issuance_date)?
            .nested(&payload)?
            .i64(self.created_at_millis)
            .u64(self.network_id);
        Ok(enc.finish())
    }

    /// The digest the issuer signs and verification recomputes.
    pub fn digest(&self) -> Result<ContentDigest, VcError> {
        Ok(credential_digest(&self.message()?))
    }

    /// Whether the credential carries a signature.
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }
}
