//! # Time Capsule
//!
//! A content record gated by an absolute unlock instant.
//!
//! ## States
//!
//! ```text
//! LOCKED ──tick (unlockAt <= now)──▶ UNLOCKED
//! ```
//!
//! `is_locked` is a cached flag: `true` at creation, flipped exactly once by
//! the capsule clock, never set back. Readers that need the truth "now"
//! should compute [`TimeRemaining`](crate::TimeRemaining) from `unlock_at`
//! instead of trusting the flag to have converged.

use serde::{Deserialize, Serialize};
use uims_core::{AccountId, CapsuleId, Timestamp};

use crate::error::CapsuleError;
use crate::remaining::TimeRemaining;

/// The kind of content a capsule holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapsuleType {
    Message,
    Memory,
    Prediction,
    Nft,
    Legacy,
}

impl CapsuleType {
    /// All capsule types, in display order.
    pub const ALL: [CapsuleType; 5] = [
        Self::Message,
        Self::Memory,
        Self::Prediction,
        Self::Nft,
        Self::Legacy,
    ];

    /// Lowercase tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Memory => "memory",
            Self::Prediction => "prediction",
            Self::Nft => "nft",
            Self::Legacy => "legacy",
        }
    }
}

impl std::fmt::Display for CapsuleType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CapsuleType {
    type Err = CapsuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| CapsuleError::UnknownCapsuleType(s.to_string()))
    }
}

/// Caller-supplied fields for a new capsule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CapsuleDraft {
    pub capsule_type: Option<CapsuleType>,
    pub title: String,
    pub content: String,
    pub unlock_at: Option<Timestamp>,
    /// Account that sealed the capsule, if known.
    pub owner: Option<AccountId>,
}

/// A time capsule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeCapsule {
    pub id: CapsuleId,
    pub capsule_type: CapsuleType,
    pub title: String,
    pub content: String,
    pub unlock_at: Timestamp,
    pub is_locked: bool,
    pub created_at: Timestamp,
    #[serde(default)]
    pub owner: Option<AccountId>,
}

impl TimeCapsule {
    /// Build a locked capsule from a draft.
    ///
    /// An `unlock_at` already in the past is accepted; the capsule unlocks
    /// on the next tick.
    pub(crate) fn seal(draft: CapsuleDraft, created_at: Timestamp) -> Result<Self, CapsuleError> {
        let capsule_type = draft.capsule_type.ok_or(CapsuleError::MissingRequiredField {
            field: "capsuleType",
        })?;
        if draft.title.trim().is_empty() {
            return Err(CapsuleError::MissingRequiredField { field: "title" });
        }
        let unlock_at = draft.unlock_at.ok_or(CapsuleError::MissingRequiredField {
            field: "unlockAt",
        })?;
        Ok(Self {
            id: CapsuleId::new(),
            capsule_type,
            title: draft.title,
            content: draft.content,
            unlock_at,
            is_locked: true,
            created_at,
            owner: draft.owner,
        })
    }

    /// Whether the unlock instant has been reached at `now`.
    pub fn is_due(&self, now: &Timestamp) -> bool {
        self.unlock_at <= *now
    }

    /// Countdown to `unlock_at`, independent of the cached flag.
    pub fn time_remaining(&self, now: &Timestamp) -> TimeRemaining {
        TimeRemaining::between(now, &self.unlock_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn draft() -> CapsuleDraft {
        CapsuleDraft {
            capsule_type: Some(CapsuleType::Prediction),
            title: "Who wins 2030".to_string(),
            content: "Nobody expected it".to_string(),
            unlock_at: Some(t("2030-01-01T00:00:00Z")),
            owner: None,
        }
    }

    #[test]
    fn seal_starts_locked() {
        let c = TimeCapsule::seal(draft(), t("2026-01-01T00:00:00Z")).unwrap();
        assert!(c.is_locked);
        assert!(!c.is_due(&t("2029-12-31T23:59:59.999Z")));
        assert!(c.is_due(&t("2030-01-01T00:00:00Z")));
    }

    #[test]
    fn seal_requires_type_title_unlock() {
        let mut d = draft();
        d.capsule_type = None;
        assert!(matches!(
            TimeCapsule::seal(d, Timestamp::now()),
            Err(CapsuleError::MissingRequiredField { field: "capsuleType" })
        ));

        let mut d = draft();
        d.title = " ".to_string();
        assert!(matches!(
            TimeCapsule::seal(d, Timestamp::now()),
            Err(CapsuleError::MissingRequiredField { field: "title" })
        ));

        let mut d = draft();
        d.unlock_at = None;
        assert!(matches!(
            TimeCapsule::seal(d, Timestamp::now()),
            Err(CapsuleError::MissingRequiredField { field: "unlockAt" })
        ));
    }

    #[test]
    fn seal_accepts_past_unlock() {
        let c = TimeCapsule::seal(draft(), t("2031-01-01T00:00:00Z")).unwrap();
        assert!(c.is_locked);
        assert!(c.is_due(&c.created_at));
    }

    #[test]
    fn capsule_type_parse_and_serde() {
        assert_eq!("NFT".parse::<CapsuleType>().unwrap(), CapsuleType::Nft);
        assert!("letter".parse::<CapsuleType>().is_err());
        assert_eq!(serde_json::to_string(&CapsuleType::Legacy).unwrap(), "\"legacy\"");
    }

    #[test]
    fn capsule_serde_camel_case() {
        let c = TimeCapsule::seal(draft(), t("2026-01-01T00:00:00Z")).unwrap();
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["capsuleType"], "prediction");
        assert_eq!(json["isLocked"], true);
        let back: TimeCapsule = serde_json::from_value(json).unwrap();
        assert_eq!(back, c);
    }
}
