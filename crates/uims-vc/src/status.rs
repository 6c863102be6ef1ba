//! # Verification State Machine
//!
//! ```text
//! Unverified ──verify──▶ { Verified | Expired | Invalid }
//!                              ▲         │
//!                              └─verify──┘   (re-evaluated on every call)
//! ```
//!
//! A verification attempt always ends in one of the three determined states.
//! Later attempts re-evaluate from scratch, so `Verified → Expired` happens
//! once time passes, and nothing ever returns to `Unverified`.
//!
//! ## Precedence
//!
//! Expiry wins over signature validity: a credential with
//! `now >= expiryDate 00:00 UTC` reports `Expired` whatever the signature
//! check said. Callers that need to know whether an expired credential was
//! ever validly signed use `CredentialStore::inspect_signature()`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uims_core::Timestamp;
use uims_crypto::SignatureCheck;

/// Verification status of a credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    /// Never verified.
    #[default]
    Unverified,
    /// Signed by the declared issuer and not expired.
    Verified,
    /// Past its expiry date.
    Expired,
    /// Not signed by the declared issuer over its current fields.
    Invalid,
}

impl VerificationStatus {
    /// All statuses, in declaration order.
    pub const ALL: [VerificationStatus; 4] = [
        Self::Unverified,
        Self::Verified,
        Self::Expired,
        Self::Invalid,
    ];

    /// Lowercase label used in logs, metrics, and JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unverified => "unverified",
            Self::Verified => "verified",
            Self::Expired => "expired",
            Self::Invalid => "invalid",
        }
    }
}

impl std::fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a credential expiring on `expiry_date` is expired at `now`.
pub fn is_expired(now: &Timestamp, expiry_date: NaiveDate) -> bool {
    *now >= Timestamp::start_of_day(expiry_date)
}

/// Fold a signature check and the expiry date into a status.
pub fn evaluate(check: &SignatureCheck, now: &Timestamp, expiry_date: NaiveDate) -> VerificationStatus {
    if is_expired(now, expiry_date) {
        VerificationStatus::Expired
    } else if check.is_match() {
        VerificationStatus::Verified
    } else {
        VerificationStatus::Invalid
    }
}

/// One entry in a credential's verification history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// When the attempt ran.
    pub at: Timestamp,
    /// Status before the attempt.
    pub previous: VerificationStatus,
    /// Status after the attempt.
    pub status: VerificationStatus,
    /// The signature check underlying the status.
    pub check: SignatureCheck,
}

impl VerificationRecord {
    /// Whether this attempt changed the status.
    pub fn is_transition(&self) -> bool {
        self.previous != self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uims_core::AccountId;

    fn matched() -> SignatureCheck {
        SignatureCheck::Match {
            recovered: AccountId::from_bytes([1; 20]),
        }
    }

    fn mismatched() -> SignatureCheck {
        SignatureCheck::Mismatch {
            recovered: None,
            claimed: AccountId::from_bytes([1; 20]),
        }
    }

    fn malformed() -> SignatureCheck {
        SignatureCheck::Malformed {
            reason: "short".to_string(),
        }
    }

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2099, 1, 1).unwrap()
    }

    #[test]
    fn expiry_boundary_is_start_of_day() {
        let last_ms = Timestamp::parse("2098-12-31T23:59:59.999Z").unwrap();
        let midnight = Timestamp::parse("2099-01-01T00:00:00Z").unwrap();
        assert!(!is_expired(&last_ms, expiry()));
        assert!(is_expired(&midnight, expiry()));
    }

    #[test]
    fn valid_and_unexpired_is_verified() {
        let now = Timestamp::parse("2026-01-01T00:00:00Z").unwrap();
        assert_eq!(evaluate(&matched(), &now, expiry()), VerificationStatus::Verified);
    }

    #[test]
    fn mismatch_and_malformed_are_invalid() {
        let now = Timestamp::parse("2026-01-01T00:00:00Z").unwrap();
        assert_eq!(evaluate(&mismatched(), &now, expiry()), VerificationStatus::Invalid);
        assert_eq!(evaluate(&malformed(), &now, expiry()), VerificationStatus::Invalid);
    }

    #[test]
    fn expiry_takes_precedence_over_every_check() {
        let now = Timestamp::parse("2099-01-02T00:00:00Z").unwrap();
        for check in [matched(), mismatched(), malformed()] {
            assert_eq!(evaluate(&check, &now, expiry()), VerificationStatus::Expired);
        }
    }

    #[test]
    fn status_serde_is_lowercase() {
        for status in VerificationStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
        assert_eq!(VerificationStatus::default(), VerificationStatus::Unverified);
    }
}
