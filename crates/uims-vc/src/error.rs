//! # Credential Error Types

use chrono::NaiveDate;
use thiserror::Error;
use uims_core::{CanonicalizationError, ClockError, CredentialId};
use uims_crypto::SigningError;

/// Structural failures of credential operations.
///
/// Verification outcomes (bad or malformed signatures, expiry) are not
/// errors; they are reported as a `VerificationStatus`.
#[derive(Error, Debug)]
pub enum VcError {
    /// A required draft field is absent or blank.
    #[error("missing required field: {field}")]
    MissingRequiredField {
        /// Field name in its serialized (camelCase) form.
        field: &'static str,
    },

    /// `expiryDate` is not strictly after `issuanceDate`.
    #[error("expiry date {expiry_date} must be after issuance date {issuance_date}")]
    InvalidValidityWindow {
        issuance_date: NaiveDate,
        expiry_date: NaiveDate,
    },

    /// The signer declined. Nothing was stored.
    #[error("signing rejected: {reason}")]
    SigningRejected { reason: String },

    /// The signer failed. Nothing was stored.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// The credential message could not be encoded.
    #[error("credential encoding failed: {0}")]
    Encoding(#[from] CanonicalizationError),

    /// The host clock could not be read.
    #[error(transparent)]
    Clock(#[from] ClockError),

    /// No credential with this id is stored.
    #[error("unknown {0}")]
    UnknownCredential(CredentialId),

    /// A credential with this id is already stored.
    #[error("duplicate {0}")]
    DuplicateCredential(CredentialId),

    /// An imported credential carries no signature.
    #[error("{0} is not signed")]
    Unsigned(CredentialId),
}

impl From<SigningError> for VcError {
    fn from(err: SigningError) -> Self {
        match err {
            SigningError::Rejected { reason } => Self::SigningRejected { reason },
            SigningError::Failed(msg) => Self::SigningFailed(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signing_error_maps_to_vc_error() {
        let err: VcError = SigningError::Rejected {
            reason: "user declined".to_string(),
        }
        .into();
        assert!(matches!(err, VcError::SigningRejected { ref reason } if reason == "user declined"));

        let err: VcError = SigningError::Failed("timeout".to_string()).into();
        assert!(matches!(err, VcError::SigningFailed(_)));
    }

    #[test]
    fn missing_field_display() {
        let err = VcError::MissingRequiredField { field: "title" };
        assert_eq!(format!("{err}"), "missing required field: title");
    }

    #[test]
    fn unknown_credential_display_uses_prefixed_id() {
        let id = CredentialId::new();
        let err = VcError::UnknownCredential(id);
        assert_eq!(format!("{err}"), format!("unknown {id}"));
    }
}
