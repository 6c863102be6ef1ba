//! Metrics emitted by the credential store.
//!
//! Recorded through the `metrics` facade; installing a recorder is the
//! host's choice.

use crate::status::VerificationStatus;

/// Metric names.
pub mod names {
    /// Total credentials created and stored.
    pub const CREDENTIALS_CREATED_TOTAL: &str = "uims_credentials_created_total";
    /// Total verification attempts, labeled by resulting `status`.
    pub const CREDENTIAL_VERIFICATIONS_TOTAL: &str = "uims_credential_verifications_total";
}

/// Record a stored credential.
#[inline]
pub fn credential_created() {
    metrics::counter!(names::CREDENTIALS_CREATED_TOTAL).increment(1);
}

/// Record a verification attempt.
#[inline]
pub fn credential_verified(status: VerificationStatus) {
    metrics::counter!(names::CREDENTIAL_VERIFICATIONS_TOTAL, "status" => status.as_str())
        .increment(1);
}
