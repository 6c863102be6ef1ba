//! # Credential Store
//!
//! The authoritative in-memory collection of credentials. The store is an
//! explicit object owned by the caller; every operation receives the ports
//! it needs (signer, recovery, clock, network) as arguments.
//!
//! ## Issuance Atomicity
//!
//! Issuance is split in two.
//! [`issue_credential()`](crate::issuance::issue_credential) validates,
//! hashes, and awaits the signer without any access to the store;
//! [`CredentialStore::create_credential()`] then appends the signed result
//! synchronously. A rejected, failed, or dropped signing leaves the store
//! unchanged, and the store stays readable while the signer is pending.
//!
//! ## Verification Side Effects
//!
//! Every call to [`CredentialStore::verify()`] stamps
//! `lastVerifiedAtMillis`, increments `verificationCount`, and appends a
//! [`VerificationRecord`], whatever the outcome. Only the latest
//! [`HISTORY_LIMIT`] records are kept per credential; `verificationCount`
//! keeps counting past it.

use std::collections::HashMap;

use serde::Serialize;
use uims_core::{AccountId, ClockSource, CredentialId};
use uims_crypto::{AccountRecoveryPort, SignatureCheck, SignatureVerifier};

use crate::credential::Credential;
use crate::error::VcError;
use crate::issuance::IssuedCredential;
use crate::metrics;
use crate::status::{self, VerificationRecord, VerificationStatus};

/// Verification records kept per credential. Older records are dropped.
pub const HISTORY_LIMIT: usize = 256;

#[derive(Debug, Clone)]
struct Entry {
    credential: Credential,
    history: Vec<VerificationRecord>,
}

/// Per-status counts for dashboards and the CLI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSummary {
    pub total: usize,
    pub unverified: usize,
    pub verified: usize,
    pub expired: usize,
    pub invalid: usize,
    /// Sum of `verificationCount` across all credentials.
    pub verification_attempts: u64,
}

/// In-memory credential collection, in creation/import order.
#[derive(Debug, Default)]
pub struct CredentialStore {
    entries: Vec<Entry>,
    index: HashMap<CredentialId, usize>,
}

impl CredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored credentials.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a credential produced by
    /// [`issue_credential()`](crate::issuance::issue_credential).
    ///
    /// Synchronous: the signer has already returned, so no borrow of the
    /// store spans the wallet prompt.
    pub fn create_credential(&mut self, issued: IssuedCredential) -> Credential {
        let credential = issued.into_inner();
        self.insert(credential.clone());
        metrics::credential_created();
        tracing::info!(
            credential_id = %credential.id,
            issuer = %credential.issuer,
            holder = %credential.holder,
            credential_type = %credential.credential_type,
            network_id = credential.network_id,
            "credential created"
        );
        credential
    }

    /// Re-evaluate a stored credential and record the attempt.
    ///
    /// # Errors
    ///
    /// Only `UnknownCredential` and `Clock`. Signature problems and expiry
    /// are reported through the returned status.
    pub fn verify<R, C>(
        &mut self,
        id: &CredentialId,
        recovery: &R,
        clock: &C,
    ) -> Result<VerificationStatus, VcError>
    where
        R: AccountRecoveryPort,
        C: ClockSource,
    {
        let pos = self.position(id)?;
        let now = clock.now()?;

        let entry = &mut self.entries[pos];
        let check = signature_check(&entry.credential, recovery);
        let status = status::evaluate(&check, &now, entry.credential.expiry_date);

        let credential = &mut entry.credential;
        let previous = credential.verification_status;
        credential.verification_status = status;
        credential.last_verified_at_millis = Some(now.epoch_millis());
        credential.verification_count = credential.verification_count.saturating_add(1);

        let record = VerificationRecord {
            at: now,
            previous,
            status,
            check,
        };
        if record.is_transition() {
            tracing::info!(
                credential_id = %credential.id,
                from = %previous,
                to = %status,
                "credential status transition"
            );
        }
        tracing::info!(
            credential_id = %credential.id,
            status = %status,
            count = credential.verification_count,
            "credential verified"
        );
        entry.history.push(record);
        if entry.history.len() > HISTORY_LIMIT {
            let excess = entry.history.len() - HISTORY_LIMIT;
            entry.history.drain(..excess);
        }
        metrics::credential_verified(status);
        Ok(status)
    }

    /// Decompose signature validity without side effects.
    ///
    /// Unlike [`verify()`](Self::verify), this ignores expiry, so it answers
    /// "was this ever validly signed by its issuer" for expired credentials.
    pub fn inspect_signature<R: AccountRecoveryPort>(
        &self,
        id: &CredentialId,
        recovery: &R,
    ) -> Result<SignatureCheck, VcError> {
        let pos = self.position(id)?;
        Ok(signature_check(&self.entries[pos].credential, recovery))
    }

    /// Load an already-signed credential, e.g. from external persistence.
    ///
    /// Hashed fields and the signature are stored as given. Verification
    /// state in the input is not trusted: the credential enters the store
    /// `unverified` with a zero count, and only a later
    /// [`verify()`](Self::verify) changes that.
    pub fn import(&mut self, mut credential: Credential) -> Result<(), VcError> {
        if !credential.is_signed() {
            return Err(VcError::Unsigned(credential.id));
        }
        if self.index.contains_key(&credential.id) {
            return Err(VcError::DuplicateCredential(credential.id));
        }
        if credential.verification_status != VerificationStatus::Unverified
            || credential.verification_count != 0
        {
            tracing::debug!(
                credential_id = %credential.id,
                claimed_status = %credential.verification_status,
                claimed_count = credential.verification_count,
                "discarding imported verification state"
            );
        }
        credential.verification_status = VerificationStatus::Unverified;
        credential.verification_count = 0;
        credential.last_verified_at_millis = None;

        tracing::debug!(credential_id = %credential.id, "credential imported");
        self.insert(credential);
        Ok(())
    }

    /// All credentials in creation/import order.
    pub fn list_credentials(&self) -> Vec<&Credential> {
        self.entries.iter().map(|e| &e.credential).collect()
    }

    /// Credentials held by `holder`, in creation/import order.
    pub fn list_for_holder(&self, holder: &AccountId) -> Vec<&Credential> {
        self.entries
            .iter()
            .map(|e| &e.credential)
            .filter(|c| &c.holder == holder)
            .collect()
    }

    /// Look up a credential.
    pub fn get(&self, id: &CredentialId) -> Option<&Credential> {
        self.index.get(id).map(|&pos| &self.entries[pos].credential)
    }

    /// Verification history of a credential, oldest first, at most
    /// [`HISTORY_LIMIT`] records.
    pub fn history(&self, id: &CredentialId) -> Option<&[VerificationRecord]> {
        self.index
            .get(id)
            .map(|&pos| self.entries[pos].history.as_slice())
    }

    /// Per-status counts.
    pub fn summary(&self) -> CredentialSummary {
        let mut summary = CredentialSummary {
            total: self.entries.len(),
            ..CredentialSummary::default()
        };
        for Entry { credential, .. } in &self.entries {
            match credential.verification_status {
                VerificationStatus::Unverified => summary.unverified += 1,
                VerificationStatus::Verified => summary.verified += 1,
                VerificationStatus::Expired => summary.expired += 1,
                VerificationStatus::Invalid => summary.invalid += 1,
            }
            summary.verification_attempts = summary
                .verification_attempts
                .saturating_add(credential.verification_count);
        }
        summary
    }

    fn position(&self, id: &CredentialId) -> Result<usize, VcError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| VcError::UnknownCredential(*id))
    }

    fn insert(&mut self, credential: Credential) {
        self.index.insert(credential.id, self.entries.len());
        self.entries.push(Entry {
            credential,
            history: Vec::new(),
        });
    }
}

/// Recompute the digest and check the signature against the issuer.
///
/// A message that cannot be encoded cannot have been signed, so it is
/// reported as malformed rather than as an error.
fn signature_check<R: AccountRecoveryPort>(credential: &Credential, recovery: &R) -> SignatureCheck {
    match credential.digest() {
        Ok(digest) => SignatureVerifier::new(recovery).check(
            &digest,
            &credential.signature,
            &credential.issuer,
        ),
        Err(e) => SignatureCheck::Malformed {
            reason: e.to_string(),
        },
    }
}
