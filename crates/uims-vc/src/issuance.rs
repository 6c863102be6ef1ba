//! # Issuance
//!
//! Builds a new credential without touching any store: validate the draft,
//! read the clock and network once, hash, and await the signer. The result
//! is an [`IssuedCredential`] that [`CredentialStore::create_credential()`]
//! appends synchronously.
//!
//! The signer may take arbitrary wall-clock time (a wallet prompt), so no
//! borrow of the store is held while it runs. Readers keep listing and
//! verifying in the meantime. If the signer rejects, fails, or the future
//! is dropped, there is nothing to roll back.
//!
//! [`CredentialStore::create_credential()`]: crate::store::CredentialStore::create_credential

use uims_core::{ClockSource, CredentialId, NetworkContext};
use uims_crypto::SigningPort;

use crate::credential::{Credential, CredentialDraft};
use crate::error::VcError;

/// A freshly signed credential, not yet stored and never verified.
///
/// Not `Clone`: each issuance is appended at most once.
#[derive(Debug, PartialEq)]
pub struct IssuedCredential(Credential);

impl IssuedCredential {
    /// The signed credential.
    pub fn credential(&self) -> &Credential {
        &self.0
    }

    pub(crate) fn into_inner(self) -> Credential {
        self.0
    }
}

/// Validate, hash, and sign a new credential.
///
/// # Errors
///
/// - `MissingRequiredField` / `InvalidValidityWindow` before hashing.
/// - `Clock` if the creation time cannot be read.
/// - `SigningRejected` / `SigningFailed` from the signer, including an
///   empty signature.
pub async fn issue_credential<S, N, C>(
    draft: CredentialDraft,
    signer: &S,
    network: &N,
    clock: &C,
) -> Result<IssuedCredential, VcError>
where
    S: SigningPort,
    N: NetworkContext,
    C: ClockSource,
{
    let draft = draft.validate()?;
    let created_at = clock.now()?;
    let network_id = network.current_network_id();

    let mut credential = Credential::unsigned(
        draft,
        CredentialId::new(),
        network_id,
        created_at.epoch_millis(),
    );
    let digest = credential.digest()?;

    let signature = match signer.sign(&credential.issuer, &digest).await {
        Ok(sig) if !sig.is_empty() => sig,
        Ok(_) => {
            return Err(VcError::SigningFailed(
                "signer returned an empty signature".to_string(),
            ))
        }
        Err(e) => {
            tracing::warn!(
                issuer = %credential.issuer,
                error = %e,
                "credential signing did not complete"
            );
            return Err(e.into());
        }
    };
    credential.signature = signature;

    tracing::debug!(
        credential_id = %credential.id,
        issuer = %credential.issuer,
        network_id,
        digest = %digest,
        "credential signed"
    );
    Ok(IssuedCredential(credential))
}
