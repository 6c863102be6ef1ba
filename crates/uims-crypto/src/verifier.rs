//! # Signature Verifier
//!
//! Checks that a signature over a credential digest was produced by the
//! claimed issuer. Recovery goes through an [`AccountRecoveryPort`]; the
//! comparison is on normalized [`AccountId`]s, so `0xAbC...` and `0xabc...`
//! are the same account.
//!
//! The verifier never fails: every outcome, including unparseable
//! signatures, is reported as a [`SignatureCheck`] for the caller to fold
//! into a verification status.

use serde::{Deserialize, Serialize};
use uims_core::{AccountId, ContentDigest};

use crate::error::RecoveryError;
use crate::ports::{AccountRecoveryPort, AccountSignature};

/// Outcome of checking a signature against a claimed signer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SignatureCheck {
    /// The recovered account equals the claimed one.
    Match {
        /// The recovered signer.
        recovered: AccountId,
    },
    /// The signature is well-formed but was not produced by the claimed
    /// account over this digest.
    Mismatch {
        /// Recovered signer, when recovery succeeded.
        recovered: Option<AccountId>,
        /// The account the credential names as issuer.
        claimed: AccountId,
    },
    /// The signature bytes cannot be interpreted at all.
    Malformed {
        /// Parser diagnostic.
        reason: String,
    },
}

impl SignatureCheck {
    /// Whether the signature is authentic for the claimed signer.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match { .. })
    }
}

/// Compares recovered signers against claimed ones.
#[derive(Debug, Clone)]
pub struct SignatureVerifier<R> {
    recovery: R,
}

impl<R: AccountRecoveryPort> SignatureVerifier<R> {
    /// Wrap a recovery port.
    pub fn new(recovery: R) -> Self {
        Self { recovery }
    }

    /// The underlying recovery port.
    pub fn recovery(&self) -> &R {
        &self.recovery
    }

    /// Check `signature` over `digest` against `claimed`.
    pub fn check(
        &self,
        digest: &ContentDigest,
        signature: &AccountSignature,
        claimed: &AccountId,
    ) -> SignatureCheck {
        if signature.is_empty() {
            return SignatureCheck::Malformed {
                reason: "signature is empty".to_string(),
            };
        }
        match self.recovery.recover(digest, signature) {
            Ok(recovered) if &recovered == claimed => SignatureCheck::Match { recovered },
            Ok(recovered) => SignatureCheck::Mismatch {
                recovered: Some(recovered),
                claimed: claimed.clone(),
            },
            Err(RecoveryError::Unrecoverable(_)) => SignatureCheck::Mismatch {
                recovered: None,
                claimed: claimed.clone(),
            },
            Err(RecoveryError::MalformedSignature(reason)) => SignatureCheck::Malformed { reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ed25519::{Ed25519Recovery, LocalWallet};
    use crate::ports::SigningPort;
    use uims_core::{sha256_digest, CanonicalBytes};

    fn digest_of(value: serde_json::Value) -> ContentDigest {
        sha256_digest(&CanonicalBytes::new(&value).unwrap())
    }

    fn verifier() -> SignatureVerifier<Ed25519Recovery> {
        SignatureVerifier::new(Ed25519Recovery)
    }

    #[tokio::test]
    async fn match_is_case_insensitive_on_claimed_account() {
        let wallet = LocalWallet::generate();
        let digest = digest_of(serde_json::json!({"a": 1}));
        let sig = wallet.sign(wallet.account(), &digest).await.unwrap();

        let upper = wallet.account().as_str().to_uppercase().replacen("0X", "0x", 1);
        let claimed: AccountId = upper.parse().unwrap();
        let check = verifier().check(&digest, &sig, &claimed);
        assert!(check.is_match());
    }

    #[tokio::test]
    async fn other_signer_is_mismatch_with_recovered() {
        let issuer = LocalWallet::generate();
        let impostor = LocalWallet::generate();
        let digest = digest_of(serde_json::json!({"a": 2}));
        let sig = impostor.sign(impostor.account(), &digest).await.unwrap();

        match verifier().check(&digest, &sig, issuer.account()) {
            SignatureCheck::Mismatch { recovered, claimed } => {
                assert_eq!(recovered.as_ref(), Some(impostor.account()));
                assert_eq!(&claimed, issuer.account());
            }
            other => panic!("expected mismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn altered_digest_is_mismatch_without_recovered() {
        let wallet = LocalWallet::generate();
        let sig = wallet
            .sign(wallet.account(), &digest_of(serde_json::json!({"v": 1})))
            .await
            .unwrap();
        let check = verifier().check(
            &digest_of(serde_json::json!({"v": 2})),
            &sig,
            wallet.account(),
        );
        assert_eq!(
            check,
            SignatureCheck::Mismatch {
                recovered: None,
                claimed: wallet.account().clone(),
            }
        );
    }

    #[test]
    fn empty_and_garbage_are_malformed() {
        let wallet = LocalWallet::generate();
        let digest = digest_of(serde_json::json!({}));
        let v = verifier();
        assert!(matches!(
            v.check(&digest, &AccountSignature::default(), wallet.account()),
            SignatureCheck::Malformed { .. }
        ));
        assert!(matches!(
            v.check(&digest, &AccountSignature::from_bytes(vec![1, 2, 3]), wallet.account()),
            SignatureCheck::Malformed { .. }
        ));
    }

    #[test]
    fn check_serializes_with_outcome_tag() {
        let check = SignatureCheck::Malformed {
            reason: "short".to_string(),
        };
        let json = serde_json::to_value(&check).unwrap();
        assert_eq!(json["outcome"], "malformed");
    }
}
