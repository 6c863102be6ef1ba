//! # Ed25519 Reference Wallet
//!
//! A self-contained implementation of both ports, usable in tests, the CLI,
//! and deployments that manage their own keys.
//!
//! ## Scheme
//!
//! - **Account**: `0x` + hex of the last 20 bytes of `SHA-256(public_key)`.
//! - **Signed message**: `"\x19UIMS Signed Message:\n32" || digest`. The
//!   prefix keeps a credential signature from being replayed as a signature
//!   over any other 32-byte payload.
//! - **Signature**: `public_key (32 bytes) || ed25519_signature (64 bytes)`.
//!   Recovery parses the embedded key, verifies the Ed25519 signature over
//!   the prefixed message, and derives the account from the key.
//!
//! ## Security Invariant
//!
//! Private keys are never serialized or logged. `LocalWallet` does not
//! implement `Serialize` and its `Debug` output is redacted.

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use sha2::{Digest, Sha256};
use uims_core::{AccountId, ContentDigest};

use crate::error::{CryptoError, RecoveryError, SigningError};
use crate::ports::{
    bytes_to_hex, hex_to_bytes, AccountRecoveryPort, AccountSignature, SigningPort,
};

/// Prefix bound into every signed message.
pub const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19UIMS Signed Message:\n32";

/// Length of a reference-scheme signature in bytes.
pub const SIGNATURE_LEN: usize = 32 + 64;

/// Derive the account identifier controlled by an Ed25519 verifying key.
pub fn account_for_key(key: &VerifyingKey) -> AccountId {
    let hash = Sha256::digest(key.as_bytes());
    let mut tail = [0u8; 20];
    tail.copy_from_slice(&hash[12..]);
    AccountId::from_bytes(tail)
}

fn personal_message(digest: &ContentDigest) -> Vec<u8> {
    let mut msg = Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + 32);
    msg.extend_from_slice(PERSONAL_MESSAGE_PREFIX);
    msg.extend_from_slice(digest.as_bytes());
    msg
}

// ---------------------------------------------------------------------------
// LocalWallet
// ---------------------------------------------------------------------------

/// In-memory Ed25519 wallet controlling exactly one account.
pub struct LocalWallet {
    key: SigningKey,
    account: AccountId,
}

impl LocalWallet {
    /// Generate a new random wallet using the OS CSPRNG.
    pub fn generate() -> Self {
        Self::from_key(SigningKey::generate(&mut rand::rngs::OsRng))
    }

    /// Create from a raw 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self::from_key(SigningKey::from_bytes(seed))
    }

    /// Create from a 64-character hex seed, with or without `0x`.
    pub fn from_hex(hex: &str) -> Result<Self, CryptoError> {
        let trimmed = hex.trim();
        let body = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex_to_bytes(body)?;
        let seed: [u8; 32] = bytes.try_into().map_err(|v: Vec<u8>| {
            CryptoError::InvalidSigningKey(format!(
                "expected 32 bytes (64 hex chars), got {} bytes",
                v.len()
            ))
        })?;
        Ok(Self::from_seed(&seed))
    }

    fn from_key(key: SigningKey) -> Self {
        let account = account_for_key(&key.verifying_key());
        Self { key, account }
    }

    /// The account this wallet signs for.
    pub fn account(&self) -> &AccountId {
        &self.account
    }

    /// Hex-encoded seed, for key export by `uims keygen`.
    pub fn seed_hex(&self) -> String {
        bytes_to_hex(self.key.as_bytes())
    }

    /// Produce a reference-scheme signature over `digest`.
    fn sign_digest(&self, digest: &ContentDigest) -> AccountSignature {
        let sig = self.key.sign(&personal_message(digest));
        let mut bytes = Vec::with_capacity(SIGNATURE_LEN);
        bytes.extend_from_slice(self.key.verifying_key().as_bytes());
        bytes.extend_from_slice(&sig.to_bytes());
        AccountSignature::from_bytes(bytes)
    }

    fn sign_as(
        &self,
        account: &AccountId,
        digest: &ContentDigest,
    ) -> Result<AccountSignature, SigningError> {
        if account != &self.account {
            tracing::warn!(
                requested = %account,
                controlled = %self.account,
                "signing request for foreign account rejected"
            );
            return Err(SigningError::Rejected {
                reason: format!("wallet does not control account {account}"),
            });
        }
        Ok(self.sign_digest(digest))
    }
}

impl SigningPort for LocalWallet {
    async fn sign(
        &self,
        account: &AccountId,
        digest: &ContentDigest,
    ) -> Result<AccountSignature, SigningError> {
        self.sign_as(account, digest)
    }
}

impl std::fmt::Debug for LocalWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "LocalWallet({}, <private>)", self.account)
    }
}

// ---------------------------------------------------------------------------
// Recovery
// ---------------------------------------------------------------------------

/// Account recovery for the reference scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Recovery;

impl AccountRecoveryPort for Ed25519Recovery {
    fn recover(
        &self,
        digest: &ContentDigest,
        signature: &AccountSignature,
    ) -> Result<AccountId, RecoveryError> {
        let bytes = signature.as_bytes();
        if bytes.len() != SIGNATURE_LEN {
            return Err(RecoveryError::MalformedSignature(format!(
                "expected {SIGNATURE_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let (key_bytes, sig_bytes) = bytes.split_at(32);

        let mut key_arr = [0u8; 32];
        key_arr.copy_from_slice(key_bytes);
        let key = VerifyingKey::from_bytes(&key_arr)
            .map_err(|e| RecoveryError::MalformedSignature(format!("embedded key: {e}")))?;

        let sig = ed25519_dalek::Signature::from_slice(sig_bytes)
            .map_err(|e| RecoveryError::MalformedSignature(format!("signature body: {e}")))?;

        key.verify(&personal_message(digest), &sig)
            .map_err(|e| RecoveryError::Unrecoverable(format!("Ed25519 verification failed: {e}")))?;

        Ok(account_for_key(&key))
    }
}
