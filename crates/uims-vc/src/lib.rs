//! # uims-vc: Credentials
//!
//! Implements the credential issuance and verification engine:
//!
//! - **Credential** (`credential.rs`): data model, draft validation, and the
//!   canonical credential message and digest.
//!
//! - **Status** (`status.rs`): the verification state machine and its
//!   expiry-first precedence rule.
//!
//! - **Issuance** (`issuance.rs`): validation, hashing, and signing through
//!   a `SigningPort`, with no store borrowed while the signer runs.
//!
//! - **Store** (`store.rs`): the authoritative collection; appends issued
//!   credentials, verification through an `AccountRecoveryPort`.
//!
//! ## Security Invariant
//!
//! The digest that is signed at issuance is the digest recomputed at
//! verification: both come from `Credential::digest()`, which depends only
//! on hashed fields. No hash-of-hash, no re-wrapping; any personal-message
//! prefix belongs to the signing scheme.
//!
//! ## Crate Policy
//!
//! - Depends on `uims-core` and `uims-crypto` internally.
//! - Verification outcomes are data (`VerificationStatus`), never errors.

pub mod credential;
pub mod error;
pub mod issuance;
pub mod metrics;
pub mod status;
pub mod store;

pub use credential::{
    Credential, CredentialDraft, CredentialType, CustomTag, CREDENTIAL_MESSAGE_DOMAIN,
};
pub use error::VcError;
pub use issuance::{issue_credential, IssuedCredential};
pub use status::{VerificationRecord, VerificationStatus};
pub use store::{CredentialStore, CredentialSummary, HISTORY_LIMIT};
