//! # Credential Subcommand
//!
//! - `issue`: sign a new credential with the configured wallet, verify it
//!   once, and emit it as JSON.
//! - `verify`: load a credential JSON file and run verification on it.
//! - `digest`: print the credential digest a signer would sign.
//!
//! Each invocation works on a fresh in-memory store; persistence is the
//! JSON file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;

use uims_core::{AccountId, ClockSource, CredentialId, StaticNetwork, SystemClock};
use uims_crypto::Ed25519Recovery;
use uims_vc::{
    issue_credential, Credential, CredentialDraft, CredentialStore, CredentialType,
    VerificationRecord, VerificationStatus,
};

use crate::config::Config;
use crate::{runtime, write_json, EXIT_NEGATIVE};

/// Arguments for the `uims credential` subcommand.
#[derive(Args, Debug)]
pub struct CredentialArgs {
    #[command(subcommand)]
    pub command: CredentialCommand,
}

/// Credential subcommands.
#[derive(Subcommand, Debug)]
pub enum CredentialCommand {
    /// Issue and sign a credential as the configured wallet.
    Issue(IssueArgs),

    /// Verify a credential JSON file.
    Verify {
        /// Path to the credential JSON.
        #[arg(long)]
        file: PathBuf,
    },

    /// Print the digest of a credential JSON file.
    Digest {
        /// Path to the credential JSON.
        #[arg(long)]
        file: PathBuf,
    },
}

/// Flags for `uims credential issue`.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Credential type (academic, professional, certification, identity,
    /// membership, or any custom tag).
    #[arg(long = "type", value_name = "TYPE")]
    pub credential_type: String,

    /// Credential title.
    #[arg(long)]
    pub title: String,

    #[arg(long, default_value = "")]
    pub description: String,

    #[arg(long, default_value = "")]
    pub category: String,

    /// Tag; repeat for several.
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// External media reference (URL or content hash).
    #[arg(long)]
    pub media: Option<String>,

    /// Opaque credential payload, hashed as given.
    #[arg(long, default_value = "")]
    pub data: String,

    /// Holder account; defaults to the issuer.
    #[arg(long)]
    pub holder: Option<String>,

    /// Issuance date (YYYY-MM-DD); defaults to today (UTC).
    #[arg(long)]
    pub issued: Option<NaiveDate>,

    /// Expiry date (YYYY-MM-DD).
    #[arg(long)]
    pub expires: NaiveDate,

    /// Write the credential here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Outcome printed by `uims credential verify`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyReport<'a> {
    credential_id: CredentialId,
    status: VerificationStatus,
    record: Option<&'a VerificationRecord>,
}

/// Execute the credential subcommand.
pub fn run_credential(args: &CredentialArgs, config: &Config) -> Result<u8> {
    match &args.command {
        CredentialCommand::Issue(issue) => cmd_issue(issue, config),
        CredentialCommand::Verify { file } => cmd_verify(file),
        CredentialCommand::Digest { file } => cmd_digest(file),
    }
}

fn cmd_issue(args: &IssueArgs, config: &Config) -> Result<u8> {
    let wallet = config.wallet()?;
    let clock = SystemClock;
    let today = clock.now()?.as_datetime().date_naive();

    let holder = args
        .holder
        .as_deref()
        .map(AccountId::parse)
        .transpose()
        .context("invalid --holder")?;
    let draft = CredentialDraft {
        issuer: Some(wallet.account().clone()),
        holder,
        credential_type: Some(CredentialType::parse(&args.credential_type)?),
        title: args.title.clone(),
        description: args.description.clone(),
        category: args.category.clone(),
        tags: args.tags.iter().cloned().collect(),
        media_reference: args.media.clone(),
        data: args.data.clone(),
        issuance_date: Some(args.issued.unwrap_or(today)),
        expiry_date: Some(args.expires),
    };

    let mut store = CredentialStore::new();
    let network = StaticNetwork(config.network_id);
    let signed = runtime()?.block_on(issue_credential(draft, &wallet, &network, &clock))?;
    let created = store.create_credential(signed);
    let status = store.verify(&created.id, &Ed25519Recovery, &clock)?;
    let issued = store
        .get(&created.id)
        .context("issued credential missing from store")?;

    write_json(issued, args.out.as_deref())?;
    if let Some(out) = &args.out {
        eprintln!("OK: issued {} ({status}) -> {}", created.id, out.display());
    }
    Ok(exit_code(status))
}

fn cmd_verify(file: &Path) -> Result<u8> {
    let credential = read_credential(file)?;
    let id = credential.id;

    let mut store = CredentialStore::new();
    store.import(credential)?;
    let status = store.verify(&id, &Ed25519Recovery, &SystemClock)?;
    let report = VerifyReport {
        credential_id: id,
        status,
        record: store.history(&id).and_then(|h| h.last()),
    };
    write_json(&report, None)?;
    Ok(exit_code(status))
}

fn cmd_digest(file: &Path) -> Result<u8> {
    let credential = read_credential(file)?;
    println!("{}", credential.digest()?.to_hex());
    Ok(0)
}

fn read_credential(path: &Path) -> Result<Credential> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("{} is not a credential document", path.display()))
}

fn exit_code(status: VerificationStatus) -> u8 {
    match status {
        VerificationStatus::Verified => 0,
        _ => EXIT_NEGATIVE,
    }
}
