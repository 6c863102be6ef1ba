//! # Keygen Subcommand
//!
//! Generates an Ed25519 seed for `UIMS_SIGNING_KEY` and prints the account
//! it signs for. The seed is secret; it goes to stdout only.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use uims_crypto::LocalWallet;

use crate::write_json;

/// Arguments for `uims keygen`.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Print as JSON instead of text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct GeneratedKey {
    account: String,
    seed: String,
}

/// Execute the keygen subcommand.
pub fn run_keygen(args: &KeygenArgs) -> Result<u8> {
    let wallet = LocalWallet::generate();
    let key = GeneratedKey {
        account: wallet.account().to_string(),
        seed: wallet.seed_hex(),
    };
    if args.json {
        write_json(&key, None)?;
    } else {
        println!("account: {}", key.account);
        println!("seed:    {}", key.seed);
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keygen_succeeds_in_both_formats() {
        assert_eq!(run_keygen(&KeygenArgs { json: false }).unwrap(), 0);
        assert_eq!(run_keygen(&KeygenArgs { json: true }).unwrap(), 0);
    }

    #[test]
    fn generated_seed_restores_the_same_account() {
        let wallet = LocalWallet::generate();
        let restored = LocalWallet::from_hex(&wallet.seed_hex()).unwrap();
        assert_eq!(restored.account(), wallet.account());
    }
}
