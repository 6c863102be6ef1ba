//! # uims-cli: Command-Line Tool for UIMS
//!
//! Provides the `uims` binary, a thin driver over the engine crates.
//!
//! ## Subcommands
//!
//! - `uims credential issue|verify|digest`: credential lifecycle.
//! - `uims capsule watch`: seal capsules and watch the clock unlock them.
//! - `uims keygen`: fresh Ed25519 seed and its account id.
//!
//! ```bash
//! export UIMS_SIGNING_KEY="$(uims keygen --json | jq -r .seed)"
//! uims credential issue --type academic --title "BSc" --expires 2030-01-01 --out bsc.json
//! uims credential verify --file bsc.json
//! uims capsule watch --unlock-in 2 --unlock-in 5
//! ```
//!
//! ## Exit codes
//!
//! `0` on success, `1` on error, `2` when the command ran but the outcome is
//! negative (credential not verified, capsules still locked).

pub mod capsule;
pub mod config;
pub mod credential;
pub mod keygen;

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

/// Exit code for a command that ran to completion with a negative outcome.
pub const EXIT_NEGATIVE: u8 = 2;

/// Build the runtime the async engine calls run on.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start tokio runtime")
}

/// Pretty-print `value` as JSON to `out`, or to stdout when `out` is `None`.
pub fn write_json<T: Serialize>(value: &T, out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    match out {
        Some(path) => std::fs::write(path, format!("{json}\n"))
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_json_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&serde_json::json!({"a": 1}), Some(&path)).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n  \"a\": 1\n}\n");
    }

    #[test]
    fn write_json_to_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.json");
        let err = write_json(&1, Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("failed to write"));
    }
}
