//! # uims CLI entry point
//!
//! Parses command-line arguments, initializes tracing, resolves
//! configuration, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use uims_cli::capsule::{run_capsule, CapsuleArgs};
use uims_cli::config::Config;
use uims_cli::credential::{run_credential, CredentialArgs};
use uims_cli::keygen::{run_keygen, KeygenArgs};

/// UIMS credential and time-capsule toolchain.
///
/// Issues and verifies signed credentials, and runs the capsule unlock
/// clock.
#[derive(Parser, Debug)]
#[command(name = "uims", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Issue, verify, and digest credentials.
    Credential(CredentialArgs),

    /// Seal time capsules and watch them unlock.
    Capsule(CapsuleArgs),

    /// Generate an Ed25519 signing seed.
    Keygen(KeygenArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    tracing::debug!("uims CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = match &cli.command {
        Commands::Credential(args) => {
            Config::load(cli.config.as_deref()).and_then(|config| run_credential(args, &config))
        }
        Commands::Capsule(args) => {
            Config::load(cli.config.as_deref()).and_then(|config| run_capsule(args, &config))
        }
        Commands::Keygen(args) => run_keygen(args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// `RUST_LOG` wins over `-v` when set. Logs go to stderr so stdout carries
/// only command output.
fn init_tracing(verbose: u8, json: bool) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uims_cli::capsule::CapsuleCommand;
    use uims_cli::credential::CredentialCommand;

    #[test]
    fn cli_parse_credential_issue() {
        let cli = Cli::try_parse_from([
            "uims",
            "credential",
            "issue",
            "--type",
            "academic",
            "--title",
            "BSc",
            "--tag",
            "cs",
            "--tag",
            "degree",
            "--issued",
            "2024-06-01",
            "--expires",
            "2099-01-01",
        ])
        .unwrap();
        let Commands::Credential(args) = cli.command else {
            panic!("expected credential command");
        };
        let CredentialCommand::Issue(issue) = args.command else {
            panic!("expected issue");
        };
        assert_eq!(issue.credential_type, "academic");
        assert_eq!(issue.tags, vec!["cs", "degree"]);
        assert_eq!(issue.issued.unwrap().to_string(), "2024-06-01");
        assert_eq!(issue.expires.to_string(), "2099-01-01");
        assert!(issue.holder.is_none());
        assert!(issue.out.is_none());
    }

    #[test]
    fn cli_parse_issue_requires_expiry() {
        assert!(Cli::try_parse_from([
            "uims", "credential", "issue", "--type", "academic", "--title", "BSc",
        ])
        .is_err());
    }

    #[test]
    fn cli_parse_issue_rejects_bad_date() {
        assert!(Cli::try_parse_from([
            "uims",
            "credential",
            "issue",
            "--type",
            "academic",
            "--title",
            "BSc",
            "--expires",
            "01/01/2099",
        ])
        .is_err());
    }

    #[test]
    fn cli_parse_credential_verify() {
        let cli =
            Cli::try_parse_from(["uims", "credential", "verify", "--file", "bsc.json"]).unwrap();
        let Commands::Credential(args) = cli.command else {
            panic!("expected credential command");
        };
        assert!(matches!(
            args.command,
            CredentialCommand::Verify { file } if file == PathBuf::from("bsc.json")
        ));
    }

    #[test]
    fn cli_parse_capsule_watch() {
        let cli = Cli::try_parse_from([
            "uims",
            "capsule",
            "watch",
            "--unlock-in",
            "2",
            "--unlock-in",
            "5",
            "--max-ticks",
            "10",
        ])
        .unwrap();
        let Commands::Capsule(args) = cli.command else {
            panic!("expected capsule command");
        };
        let CapsuleCommand::Watch(watch) = args.command;
        assert_eq!(watch.unlock_in, vec![2, 5]);
        assert_eq!(watch.capsule_type, "message");
        assert_eq!(watch.max_ticks, Some(10));
    }

    #[test]
    fn cli_parse_watch_requires_unlock_in() {
        assert!(Cli::try_parse_from(["uims", "capsule", "watch"]).is_err());
    }

    #[test]
    fn cli_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "uims",
            "keygen",
            "-vv",
            "--log-json",
            "--config",
            "uims.yaml",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(cli.log_json);
        assert_eq!(cli.config, Some(PathBuf::from("uims.yaml")));
        assert!(matches!(cli.command, Commands::Keygen(_)));
    }

    #[test]
    fn cli_parse_missing_subcommand() {
        assert!(Cli::try_parse_from(["uims"]).is_err());
    }
}
