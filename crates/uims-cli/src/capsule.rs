//! # Capsule Subcommand
//!
//! `uims capsule watch` seals capsules due a few seconds from now, runs the
//! capsule clock in the background, and reports each capsule as it opens.

use std::collections::HashSet;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use uims_core::{CapsuleId, ClockSource, SystemClock};
use uims_state::{CapsuleClock, CapsuleDraft, CapsuleStore, CapsuleType};

use crate::config::Config;
use crate::{runtime, EXIT_NEGATIVE};

/// Arguments for the `uims capsule` subcommand.
#[derive(Args, Debug)]
pub struct CapsuleArgs {
    #[command(subcommand)]
    pub command: CapsuleCommand,
}

/// Capsule subcommands.
#[derive(Subcommand, Debug)]
pub enum CapsuleCommand {
    /// Seal capsules and watch them unlock.
    Watch(WatchArgs),
}

/// Flags for `uims capsule watch`.
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Seconds until a capsule unlocks; repeat to seal several.
    #[arg(long = "unlock-in", value_name = "SECS", required = true)]
    pub unlock_in: Vec<u64>,

    /// Capsule type (message, memory, prediction, nft, legacy).
    #[arg(long = "type", value_name = "TYPE", default_value = "message")]
    pub capsule_type: String,

    #[arg(long, default_value = "time capsule")]
    pub title: String,

    #[arg(long, default_value = "")]
    pub content: String,

    /// Give up after this many clock periods.
    #[arg(long)]
    pub max_ticks: Option<u64>,
}

/// Execute the capsule subcommand.
pub fn run_capsule(args: &CapsuleArgs, config: &Config) -> Result<u8> {
    match &args.command {
        CapsuleCommand::Watch(watch_args) => cmd_watch(watch_args, config),
    }
}

fn cmd_watch(args: &WatchArgs, config: &Config) -> Result<u8> {
    let capsule_type: CapsuleType = args.capsule_type.parse()?;
    let store = CapsuleStore::new();
    let clock = SystemClock;
    let now = clock.now()?;

    for (n, secs) in args.unlock_in.iter().enumerate() {
        let millis = i64::try_from(*secs)
            .ok()
            .and_then(|s| s.checked_mul(1_000))
            .with_context(|| format!("--unlock-in {secs} is out of range"))?;
        let capsule = store.create_capsule(
            CapsuleDraft {
                capsule_type: Some(capsule_type),
                title: format!("{} #{}", args.title, n + 1),
                content: args.content.clone(),
                unlock_at: Some(now.plus_millis(millis)),
                owner: None,
            },
            &clock,
        )?;
        println!(
            "sealed {} \"{}\" (unlocks {})",
            capsule.id, capsule.title, capsule.unlock_at
        );
    }

    runtime()?.block_on(watch(store, config.tick_interval(), args.max_ticks))
}

async fn watch(store: CapsuleStore, period: Duration, max_ticks: Option<u64>) -> Result<u8> {
    let handle = CapsuleClock::new(store.clone(), SystemClock).spawn(period)?;
    let mut interval = tokio::time::interval(period);
    let mut reported: HashSet<CapsuleId> = HashSet::new();
    let mut periods = 0u64;

    loop {
        interval.tick().await;
        if handle.is_finished() {
            handle.join().await?;
            anyhow::bail!("capsule clock stopped unexpectedly");
        }

        let now = SystemClock.now()?;
        for capsule in store.list_capsules(None) {
            if capsule.is_locked {
                tracing::info!(
                    capsule_id = %capsule.id,
                    remaining = %capsule.time_remaining(&now),
                    "waiting"
                );
            } else if reported.insert(capsule.id) {
                let content = store.open_capsule(&capsule.id)?;
                println!("unlocked {} \"{}\": {content}", capsule.id, capsule.title);
            }
        }

        let summary = store.summary();
        if summary.locked == 0 {
            break;
        }
        periods += 1;
        if max_ticks.is_some_and(|max| periods >= max) {
            let stats = handle.stop().await?;
            println!(
                "stopped after {} ticks; {} of {} capsules still locked",
                stats.ticks, summary.locked, summary.total
            );
            return Ok(EXIT_NEGATIVE);
        }
    }

    let stats = handle.stop().await?;
    println!(
        "all {} capsules unlocked after {} ticks",
        store.len(),
        stats.ticks
    );
    Ok(0)
}
