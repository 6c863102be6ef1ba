//! # CLI Configuration
//!
//! Resolved in layers, later layers winning:
//!
//! 1. Built-in defaults.
//! 2. An optional YAML file given with `--config`.
//! 3. `UIMS_*` environment variables.
//!
//! ```yaml
//! network_id: 137
//! tick_interval_ms: 500
//! signing_key: "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60"
//! ```

use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use uims_crypto::LocalWallet;

/// Network id the credentials are bound to.
pub const ENV_NETWORK_ID: &str = "UIMS_NETWORK_ID";
/// Capsule clock period in milliseconds.
pub const ENV_TICK_INTERVAL_MS: &str = "UIMS_TICK_INTERVAL_MS";
/// Hex-encoded 32-byte Ed25519 seed of the issuing wallet.
pub const ENV_SIGNING_KEY: &str = "UIMS_SIGNING_KEY";

/// Resolved CLI configuration.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub network_id: u64,
    pub tick_interval_ms: u64,
    signing_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network_id: 1,
            tick_interval_ms: 1_000,
            signing_key: None,
        }
    }
}

impl Config {
    /// Resolve from defaults, `path` and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |name| std::env::var(name).ok())
    }

    /// Resolve with an explicit environment lookup.
    pub fn load_with<F>(path: Option<&Path>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_env(env)?;
        config.validate()?;
        tracing::debug!(config = ?config, "configuration resolved");
        Ok(config)
    }

    fn from_yaml_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = env(ENV_NETWORK_ID) {
            self.network_id = raw
                .trim()
                .parse()
                .with_context(|| format!("{ENV_NETWORK_ID} is not an unsigned integer: {raw:?}"))?;
        }
        if let Some(raw) = env(ENV_TICK_INTERVAL_MS) {
            self.tick_interval_ms = raw.trim().parse().with_context(|| {
                format!("{ENV_TICK_INTERVAL_MS} is not an unsigned integer: {raw:?}")
            })?;
        }
        if let Some(raw) = env(ENV_SIGNING_KEY) {
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                self.signing_key = Some(trimmed.to_string());
            }
        }
        Ok(())
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            bail!("tick_interval_ms must be greater than zero");
        }
        Ok(())
    }

    /// Set the signing seed, replacing any configured one.
    pub fn with_signing_key(mut self, hex: impl Into<String>) -> Self {
        self.signing_key = Some(hex.into());
        self
    }

    /// Whether a signing seed is configured.
    pub fn has_signing_key(&self) -> bool {
        self.signing_key.is_some()
    }

    /// Capsule clock period.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// The issuing wallet. Without a configured seed a throwaway key is
    /// generated; credentials it signs verify, but nobody can sign for that
    /// account again.
    pub fn wallet(&self) -> Result<LocalWallet> {
        match &self.signing_key {
            Some(hex) => LocalWallet::from_hex(hex).context("invalid signing key"),
            None => {
                let wallet = LocalWallet::generate();
                tracing::warn!(
                    account = %wallet.account(),
                    "{ENV_SIGNING_KEY} not set; signing with an ephemeral key"
                );
                Ok(wallet)
            }
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("network_id", &self.network_id)
            .field("tick_interval_ms", &self.tick_interval_ms)
            .field(
                "signing_key",
                &self.signing_key.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}
