//! Configuration for the signer-census binary
//!
//! Loaded from a TOML file with optional environment overrides via dotenvy.
//! The two behaviors that diverge between known deployments of this tool,
//! the failure policy and the inter-call delay, are deliberately plain
//! configuration rather than hard-coded choices.

use std::str::FromStr;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;

use crate::types::FailurePolicy;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint configuration
    pub rpc: RpcConfig,

    /// Discovery run configuration
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Output sink configuration
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// HTTP RPC endpoint
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_rpc_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Program addresses to census (base58); CLI arguments override this list
    #[serde(default)]
    pub programs: Vec<String>,

    /// Signature-history page size; one page per program, no continuation
    #[serde(default = "default_page_limit")]
    pub page_limit: usize,

    /// Fixed delay between successive RPC calls, in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Cooldown after a transient fetch failure under skip-and-continue
    #[serde(default = "default_transient_cooldown_ms")]
    pub transient_cooldown_ms: u64,

    /// Reaction to transient fetch failures
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// In-call fetch retry attempts (1 = no retry)
    #[serde(default = "default_fetch_attempts")]
    pub fetch_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Destination file for the serialized address record
    #[serde(default = "default_output_path")]
    pub path: String,
}

fn default_rpc_timeout() -> u64 {
    30
}
fn default_page_limit() -> usize {
    1000
}
fn default_request_delay_ms() -> u64 {
    500
}
fn default_transient_cooldown_ms() -> u64 {
    10_000
}
fn default_fetch_attempts() -> u32 {
    1
}
fn default_output_path() -> String {
    "signers.txt".to_string()
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            programs: Vec::new(),
            page_limit: default_page_limit(),
            request_delay_ms: default_request_delay_ms(),
            transient_cooldown_ms: default_transient_cooldown_ms(),
            failure_policy: FailurePolicy::default(),
            fetch_attempts: default_fetch_attempts(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {path}"))?;
        let config: Config =
            toml::from_str(&content).with_context(|| format!("failed to parse config file {path}"))?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    pub fn from_file_with_env(path: &str) -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_file(path)
    }

    pub fn validate(&self) -> Result<()> {
        if self.rpc.endpoint.is_empty() {
            bail!("rpc.endpoint must not be empty");
        }
        if self.discovery.page_limit == 0 || self.discovery.page_limit > 1000 {
            bail!(
                "discovery.page_limit must be in 1..=1000, got {}",
                self.discovery.page_limit
            );
        }
        if self.discovery.fetch_attempts == 0 {
            bail!("discovery.fetch_attempts must be at least 1");
        }
        for program in &self.discovery.programs {
            Pubkey::from_str(program)
                .with_context(|| format!("invalid program address in config: {program}"))?;
        }
        Ok(())
    }

    /// Parse the configured program list into pubkeys
    pub fn program_pubkeys(&self) -> Result<Vec<Pubkey>> {
        self.discovery
            .programs
            .iter()
            .map(|program| {
                Pubkey::from_str(program)
                    .with_context(|| format!("invalid program address: {program}"))
            })
            .collect()
    }
}
