//! signer-census - Signer discovery over Solana program history
//!
//! Queries one page of transaction-signature history per program address,
//! fetches each transaction in parsed form, collects the signer-flagged
//! account keys, and persists the deduplicated set as a single `;`-joined
//! record.

// Compiler warning configuration
#![deny(unused_imports)]
#![deny(unused_mut)]
#![warn(dead_code)]
#![warn(unused_must_use)]

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use solana_sdk::pubkey::Pubkey;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use signer_census::config::Config;
use signer_census::ledger::RpcLedger;
use signer_census::logging::DiscoveryLogger;
use signer_census::output;
use signer_census::pipeline::DiscoveryPipeline;
use signer_census::rate_limit::RateLimiter;
use signer_census::types::FailurePolicy;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Program addresses to census (overrides the config list)
    #[arg(value_name = "PROGRAM")]
    programs: Vec<String>,

    /// Output file path (overrides the config)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Failure-policy override for transient fetch errors
    #[arg(long, value_enum)]
    policy: Option<FailurePolicy>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose)?;

    info!("🔎 Starting signer census");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    info!("📋 Loading configuration from: {}", args.config);
    let config = Config::from_file_with_env(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config))?;
    config.validate()?;

    let programs = if args.programs.is_empty() {
        config.program_pubkeys()?
    } else {
        args.programs
            .iter()
            .map(|program| {
                Pubkey::from_str(program)
                    .with_context(|| format!("invalid program address: {program}"))
            })
            .collect::<Result<Vec<_>>>()?
    };
    if programs.is_empty() {
        bail!("no program addresses given (set [discovery].programs or pass them as arguments)");
    }
    info!("🎯 Censusing {} program address(es)", programs.len());

    let policy = args.policy.unwrap_or(config.discovery.failure_policy);
    info!("⚖️ Failure policy: {:?}", policy);

    let ledger = RpcLedger::new(
        config.rpc.endpoint.clone(),
        Duration::from_secs(config.rpc.timeout_secs),
    )
    .with_fetch_retry(config.discovery.fetch_attempts, Duration::from_millis(500));

    let logger = DiscoveryLogger::new();
    info!("🧾 Run id: {}", logger.run_id());

    let pipeline = DiscoveryPipeline::new(
        ledger,
        policy,
        config.discovery.page_limit,
        RateLimiter::new(Duration::from_millis(config.discovery.request_delay_ms)),
        Duration::from_millis(config.discovery.transient_cooldown_ms),
        logger,
    );

    // A listing failure aborts here; nothing is written in that case
    let outcome = pipeline
        .run(&programs)
        .await
        .context("discovery run failed")?;

    if !outcome.completed {
        warn!("Run aborted after a transient failure; persisting the partial set");
    }
    info!(
        "✅ {} unique signer(s) ({} transactions processed, {} skipped, {} failed)",
        outcome.signers.len(),
        outcome.processed,
        outcome.skipped,
        outcome.failed
    );

    let output_path = args
        .output
        .unwrap_or_else(|| PathBuf::from(&config.output.path));
    output::write_record(&output_path, &outcome.signers).await?;
    info!(
        "💾 Wrote {} address(es) to {}",
        outcome.signers.len(),
        output_path.display()
    );

    Ok(())
}

fn init_logging(verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        "signer_census=debug,info"
    } else {
        "signer_census=info,warn,error"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();

    Ok(())
}
