//! Structured logging context for a discovery run

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Per-run logging context, constructed explicitly and handed to the
/// pipeline. Carries a run id so interleaved runs stay distinguishable;
/// no ambient mutable logging state is involved.
#[derive(Debug, Clone)]
pub struct DiscoveryLogger {
    run_id: String,
}

impl DiscoveryLogger {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn log_page_listed(
        &self,
        address: &str,
        signatures: usize,
        newest_slot: Option<u64>,
        newest_block_time: Option<i64>,
    ) {
        tracing::info!(
            run_id = %self.run_id,
            address = %address,
            signatures = signatures,
            newest_slot = ?newest_slot,
            newest_block_time = %format_block_time(newest_block_time),
            "Listed signature page"
        );
    }

    pub fn log_new_signer(&self, signer: &str, total: usize) {
        tracing::info!(
            run_id = %self.run_id,
            signer = %signer,
            total = total,
            "New signer discovered"
        );
    }

    pub fn log_transaction_skipped(&self, signature: &str, reason: &str) {
        tracing::warn!(
            run_id = %self.run_id,
            signature = %signature,
            reason = %reason,
            "Transaction skipped"
        );
    }

    pub fn log_transient_failure(&self, signature: &str, error: &str, cooldown_ms: u64) {
        tracing::warn!(
            run_id = %self.run_id,
            signature = %signature,
            error = %error,
            cooldown_ms = cooldown_ms,
            "Transient fetch failure"
        );
    }

    pub fn log_run_complete(&self, processed: usize, skipped: usize, unique: usize) {
        tracing::info!(
            run_id = %self.run_id,
            processed = processed,
            skipped = skipped,
            unique = unique,
            "Discovery run complete"
        );
    }
}

impl Default for DiscoveryLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Render an optional unix block time for logs. Absence stays visible as
/// "unknown" rather than collapsing to the epoch.
fn format_block_time(block_time: Option<i64>) -> String {
    match block_time.and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)) {
        Some(ts) => ts.to_rfc3339(),
        None => "unknown".to_string(),
    }
}
