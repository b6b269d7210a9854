//! Discovery run orchestration

use std::time::Duration;

use solana_sdk::pubkey::Pubkey;
use tokio::time::sleep;

use crate::address_set::AddressSetBuilder;
use crate::error::DiscoveryError;
use crate::extractor::extract_signers;
use crate::ledger::LedgerQuery;
use crate::logging::DiscoveryLogger;
use crate::rate_limit::RateLimiter;
use crate::types::FailurePolicy;

/// Result of a discovery run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryOutcome {
    /// Unique signer addresses in first-seen order
    pub signers: Vec<String>,

    /// False when `AbortAndReturnPartial` cut the run short
    pub completed: bool,

    /// Transactions whose signers were merged into the set
    pub processed: usize,

    /// Signatures dropped on transient fetch failure
    pub failed: usize,

    /// Signatures whose transaction was gone or carried no account list
    pub skipped: usize,
}

/// Sequential orchestrator: for each program address, list one signature
/// page, then fetch, extract, and merge per signature, pacing every network
/// call through the rate limiter.
///
/// Exactly one network call is ever in flight; signatures are processed in
/// ledger-returned (newest-first) order, addresses in caller order.
pub struct DiscoveryPipeline<L> {
    ledger: L,
    policy: FailurePolicy,
    page_limit: usize,
    rate_limiter: RateLimiter,
    transient_cooldown: Duration,
    logger: DiscoveryLogger,
}

impl<L: LedgerQuery> DiscoveryPipeline<L> {
    pub fn new(
        ledger: L,
        policy: FailurePolicy,
        page_limit: usize,
        rate_limiter: RateLimiter,
        transient_cooldown: Duration,
        logger: DiscoveryLogger,
    ) -> Self {
        Self {
            ledger,
            policy,
            page_limit,
            rate_limiter,
            transient_cooldown,
            logger,
        }
    }

    /// Run discovery over `programs`. A listing failure aborts the whole run;
    /// transient fetch failures are handled per the configured policy.
    pub async fn run(&self, programs: &[Pubkey]) -> Result<DiscoveryOutcome, DiscoveryError> {
        let observer_logger = self.logger.clone();
        let mut signers = AddressSetBuilder::with_observer(Box::new(move |address, total| {
            observer_logger.log_new_signer(address, total);
        }));
        let mut processed = 0usize;
        let mut failed = 0usize;
        let mut skipped = 0usize;

        for program in programs {
            let page = self
                .ledger
                .list_signatures(program, self.page_limit)
                .await
                .map_err(|source| DiscoveryError::Listing {
                    address: program.to_string(),
                    source,
                })?;
            let newest = page.first();
            self.logger.log_page_listed(
                &program.to_string(),
                page.len(),
                newest.map(|record| record.slot),
                newest.and_then(|record| record.block_time),
            );
            self.rate_limiter.pause().await;

            for record in &page {
                match self.ledger.fetch_parsed_transaction(&record.signature).await {
                    Ok(Some(transaction)) => {
                        if transaction.account_entries.is_none() {
                            skipped += 1;
                            self.logger
                                .log_transaction_skipped(&record.signature, "account list missing");
                        } else {
                            for signer in extract_signers(Some(&transaction)) {
                                signers.insert(&signer);
                            }
                            processed += 1;
                        }
                    }
                    Ok(None) => {
                        skipped += 1;
                        self.logger
                            .log_transaction_skipped(&record.signature, "transaction not found");
                    }
                    Err(err) => {
                        failed += 1;
                        match self.policy {
                            FailurePolicy::SkipAndContinue => {
                                self.logger.log_transient_failure(
                                    &record.signature,
                                    &err.to_string(),
                                    self.transient_cooldown.as_millis() as u64,
                                );
                                // The cooldown replaces the standard delay;
                                // the failed signature is never retried.
                                sleep(self.transient_cooldown).await;
                                continue;
                            }
                            FailurePolicy::AbortAndReturnPartial => {
                                self.logger.log_transient_failure(
                                    &record.signature,
                                    &err.to_string(),
                                    0,
                                );
                                self.logger
                                    .log_run_complete(processed, failed + skipped, signers.len());
                                return Ok(DiscoveryOutcome {
                                    signers: signers.into_addresses(),
                                    completed: false,
                                    processed,
                                    failed,
                                    skipped,
                                });
                            }
                        }
                    }
                }
                self.rate_limiter.pause().await;
            }
        }

        self.logger
            .log_run_complete(processed, failed + skipped, signers.len());
        Ok(DiscoveryOutcome {
            signers: signers.into_addresses(),
            completed: true,
            processed,
            failed,
            skipped,
        })
    }
}
