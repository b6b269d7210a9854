//! Common types used throughout the application

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One entry of a signature-history page, newest-first as the ledger returns it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// Base58 transaction signature
    pub signature: String,

    /// Slot the transaction landed in
    pub slot: u64,

    /// Wall-clock block time when the node knows it; absence is not zero
    pub block_time: Option<i64>,
}

/// One account entry of a parsed transaction message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountEntry {
    /// Base58 account public key
    pub pubkey: String,

    /// Whether this account authorized the transaction
    pub is_signer: bool,
}

/// A parsed transaction reduced to what signer discovery needs.
///
/// `account_entries` is `None` when the node returned a message without an
/// account list (degenerate message); absence of the whole transaction is
/// modelled as `Option<ParsedTransaction>` at the fetch seam instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTransaction {
    pub account_entries: Option<Vec<AccountEntry>>,
}

impl ParsedTransaction {
    /// A transaction carrying the given account entries
    pub fn with_entries(entries: Vec<AccountEntry>) -> Self {
        Self {
            account_entries: Some(entries),
        }
    }
}

/// How the pipeline reacts to a transient transaction-fetch failure.
///
/// Both behaviors exist in the wild; the choice is an explicit parameter of
/// the pipeline, never an inline branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Wait out a fixed cooldown, drop the failed signature for good, keep going
    SkipAndContinue,
    /// Stop immediately and hand back whatever has accumulated so far
    AbortAndReturnPartial,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self::SkipAndContinue
    }
}
