//! Error taxonomy for the discovery run

use thiserror::Error;

/// Errors surfaced by a `LedgerQuery` implementation
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// Signature listing failed; there is nothing to iterate without it
    #[error("signature listing failed: {0}")]
    Listing(String),

    /// Transient transaction-fetch failure (network, timeout, rate limit)
    #[error("transient fetch error: {0}")]
    TransientFetch(String),
}

impl LedgerError {
    /// Transient errors are recovered per the active failure policy;
    /// everything else aborts the run
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientFetch(_))
    }
}

/// Errors that abort a discovery run entirely
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// A listing failure is fatal; no sink write happens afterwards
    #[error("signature listing failed for {address}")]
    Listing {
        address: String,
        #[source]
        source: LedgerError,
    },
}
