//! Signer census library
//!
//! Best-effort discovery of the unique signer public keys behind the recent
//! transaction history of a set of Solana program addresses: one signature
//! page per program, one parsed-transaction fetch per signature, signer
//! extraction and deduplication, with a fixed inter-call delay and an
//! explicit policy for transient fetch failures.

pub mod address_set;
pub mod config;
pub mod error;
pub mod extractor;
pub mod ledger;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod rate_limit;
pub mod types;

// Re-export commonly used types
pub use solana_sdk::{pubkey::Pubkey, signature::Signature};
