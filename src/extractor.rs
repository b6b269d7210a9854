//! Signer extraction from parsed transactions

use crate::types::ParsedTransaction;

/// Project a parsed transaction onto the pubkeys of its signer-flagged
/// account entries.
///
/// An absent transaction and a message without an account list both yield an
/// empty result, never an error. Duplicates within one transaction are
/// harmless since the destination is a set.
pub fn extract_signers(transaction: Option<&ParsedTransaction>) -> Vec<String> {
    let Some(transaction) = transaction else {
        return Vec::new();
    };
    let Some(entries) = transaction.account_entries.as_ref() else {
        return Vec::new();
    };
    entries
        .iter()
        .filter(|entry| entry.is_signer)
        .map(|entry| entry.pubkey.clone())
        .collect()
}
