//! The consumed ledger-query capability and its Solana RPC adapter

use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use solana_client::client_error::{ClientError, ClientErrorKind};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_client::GetConfirmedSignaturesForAddress2Config;
use solana_client::rpc_config::RpcTransactionConfig;
use solana_rpc_client_api::custom_error::{
    JSON_RPC_SERVER_ERROR_LONG_TERM_STORAGE_SLOT_SKIPPED,
    JSON_RPC_SERVER_ERROR_TRANSACTION_HISTORY_NOT_AVAILABLE,
};
use solana_rpc_client_api::request::RpcError;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_transaction_status::{EncodedTransaction, UiMessage, UiTransactionEncoding};
use tokio::time::sleep;
use tracing::debug;

use crate::error::LedgerError;
use crate::types::{AccountEntry, ParsedTransaction, SignatureRecord};

/// Only version-0 transactions are requested; anything newer is out of scope
pub const MAX_SUPPORTED_TRANSACTION_VERSION: u8 = 0;

/// The transaction-history capability the pipeline consumes.
///
/// Implemented by [`RpcLedger`] in production and by scripted mocks in tests.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// One page of signature history for `address`, newest-first.
    ///
    /// Deliberately a single page with no continuation; callers needing full
    /// history must layer cursor pagination on top.
    async fn list_signatures(
        &self,
        address: &Pubkey,
        page_limit: usize,
    ) -> Result<Vec<SignatureRecord>, LedgerError>;

    /// The parsed transaction behind `signature`, or `None` when the ledger
    /// no longer has it (pruned history).
    async fn fetch_parsed_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<ParsedTransaction>, LedgerError>;
}

#[async_trait]
impl<L: LedgerQuery + ?Sized> LedgerQuery for std::sync::Arc<L> {
    async fn list_signatures(
        &self,
        address: &Pubkey,
        page_limit: usize,
    ) -> Result<Vec<SignatureRecord>, LedgerError> {
        (**self).list_signatures(address, page_limit).await
    }

    async fn fetch_parsed_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<ParsedTransaction>, LedgerError> {
        (**self).fetch_parsed_transaction(signature).await
    }
}

/// `LedgerQuery` backed by a nonblocking Solana RPC client
pub struct RpcLedger {
    client: RpcClient,
    commitment: CommitmentConfig,
    fetch_attempts: u32,
    retry_backoff: Duration,
}

impl RpcLedger {
    pub fn new(endpoint: String, timeout: Duration) -> Self {
        Self {
            client: RpcClient::new_with_timeout(endpoint, timeout),
            commitment: CommitmentConfig::confirmed(),
            fetch_attempts: 1,
            retry_backoff: Duration::from_millis(500),
        }
    }

    /// Retry transient fetch failures up to `attempts` times within a single
    /// call, doubling the backoff between tries. The retry state never
    /// outlives the call; 1 means no retry.
    pub fn with_fetch_retry(mut self, attempts: u32, backoff: Duration) -> Self {
        self.fetch_attempts = attempts.max(1);
        self.retry_backoff = backoff;
        self
    }

    async fn fetch_once(
        &self,
        signature: &Signature,
    ) -> Result<Option<ParsedTransaction>, LedgerError> {
        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::JsonParsed),
            commitment: Some(self.commitment),
            max_supported_transaction_version: Some(MAX_SUPPORTED_TRANSACTION_VERSION),
        };
        match self
            .client
            .get_transaction_with_config(signature, config)
            .await
        {
            Ok(confirmed) => Ok(Some(reduce_transaction(confirmed.transaction.transaction))),
            Err(err) if is_not_found(&err) => Ok(None),
            Err(err) => Err(LedgerError::TransientFetch(err.to_string())),
        }
    }
}

#[async_trait]
impl LedgerQuery for RpcLedger {
    async fn list_signatures(
        &self,
        address: &Pubkey,
        page_limit: usize,
    ) -> Result<Vec<SignatureRecord>, LedgerError> {
        let config = GetConfirmedSignaturesForAddress2Config {
            before: None,
            until: None,
            limit: Some(page_limit),
            commitment: Some(self.commitment),
        };
        let statuses = self
            .client
            .get_signatures_for_address_with_config(address, config)
            .await
            .map_err(|err| LedgerError::Listing(err.to_string()))?;
        Ok(statuses
            .into_iter()
            .map(|status| SignatureRecord {
                signature: status.signature,
                slot: status.slot,
                block_time: status.block_time,
            })
            .collect())
    }

    async fn fetch_parsed_transaction(
        &self,
        signature: &str,
    ) -> Result<Option<ParsedTransaction>, LedgerError> {
        let parsed = Signature::from_str(signature).map_err(|err| {
            // The listing produced this string; a parse failure means the
            // node served a corrupted response.
            LedgerError::TransientFetch(format!("unparseable signature {signature}: {err}"))
        })?;
        let mut backoff = self.retry_backoff;
        let mut last_err = LedgerError::TransientFetch("fetch never attempted".to_string());
        for attempt in 0..self.fetch_attempts {
            match self.fetch_once(&parsed).await {
                Ok(outcome) => return Ok(outcome),
                Err(err) => {
                    debug!(signature = %parsed, attempt, error = %err, "Fetch attempt failed");
                    last_err = err;
                    if attempt + 1 < self.fetch_attempts {
                        sleep(backoff).await;
                        backoff *= 2;
                    }
                }
            }
        }
        Err(last_err)
    }
}

/// Reduce the RPC wire encoding down to the account-entry list the extractor
/// needs. Non-JSON encodings and raw (unparsed) messages carry no flagged
/// account list, so they reduce to an absent list.
fn reduce_transaction(encoded: EncodedTransaction) -> ParsedTransaction {
    let account_entries = match encoded {
        EncodedTransaction::Json(tx) => match tx.message {
            UiMessage::Parsed(message) => Some(
                message
                    .account_keys
                    .into_iter()
                    .map(|account| AccountEntry {
                        pubkey: account.pubkey,
                        is_signer: account.signer,
                    })
                    .collect(),
            ),
            UiMessage::Raw(_) => None,
        },
        _ => None,
    };
    ParsedTransaction { account_entries }
}

/// A missing transaction surfaces either as a null JSON result (a serde
/// error on the client side) or as an explicit history-not-available
/// response code.
fn is_not_found(err: &ClientError) -> bool {
    match err.kind() {
        ClientErrorKind::SerdeJson(_) => true,
        ClientErrorKind::RpcError(RpcError::ForUser(message)) => message.contains("not found"),
        ClientErrorKind::RpcError(RpcError::RpcResponseError { code, .. }) => {
            *code == JSON_RPC_SERVER_ERROR_TRANSACTION_HISTORY_NOT_AVAILABLE
                || *code == JSON_RPC_SERVER_ERROR_LONG_TERM_STORAGE_SLOT_SKIPPED
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use solana_rpc_client_api::request::RpcResponseErrorData;
    use solana_transaction_status::UiTransaction;

    fn parsed_ui_transaction() -> UiTransaction {
        serde_json::from_value(json!({
            "signatures": ["5VERYlongFakeSignature"],
            "message": {
                "accountKeys": [
                    { "pubkey": "Auth11", "signer": true, "writable": true },
                    { "pubkey": "Prog11", "signer": false, "writable": false }
                ],
                "recentBlockhash": "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N",
                "instructions": []
            }
        }))
        .expect("valid parsed transaction json")
    }

    #[test]
    fn parsed_message_reduces_to_account_entries() {
        let reduced = reduce_transaction(EncodedTransaction::Json(parsed_ui_transaction()));
        let entries = reduced.account_entries.expect("account list present");
        assert_eq!(entries.len(), 2);
        assert!(entries[0].is_signer);
        assert_eq!(entries[0].pubkey, "Auth11");
        assert!(!entries[1].is_signer);
    }

    #[test]
    fn raw_message_reduces_to_absent_account_list() {
        let tx: UiTransaction = serde_json::from_value(json!({
            "signatures": ["5VERYlongFakeSignature"],
            "message": {
                "accountKeys": ["Auth11", "Prog11"],
                "header": {
                    "numRequiredSignatures": 1,
                    "numReadonlySignedAccounts": 0,
                    "numReadonlyUnsignedAccounts": 1
                },
                "recentBlockhash": "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N",
                "instructions": []
            }
        }))
        .expect("valid raw transaction json");
        let reduced = reduce_transaction(EncodedTransaction::Json(tx));
        assert!(reduced.account_entries.is_none());
    }

    #[test]
    fn not_found_classification() {
        let for_user: ClientError =
            RpcError::ForUser("transaction not found".to_string()).into();
        assert!(is_not_found(&for_user));

        let history_gone: ClientError = RpcError::RpcResponseError {
            code: JSON_RPC_SERVER_ERROR_TRANSACTION_HISTORY_NOT_AVAILABLE,
            message: "Transaction history is not available from this node".to_string(),
            data: RpcResponseErrorData::Empty,
        }
        .into();
        assert!(is_not_found(&history_gone));

        let rate_limited: ClientError =
            RpcError::RpcRequestError("429 Too Many Requests".to_string()).into();
        assert!(!is_not_found(&rate_limited));
    }
}
