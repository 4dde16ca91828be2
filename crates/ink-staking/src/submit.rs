// ink-staking/submit.rs - signing and submission pipeline. A batch moves
// through built, signed, submitted, then confirmed or failed; confirmation
// is finalized commitment for every transaction.

use futures::future::join_all;
use log::{info, warn};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::RpcSendTransactionConfig;
use solana_sdk::commitment_config::{CommitmentConfig, CommitmentLevel};
use solana_sdk::hash::Hash;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::SignerError;
use solana_sdk::transaction::Transaction;
use tokio::time::sleep;

use crate::constants::{CONFIRM_POLL_INTERVAL, SEND_RETRY_COUNT};
use crate::error::{Result, StakingClientError};

/// Wallet capability supplied by the caller, shaped like a wallet adapter:
/// a multi-transaction batch goes through one `sign_all_transactions` call
/// so interactive wallets can show a single approval.
pub trait WalletSigner {
    /// Whether the capability is currently usable. Operations are skipped,
    /// not failed, while it is not.
    fn is_available(&self) -> bool {
        true
    }

    fn sign_transaction(&self, transaction: &mut Transaction)
        -> std::result::Result<(), SignerError>;

    fn sign_all_transactions(
        &self,
        transactions: &mut [Transaction],
    ) -> std::result::Result<(), SignerError> {
        for transaction in transactions.iter_mut() {
            self.sign_transaction(transaction)?;
        }
        Ok(())
    }
}

/// Local keypair signing, for tooling and tests.
impl WalletSigner for Keypair {
    fn sign_transaction(
        &self,
        transaction: &mut Transaction,
    ) -> std::result::Result<(), SignerError> {
        let recent_blockhash = transaction.message.recent_blockhash;
        transaction.try_sign(&[self], recent_blockhash)
    }
}

/// How an operation ended without anything being submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The operation produced zero transactions.
    NoTransactions,
    /// The wallet capability is not available; the operation is a no-op.
    SignerUnavailable,
}

/// Result of one operation-level batch.
#[derive(Debug, PartialEq)]
pub enum BatchOutcome {
    /// Every transaction reached finalized commitment.
    Confirmed(Vec<Signature>),
    Skipped(SkipReason),
}

/// Terminal state of one transaction in a batch.
#[derive(Debug, PartialEq)]
pub enum TransactionResult {
    Confirmed(Signature),
    SendFailed(String),
    ConfirmFailed { signature: Signature, error: String },
}

/// Per-transaction ledger for a batch, in input order. A batch that did not
/// fully confirm still lists which transactions are final on-chain.
#[derive(Debug, Default, PartialEq)]
pub struct BatchReport {
    pub results: Vec<TransactionResult>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.results
            .iter()
            .all(|result| matches!(result, TransactionResult::Confirmed(_)))
    }

    /// Signatures that reached finalized commitment.
    pub fn confirmed(&self) -> Vec<Signature> {
        self.results
            .iter()
            .filter_map(|result| match result {
                TransactionResult::Confirmed(signature) => Some(*signature),
                _ => None,
            })
            .collect()
    }
}

/// Sign, submit, and confirm a batch.
///
/// Signing is one signer call for the whole batch. Sends skip preflight and
/// carry a fixed transport retry count; every send is dispatched even when
/// an earlier one failed. Every submitted signature is then awaited to
/// finalized commitment in parallel, with no deadline from this layer. The
/// confirmed signatures are returned only when the whole batch confirmed;
/// otherwise the error carries the per-transaction report.
pub async fn submit_batch(
    rpc: &RpcClient,
    mut transactions: Vec<Transaction>,
    wallet: &dyn WalletSigner,
) -> Result<Vec<Signature>> {
    if transactions.is_empty() {
        return Ok(Vec::new());
    }

    if transactions.len() == 1 {
        wallet.sign_transaction(&mut transactions[0])?;
    } else {
        wallet.sign_all_transactions(&mut transactions)?;
    }

    let sends = join_all(
        transactions
            .iter()
            .map(|transaction| rpc.send_transaction_with_config(transaction, send_config())),
    )
    .await;

    let results = join_all(sends.iter().zip(&transactions).map(|(send, transaction)| {
        let recent_blockhash = transaction.message.recent_blockhash;
        async move {
            match send {
                Ok(signature) => match await_finalized(rpc, signature, &recent_blockhash).await {
                    Ok(()) => TransactionResult::Confirmed(*signature),
                    Err(error) => TransactionResult::ConfirmFailed {
                        signature: *signature,
                        error,
                    },
                },
                Err(error) => TransactionResult::SendFailed(error.to_string()),
            }
        }
    }))
    .await;

    let report = BatchReport { results };
    for result in &report.results {
        match result {
            TransactionResult::Confirmed(signature) => info!("confirmed {signature}"),
            TransactionResult::SendFailed(error) => warn!("send failed: {error}"),
            TransactionResult::ConfirmFailed { signature, error } => {
                warn!("confirmation failed for {signature}: {error}")
            }
        }
    }

    if report.is_complete() {
        Ok(report.confirmed())
    } else {
        Err(StakingClientError::BatchFailed { report })
    }
}

/// Wait for one signature to reach finalized commitment. This layer sets no
/// deadline of its own: the wait ends when the signature finalizes, the
/// transaction fails on chain, or its blockhash expires without the
/// signature appearing.
async fn await_finalized(
    rpc: &RpcClient,
    signature: &Signature,
    recent_blockhash: &Hash,
) -> std::result::Result<(), String> {
    let mut blockhash_expired = false;
    loop {
        let statuses = rpc
            .get_signature_statuses(&[*signature])
            .await
            .map_err(|error| error.to_string())?
            .value;
        match statuses.first().and_then(|status| status.as_ref()) {
            Some(status) if status.satisfies_commitment(CommitmentConfig::finalized()) => {
                return match &status.err {
                    None => Ok(()),
                    Some(error) => Err(error.to_string()),
                };
            }
            // Landed but not yet rooted. Keep waiting.
            Some(_) => {}
            None => {
                // Expiry is terminal only once a later status poll still
                // comes back empty.
                if blockhash_expired {
                    return Err(format!(
                        "blockhash {recent_blockhash} expired before the signature was observed"
                    ));
                }
                blockhash_expired = !rpc
                    .is_blockhash_valid(recent_blockhash, CommitmentConfig::processed())
                    .await
                    .map_err(|error| error.to_string())?;
            }
        }
        sleep(CONFIRM_POLL_INTERVAL).await;
    }
}

/// Send policy shared by every transaction in a batch: preflight skipped,
/// fixed transport retry count.
fn send_config() -> RpcSendTransactionConfig {
    RpcSendTransactionConfig {
        skip_preflight: true,
        preflight_commitment: Some(CommitmentLevel::Confirmed),
        max_retries: Some(SEND_RETRY_COUNT),
        ..RpcSendTransactionConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde_json::{json, Value};
    use solana_client::client_error::{ClientError, ClientErrorKind};
    use solana_client::rpc_client::RpcClientConfig;
    use solana_client::rpc_request::RpcRequest;
    use solana_client::rpc_sender::{RpcSender, RpcTransportStats};
    use solana_sdk::pubkey::Pubkey;
    use solana_sdk::signer::Signer;
    use solana_sdk::system_instruction;

    type ClientResult<T> = std::result::Result<T, ClientError>;

    fn unsigned_transfer(payer: &Keypair) -> Transaction {
        unsigned_transfer_with(payer, Hash::new_unique())
    }

    fn unsigned_transfer_with(payer: &Keypair, recent_blockhash: Hash) -> Transaction {
        let instruction = system_instruction::transfer(&payer.pubkey(), &Pubkey::new_unique(), 1);
        let mut tx = Transaction::new_with_payer(&[instruction], Some(&payer.pubkey()));
        tx.message.recent_blockhash = recent_blockhash;
        tx
    }

    /// The signature the payer will produce for this transaction.
    fn presigned_signature(transaction: &Transaction, payer: &Keypair) -> Signature {
        let mut signed = transaction.clone();
        signed
            .try_sign(&[payer], transaction.message.recent_blockhash)
            .unwrap();
        signed.signatures[0]
    }

    /// RPC transport with canned responses, consumed one per request.
    struct ScriptedSender {
        sends: Mutex<VecDeque<ClientResult<Value>>>,
        statuses: Mutex<VecDeque<Value>>,
        blockhash_valid: Mutex<VecDeque<bool>>,
    }

    impl ScriptedSender {
        fn new(
            sends: Vec<ClientResult<Value>>,
            statuses: Vec<Value>,
            blockhash_valid: Vec<bool>,
        ) -> Self {
            Self {
                sends: Mutex::new(sends.into()),
                statuses: Mutex::new(statuses.into()),
                blockhash_valid: Mutex::new(blockhash_valid.into()),
            }
        }
    }

    #[async_trait]
    impl RpcSender for ScriptedSender {
        async fn send(&self, request: RpcRequest, _params: Value) -> ClientResult<Value> {
            match request {
                RpcRequest::SendTransaction => self
                    .sends
                    .lock()
                    .unwrap()
                    .pop_front()
                    .expect("no send response scripted"),
                RpcRequest::GetSignatureStatuses => Ok(self
                    .statuses
                    .lock()
                    .unwrap()
                    .pop_front()
                    .expect("no status response scripted")),
                RpcRequest::IsBlockhashValid => Ok(json!({
                    "context": { "slot": 1 },
                    "value": self
                        .blockhash_valid
                        .lock()
                        .unwrap()
                        .pop_front()
                        .expect("no validity response scripted"),
                })),
                // Checked once before the first send to pick a wire encoding.
                RpcRequest::GetVersion => Ok(json!({
                    "solana-core": "1.18.10",
                    "feature-set": null,
                })),
                other => panic!("unexpected rpc request {other}"),
            }
        }

        fn get_transport_stats(&self) -> RpcTransportStats {
            RpcTransportStats::default()
        }

        fn url(&self) -> String {
            "scripted".to_string()
        }
    }

    fn scripted_client(sender: ScriptedSender) -> RpcClient {
        RpcClient::new_sender(sender, RpcClientConfig::default())
    }

    fn status_response(status: Value) -> Value {
        json!({ "context": { "slot": 1 }, "value": [status] })
    }

    fn finalized_status() -> Value {
        json!({
            "slot": 1,
            "confirmations": null,
            "status": { "Ok": null },
            "err": null,
            "confirmationStatus": "finalized",
        })
    }

    fn confirmed_status() -> Value {
        json!({
            "slot": 1,
            "confirmations": 5,
            "status": { "Ok": null },
            "err": null,
            "confirmationStatus": "confirmed",
        })
    }

    #[test]
    fn keypair_signs_a_single_transaction() {
        let payer = Keypair::new();
        let mut tx = unsigned_transfer(&payer);
        payer.sign_transaction(&mut tx).unwrap();
        assert!(tx.is_signed());
        assert!(tx.verify().is_ok());
    }

    #[test]
    fn default_batch_signing_covers_every_transaction() {
        let payer = Keypair::new();
        let mut txs = vec![
            unsigned_transfer(&payer),
            unsigned_transfer(&payer),
            unsigned_transfer(&payer),
        ];
        payer.sign_all_transactions(&mut txs).unwrap();
        assert!(txs.iter().all(Transaction::is_signed));
    }

    #[test]
    fn report_separates_confirmed_from_failed() {
        let finalized = Signature::default();
        let report = BatchReport {
            results: vec![
                TransactionResult::Confirmed(finalized),
                TransactionResult::SendFailed("blockhash not found".to_string()),
                TransactionResult::ConfirmFailed {
                    signature: Signature::default(),
                    error: "timeout".to_string(),
                },
            ],
        };
        assert_eq!(report.len(), 3);
        assert!(!report.is_complete());
        assert_eq!(report.confirmed(), vec![finalized]);
    }

    #[test]
    fn complete_report_confirms_every_transaction() {
        let report = BatchReport {
            results: vec![
                TransactionResult::Confirmed(Signature::default()),
                TransactionResult::Confirmed(Signature::default()),
            ],
        };
        assert!(report.is_complete());
        assert_eq!(report.confirmed().len(), 2);
    }

    #[test]
    fn batch_failure_reports_the_confirmed_count() {
        let error = StakingClientError::BatchFailed {
            report: BatchReport {
                results: vec![
                    TransactionResult::Confirmed(Signature::default()),
                    TransactionResult::SendFailed("node is behind".to_string()),
                    TransactionResult::SendFailed("node is behind".to_string()),
                ],
            },
        };
        assert_eq!(
            error.to_string(),
            "batch failed: 1 of 3 transactions confirmed"
        );
    }

    #[tokio::test]
    async fn partial_batch_reports_confirmed_subset_in_order() {
        let payer = Keypair::new();
        let recent_blockhash = Hash::new_unique();
        let transactions: Vec<Transaction> = (0..3)
            .map(|_| unsigned_transfer_with(&payer, recent_blockhash))
            .collect();
        let signatures: Vec<Signature> = transactions
            .iter()
            .map(|tx| presigned_signature(tx, &payer))
            .collect();

        let rpc = scripted_client(ScriptedSender::new(
            vec![
                Ok(json!(signatures[0].to_string())),
                Err(ClientErrorKind::Custom("node is unhealthy".to_string()).into()),
                Ok(json!(signatures[2].to_string())),
            ],
            vec![
                status_response(finalized_status()),
                status_response(finalized_status()),
            ],
            vec![],
        ));

        let error = submit_batch(&rpc, transactions, &payer).await.unwrap_err();
        match error {
            StakingClientError::BatchFailed { report } => {
                assert_eq!(report.len(), 3);
                assert!(!report.is_complete());
                assert_eq!(report.results[0], TransactionResult::Confirmed(signatures[0]));
                assert!(matches!(report.results[1], TransactionResult::SendFailed(_)));
                assert_eq!(report.results[2], TransactionResult::Confirmed(signatures[2]));
                assert_eq!(report.confirmed(), vec![signatures[0], signatures[2]]);
            }
            other => panic!("expected a batch failure, got {other}"),
        }
    }

    #[tokio::test]
    async fn confirmation_outlasts_interim_commitment() {
        let payer = Keypair::new();
        let transaction = unsigned_transfer_with(&payer, Hash::new_unique());
        let signature = presigned_signature(&transaction, &payer);

        let rpc = scripted_client(ScriptedSender::new(
            vec![Ok(json!(signature.to_string()))],
            vec![
                status_response(confirmed_status()),
                status_response(finalized_status()),
            ],
            vec![],
        ));

        let confirmed = submit_batch(&rpc, vec![transaction], &payer).await.unwrap();
        assert_eq!(confirmed, vec![signature]);
    }

    #[tokio::test]
    async fn unseen_signature_fails_on_blockhash_expiry() {
        let payer = Keypair::new();
        let transaction = unsigned_transfer_with(&payer, Hash::new_unique());
        let signature = presigned_signature(&transaction, &payer);

        let rpc = scripted_client(ScriptedSender::new(
            vec![Ok(json!(signature.to_string()))],
            vec![status_response(json!(null)), status_response(json!(null))],
            vec![false],
        ));

        let error = submit_batch(&rpc, vec![transaction], &payer).await.unwrap_err();
        match error {
            StakingClientError::BatchFailed { report } => {
                assert_eq!(report.len(), 1);
                match &report.results[0] {
                    TransactionResult::ConfirmFailed { signature: failed, error } => {
                        assert_eq!(*failed, signature);
                        assert!(error.contains("expired"), "{error}");
                    }
                    other => panic!("expected a confirmation failure, got {other:?}"),
                }
            }
            other => panic!("expected a batch failure, got {other}"),
        }
    }
}
