//! Transaction building, signing, and submission.
//!
//! # Responsibilities
//! - Wrap a kind-specific body in the common transaction envelope
//! - Sign body bytes with the operator and any added keys
//! - Submit to a node, retrying BUSY and transient failures on other nodes
//! - Poll for the receipt of a submitted transaction
//!
//! # Flow
//! ```text
//! Transaction<D>::execute
//!     → pick node (round robin, failing nodes cool down)
//!     → TransactionBody { id, node, fee, duration, memo, data }
//!     → SignedTransaction { body_bytes, sig_map }
//!     → Transport::submit
//!     → precheck OK  → TransactionResponse
//!     → precheck BUSY / transient error → backoff → next node
//!     → other precheck → LedgerError::Precheck
//! ```

use std::time::Instant;

use prost::Message;

use crate::ledger::client::Client;
use crate::ledger::network::NodeAddress;
use crate::ledger::proto;
use crate::ledger::query::TransactionReceiptQuery;
use crate::ledger::receipt::TransactionReceipt;
use crate::ledger::status::Status;
use crate::ledger::transport::{ApiMethod, Transport};
use crate::ledger::types::{Hbar, LedgerError, LedgerResult, TransactionId};
use crate::ledger::wallet::PrivateKey;
use crate::observability::metrics;
use crate::resilience::with_timeout;

/// How long after its valid start a transaction may still be accepted.
pub const TRANSACTION_VALID_DURATION_SECS: i64 = 120;

/// Longest memo the network accepts, in bytes.
pub const MAX_MEMO_BYTES: usize = 100;

/// Kind-specific part of a transaction.
pub trait TransactionData: Send + Sync {
    /// RPC that accepts this kind.
    const METHOD: ApiMethod;

    /// Local checks run before anything is sent.
    fn validate(&self) -> LedgerResult<()> {
        Ok(())
    }

    /// The body variant for the wire.
    fn to_body_data(&self) -> LedgerResult<proto::transaction_body::Data>;
}

/// A transaction of kind `D`, built with consuming setters.
#[derive(Debug, Clone)]
pub struct Transaction<D> {
    data: D,
    memo: String,
    max_transaction_fee: Option<Hbar>,
    transaction_id: Option<TransactionId>,
    signers: Vec<PrivateKey>,
}

impl<D: TransactionData + Default> Transaction<D> {
    pub fn new() -> Self {
        Self::with_data(D::default())
    }
}

impl<D: TransactionData + Default> Default for Transaction<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: TransactionData> Transaction<D> {
    pub fn with_data(data: D) -> Self {
        Self {
            data,
            memo: String::new(),
            max_transaction_fee: None,
            transaction_id: None,
            signers: Vec::new(),
        }
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    /// Transaction memo (not the entity memo some kinds also carry).
    pub fn transaction_memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = memo.into();
        self
    }

    /// Override the client's default max transaction fee.
    pub fn max_transaction_fee(mut self, fee: Hbar) -> Self {
        self.max_transaction_fee = Some(fee);
        self
    }

    /// Use an explicit transaction id instead of generating one.
    pub fn transaction_id(mut self, id: TransactionId) -> Self {
        self.transaction_id = Some(id);
        self
    }

    /// The id, once frozen or explicitly set.
    pub fn get_transaction_id(&self) -> Option<TransactionId> {
        self.transaction_id
    }

    /// Validate and fix the transaction id against `client`'s operator.
    ///
    /// Signing keys added afterwards sign the same id, which is what lets a
    /// second party co-sign before execution.
    pub fn freeze_with<T: Transport>(mut self, client: &Client<T>) -> LedgerResult<Self> {
        self.validate()?;
        if self.transaction_id.is_none() {
            self.transaction_id = Some(TransactionId::generate(client.operator_account_id()));
        }
        Ok(self)
    }

    /// Add a co-signer. The operator always signs and need not be added.
    pub fn sign(mut self, key: PrivateKey) -> Self {
        if !self
            .signers
            .iter()
            .any(|k| k.public_key() == key.public_key())
        {
            self.signers.push(key);
        }
        self
    }

    fn validate(&self) -> LedgerResult<()> {
        if self.memo.len() > MAX_MEMO_BYTES {
            return Err(LedgerError::InvalidArgument(format!(
                "memo is {} bytes, limit is {}",
                self.memo.len(),
                MAX_MEMO_BYTES
            )));
        }
        self.data.validate()
    }

    /// Submit to the network. Returns once a node accepts the transaction;
    /// use [`TransactionResponse::get_receipt`] to wait for consensus.
    pub async fn execute<T: Transport>(
        &self,
        client: &Client<T>,
    ) -> LedgerResult<TransactionResponse> {
        client.ensure_open()?;
        self.validate()?;

        let transaction_id = self
            .transaction_id
            .unwrap_or_else(|| TransactionId::generate(client.operator_account_id()));
        let data = self.data.to_body_data()?;
        let fee = self
            .max_transaction_fee
            .unwrap_or(client.settings().max_transaction_fee)
            .to_unsigned_tinybars()?;
        let policy = client.settings().retry;
        let method = D::METHOD;

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let node = client
                .selector()
                .next_node()
                .ok_or_else(|| LedgerError::InvalidArgument("no consensus nodes".to_string()))?;

            let body = proto::TransactionBody {
                transaction_id: Some(transaction_id.into()),
                node_account_id: Some(node.address.account_id.into()),
                transaction_fee: fee,
                transaction_valid_duration: Some(proto::Duration {
                    seconds: TRANSACTION_VALID_DURATION_SECS,
                }),
                memo: self.memo.clone(),
                data: Some(data.clone()),
            };
            let signed = sign_body(&body, client.operator_key(), &self.signers)?;

            let result = with_timeout(
                client.settings().request_timeout,
                client.transport().submit(&node.address, method, signed),
            )
            .await
            .and_then(|response| {
                let status = Status::from(response.node_transaction_precheck_code);
                metrics::record_transaction(method.name(), &status.to_string());
                if status == Status::OK {
                    Ok(())
                } else {
                    Err(LedgerError::Precheck {
                        status,
                        transaction_id,
                    })
                }
            });

            match result {
                Ok(()) => {
                    client.selector().mark_success(&node);
                    tracing::debug!(
                        method = method.name(),
                        transaction_id = %transaction_id,
                        node = %node.address.account_id,
                        attempt = attempt,
                        "Transaction accepted"
                    );
                    return Ok(TransactionResponse {
                        transaction_id,
                        node: node.address.clone(),
                    });
                }
                Err(e) if policy.is_retryable(&e) => {
                    client.selector().mark_failure(&node);
                    if !policy.has_attempts_left(attempt) {
                        tracing::error!(
                            method = method.name(),
                            transaction_id = %transaction_id,
                            attempt = attempt,
                            error = %e,
                            "Giving up on transaction"
                        );
                        return Err(LedgerError::AttemptsExhausted(attempt));
                    }
                    let delay = policy.delay_after(attempt);
                    tracing::warn!(
                        method = method.name(),
                        node = %node.address.account_id,
                        attempt = attempt,
                        delay = ?delay,
                        error = %e,
                        "Retrying transaction on another node"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Sign `body` with the operator and every extra key, operator first.
pub(crate) fn sign_body(
    body: &proto::TransactionBody,
    operator: &PrivateKey,
    signers: &[PrivateKey],
) -> LedgerResult<proto::Transaction> {
    let body_bytes = body.encode_to_vec();

    let mut sig_pair = vec![operator.signature_pair(&body_bytes)?];
    let operator_public = operator.public_key();
    for key in signers {
        if key.public_key() != operator_public {
            sig_pair.push(key.signature_pair(&body_bytes)?);
        }
    }

    let signed = proto::SignedTransaction {
        body_bytes,
        sig_map: Some(proto::SignatureMap { sig_pair }),
    };
    Ok(proto::Transaction {
        signed_transaction_bytes: signed.encode_to_vec(),
    })
}

/// A transaction a node accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionResponse {
    pub transaction_id: TransactionId,
    /// Node that accepted it; receipts are requested there first.
    pub node: NodeAddress,
}

impl TransactionResponse {
    /// Wait for the receipt. A final status other than `SUCCESS` is an error.
    pub async fn get_receipt<T: Transport>(
        &self,
        client: &Client<T>,
    ) -> LedgerResult<TransactionReceipt> {
        let start = Instant::now();
        let receipt = TransactionReceiptQuery::new(self.transaction_id)
            .node(self.node.clone())
            .execute(client)
            .await?;
        metrics::record_receipt_wait(start);

        if receipt.status != Status::SUCCESS {
            return Err(LedgerError::ReceiptStatus {
                status: receipt.status,
                transaction_id: self.transaction_id,
            });
        }

        tracing::debug!(
            transaction_id = %self.transaction_id,
            elapsed = ?start.elapsed(),
            "Receipt final"
        );
        Ok(receipt)
    }
}
