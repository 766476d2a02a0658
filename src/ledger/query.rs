//! Queries: free receipt polling and paid queries.
//!
//! # Paid query flow
//! ```text
//! node ← next from selector
//!     → COST_ANSWER with a zero-amount payment   → cost
//!     → cost > max query payment?                → QueryCostExceeded
//!     → ANSWER_ONLY with a payment of `cost`     → response
//! BUSY or transient failure at either step → backoff → next node
//! ```

use std::time::Instant;

use crate::ledger::client::Client;
use crate::ledger::network::NodeAddress;
use crate::ledger::proto;
use crate::ledger::receipt::TransactionReceipt;
use crate::ledger::status::Status;
use crate::ledger::transaction::{sign_body, TRANSACTION_VALID_DURATION_SECS};
use crate::ledger::transport::{ApiMethod, Transport};
use crate::ledger::types::{Hbar, LedgerError, LedgerResult, TransactionId};
use crate::observability::metrics;
use crate::resilience::with_timeout;

/// Receipt lookup. Free; polls until the status is final.
#[derive(Debug, Clone)]
pub struct TransactionReceiptQuery {
    transaction_id: TransactionId,
    node: Option<NodeAddress>,
}

impl TransactionReceiptQuery {
    pub fn new(transaction_id: TransactionId) -> Self {
        Self {
            transaction_id,
            node: None,
        }
    }

    /// Ask this node first (normally the one that accepted the transaction).
    pub fn node(mut self, node: NodeAddress) -> Self {
        self.node = Some(node);
        self
    }

    fn to_query(&self) -> proto::Query {
        proto::Query {
            query: Some(proto::query::Query::TransactionGetReceipt(
                proto::TransactionGetReceiptQuery {
                    header: Some(proto::QueryHeader {
                        payment: None,
                        response_type: proto::ResponseType::AnswerOnly.into(),
                    }),
                    transaction_id: Some(self.transaction_id.into()),
                },
            )),
        }
    }

    /// Poll until the receipt leaves the pending states or the client's
    /// receipt timeout passes. The returned status may be any final code.
    pub async fn execute<T: Transport>(&self, client: &Client<T>) -> LedgerResult<TransactionReceipt> {
        client.ensure_open()?;
        let settings = client.settings();
        let deadline = Instant::now() + settings.receipt_timeout;
        let query = self.to_query();

        let mut node = match &self.node {
            Some(address) => client.selector().node_for(address),
            None => None,
        };
        let mut polls = 0u32;

        loop {
            polls += 1;
            let current = match node.clone().or_else(|| client.selector().next_node()) {
                Some(n) => n,
                None => return Err(LedgerError::InvalidArgument("no consensus nodes".to_string())),
            };

            let outcome = with_timeout(
                settings.request_timeout,
                client
                    .transport()
                    .query(&current.address, ApiMethod::GetReceipt, query.clone()),
            )
            .await;

            match outcome {
                Ok(response) => {
                    let answer = match response.response {
                        Some(proto::response::Response::TransactionGetReceipt(answer)) => answer,
                        _ => return Err(LedgerError::MissingField("transaction_get_receipt")),
                    };
                    let precheck = answer
                        .header
                        .as_ref()
                        .map(|h| Status::from(h.node_transaction_precheck_code))
                        .unwrap_or(Status::OK);

                    if precheck == Status::OK {
                        let receipt = answer
                            .receipt
                            .ok_or(LedgerError::MissingField("receipt"))?;
                        let receipt = TransactionReceipt::try_from(receipt)?;
                        if !receipt.status.is_receipt_pending() {
                            return Ok(receipt);
                        }
                    } else if !precheck.is_receipt_pending() {
                        return Err(LedgerError::Precheck {
                            status: precheck,
                            transaction_id: self.transaction_id,
                        });
                    }
                }
                Err(e) if e.is_transient() => {
                    client.selector().mark_failure(&current);
                    tracing::warn!(
                        transaction_id = %self.transaction_id,
                        node = %current.address.account_id,
                        error = %e,
                        "Receipt query failed, trying next node"
                    );
                    node = None;
                }
                Err(e) => return Err(e),
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(LedgerError::ReceiptTimeout(
                    self.transaction_id,
                    settings.receipt_timeout,
                ));
            }
            tracing::trace!(transaction_id = %self.transaction_id, polls = polls, "Receipt pending");
            tokio::time::sleep(settings.receipt_poll_interval.min(deadline - now)).await;
        }
    }
}

/// Crypto transfer paying `amount` from the operator to `node`.
fn payment_transaction<T: Transport>(
    client: &Client<T>,
    node: &NodeAddress,
    amount: Hbar,
) -> LedgerResult<proto::Transaction> {
    let operator = client.operator_account_id();
    let tinybars = amount.to_tinybars();
    let body = proto::TransactionBody {
        transaction_id: Some(TransactionId::generate(operator).into()),
        node_account_id: Some(node.account_id.into()),
        transaction_fee: client.settings().max_transaction_fee.to_unsigned_tinybars()?,
        transaction_valid_duration: Some(proto::Duration {
            seconds: TRANSACTION_VALID_DURATION_SECS,
        }),
        memo: String::new(),
        data: Some(proto::transaction_body::Data::CryptoTransfer(
            proto::CryptoTransferTransactionBody {
                transfers: Some(proto::TransferList {
                    account_amounts: vec![
                        proto::AccountAmount {
                            account_id: Some(operator.into()),
                            amount: -tinybars,
                        },
                        proto::AccountAmount {
                            account_id: Some(node.account_id.into()),
                            amount: tinybars,
                        },
                    ],
                }),
            },
        )),
    };
    sign_body(&body, client.operator_key(), &[])
}

fn precheck_of(response: &proto::Response) -> LedgerResult<(Status, u64)> {
    let header = response
        .header()
        .ok_or(LedgerError::MissingField("response header"))?;
    Ok((Status::from(header.node_transaction_precheck_code), header.cost))
}

/// Run a paid query. `build` wraps a header in the kind-specific query.
pub(crate) async fn execute_paid<T, F>(
    client: &Client<T>,
    method: ApiMethod,
    build: F,
) -> LedgerResult<proto::Response>
where
    T: Transport,
    F: Fn(proto::QueryHeader) -> proto::Query,
{
    client.ensure_open()?;
    let settings = client.settings();
    let policy = settings.retry;
    let timeout = settings.request_timeout;

    let mut attempt = 0u32;
    loop {
        attempt += 1;
        let node = client
            .selector()
            .next_node()
            .ok_or_else(|| LedgerError::InvalidArgument("no consensus nodes".to_string()))?;

        let result: LedgerResult<proto::Response> = async {
            let cost_query = build(proto::QueryHeader {
                payment: Some(payment_transaction(client, &node.address, Hbar::ZERO)?),
                response_type: proto::ResponseType::CostAnswer.into(),
            });
            let cost_response = with_timeout(
                timeout,
                client.transport().query(&node.address, method, cost_query),
            )
            .await?;
            let (status, cost) = precheck_of(&cost_response)?;
            check_precheck(status)?;

            metrics::record_query_cost(method.name(), cost);
            let cost = Hbar::from_tinybars(i64::try_from(cost).unwrap_or(i64::MAX));
            if cost > settings.max_query_payment {
                return Err(LedgerError::QueryCostExceeded {
                    cost,
                    max: settings.max_query_payment,
                });
            }

            let query = build(proto::QueryHeader {
                payment: Some(payment_transaction(client, &node.address, cost)?),
                response_type: proto::ResponseType::AnswerOnly.into(),
            });
            let response =
                with_timeout(timeout, client.transport().query(&node.address, method, query))
                    .await?;
            let (status, _) = precheck_of(&response)?;
            check_precheck(status)?;
            Ok(response)
        }
        .await;

        match result {
            Ok(response) => {
                client.selector().mark_success(&node);
                return Ok(response);
            }
            Err(e) if is_retryable_query_error(&e) => {
                client.selector().mark_failure(&node);
                if !policy.has_attempts_left(attempt) {
                    return Err(LedgerError::AttemptsExhausted(attempt));
                }
                let delay = policy.delay_after(attempt);
                tracing::warn!(
                    method = method.name(),
                    node = %node.address.account_id,
                    attempt = attempt,
                    delay = ?delay,
                    error = %e,
                    "Retrying query on another node"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}

fn check_precheck(status: Status) -> LedgerResult<()> {
    if status == Status::OK {
        Ok(())
    } else {
        Err(LedgerError::QueryPrecheck(status))
    }
}

fn is_retryable_query_error(error: &LedgerError) -> bool {
    match error {
        LedgerError::QueryPrecheck(status) => status.is_retryable_precheck(),
        other => other.is_transient(),
    }
}
