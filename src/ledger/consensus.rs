//! Consensus topics: create, submit, and subscribe.
//!
//! # Subscription lifecycle
//! ```text
//! subscribe()
//!     → spawn task
//!     → mirror subscribeTopic stream
//!         → message → callback (resume point advances)
//!         → NOT_FOUND / transient error → backoff → reopen from resume point
//!         → stream end → task ends
//!     → client close or handle abort → task ends
//! ```

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::ledger::account::DEFAULT_AUTO_RENEW_PERIOD_SECS;
use crate::ledger::client::Client;
use crate::ledger::proto;
use crate::ledger::transaction::{Transaction, TransactionData};
use crate::ledger::transport::{ApiMethod, Transport};
use crate::ledger::types::{AccountId, LedgerError, LedgerResult, TopicId};
use crate::ledger::wallet::PublicKey;
use crate::observability::metrics;
use crate::resilience::RetryPolicy;

/// Largest message that fits one submit transaction.
pub const MAX_MESSAGE_BYTES: usize = 1024;

#[derive(Debug, Clone, Default)]
pub struct TopicCreateData {
    topic_memo: String,
    admin_key: Option<PublicKey>,
    submit_key: Option<PublicKey>,
    auto_renew_account: Option<AccountId>,
}

impl TransactionData for TopicCreateData {
    const METHOD: ApiMethod = ApiMethod::CreateTopic;

    fn to_body_data(&self) -> LedgerResult<proto::transaction_body::Data> {
        Ok(proto::transaction_body::Data::ConsensusCreateTopic(
            proto::ConsensusCreateTopicTransactionBody {
                memo: self.topic_memo.clone(),
                admin_key: self.admin_key.as_ref().map(proto::Key::from),
                submit_key: self.submit_key.as_ref().map(proto::Key::from),
                auto_renew_period: Some(proto::Duration {
                    seconds: DEFAULT_AUTO_RENEW_PERIOD_SECS,
                }),
                auto_renew_account: self.auto_renew_account.map(Into::into),
            },
        ))
    }
}

/// Creates a consensus topic.
pub type TopicCreateTransaction = Transaction<TopicCreateData>;

impl Transaction<TopicCreateData> {
    pub fn topic_memo(mut self, memo: impl Into<String>) -> Self {
        self.data_mut().topic_memo = memo.into();
        self
    }

    pub fn admin_key(mut self, key: PublicKey) -> Self {
        self.data_mut().admin_key = Some(key);
        self
    }

    /// When set, only messages signed by this key are accepted.
    pub fn submit_key(mut self, key: PublicKey) -> Self {
        self.data_mut().submit_key = Some(key);
        self
    }

    pub fn auto_renew_account_id(mut self, account: AccountId) -> Self {
        self.data_mut().auto_renew_account = Some(account);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct TopicMessageSubmitData {
    topic_id: Option<TopicId>,
    message: Vec<u8>,
}

impl TransactionData for TopicMessageSubmitData {
    const METHOD: ApiMethod = ApiMethod::SubmitMessage;

    fn validate(&self) -> LedgerResult<()> {
        if self.topic_id.is_none() {
            return Err(LedgerError::InvalidArgument(
                "message submit requires a topic id".to_string(),
            ));
        }
        if self.message.is_empty() {
            return Err(LedgerError::InvalidArgument("message is empty".to_string()));
        }
        if self.message.len() > MAX_MESSAGE_BYTES {
            return Err(LedgerError::InvalidArgument(format!(
                "message is {} bytes, limit is {}",
                self.message.len(),
                MAX_MESSAGE_BYTES
            )));
        }
        Ok(())
    }

    fn to_body_data(&self) -> LedgerResult<proto::transaction_body::Data> {
        Ok(proto::transaction_body::Data::ConsensusSubmitMessage(
            proto::ConsensusSubmitMessageTransactionBody {
                topic_id: self.topic_id.map(Into::into),
                message: self.message.clone(),
            },
        ))
    }
}

/// Submits one message to a topic.
pub type TopicMessageSubmitTransaction = Transaction<TopicMessageSubmitData>;

impl Transaction<TopicMessageSubmitData> {
    pub fn topic_id(mut self, id: TopicId) -> Self {
        self.data_mut().topic_id = Some(id);
        self
    }

    pub fn message(mut self, message: impl Into<Vec<u8>>) -> Self {
        self.data_mut().message = message.into();
        self
    }
}

/// A message delivered by the mirror node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicMessage {
    pub consensus_timestamp: DateTime<Utc>,
    pub contents: Vec<u8>,
    pub sequence_number: u64,
    pub running_hash: Vec<u8>,
}

impl TryFrom<proto::ConsensusTopicResponse> for TopicMessage {
    type Error = LedgerError;

    fn try_from(response: proto::ConsensusTopicResponse) -> LedgerResult<Self> {
        let ts = response
            .consensus_timestamp
            .ok_or(LedgerError::MissingField("consensus_timestamp"))?;
        let consensus_timestamp = DateTime::from_timestamp(ts.seconds, ts.nanos.max(0) as u32)
            .ok_or_else(|| LedgerError::Decode(format!("timestamp {}.{}", ts.seconds, ts.nanos)))?;
        Ok(Self {
            consensus_timestamp,
            contents: response.message,
            sequence_number: response.sequence_number,
            running_hash: response.running_hash,
        })
    }
}

/// Mirror node subscription to a topic.
#[derive(Debug, Clone, Default)]
pub struct TopicMessageQuery {
    topic_id: Option<TopicId>,
    start_time: Option<DateTime<Utc>>,
    limit: u64,
}

impl TopicMessageQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn topic_id(mut self, id: TopicId) -> Self {
        self.topic_id = Some(id);
        self
    }

    /// Only deliver messages at or after this consensus time.
    pub fn start_time(mut self, start: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self
    }

    /// Stop after this many messages; 0 means unbounded.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Start a background subscription that calls `on_message` for every
    /// message. The task stops when the stream ends, the client closes, or
    /// the handle is aborted.
    pub fn subscribe<T, F>(&self, client: &Client<T>, on_message: F) -> LedgerResult<SubscriptionHandle>
    where
        T: Transport,
        F: FnMut(TopicMessage) + Send + 'static,
    {
        client.ensure_open()?;
        let topic_id = self.topic_id.ok_or_else(|| {
            LedgerError::InvalidArgument("subscription requires a topic id".to_string())
        })?;

        let shutdown = client.subscribe_shutdown();
        let task = SubscriptionTask {
            client: client.clone(),
            topic_id,
            resume_from: self.start_time.map(to_proto_timestamp),
            remaining: self.limit,
            policy: client.settings().retry,
        };

        tracing::info!(topic_id = %topic_id, "Subscribing to topic");
        let handle = tokio::spawn(task.run(shutdown, on_message));
        Ok(SubscriptionHandle { handle })
    }
}

/// Handle to a running subscription.
#[derive(Debug)]
pub struct SubscriptionHandle {
    handle: JoinHandle<()>,
}

impl SubscriptionHandle {
    pub fn abort(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the task to end.
    pub async fn join(self) {
        let _ = self.handle.await;
    }
}

struct SubscriptionTask<T: Transport> {
    client: Client<T>,
    topic_id: TopicId,
    resume_from: Option<proto::Timestamp>,
    remaining: u64,
    policy: RetryPolicy,
}

enum StreamEnd {
    Finished,
    Retry(LedgerError),
}

impl<T: Transport> SubscriptionTask<T> {
    async fn run<F>(mut self, mut shutdown: broadcast::Receiver<()>, mut on_message: F)
    where
        F: FnMut(TopicMessage) + Send + 'static,
    {
        if self.client.is_closed() {
            return;
        }

        let mut attempt = 0u32;
        loop {
            let opened = tokio::select! {
                _ = shutdown.recv() => break,
                opened = self.client.transport().subscribe_topic(self.query()) => opened,
            };

            let end = match opened {
                Ok(stream) => {
                    attempt = 0;
                    match self.drain(stream, &mut shutdown, &mut on_message).await {
                        Some(end) => end,
                        None => break,
                    }
                }
                Err(e) => StreamEnd::Retry(e),
            };

            let error = match end {
                StreamEnd::Finished => break,
                StreamEnd::Retry(e) => e,
            };
            attempt += 1;
            if !is_retryable_subscription_error(&error) || !self.policy.has_attempts_left(attempt) {
                tracing::error!(topic_id = %self.topic_id, attempt = attempt, error = %error, "Subscription failed");
                break;
            }

            let delay = self.policy.delay_after(attempt);
            tracing::warn!(
                topic_id = %self.topic_id,
                attempt = attempt,
                delay = ?delay,
                error = %error,
                "Subscription interrupted, reconnecting"
            );
            tokio::select! {
                _ = shutdown.recv() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        tracing::debug!(topic_id = %self.topic_id, "Subscription ended");
    }

    /// Forward messages until the stream ends or fails. `None` means shutdown.
    async fn drain<F>(
        &mut self,
        mut stream: crate::ledger::transport::TopicStream,
        shutdown: &mut broadcast::Receiver<()>,
        on_message: &mut F,
    ) -> Option<StreamEnd>
    where
        F: FnMut(TopicMessage),
    {
        loop {
            let item = tokio::select! {
                _ = shutdown.recv() => return None,
                item = stream.next() => item,
            };

            match item {
                Some(Ok(response)) => {
                    let next_start = response.consensus_timestamp.map(just_after);
                    match TopicMessage::try_from(response) {
                        Ok(message) => {
                            metrics::record_topic_message();
                            tracing::debug!(
                                topic_id = %self.topic_id,
                                sequence_number = message.sequence_number,
                                "Topic message received"
                            );
                            on_message(message);
                        }
                        Err(e) => {
                            tracing::warn!(topic_id = %self.topic_id, error = %e, "Skipping undecodable message")
                        }
                    }
                    if next_start.is_some() {
                        self.resume_from = next_start;
                    }
                    if self.remaining > 0 {
                        self.remaining -= 1;
                        if self.remaining == 0 {
                            return Some(StreamEnd::Finished);
                        }
                    }
                }
                Some(Err(e)) => return Some(StreamEnd::Retry(e)),
                None => return Some(StreamEnd::Finished),
            }
        }
    }

    fn query(&self) -> proto::ConsensusTopicQuery {
        proto::ConsensusTopicQuery {
            topic_id: Some(self.topic_id.into()),
            consensus_start_time: self.resume_from,
            consensus_end_time: None,
            limit: self.remaining,
        }
    }
}

/// A topic that has not reached the mirror node yet reports NOT_FOUND.
fn is_retryable_subscription_error(error: &LedgerError) -> bool {
    match error {
        LedgerError::Grpc { code, .. } if *code == tonic::Code::NotFound => true,
        other => other.is_transient(),
    }
}

/// One nanosecond later, so a reconnect does not replay the last message.
fn just_after(ts: proto::Timestamp) -> proto::Timestamp {
    if ts.nanos >= 999_999_999 {
        proto::Timestamp {
            seconds: ts.seconds + 1,
            nanos: 0,
        }
    } else {
        proto::Timestamp {
            seconds: ts.seconds,
            nanos: ts.nanos + 1,
        }
    }
}

fn to_proto_timestamp(time: DateTime<Utc>) -> proto::Timestamp {
    proto::Timestamp {
        seconds: time.timestamp(),
        nanos: time.timestamp_subsec_nanos() as i32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_size_limit() {
        let topic = TopicId::new(0, 0, 42);
        let ok = TopicMessageSubmitTransaction::new()
            .topic_id(topic)
            .message(vec![b'a'; MAX_MESSAGE_BYTES]);
        assert!(ok.data().validate().is_ok());

        let too_big = TopicMessageSubmitTransaction::new()
            .topic_id(topic)
            .message(vec![b'a'; MAX_MESSAGE_BYTES + 1]);
        assert!(too_big.data().validate().is_err());

        let empty = TopicMessageSubmitTransaction::new().topic_id(topic);
        assert!(empty.data().validate().is_err());
    }

    #[test]
    fn test_topic_message_from_wire() {
        let message = TopicMessage::try_from(proto::ConsensusTopicResponse {
            consensus_timestamp: Some(proto::Timestamp {
                seconds: 1_700_000_000,
                nanos: 5,
            }),
            message: b"Hello, HCS!".to_vec(),
            running_hash: vec![1; 48],
            sequence_number: 1,
            running_hash_version: 3,
        })
        .unwrap();
        assert_eq!(message.consensus_timestamp.timestamp(), 1_700_000_000);
        assert_eq!(message.consensus_timestamp.timestamp_subsec_nanos(), 5);
        assert_eq!(message.contents, b"Hello, HCS!");
    }

    #[test]
    fn test_resume_point_rolls_over() {
        let next = just_after(proto::Timestamp {
            seconds: 10,
            nanos: 999_999_999,
        });
        assert_eq!((next.seconds, next.nanos), (11, 0));
    }

    #[test]
    fn test_not_found_is_retried() {
        let not_found = LedgerError::Grpc {
            code: tonic::Code::NotFound,
            message: "topic not found".into(),
        };
        assert!(is_retryable_subscription_error(&not_found));

        let denied = LedgerError::Grpc {
            code: tonic::Code::PermissionDenied,
            message: String::new(),
        };
        assert!(!is_retryable_subscription_error(&denied));
    }
}
