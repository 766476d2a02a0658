//! In-process ledger network shared by the integration tests.
//!
//! `MockNetwork` implements `Transport`: it decodes every submitted
//! transaction, checks its signatures, assigns entity ids, keeps receipts,
//! answers contract calls for the lookup contract, and serves topic streams.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use alloy::primitives::{hex, keccak256, Signature, U256};
use alloy::sol;
use alloy::sol_types::{SolInterface, SolValue};
use futures_util::stream::{self, StreamExt};
use prost::Message;
use tokio::sync::broadcast;

use hedera_starter::config::StarterConfig;
use hedera_starter::explorer::Explorer;
use hedera_starter::ledger::proto;
use hedera_starter::ledger::{
    AccountId, ApiMethod, Client, ClientSettings, LedgerResult, NetworkName, NodeAddress,
    Operator, PrivateKey, Status, TopicStream, TransactionId, Transport,
};
use hedera_starter::resilience::RetryPolicy;
use hedera_starter::scenarios::ScenarioContext;

pub const OPERATOR_ACCOUNT: AccountId = AccountId::new(0, 0, 2);

/// Fixed cost the mock charges for a local contract call, in tinybars.
pub const CALL_COST_TINYBARS: u64 = 1_000;

sol! {
    interface LookupContract {
        function getMobileNumber(string name) external view returns (uint256);
        function setMobileNumber(string name, uint256 mobileNumber) external;
    }
}

/// One transaction as the mock saw it.
#[derive(Clone)]
pub struct Submission {
    pub node: AccountId,
    pub method: ApiMethod,
    pub transaction_id: TransactionId,
    pub body: proto::TransactionBody,
    /// Compressed keys of every valid signature, in signature-map order.
    pub signers: Vec<Vec<u8>>,
    pub precheck: Status,
}

struct StoredReceipt {
    receipt: proto::TransactionReceipt,
    pending_polls: u32,
}

struct Token {
    supply_key: Option<Vec<u8>>,
    max_supply: i64,
    minted: i64,
}

struct Topic {
    history: Vec<proto::ConsensusTopicResponse>,
    feed: broadcast::Sender<proto::ConsensusTopicResponse>,
    running_hash: Vec<u8>,
}

#[derive(Default)]
struct State {
    next_entity: u64,
    keys: HashMap<AccountId, Vec<u8>>,
    receipts: HashMap<TransactionId, StoredReceipt>,
    submissions: Vec<Submission>,
    files: HashMap<i64, Vec<u8>>,
    contracts: HashMap<i64, HashMap<String, U256>>,
    tokens: HashMap<i64, Token>,
    topics: HashMap<i64, Topic>,
    injected_prechecks: HashMap<AccountId, (Status, u32)>,
    injected_receipt: Option<Status>,
    unreachable_nodes: HashSet<AccountId>,
    receipt_pending_polls: u32,
    queries: Vec<(AccountId, ApiMethod)>,
}

/// Shared handle to the in-process network.
#[derive(Clone)]
pub struct MockNetwork {
    state: Arc<Mutex<State>>,
}

impl MockNetwork {
    /// A network whose operator account `0.0.2` is owned by `operator`.
    pub fn new(operator: &PrivateKey) -> Self {
        let mut state = State {
            next_entity: 1001,
            receipt_pending_polls: 1,
            ..State::default()
        };
        state
            .keys
            .insert(OPERATOR_ACCOUNT, operator.public_key().to_bytes());
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn nodes() -> Vec<NodeAddress> {
        vec![
            NodeAddress::new(3, "mock-node-3:50211"),
            NodeAddress::new(4, "mock-node-4:50211"),
            NodeAddress::new(5, "mock-node-5:50211"),
        ]
    }

    /// The next `times` submissions to `node` get `status` at precheck.
    pub fn inject_precheck(&self, node: u64, status: Status, times: u32) {
        self.lock()
            .injected_prechecks
            .insert(AccountId::new(0, 0, node), (status, times));
    }

    /// The next accepted transaction reaches consensus with `status`.
    pub fn fail_next_receipt(&self, status: Status) {
        self.lock().injected_receipt = Some(status);
    }

    /// Calls to `node` fail with a transport error.
    pub fn make_unreachable(&self, node: u64) {
        self.lock()
            .unreachable_nodes
            .insert(AccountId::new(0, 0, node));
    }

    pub fn submissions(&self) -> Vec<Submission> {
        self.lock().submissions.clone()
    }

    pub fn queries(&self) -> Vec<(AccountId, ApiMethod)> {
        self.lock().queries.clone()
    }

    pub fn account_key(&self, account: AccountId) -> Option<Vec<u8>> {
        self.lock().keys.get(&account).cloned()
    }

    pub fn file_count(&self) -> usize {
        self.lock().files.len()
    }

    pub fn topic_messages(&self, topic_num: i64) -> usize {
        self.lock()
            .topics
            .get(&topic_num)
            .map_or(0, |t| t.history.len())
    }

    fn handle_submit(
        &self,
        node: &NodeAddress,
        method: ApiMethod,
        transaction: proto::Transaction,
    ) -> LedgerResult<proto::TransactionResponse> {
        let mut state = self.lock();
        if state.unreachable_nodes.contains(&node.account_id) {
            return Err(hedera_starter::LedgerError::Transport(format!(
                "{} unreachable",
                node.endpoint
            )));
        }

        let signed = proto::SignedTransaction::decode(transaction.signed_transaction_bytes.as_slice())
            .expect("signed transaction decodes");
        let body = proto::TransactionBody::decode(signed.body_bytes.as_slice())
            .expect("transaction body decodes");
        let transaction_id = TransactionId::try_from(
            body.transaction_id.clone().expect("transaction id present"),
        )
        .expect("transaction id valid");

        let mut signers = Vec::new();
        let mut all_valid = true;
        for pair in signed.sig_map.map(|m| m.sig_pair).unwrap_or_default() {
            if verify(&signed.body_bytes, &pair) {
                signers.push(pair.pub_key_prefix);
            } else {
                all_valid = false;
            }
        }

        let payer_key = state.keys.get(&transaction_id.account_id).cloned();
        let precheck = if let Some((status, remaining)) =
            state.injected_prechecks.get_mut(&node.account_id).filter(|(_, n)| *n > 0)
        {
            *remaining -= 1;
            *status
        } else if body.node_account_id.clone().map(AccountId::try_from).transpose().ok().flatten()
            != Some(node.account_id)
        {
            Status::INVALID_NODE_ACCOUNT
        } else if !all_valid || payer_key.map_or(true, |k| !signers.contains(&k)) {
            Status::INVALID_SIGNATURE
        } else if state.receipts.contains_key(&transaction_id) {
            Status::DUPLICATE_TRANSACTION
        } else {
            Status::OK
        };

        state.submissions.push(Submission {
            node: node.account_id,
            method,
            transaction_id,
            body: body.clone(),
            signers: signers.clone(),
            precheck,
        });

        if precheck == Status::OK {
            let mut receipt = match state.injected_receipt.take() {
                Some(status) => proto::TransactionReceipt {
                    status: status.0,
                    ..Default::default()
                },
                None => state.apply(body, &signers),
            };
            if receipt.status == 0 {
                receipt.status = Status::SUCCESS.0;
            }
            let pending_polls = state.receipt_pending_polls;
            state.receipts.insert(
                transaction_id,
                StoredReceipt {
                    receipt,
                    pending_polls,
                },
            );
        }

        Ok(proto::TransactionResponse {
            node_transaction_precheck_code: precheck.0,
            cost: 0,
        })
    }

    fn handle_query(
        &self,
        node: &NodeAddress,
        method: ApiMethod,
        query: proto::Query,
    ) -> LedgerResult<proto::Response> {
        let mut state = self.lock();
        if state.unreachable_nodes.contains(&node.account_id) {
            return Err(hedera_starter::LedgerError::Transport(format!(
                "{} unreachable",
                node.endpoint
            )));
        }
        state.queries.push((node.account_id, method));

        match query.query.expect("query kind present") {
            proto::query::Query::TransactionGetReceipt(q) => {
                let id = TransactionId::try_from(q.transaction_id.expect("transaction id present"))
                    .expect("transaction id valid");
                let (precheck, receipt) = match state.receipts.get_mut(&id) {
                    None => (Status::RECEIPT_NOT_FOUND, None),
                    Some(stored) if stored.pending_polls > 0 => {
                        stored.pending_polls -= 1;
                        (
                            Status::OK,
                            Some(proto::TransactionReceipt {
                                status: Status::UNKNOWN.0,
                                ..Default::default()
                            }),
                        )
                    }
                    Some(stored) => (Status::OK, Some(stored.receipt.clone())),
                };
                Ok(proto::Response {
                    response: Some(proto::response::Response::TransactionGetReceipt(
                        proto::TransactionGetReceiptResponse {
                            header: Some(header(precheck, 0)),
                            receipt,
                        },
                    )),
                })
            }
            proto::query::Query::ContractCallLocal(q) => {
                let query_header = q.header.clone().expect("query header present");
                let payment_ok = query_header
                    .payment
                    .as_ref()
                    .map_or(false, |p| state.payment_is_signed(p));
                let answer = if let Some((status, remaining)) = state
                    .injected_prechecks
                    .get_mut(&node.account_id)
                    .filter(|(_, n)| *n > 0)
                {
                    *remaining -= 1;
                    proto::ContractCallLocalResponse {
                        header: Some(header(*status, 0)),
                        function_result: None,
                    }
                } else if !payment_ok {
                    proto::ContractCallLocalResponse {
                        header: Some(header(Status::INVALID_SIGNATURE, 0)),
                        function_result: None,
                    }
                } else if query_header.response_type == proto::ResponseType::CostAnswer as i32 {
                    proto::ContractCallLocalResponse {
                        header: Some(header(Status::OK, CALL_COST_TINYBARS)),
                        function_result: None,
                    }
                } else {
                    let contract_num = contract_num(q.contract_id.clone());
                    let result = match state.contracts.get(&contract_num) {
                        None => proto::ContractFunctionResult {
                            contract_id: q.contract_id.clone(),
                            error_message: "INVALID_CONTRACT_ID".to_string(),
                            ..Default::default()
                        },
                        Some(entries) => call_lookup(entries, &q.function_parameters, q.contract_id.clone()),
                    };
                    proto::ContractCallLocalResponse {
                        header: Some(header(Status::OK, 0)),
                        function_result: Some(result),
                    }
                };
                Ok(proto::Response {
                    response: Some(proto::response::Response::ContractCallLocal(answer)),
                })
            }
        }
    }

    fn handle_subscribe(&self, query: proto::ConsensusTopicQuery) -> LedgerResult<TopicStream> {
        let state = self.lock();
        let topic_num = query.topic_id.map_or(0, |t| t.topic_num);
        let Some(topic) = state.topics.get(&topic_num) else {
            return Err(tonic::Status::not_found("topic not known to mirror").into());
        };

        let start = query.consensus_start_time.map_or((0, 0), |t| (t.seconds, t.nanos));
        let after_start = move |m: &proto::ConsensusTopicResponse| {
            m.consensus_timestamp
                .as_ref()
                .map_or(true, |t| (t.seconds, t.nanos) >= start)
        };
        let history: Vec<LedgerResult<proto::ConsensusTopicResponse>> = topic
            .history
            .iter()
            .filter(|m| after_start(m))
            .cloned()
            .map(Ok)
            .collect();
        let live = topic.feed.subscribe();

        let live = stream::unfold(live, |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(message) => return Some((Ok(message), rx)),
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(broadcast::error::RecvError::Closed) => return None,
                }
            }
        });
        Ok(stream::iter(history).chain(live).boxed())
    }
}

impl State {
    fn allocate(&mut self) -> i64 {
        let num = self.next_entity;
        self.next_entity += 1;
        num as i64
    }

    fn payment_is_signed(&self, payment: &proto::Transaction) -> bool {
        let Ok(signed) = proto::SignedTransaction::decode(payment.signed_transaction_bytes.as_slice())
        else {
            return false;
        };
        let Some(operator_key) = self.keys.get(&OPERATOR_ACCOUNT) else {
            return false;
        };
        signed
            .sig_map
            .map(|m| m.sig_pair)
            .unwrap_or_default()
            .iter()
            .any(|pair| &pair.pub_key_prefix == operator_key && verify(&signed.body_bytes, pair))
    }

    fn has_signed(&self, signers: &[Vec<u8>], account: Option<proto::AccountId>) -> bool {
        account
            .and_then(|a| AccountId::try_from(a).ok())
            .and_then(|a| self.keys.get(&a))
            .map_or(false, |key| signers.contains(key))
    }

    /// Execute an accepted transaction and build its receipt.
    fn apply(&mut self, body: proto::TransactionBody, signers: &[Vec<u8>]) -> proto::TransactionReceipt {
        use proto::transaction_body::Data;

        let mut receipt = proto::TransactionReceipt::default();
        match body.data.expect("transaction data present") {
            Data::CryptoCreateAccount(create) => {
                let num = self.allocate();
                let account = AccountId::new(0, 0, num as u64);
                if let Some(key) = ecdsa_key(create.key) {
                    self.keys.insert(account, key);
                }
                receipt.account_id = Some(account.into());
            }
            Data::ConsensusCreateTopic(_) => {
                let num = self.allocate();
                let (feed, _) = broadcast::channel(64);
                self.topics.insert(
                    num,
                    Topic {
                        history: Vec::new(),
                        feed,
                        running_hash: vec![0; 48],
                    },
                );
                receipt.topic_id = Some(proto::TopicId {
                    shard_num: 0,
                    realm_num: 0,
                    topic_num: num,
                });
            }
            Data::ConsensusSubmitMessage(submit) => {
                let num = submit.topic_id.map_or(0, |t| t.topic_num);
                let Some(topic) = self.topics.get_mut(&num) else {
                    receipt.status = Status::INVALID_TOPIC_ID.0;
                    return receipt;
                };
                let sequence_number = topic.history.len() as u64 + 1;
                let mut hashed = topic.running_hash.clone();
                hashed.extend_from_slice(&submit.message);
                topic.running_hash = keccak256(&hashed).to_vec();

                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .unwrap_or_default();
                let message = proto::ConsensusTopicResponse {
                    consensus_timestamp: Some(proto::Timestamp {
                        seconds: now.as_secs() as i64,
                        nanos: now.subsec_nanos() as i32,
                    }),
                    message: submit.message,
                    running_hash: topic.running_hash.clone(),
                    sequence_number,
                    running_hash_version: 3,
                };
                topic.history.push(message.clone());
                let _ = topic.feed.send(message);

                receipt.topic_sequence_number = sequence_number;
                receipt.topic_running_hash = topic.running_hash.clone();
            }
            Data::TokenCreation(create) => {
                if !self.has_signed(signers, create.treasury.clone()) {
                    receipt.status = Status::INVALID_SIGNATURE.0;
                    return receipt;
                }
                let num = self.allocate();
                self.tokens.insert(
                    num,
                    Token {
                        supply_key: ecdsa_key(create.supply_key),
                        max_supply: create.max_supply,
                        minted: 0,
                    },
                );
                receipt.token_id = Some(proto::TokenId {
                    shard_num: 0,
                    realm_num: 0,
                    token_num: num,
                });
            }
            Data::TokenMint(mint) => {
                let num = mint.token.map_or(0, |t| t.token_num);
                let Some(token) = self.tokens.get_mut(&num) else {
                    receipt.status = Status::INVALID_TOKEN_ID.0;
                    return receipt;
                };
                if token.supply_key.as_ref().map_or(true, |k| !signers.contains(k)) {
                    receipt.status = Status::INVALID_SIGNATURE.0;
                    return receipt;
                }
                let count = mint.metadata.len() as i64;
                if token.max_supply > 0 && token.minted + count > token.max_supply {
                    receipt.status = Status::FAIL_INVALID.0;
                    return receipt;
                }
                receipt.serial_numbers = (token.minted + 1..=token.minted + count).collect();
                token.minted += count;
                receipt.new_total_supply = token.minted as u64;
            }
            Data::FileCreate(create) => {
                let num = self.allocate();
                self.files.insert(num, create.contents);
                receipt.file_id = Some(proto::FileId {
                    shard_num: 0,
                    realm_num: 0,
                    file_num: num,
                });
            }
            Data::FileAppend(append) => {
                let num = append.file_id.map_or(0, |f| f.file_num);
                match self.files.get_mut(&num) {
                    Some(contents) => contents.extend_from_slice(&append.contents),
                    None => receipt.status = Status::INVALID_FILE_ID.0,
                }
            }
            Data::FileDelete(delete) => {
                let num = delete.file_id.map_or(0, |f| f.file_num);
                if self.files.remove(&num).is_none() {
                    receipt.status = Status::INVALID_FILE_ID.0;
                }
            }
            Data::ContractCreateInstance(create) => {
                use proto::contract_create_transaction_body::InitcodeSource;

                let initcode = match create.initcode_source {
                    Some(InitcodeSource::Initcode(bytes)) => bytes,
                    Some(InitcodeSource::FileId(file)) => {
                        let Some(contents) = self.files.get(&file.file_num) else {
                            receipt.status = Status::INVALID_FILE_ID.0;
                            return receipt;
                        };
                        match hex::decode(contents) {
                            Ok(bytes) => bytes,
                            Err(_) => {
                                receipt.status = Status::CONTRACT_EXECUTION_EXCEPTION.0;
                                return receipt;
                            }
                        }
                    }
                    None => Vec::new(),
                };
                let Ok((name, number)) =
                    <(String, U256)>::abi_decode_params(&create.constructor_parameters)
                else {
                    receipt.status = Status::CONTRACT_REVERT_EXECUTED.0;
                    return receipt;
                };
                if initcode.is_empty() {
                    receipt.status = Status::CONTRACT_EXECUTION_EXCEPTION.0;
                    return receipt;
                }

                let num = self.allocate();
                self.contracts.insert(num, HashMap::from([(name, number)]));
                receipt.contract_id = Some(proto::ContractId {
                    shard_num: 0,
                    realm_num: 0,
                    contract: Some(proto::contract_id::Contract::ContractNum(num)),
                });
            }
            Data::ContractCall(call) => {
                let num = contract_num(call.contract_id.clone());
                let Some(entries) = self.contracts.get_mut(&num) else {
                    receipt.status = Status::INVALID_CONTRACT_ID.0;
                    return receipt;
                };
                match LookupContract::LookupContractCalls::abi_decode(&call.function_parameters) {
                    Ok(LookupContract::LookupContractCalls::setMobileNumber(set)) => {
                        entries.insert(set.name, set.mobileNumber);
                        receipt.contract_id = call.contract_id;
                    }
                    _ => receipt.status = Status::CONTRACT_REVERT_EXECUTED.0,
                }
            }
            Data::CryptoTransfer(_) => {}
        }
        receipt
    }
}

impl Transport for MockNetwork {
    async fn submit(
        &self,
        node: &NodeAddress,
        method: ApiMethod,
        transaction: proto::Transaction,
    ) -> LedgerResult<proto::TransactionResponse> {
        self.handle_submit(node, method, transaction)
    }

    async fn query(
        &self,
        node: &NodeAddress,
        method: ApiMethod,
        query: proto::Query,
    ) -> LedgerResult<proto::Response> {
        self.handle_query(node, method, query)
    }

    async fn subscribe_topic(&self, query: proto::ConsensusTopicQuery) -> LedgerResult<TopicStream> {
        self.handle_subscribe(query)
    }
}

fn header(status: Status, cost: u64) -> proto::ResponseHeader {
    proto::ResponseHeader {
        node_transaction_precheck_code: status.0,
        response_type: proto::ResponseType::AnswerOnly as i32,
        cost,
    }
}

fn contract_num(id: Option<proto::ContractId>) -> i64 {
    match id.and_then(|c| c.contract) {
        Some(proto::contract_id::Contract::ContractNum(num)) => num,
        _ => 0,
    }
}

fn ecdsa_key(key: Option<proto::Key>) -> Option<Vec<u8>> {
    match key.and_then(|k| k.key) {
        Some(proto::key::Key::EcdsaSecp256k1(bytes)) => Some(bytes),
        _ => None,
    }
}

fn call_lookup(
    entries: &HashMap<String, U256>,
    params: &[u8],
    contract_id: Option<proto::ContractId>,
) -> proto::ContractFunctionResult {
    match LookupContract::LookupContractCalls::abi_decode(params) {
        Ok(LookupContract::LookupContractCalls::getMobileNumber(get)) => {
            let number = entries.get(&get.name).copied().unwrap_or(U256::ZERO);
            proto::ContractFunctionResult {
                contract_id,
                contract_call_result: number.abi_encode(),
                error_message: String::new(),
                gas_used: 2_500,
            }
        }
        _ => proto::ContractFunctionResult {
            contract_id,
            error_message: "CONTRACT_REVERT_EXECUTED".to_string(),
            ..Default::default()
        },
    }
}

/// Check an ECDSA secp256k1 signature over keccak-256 of `body`.
pub fn verify(body: &[u8], pair: &proto::SignaturePair) -> bool {
    let Some(proto::signature_pair::Signature::EcdsaSecp256k1(sig)) = &pair.signature else {
        return false;
    };
    if sig.len() != 64 {
        return false;
    }
    let digest = keccak256(body);
    let r = U256::from_be_slice(&sig[..32]);
    let s = U256::from_be_slice(&sig[32..]);
    [false, true].into_iter().any(|parity| {
        Signature::new(r, s, parity)
            .recover_from_prehash(&digest)
            .map(|key| key.to_encoded_point(true).as_bytes() == pair.pub_key_prefix.as_slice())
            .unwrap_or(false)
    })
}

/// Settings that keep tests fast: short polls, tiny backoff.
pub fn fast_settings() -> ClientSettings {
    ClientSettings {
        receipt_timeout: Duration::from_secs(5),
        receipt_poll_interval: Duration::from_millis(5),
        request_timeout: Duration::from_secs(2),
        node_cooldown: Duration::from_millis(50),
        retry: RetryPolicy {
            max_attempts: 5,
            base_delay_ms: 1,
            max_delay_ms: 5,
        },
        ..ClientSettings::default()
    }
}

pub fn client(network: &MockNetwork, operator: &PrivateKey) -> Client<MockNetwork> {
    Client::with_transport(
        network.clone(),
        MockNetwork::nodes(),
        Operator {
            account_id: OPERATOR_ACCOUNT,
            key: operator.clone(),
        },
        fast_settings(),
    )
    .unwrap()
}

/// Scenario context over a fresh mock network, with no pauses.
pub fn context(config: StarterConfig) -> (MockNetwork, ScenarioContext<MockNetwork>) {
    let operator = PrivateKey::generate_ecdsa();
    let network = MockNetwork::new(&operator);
    let ctx = ScenarioContext {
        client: client(&network, &operator),
        explorer: Explorer::new(&config.explorer.base_url, NetworkName::Testnet).unwrap(),
        config,
    };
    (network, ctx)
}
