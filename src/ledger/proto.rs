//! Wire messages for the subset of the ledger API this crate speaks.
//!
//! Field tags follow the published HAPI and mirror-node protobuf schemas;
//! only the fields we read or write are declared. Unknown fields on incoming
//! messages are skipped by prost.

// Basic types

#[derive(Clone, Copy, PartialEq, ::prost::Message)]
pub struct Timestamp {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
    #[prost(int32, tag = "2")]
    pub nanos: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Duration {
    #[prost(int64, tag = "1")]
    pub seconds: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AccountId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(oneof = "account_id::Account", tags = "3, 4")]
    pub account: Option<account_id::Account>,
}

pub mod account_id {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Account {
        #[prost(int64, tag = "3")]
        AccountNum(i64),
        #[prost(bytes, tag = "4")]
        Alias(Vec<u8>),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TopicId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(int64, tag = "3")]
    pub topic_num: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TokenId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(int64, tag = "3")]
    pub token_num: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(int64, tag = "3")]
    pub file_num: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractId {
    #[prost(int64, tag = "1")]
    pub shard_num: i64,
    #[prost(int64, tag = "2")]
    pub realm_num: i64,
    #[prost(oneof = "contract_id::Contract", tags = "3, 4")]
    pub contract: Option<contract_id::Contract>,
}

pub mod contract_id {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Contract {
        #[prost(int64, tag = "3")]
        ContractNum(i64),
        #[prost(bytes, tag = "4")]
        EvmAddress(Vec<u8>),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionId {
    #[prost(message, optional, tag = "1")]
    pub transaction_valid_start: Option<Timestamp>,
    #[prost(message, optional, tag = "2")]
    pub account_id: Option<AccountId>,
    #[prost(bool, tag = "3")]
    pub scheduled: bool,
    #[prost(int32, tag = "4")]
    pub nonce: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Key {
    #[prost(oneof = "key::Key", tags = "2, 6, 7")]
    pub key: Option<key::Key>,
}

pub mod key {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Key {
        #[prost(bytes, tag = "2")]
        Ed25519(Vec<u8>),
        #[prost(message, tag = "6")]
        KeyList(super::KeyList),
        #[prost(bytes, tag = "7")]
        EcdsaSecp256k1(Vec<u8>),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct KeyList {
    #[prost(message, repeated, tag = "1")]
    pub keys: Vec<Key>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignaturePair {
    #[prost(bytes, tag = "1")]
    pub pub_key_prefix: Vec<u8>,
    #[prost(oneof = "signature_pair::Signature", tags = "3, 6")]
    pub signature: Option<signature_pair::Signature>,
}

pub mod signature_pair {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Signature {
        #[prost(bytes, tag = "3")]
        Ed25519(Vec<u8>),
        #[prost(bytes, tag = "6")]
        EcdsaSecp256k1(Vec<u8>),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignatureMap {
    #[prost(message, repeated, tag = "1")]
    pub sig_pair: Vec<SignaturePair>,
}

// Transaction envelope

/// Top-level transaction as sent over gRPC.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Transaction {
    #[prost(bytes, tag = "5")]
    pub signed_transaction_bytes: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SignedTransaction {
    #[prost(bytes, tag = "1")]
    pub body_bytes: Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub sig_map: Option<SignatureMap>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionBody {
    #[prost(message, optional, tag = "1")]
    pub transaction_id: Option<TransactionId>,
    #[prost(message, optional, tag = "2")]
    pub node_account_id: Option<AccountId>,
    #[prost(uint64, tag = "3")]
    pub transaction_fee: u64,
    #[prost(message, optional, tag = "4")]
    pub transaction_valid_duration: Option<Duration>,
    #[prost(string, tag = "6")]
    pub memo: String,
    #[prost(
        oneof = "transaction_body::Data",
        tags = "7, 8, 11, 14, 16, 17, 18, 24, 27, 29, 37"
    )]
    pub data: Option<transaction_body::Data>,
}

pub mod transaction_body {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Data {
        #[prost(message, tag = "7")]
        ContractCall(super::ContractCallTransactionBody),
        #[prost(message, tag = "8")]
        ContractCreateInstance(super::ContractCreateTransactionBody),
        #[prost(message, tag = "11")]
        CryptoCreateAccount(super::CryptoCreateTransactionBody),
        #[prost(message, tag = "14")]
        CryptoTransfer(super::CryptoTransferTransactionBody),
        #[prost(message, tag = "16")]
        FileAppend(super::FileAppendTransactionBody),
        #[prost(message, tag = "17")]
        FileCreate(super::FileCreateTransactionBody),
        #[prost(message, tag = "18")]
        FileDelete(super::FileDeleteTransactionBody),
        #[prost(message, tag = "24")]
        ConsensusCreateTopic(super::ConsensusCreateTopicTransactionBody),
        #[prost(message, tag = "27")]
        ConsensusSubmitMessage(super::ConsensusSubmitMessageTransactionBody),
        #[prost(message, tag = "29")]
        TokenCreation(super::TokenCreateTransactionBody),
        #[prost(message, tag = "37")]
        TokenMint(super::TokenMintTransactionBody),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionResponse {
    #[prost(int32, tag = "1")]
    pub node_transaction_precheck_code: i32,
    #[prost(uint64, tag = "2")]
    pub cost: u64,
}

// Transaction bodies

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CryptoCreateTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub key: Option<Key>,
    #[prost(uint64, tag = "2")]
    pub initial_balance: u64,
    #[prost(bool, tag = "8")]
    pub receiver_sig_required: bool,
    #[prost(message, optional, tag = "9")]
    pub auto_renew_period: Option<Duration>,
    #[prost(string, tag = "13")]
    pub memo: String,
    #[prost(int32, tag = "14")]
    pub max_automatic_token_associations: i32,
    #[prost(bytes, tag = "18")]
    pub alias: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AccountAmount {
    #[prost(message, optional, tag = "1")]
    pub account_id: Option<AccountId>,
    #[prost(sint64, tag = "2")]
    pub amount: i64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransferList {
    #[prost(message, repeated, tag = "1")]
    pub account_amounts: Vec<AccountAmount>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CryptoTransferTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub transfers: Option<TransferList>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConsensusCreateTopicTransactionBody {
    #[prost(string, tag = "1")]
    pub memo: String,
    #[prost(message, optional, tag = "2")]
    pub admin_key: Option<Key>,
    #[prost(message, optional, tag = "3")]
    pub submit_key: Option<Key>,
    #[prost(message, optional, tag = "6")]
    pub auto_renew_period: Option<Duration>,
    #[prost(message, optional, tag = "7")]
    pub auto_renew_account: Option<AccountId>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConsensusSubmitMessageTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub topic_id: Option<TopicId>,
    #[prost(bytes, tag = "2")]
    pub message: Vec<u8>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum TokenType {
    FungibleCommon = 0,
    NonFungibleUnique = 1,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum TokenSupplyType {
    Infinite = 0,
    Finite = 1,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomFee {
    #[prost(message, optional, tag = "3")]
    pub fee_collector_account_id: Option<AccountId>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TokenCreateTransactionBody {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub symbol: String,
    #[prost(uint32, tag = "3")]
    pub decimals: u32,
    #[prost(uint64, tag = "4")]
    pub initial_supply: u64,
    #[prost(message, optional, tag = "5")]
    pub treasury: Option<AccountId>,
    #[prost(message, optional, tag = "6")]
    pub admin_key: Option<Key>,
    #[prost(message, optional, tag = "7")]
    pub kyc_key: Option<Key>,
    #[prost(message, optional, tag = "8")]
    pub freeze_key: Option<Key>,
    #[prost(message, optional, tag = "9")]
    pub wipe_key: Option<Key>,
    #[prost(message, optional, tag = "10")]
    pub supply_key: Option<Key>,
    #[prost(bool, tag = "11")]
    pub freeze_default: bool,
    #[prost(message, optional, tag = "14")]
    pub auto_renew_account: Option<AccountId>,
    #[prost(message, optional, tag = "15")]
    pub auto_renew_period: Option<Duration>,
    #[prost(string, tag = "16")]
    pub memo: String,
    #[prost(enumeration = "TokenType", tag = "17")]
    pub token_type: i32,
    #[prost(enumeration = "TokenSupplyType", tag = "18")]
    pub supply_type: i32,
    #[prost(int64, tag = "19")]
    pub max_supply: i64,
    #[prost(message, optional, tag = "20")]
    pub fee_schedule_key: Option<Key>,
    #[prost(message, repeated, tag = "21")]
    pub custom_fees: Vec<CustomFee>,
    #[prost(message, optional, tag = "22")]
    pub pause_key: Option<Key>,
    #[prost(bytes, tag = "23")]
    pub metadata: Vec<u8>,
    #[prost(message, optional, tag = "24")]
    pub metadata_key: Option<Key>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TokenMintTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub token: Option<TokenId>,
    #[prost(uint64, tag = "2")]
    pub amount: u64,
    #[prost(bytes, repeated, tag = "3")]
    pub metadata: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileCreateTransactionBody {
    #[prost(message, optional, tag = "2")]
    pub expiration_time: Option<Timestamp>,
    #[prost(message, optional, tag = "3")]
    pub keys: Option<KeyList>,
    #[prost(bytes, tag = "4")]
    pub contents: Vec<u8>,
    #[prost(string, tag = "8")]
    pub memo: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileAppendTransactionBody {
    #[prost(message, optional, tag = "2")]
    pub file_id: Option<FileId>,
    #[prost(bytes, tag = "4")]
    pub contents: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileDeleteTransactionBody {
    #[prost(message, optional, tag = "2")]
    pub file_id: Option<FileId>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractCreateTransactionBody {
    #[prost(message, optional, tag = "3")]
    pub admin_key: Option<Key>,
    #[prost(int64, tag = "4")]
    pub gas: i64,
    #[prost(int64, tag = "5")]
    pub initial_balance: i64,
    #[prost(message, optional, tag = "8")]
    pub auto_renew_period: Option<Duration>,
    #[prost(bytes, tag = "9")]
    pub constructor_parameters: Vec<u8>,
    #[prost(string, tag = "13")]
    pub memo: String,
    #[prost(int32, tag = "14")]
    pub max_automatic_token_associations: i32,
    #[prost(message, optional, tag = "15")]
    pub auto_renew_account_id: Option<AccountId>,
    #[prost(oneof = "contract_create_transaction_body::InitcodeSource", tags = "1, 16")]
    pub initcode_source: Option<contract_create_transaction_body::InitcodeSource>,
}

pub mod contract_create_transaction_body {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum InitcodeSource {
        #[prost(message, tag = "1")]
        FileId(super::FileId),
        #[prost(bytes, tag = "16")]
        Initcode(Vec<u8>),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractCallTransactionBody {
    #[prost(message, optional, tag = "1")]
    pub contract_id: Option<ContractId>,
    #[prost(int64, tag = "2")]
    pub gas: i64,
    #[prost(int64, tag = "3")]
    pub amount: i64,
    #[prost(bytes, tag = "4")]
    pub function_parameters: Vec<u8>,
}

// Queries

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum ResponseType {
    AnswerOnly = 0,
    AnswerStateProof = 1,
    CostAnswer = 2,
    CostAnswerStateProof = 3,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryHeader {
    #[prost(message, optional, tag = "1")]
    pub payment: Option<Transaction>,
    #[prost(enumeration = "ResponseType", tag = "2")]
    pub response_type: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResponseHeader {
    #[prost(int32, tag = "1")]
    pub node_transaction_precheck_code: i32,
    #[prost(enumeration = "ResponseType", tag = "2")]
    pub response_type: i32,
    #[prost(uint64, tag = "3")]
    pub cost: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Query {
    #[prost(oneof = "query::Query", tags = "3, 14")]
    pub query: Option<query::Query>,
}

pub mod query {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Query {
        #[prost(message, tag = "3")]
        ContractCallLocal(super::ContractCallLocalQuery),
        #[prost(message, tag = "14")]
        TransactionGetReceipt(super::TransactionGetReceiptQuery),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Response {
    #[prost(oneof = "response::Response", tags = "3, 14")]
    pub response: Option<response::Response>,
}

pub mod response {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Response {
        #[prost(message, tag = "3")]
        ContractCallLocal(super::ContractCallLocalResponse),
        #[prost(message, tag = "14")]
        TransactionGetReceipt(super::TransactionGetReceiptResponse),
    }
}

impl Response {
    /// Header of whichever answer this response carries.
    pub fn header(&self) -> Option<&ResponseHeader> {
        match self.response.as_ref()? {
            response::Response::ContractCallLocal(r) => r.header.as_ref(),
            response::Response::TransactionGetReceipt(r) => r.header.as_ref(),
        }
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionGetReceiptQuery {
    #[prost(message, optional, tag = "1")]
    pub header: Option<QueryHeader>,
    #[prost(message, optional, tag = "2")]
    pub transaction_id: Option<TransactionId>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionGetReceiptResponse {
    #[prost(message, optional, tag = "1")]
    pub header: Option<ResponseHeader>,
    #[prost(message, optional, tag = "2")]
    pub receipt: Option<TransactionReceipt>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TransactionReceipt {
    #[prost(int32, tag = "1")]
    pub status: i32,
    #[prost(message, optional, tag = "2")]
    pub account_id: Option<AccountId>,
    #[prost(message, optional, tag = "3")]
    pub file_id: Option<FileId>,
    #[prost(message, optional, tag = "4")]
    pub contract_id: Option<ContractId>,
    #[prost(message, optional, tag = "6")]
    pub topic_id: Option<TopicId>,
    #[prost(uint64, tag = "7")]
    pub topic_sequence_number: u64,
    #[prost(bytes, tag = "8")]
    pub topic_running_hash: Vec<u8>,
    #[prost(message, optional, tag = "10")]
    pub token_id: Option<TokenId>,
    #[prost(uint64, tag = "11")]
    pub new_total_supply: u64,
    #[prost(int64, repeated, tag = "14")]
    pub serial_numbers: Vec<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractCallLocalQuery {
    #[prost(message, optional, tag = "1")]
    pub header: Option<QueryHeader>,
    #[prost(message, optional, tag = "2")]
    pub contract_id: Option<ContractId>,
    #[prost(int64, tag = "3")]
    pub gas: i64,
    #[prost(bytes, tag = "4")]
    pub function_parameters: Vec<u8>,
    #[prost(message, optional, tag = "6")]
    pub sender_id: Option<AccountId>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractCallLocalResponse {
    #[prost(message, optional, tag = "1")]
    pub header: Option<ResponseHeader>,
    #[prost(message, optional, tag = "2")]
    pub function_result: Option<ContractFunctionResult>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContractFunctionResult {
    #[prost(message, optional, tag = "1")]
    pub contract_id: Option<ContractId>,
    #[prost(bytes, tag = "2")]
    pub contract_call_result: Vec<u8>,
    #[prost(string, tag = "3")]
    pub error_message: String,
    #[prost(uint64, tag = "5")]
    pub gas_used: u64,
}

// Mirror node

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConsensusTopicQuery {
    #[prost(message, optional, tag = "1")]
    pub topic_id: Option<TopicId>,
    #[prost(message, optional, tag = "2")]
    pub consensus_start_time: Option<Timestamp>,
    #[prost(message, optional, tag = "3")]
    pub consensus_end_time: Option<Timestamp>,
    #[prost(uint64, tag = "4")]
    pub limit: u64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConsensusTopicResponse {
    #[prost(message, optional, tag = "1")]
    pub consensus_timestamp: Option<Timestamp>,
    #[prost(bytes, tag = "2")]
    pub message: Vec<u8>,
    #[prost(bytes, tag = "3")]
    pub running_hash: Vec<u8>,
    #[prost(uint64, tag = "4")]
    pub sequence_number: u64,
    #[prost(uint64, tag = "5")]
    pub running_hash_version: u64,
}
