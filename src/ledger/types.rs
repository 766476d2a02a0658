//! Ledger identifiers, amounts, and error definitions.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rand::Rng;
use thiserror::Error;

use crate::ledger::proto;
use crate::ledger::status::Status;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A request parameter cannot be encoded or violates a network limit.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// An entity or transaction identifier failed to parse.
    #[error("Invalid identifier '{0}'")]
    InvalidId(String),

    /// Invalid private key format or derivation error.
    #[error("Key error: {0}")]
    InvalidKey(String),

    /// Channel setup or connection failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A gRPC call returned a non-OK status.
    #[error("gRPC error {code:?}: {message}")]
    Grpc { code: tonic::Code, message: String },

    /// Request timed out.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// The node rejected the transaction before consensus.
    #[error("Transaction {transaction_id} failed precheck with status {status}")]
    Precheck {
        status: Status,
        transaction_id: TransactionId,
    },

    /// The node rejected a query before answering it.
    #[error("Query failed precheck with status {0}")]
    QueryPrecheck(Status),

    /// The transaction reached consensus but did not succeed.
    #[error("Receipt for transaction {transaction_id} contained error status {status}")]
    ReceiptStatus {
        status: Status,
        transaction_id: TransactionId,
    },

    /// The receipt was not available before the deadline.
    #[error("Receipt for transaction {0} not available after {1:?}")]
    ReceiptTimeout(TransactionId, Duration),

    /// The node asked for more than the configured max query payment.
    #[error("Query cost {cost} exceeds maximum payment {max}")]
    QueryCostExceeded { cost: Hbar, max: Hbar },

    /// A local contract call reverted.
    #[error("Contract call reverted: {0}")]
    ContractReverted(String),

    /// A response was missing a field the request implies.
    #[error("Response missing field: {0}")]
    MissingField(&'static str),

    /// A response could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Every node attempt failed.
    #[error("Request failed after {0} attempts")]
    AttemptsExhausted(u32),

    /// The client has been closed.
    #[error("Client is closed")]
    ClientClosed,
}

impl LedgerError {
    /// Whether another node (or a later attempt) might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            LedgerError::Transport(_) | LedgerError::Timeout(_) => true,
            LedgerError::Grpc { code, .. } => matches!(
                code,
                tonic::Code::Unavailable
                    | tonic::Code::ResourceExhausted
                    | tonic::Code::DeadlineExceeded
                    | tonic::Code::Internal
            ),
            _ => false,
        }
    }
}

impl From<tonic::Status> for LedgerError {
    fn from(status: tonic::Status) -> Self {
        LedgerError::Grpc {
            code: status.code(),
            message: status.message().to_string(),
        }
    }
}

impl From<tonic::transport::Error> for LedgerError {
    fn from(err: tonic::transport::Error) -> Self {
        LedgerError::Transport(err.to_string())
    }
}

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// `shard.realm.num` triple shared by all entity identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct EntityId {
    pub shard: u64,
    pub realm: u64,
    pub num: u64,
}

impl EntityId {
    pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
        Self { shard, realm, num }
    }
}

impl FromStr for EntityId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Trailing "-abcde" checksums are accepted and ignored.
        let body = s.trim().split('-').next().unwrap_or_default();
        let parts: Vec<&str> = body.split('.').collect();
        let &[shard, realm, num] = parts.as_slice() else {
            return Err(LedgerError::InvalidId(s.to_string()));
        };
        let parse = |p: &str| p.parse::<u64>().map_err(|_| LedgerError::InvalidId(s.to_string()));
        Ok(Self::new(parse(shard)?, parse(realm)?, parse(num)?))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.shard, self.realm, self.num)
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name(pub EntityId);

        impl $name {
            pub const fn new(shard: u64, realm: u64, num: u64) -> Self {
                Self(EntityId::new(shard, realm, num))
            }

            pub fn num(&self) -> u64 {
                self.0.num
            }
        }

        impl FromStr for $name {
            type Err = LedgerError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse().map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

entity_id!(
    /// Account on the ledger.
    AccountId
);
entity_id!(
    /// Consensus topic.
    TopicId
);
entity_id!(
    /// Token (fungible or NFT collection).
    TokenId
);
entity_id!(
    /// Smart contract instance.
    ContractId
);
entity_id!(
    /// File service entry.
    FileId
);

impl ContractId {
    /// The long-zero EVM address: 4-byte shard, 8-byte realm, 8-byte num.
    pub fn to_solidity_address(&self) -> String {
        let mut bytes = [0u8; 20];
        bytes[..4].copy_from_slice(&(self.0.shard as u32).to_be_bytes());
        bytes[4..12].copy_from_slice(&self.0.realm.to_be_bytes());
        bytes[12..].copy_from_slice(&self.0.num.to_be_bytes());
        alloy::primitives::hex::encode(bytes)
    }
}

impl From<AccountId> for proto::AccountId {
    fn from(id: AccountId) -> Self {
        proto::AccountId {
            shard_num: id.0.shard as i64,
            realm_num: id.0.realm as i64,
            account: Some(proto::account_id::Account::AccountNum(id.0.num as i64)),
        }
    }
}

impl TryFrom<proto::AccountId> for AccountId {
    type Error = LedgerError;

    fn try_from(id: proto::AccountId) -> Result<Self, Self::Error> {
        match id.account {
            Some(proto::account_id::Account::AccountNum(num)) => {
                Ok(AccountId::new(id.shard_num as u64, id.realm_num as u64, num as u64))
            }
            _ => Err(LedgerError::Decode("account id has no number".to_string())),
        }
    }
}

impl From<ContractId> for proto::ContractId {
    fn from(id: ContractId) -> Self {
        proto::ContractId {
            shard_num: id.0.shard as i64,
            realm_num: id.0.realm as i64,
            contract: Some(proto::contract_id::Contract::ContractNum(id.0.num as i64)),
        }
    }
}

impl TryFrom<proto::ContractId> for ContractId {
    type Error = LedgerError;

    fn try_from(id: proto::ContractId) -> Result<Self, Self::Error> {
        match id.contract {
            Some(proto::contract_id::Contract::ContractNum(num)) => {
                Ok(ContractId::new(id.shard_num as u64, id.realm_num as u64, num as u64))
            }
            _ => Err(LedgerError::Decode("contract id has no number".to_string())),
        }
    }
}

macro_rules! simple_proto_id {
    ($domain:ident, $wire:ident, $field:ident) => {
        impl From<$domain> for proto::$wire {
            fn from(id: $domain) -> Self {
                proto::$wire {
                    shard_num: id.0.shard as i64,
                    realm_num: id.0.realm as i64,
                    $field: id.0.num as i64,
                }
            }
        }

        impl From<proto::$wire> for $domain {
            fn from(id: proto::$wire) -> Self {
                $domain::new(id.shard_num as u64, id.realm_num as u64, id.$field as u64)
            }
        }
    };
}

simple_proto_id!(TopicId, TopicId, topic_num);
simple_proto_id!(TokenId, TokenId, token_num);
simple_proto_id!(FileId, FileId, file_num);

/// Transaction identifier: payer account plus valid-start timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TransactionId {
    pub account_id: AccountId,
    pub valid_start_seconds: i64,
    pub valid_start_nanos: i32,
}

impl TransactionId {
    /// Generate an id for `payer`, backdated a few seconds so that small
    /// clock drift between us and the node does not reject it.
    pub fn generate(payer: AccountId) -> Self {
        let backdate = Duration::from_millis(rand::thread_rng().gen_range(5_000..8_000));
        let start = SystemTime::now()
            .checked_sub(backdate)
            .unwrap_or(UNIX_EPOCH)
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        Self {
            account_id: payer,
            valid_start_seconds: start.as_secs() as i64,
            valid_start_nanos: start.subsec_nanos() as i32,
        }
    }
}

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}@{}.{:09}",
            self.account_id, self.valid_start_seconds, self.valid_start_nanos
        )
    }
}

impl FromStr for TransactionId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidId(s.to_string());
        let (account, start) = s.split_once('@').ok_or_else(invalid)?;
        let (seconds, nanos) = start.split_once('.').ok_or_else(invalid)?;
        Ok(Self {
            account_id: account.parse()?,
            valid_start_seconds: seconds.parse().map_err(|_| invalid())?,
            valid_start_nanos: nanos.parse().map_err(|_| invalid())?,
        })
    }
}

impl From<TransactionId> for proto::TransactionId {
    fn from(id: TransactionId) -> Self {
        proto::TransactionId {
            transaction_valid_start: Some(proto::Timestamp {
                seconds: id.valid_start_seconds,
                nanos: id.valid_start_nanos,
            }),
            account_id: Some(id.account_id.into()),
            scheduled: false,
            nonce: 0,
        }
    }
}

impl TryFrom<proto::TransactionId> for TransactionId {
    type Error = LedgerError;

    fn try_from(id: proto::TransactionId) -> Result<Self, Self::Error> {
        let start = id
            .transaction_valid_start
            .ok_or(LedgerError::MissingField("transaction_valid_start"))?;
        let account = id.account_id.ok_or(LedgerError::MissingField("account_id"))?;
        Ok(Self {
            account_id: account.try_into()?,
            valid_start_seconds: start.seconds,
            valid_start_nanos: start.nanos,
        })
    }
}

/// Tinybars per hbar.
pub const TINYBARS_PER_HBAR: i64 = 100_000_000;

/// Amount of the native currency, stored in tinybars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Hbar(i64);

impl Hbar {
    pub const ZERO: Hbar = Hbar(0);

    /// Whole hbars.
    pub const fn new(hbars: i64) -> Self {
        Self(hbars.saturating_mul(TINYBARS_PER_HBAR))
    }

    pub const fn from_tinybars(tinybars: i64) -> Self {
        Self(tinybars)
    }

    pub const fn to_tinybars(self) -> i64 {
        self.0
    }

    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Tinybar amount for unsigned wire fields; negative amounts are rejected.
    pub fn to_unsigned_tinybars(self) -> LedgerResult<u64> {
        u64::try_from(self.0)
            .map_err(|_| LedgerError::InvalidArgument(format!("amount {} must not be negative", self)))
    }
}

impl FromStr for Hbar {
    type Err = LedgerError;

    /// Decimal hbars, e.g. `1`, `0.5`, `-2.25`; at most 8 fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || LedgerError::InvalidArgument(format!("'{}' is not an hbar amount", s));
        let trimmed = s.trim();
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid());
        }
        let all_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if fraction.len() > 8 || !all_digits(whole) || !all_digits(fraction) {
            return Err(invalid());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let fraction: i64 = if fraction.is_empty() {
            0
        } else {
            format!("{:0<8}", fraction).parse().map_err(|_| invalid())?
        };
        let tinybars = whole
            .checked_mul(TINYBARS_PER_HBAR)
            .and_then(|t| t.checked_add(fraction))
            .ok_or_else(invalid)?;
        Ok(Hbar(if negative { -tinybars } else { tinybars }))
    }
}

impl fmt::Display for Hbar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % TINYBARS_PER_HBAR == 0 {
            write!(f, "{} ℏ", self.0 / TINYBARS_PER_HBAR)
        } else {
            write!(f, "{} tℏ", self.0)
        }
    }
}
