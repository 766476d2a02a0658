//! Ledger client layer.
//!
//! # Data Flow
//! ```text
//! Scenario
//!     → Transaction<D> (account / consensus / token / contract / file)
//!         → transaction.rs (body, signatures via wallet.rs)
//!         → selector.rs (node) → transport.rs (gRPC submit)
//!         → TransactionResponse::get_receipt → query.rs (receipt polling)
//!     → ContractCallQuery → query.rs (cost, payment, answer)
//!     → TopicMessageQuery → consensus.rs (mirror stream task)
//! ```
//!
//! # Design Decisions
//! - Wire types are hand-written prost messages for the subset in use
//! - All network access goes through the `Transport` trait
//! - One signing scheme: ECDSA secp256k1 over keccak-256
//! - Errors carry the status and transaction id the network reported

pub mod account;
pub mod client;
pub mod consensus;
pub mod contract;
pub mod file;
pub mod network;
pub mod proto;
pub mod query;
pub mod receipt;
pub mod selector;
pub mod status;
pub mod token;
pub mod transaction;
pub mod transport;
pub mod types;
pub mod wallet;

pub use account::AccountCreateTransaction;
pub use client::{Client, ClientSettings, Operator};
pub use consensus::{
    SubscriptionHandle, TopicCreateTransaction, TopicMessage, TopicMessageQuery,
    TopicMessageSubmitTransaction,
};
pub use contract::{
    ContractCallQuery, ContractCreateFlow, ContractExecuteTransaction, ContractFunctionResult,
};
pub use network::{MirrorEndpoint, NetworkName, NodeAddress};
pub use receipt::TransactionReceipt;
pub use status::Status;
pub use token::{TokenCreateTransaction, TokenMintTransaction, TokenSupplyType, TokenType};
pub use transaction::TransactionResponse;
pub use transport::{ApiMethod, GrpcTransport, TopicStream, Transport};
pub use types::{
    AccountId, ContractId, FileId, Hbar, LedgerError, LedgerResult, TokenId, TopicId,
    TransactionId,
};
pub use wallet::{PrivateKey, PublicKey};
