//! Transaction receipts.

use crate::ledger::proto;
use crate::ledger::status::Status;
use crate::ledger::types::{AccountId, ContractId, FileId, LedgerResult, TokenId, TopicId};

/// Final outcome of a transaction, as recorded by the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    pub status: Status,
    pub account_id: Option<AccountId>,
    pub file_id: Option<FileId>,
    pub contract_id: Option<ContractId>,
    pub topic_id: Option<TopicId>,
    pub token_id: Option<TokenId>,
    pub topic_sequence_number: u64,
    pub new_total_supply: u64,
    pub serial_numbers: Vec<i64>,
}

impl TryFrom<proto::TransactionReceipt> for TransactionReceipt {
    type Error = crate::ledger::types::LedgerError;

    fn try_from(receipt: proto::TransactionReceipt) -> LedgerResult<Self> {
        Ok(Self {
            status: Status::from(receipt.status),
            account_id: receipt.account_id.map(AccountId::try_from).transpose()?,
            file_id: receipt.file_id.map(FileId::from),
            contract_id: receipt.contract_id.map(ContractId::try_from).transpose()?,
            topic_id: receipt.topic_id.map(TopicId::from),
            token_id: receipt.token_id.map(TokenId::from),
            topic_sequence_number: receipt.topic_sequence_number,
            new_total_supply: receipt.new_total_supply,
            serial_numbers: receipt.serial_numbers,
        })
    }
}
