//! Smart contract service: deploy, execute, and call.
//!
//! # Deploy paths
//! ```text
//! ContractCreateFlow
//!     bytecode ≤ INLINE_INITCODE_LIMIT → ContractCreate { initcode }
//!     otherwise → FileCreate(hex chunk 0) → FileAppend(chunk 1..n)
//!               → ContractCreate { file_id } → receipt → FileDelete
//! ```

use alloy::primitives::{hex, U256};
use alloy::sol_types::SolCall;

use crate::ledger::account::DEFAULT_AUTO_RENEW_PERIOD_SECS;
use crate::ledger::client::Client;
use crate::ledger::file::{
    FileAppendTransaction, FileCreateTransaction, FileDeleteTransaction, FILE_CHUNK_BYTES,
};
use crate::ledger::proto;
use crate::ledger::query::execute_paid;
use crate::ledger::transaction::{Transaction, TransactionData, TransactionResponse};
use crate::ledger::transport::{ApiMethod, Transport};
use crate::ledger::types::{AccountId, ContractId, FileId, Hbar, LedgerError, LedgerResult};
use crate::ledger::wallet::PublicKey;

/// Largest bytecode sent inline with the create transaction.
pub const INLINE_INITCODE_LIMIT: usize = 4096;

fn gas_to_wire(gas: u64) -> LedgerResult<i64> {
    i64::try_from(gas).map_err(|_| LedgerError::InvalidArgument(format!("gas {} is too large", gas)))
}

/// Where the create transaction finds the contract's initcode.
#[derive(Debug, Clone)]
pub enum InitcodeSource {
    Bytes(Vec<u8>),
    /// A file holding the hex-encoded bytecode.
    File(FileId),
}

#[derive(Debug, Clone, Default)]
pub struct ContractCreateData {
    source: Option<InitcodeSource>,
    gas: u64,
    constructor_parameters: Vec<u8>,
    admin_key: Option<PublicKey>,
    initial_balance: Hbar,
    contract_memo: String,
    auto_renew_account: Option<AccountId>,
}

impl TransactionData for ContractCreateData {
    const METHOD: ApiMethod = ApiMethod::CreateContract;

    fn validate(&self) -> LedgerResult<()> {
        match &self.source {
            None => Err(LedgerError::InvalidArgument(
                "contract create needs bytecode or a bytecode file".to_string(),
            )),
            Some(InitcodeSource::Bytes(b)) if b.is_empty() => {
                Err(LedgerError::InvalidArgument("bytecode is empty".to_string()))
            }
            _ if self.gas == 0 => Err(LedgerError::InvalidArgument(
                "contract create needs gas".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn to_body_data(&self) -> LedgerResult<proto::transaction_body::Data> {
        use proto::contract_create_transaction_body::InitcodeSource as Wire;
        let initcode_source = match &self.source {
            Some(InitcodeSource::Bytes(bytes)) => Some(Wire::Initcode(bytes.clone())),
            Some(InitcodeSource::File(id)) => Some(Wire::FileId((*id).into())),
            None => None,
        };
        Ok(proto::transaction_body::Data::ContractCreateInstance(
            proto::ContractCreateTransactionBody {
                admin_key: self.admin_key.as_ref().map(proto::Key::from),
                gas: gas_to_wire(self.gas)?,
                initial_balance: self.initial_balance.to_tinybars(),
                auto_renew_period: Some(proto::Duration {
                    seconds: DEFAULT_AUTO_RENEW_PERIOD_SECS,
                }),
                constructor_parameters: self.constructor_parameters.clone(),
                memo: self.contract_memo.clone(),
                max_automatic_token_associations: 0,
                auto_renew_account_id: self.auto_renew_account.map(Into::into),
                initcode_source,
            },
        ))
    }
}

pub type ContractCreateTransaction = Transaction<ContractCreateData>;

impl Transaction<ContractCreateData> {
    pub fn bytecode(mut self, bytecode: Vec<u8>) -> Self {
        self.data_mut().source = Some(InitcodeSource::Bytes(bytecode));
        self
    }

    pub fn bytecode_file_id(mut self, file_id: FileId) -> Self {
        self.data_mut().source = Some(InitcodeSource::File(file_id));
        self
    }

    pub fn gas(mut self, gas: u64) -> Self {
        self.data_mut().gas = gas;
        self
    }

    /// ABI-encoded constructor arguments.
    pub fn constructor_parameters(mut self, params: Vec<u8>) -> Self {
        self.data_mut().constructor_parameters = params;
        self
    }

    pub fn admin_key(mut self, key: PublicKey) -> Self {
        self.data_mut().admin_key = Some(key);
        self
    }

    pub fn initial_balance(mut self, balance: Hbar) -> Self {
        self.data_mut().initial_balance = balance;
        self
    }

    pub fn contract_memo(mut self, memo: impl Into<String>) -> Self {
        self.data_mut().contract_memo = memo.into();
        self
    }

    pub fn auto_renew_account_id(mut self, account: AccountId) -> Self {
        self.data_mut().auto_renew_account = Some(account);
        self
    }
}

/// Deploys bytecode of any size, staging it in a file when it is too large
/// to send inline.
#[derive(Debug, Clone, Default)]
pub struct ContractCreateFlow {
    bytecode: Vec<u8>,
    gas: u64,
    constructor_parameters: Vec<u8>,
    admin_key: Option<PublicKey>,
    contract_memo: String,
}

impl ContractCreateFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytecode(mut self, bytecode: Vec<u8>) -> Self {
        self.bytecode = bytecode;
        self
    }

    pub fn gas(mut self, gas: u64) -> Self {
        self.gas = gas;
        self
    }

    pub fn constructor_parameters(mut self, params: Vec<u8>) -> Self {
        self.constructor_parameters = params;
        self
    }

    pub fn admin_key(mut self, key: PublicKey) -> Self {
        self.admin_key = Some(key);
        self
    }

    pub fn contract_memo(mut self, memo: impl Into<String>) -> Self {
        self.contract_memo = memo.into();
        self
    }

    fn create_transaction(&self) -> ContractCreateTransaction {
        let mut tx = ContractCreateTransaction::new()
            .gas(self.gas)
            .constructor_parameters(self.constructor_parameters.clone())
            .contract_memo(self.contract_memo.clone());
        if let Some(key) = &self.admin_key {
            tx = tx.admin_key(key.clone());
        }
        tx
    }

    /// Deploy and return the create transaction's response.
    pub async fn execute<T: Transport>(&self, client: &Client<T>) -> LedgerResult<TransactionResponse> {
        if self.bytecode.is_empty() {
            return Err(LedgerError::InvalidArgument("bytecode is empty".to_string()));
        }

        if self.bytecode.len() <= INLINE_INITCODE_LIMIT {
            tracing::debug!(bytes = self.bytecode.len(), "Deploying contract with inline initcode");
            return self
                .create_transaction()
                .bytecode(self.bytecode.clone())
                .execute(client)
                .await;
        }

        let file_id = self.upload(client).await?;
        let created = self
            .create_transaction()
            .bytecode_file_id(file_id)
            .execute(client)
            .await;

        // The create must reach consensus before its initcode file goes away.
        // Whatever the outcome, the file is deleted; a failed delete leaves it
        // to expire.
        if let Ok(response) = &created {
            if let Err(e) = response.get_receipt(client).await {
                tracing::debug!(file_id = %file_id, error = %e, "Contract create did not succeed");
            }
        }
        let cleanup = async {
            FileDeleteTransaction::new()
                .file_id(file_id)
                .execute(client)
                .await?
                .get_receipt(client)
                .await
        };
        if let Err(e) = cleanup.await {
            tracing::warn!(file_id = %file_id, error = %e, "Failed to delete bytecode file");
        }

        created
    }

    /// Stage the hex-encoded bytecode in a new file.
    async fn upload<T: Transport>(&self, client: &Client<T>) -> LedgerResult<FileId> {
        let encoded = hex::encode(&self.bytecode).into_bytes();
        let mut chunks = encoded.chunks(FILE_CHUNK_BYTES);
        let first = chunks.next().unwrap_or_default().to_vec();

        let receipt = FileCreateTransaction::new()
            .keys(vec![client.operator_public_key()])
            .contents(first)
            .execute(client)
            .await?
            .get_receipt(client)
            .await?;
        let file_id = receipt.file_id.ok_or(LedgerError::MissingField("file_id"))?;

        let mut appended = 0usize;
        for chunk in chunks {
            FileAppendTransaction::new()
                .file_id(file_id)
                .contents(chunk.to_vec())
                .execute(client)
                .await?
                .get_receipt(client)
                .await?;
            appended += 1;
        }

        tracing::info!(
            file_id = %file_id,
            bytes = encoded.len(),
            appends = appended,
            "Bytecode staged in file"
        );
        Ok(file_id)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ContractExecuteData {
    contract_id: Option<ContractId>,
    gas: u64,
    payable_amount: Hbar,
    function_parameters: Vec<u8>,
}

impl TransactionData for ContractExecuteData {
    const METHOD: ApiMethod = ApiMethod::ContractCall;

    fn validate(&self) -> LedgerResult<()> {
        if self.contract_id.is_none() {
            return Err(LedgerError::InvalidArgument(
                "contract execute requires a contract id".to_string(),
            ));
        }
        if self.payable_amount.is_negative() {
            return Err(LedgerError::InvalidArgument(
                "payable amount must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    fn to_body_data(&self) -> LedgerResult<proto::transaction_body::Data> {
        Ok(proto::transaction_body::Data::ContractCall(
            proto::ContractCallTransactionBody {
                contract_id: self.contract_id.map(Into::into),
                gas: gas_to_wire(self.gas)?,
                amount: self.payable_amount.to_tinybars(),
                function_parameters: self.function_parameters.clone(),
            },
        ))
    }
}

/// Calls a contract function as a state-changing transaction.
pub type ContractExecuteTransaction = Transaction<ContractExecuteData>;

impl Transaction<ContractExecuteData> {
    pub fn contract_id(mut self, id: ContractId) -> Self {
        self.data_mut().contract_id = Some(id);
        self
    }

    pub fn gas(mut self, gas: u64) -> Self {
        self.data_mut().gas = gas;
        self
    }

    pub fn payable_amount(mut self, amount: Hbar) -> Self {
        self.data_mut().payable_amount = amount;
        self
    }

    /// Selector plus ABI-encoded arguments.
    pub fn function_parameters(mut self, params: Vec<u8>) -> Self {
        self.data_mut().function_parameters = params;
        self
    }

    pub fn function<C: SolCall>(self, call: &C) -> Self {
        self.function_parameters(call.abi_encode())
    }
}

/// Read-only contract call, answered by a single node.
#[derive(Debug, Clone, Default)]
pub struct ContractCallQuery {
    contract_id: Option<ContractId>,
    gas: u64,
    function_parameters: Vec<u8>,
    sender: Option<AccountId>,
}

impl ContractCallQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contract_id(mut self, id: ContractId) -> Self {
        self.contract_id = Some(id);
        self
    }

    pub fn gas(mut self, gas: u64) -> Self {
        self.gas = gas;
        self
    }

    pub fn function_parameters(mut self, params: Vec<u8>) -> Self {
        self.function_parameters = params;
        self
    }

    pub fn function<C: SolCall>(self, call: &C) -> Self {
        self.function_parameters(call.abi_encode())
    }

    /// Account the call is made from; defaults to the node's choice.
    pub fn sender_account_id(mut self, account: AccountId) -> Self {
        self.sender = Some(account);
        self
    }

    pub async fn execute<T: Transport>(&self, client: &Client<T>) -> LedgerResult<ContractFunctionResult> {
        let contract_id = self.contract_id.ok_or_else(|| {
            LedgerError::InvalidArgument("contract call requires a contract id".to_string())
        })?;
        let gas = gas_to_wire(self.gas)?;

        let response = execute_paid(client, ApiMethod::ContractCallLocal, |header| proto::Query {
            query: Some(proto::query::Query::ContractCallLocal(
                proto::ContractCallLocalQuery {
                    header: Some(header),
                    contract_id: Some(contract_id.into()),
                    gas,
                    function_parameters: self.function_parameters.clone(),
                    sender_id: self.sender.map(Into::into),
                },
            )),
        })
        .await?;

        let answer = match response.response {
            Some(proto::response::Response::ContractCallLocal(answer)) => answer,
            _ => return Err(LedgerError::MissingField("contract_call_local")),
        };
        let result = answer
            .function_result
            .ok_or(LedgerError::MissingField("function_result"))?;
        let result = ContractFunctionResult::try_from(result)?;

        if let Some(message) = &result.error_message {
            return Err(LedgerError::ContractReverted(message.clone()));
        }
        Ok(result)
    }
}

/// Raw ABI output of a contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractFunctionResult {
    pub contract_id: Option<ContractId>,
    pub bytes: Vec<u8>,
    pub error_message: Option<String>,
    pub gas_used: u64,
}

impl TryFrom<proto::ContractFunctionResult> for ContractFunctionResult {
    type Error = LedgerError;

    fn try_from(result: proto::ContractFunctionResult) -> LedgerResult<Self> {
        Ok(Self {
            contract_id: result.contract_id.map(ContractId::try_from).transpose()?,
            bytes: result.contract_call_result,
            error_message: Some(result.error_message).filter(|m| !m.is_empty()),
            gas_used: result.gas_used,
        })
    }
}

impl ContractFunctionResult {
    fn word(&self, offset: usize) -> LedgerResult<&[u8]> {
        let end = offset
            .checked_add(32)
            .ok_or_else(|| LedgerError::Decode(format!("word offset {} overflows", offset)))?;
        self.bytes.get(offset..end).ok_or_else(|| {
            LedgerError::Decode(format!(
                "result has {} bytes, no 32-byte word at offset {}",
                self.bytes.len(),
                offset
            ))
        })
    }

    fn word_as_offset(&self, offset: usize) -> LedgerResult<usize> {
        let word = self.word(offset)?;
        if word[..24].iter().any(|b| *b != 0) {
            return Err(LedgerError::Decode(format!("offset word at {} overflows", offset)));
        }
        let mut tail = [0u8; 8];
        tail.copy_from_slice(&word[24..]);
        usize::try_from(u64::from_be_bytes(tail))
            .map_err(|_| LedgerError::Decode(format!("offset word at {} overflows", offset)))
    }

    /// The `index`th return value as a `uint256`.
    pub fn get_uint256(&self, index: usize) -> LedgerResult<U256> {
        Ok(U256::from_be_slice(self.word(index * 32)?))
    }

    /// The `index`th return value as a dynamic `string`.
    pub fn get_string(&self, index: usize) -> LedgerResult<String> {
        let start = self.word_as_offset(index * 32)?;
        let len = self.word_as_offset(start)?;
        let data_start = start
            .checked_add(32)
            .ok_or_else(|| LedgerError::Decode("string offset overflows".to_string()))?;
        let data_end = data_start
            .checked_add(len)
            .ok_or_else(|| LedgerError::Decode("string length overflows".to_string()))?;
        let data = self
            .bytes
            .get(data_start..data_end)
            .ok_or_else(|| LedgerError::Decode("string data out of range".to_string()))?;
        String::from_utf8(data.to_vec()).map_err(|e| LedgerError::Decode(e.to_string()))
    }
}
