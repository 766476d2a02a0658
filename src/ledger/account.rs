//! Account creation.

use crate::ledger::proto;
use crate::ledger::transaction::{Transaction, TransactionData};
use crate::ledger::transport::ApiMethod;
use crate::ledger::types::{Hbar, LedgerError, LedgerResult};
use crate::ledger::wallet::PublicKey;

/// Auto-renew period the network assigns new entities by default (~91 days).
pub const DEFAULT_AUTO_RENEW_PERIOD_SECS: i64 = 7_890_000;

/// `max_automatic_token_associations` value meaning "no limit".
pub const UNLIMITED_TOKEN_ASSOCIATIONS: i32 = -1;

#[derive(Debug, Clone, Default)]
pub struct AccountCreateData {
    key: Option<PublicKey>,
    initial_balance: Hbar,
    max_automatic_token_associations: i32,
    receiver_signature_required: bool,
    account_memo: String,
}

impl TransactionData for AccountCreateData {
    const METHOD: ApiMethod = ApiMethod::CreateAccount;

    fn validate(&self) -> LedgerResult<()> {
        if self.key.is_none() {
            return Err(LedgerError::InvalidArgument(
                "account create requires a key".to_string(),
            ));
        }
        if self.initial_balance.is_negative() {
            return Err(LedgerError::InvalidArgument(format!(
                "initial balance {} must not be negative",
                self.initial_balance
            )));
        }
        if self.max_automatic_token_associations < UNLIMITED_TOKEN_ASSOCIATIONS {
            return Err(LedgerError::InvalidArgument(format!(
                "max automatic token associations {} is below -1",
                self.max_automatic_token_associations
            )));
        }
        Ok(())
    }

    fn to_body_data(&self) -> LedgerResult<proto::transaction_body::Data> {
        Ok(proto::transaction_body::Data::CryptoCreateAccount(
            proto::CryptoCreateTransactionBody {
                key: self.key.as_ref().map(proto::Key::from),
                initial_balance: self.initial_balance.to_unsigned_tinybars()?,
                receiver_sig_required: self.receiver_signature_required,
                auto_renew_period: Some(proto::Duration {
                    seconds: DEFAULT_AUTO_RENEW_PERIOD_SECS,
                }),
                memo: self.account_memo.clone(),
                max_automatic_token_associations: self.max_automatic_token_associations,
                alias: Vec::new(),
            },
        ))
    }
}

/// Creates a new account owned by `key`.
pub type AccountCreateTransaction = Transaction<AccountCreateData>;

impl Transaction<AccountCreateData> {
    pub fn key(mut self, key: PublicKey) -> Self {
        self.data_mut().key = Some(key);
        self
    }

    pub fn initial_balance(mut self, balance: Hbar) -> Self {
        self.data_mut().initial_balance = balance;
        self
    }

    /// `-1` for unlimited, `0` to require explicit associations.
    pub fn max_automatic_token_associations(mut self, max: i32) -> Self {
        self.data_mut().max_automatic_token_associations = max;
        self
    }

    pub fn receiver_signature_required(mut self, required: bool) -> Self {
        self.data_mut().receiver_signature_required = required;
        self
    }

    pub fn account_memo(mut self, memo: impl Into<String>) -> Self {
        self.data_mut().account_memo = memo.into();
        self
    }
}
