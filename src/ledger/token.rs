//! Token service: create a token, mint supply.

use crate::ledger::account::DEFAULT_AUTO_RENEW_PERIOD_SECS;
use crate::ledger::proto;
use crate::ledger::transaction::{Transaction, TransactionData};
use crate::ledger::transport::ApiMethod;
use crate::ledger::types::{AccountId, LedgerError, LedgerResult, TokenId};
use crate::ledger::wallet::PublicKey;

/// Most NFT metadata entries accepted by one mint.
pub const MAX_NFT_MINT_BATCH: usize = 10;

/// Longest metadata blob per NFT, in bytes.
pub const MAX_NFT_METADATA_BYTES: usize = 100;

pub use proto::{TokenSupplyType, TokenType};

/// Optional keys a token may carry besides its supply key.
#[derive(Debug, Clone, Default)]
pub struct TokenKeys {
    pub admin: Option<PublicKey>,
    pub kyc: Option<PublicKey>,
    pub freeze: Option<PublicKey>,
    pub wipe: Option<PublicKey>,
    pub supply: Option<PublicKey>,
    pub fee_schedule: Option<PublicKey>,
    pub pause: Option<PublicKey>,
    pub metadata: Option<PublicKey>,
}

#[derive(Debug, Clone)]
pub struct TokenCreateData {
    name: String,
    symbol: String,
    decimals: u32,
    initial_supply: u64,
    treasury: Option<AccountId>,
    keys: TokenKeys,
    freeze_default: bool,
    auto_renew_account: Option<AccountId>,
    token_memo: String,
    token_type: TokenType,
    supply_type: TokenSupplyType,
    max_supply: i64,
}

impl Default for TokenCreateData {
    fn default() -> Self {
        Self {
            name: String::new(),
            symbol: String::new(),
            decimals: 0,
            initial_supply: 0,
            treasury: None,
            keys: TokenKeys::default(),
            freeze_default: false,
            auto_renew_account: None,
            token_memo: String::new(),
            token_type: TokenType::FungibleCommon,
            supply_type: TokenSupplyType::Infinite,
            max_supply: 0,
        }
    }
}

impl TransactionData for TokenCreateData {
    const METHOD: ApiMethod = ApiMethod::CreateToken;

    fn validate(&self) -> LedgerResult<()> {
        let mut problems = Vec::new();
        if self.name.is_empty() {
            problems.push("name is required");
        }
        if self.symbol.is_empty() {
            problems.push("symbol is required");
        }
        if self.treasury.is_none() {
            problems.push("treasury account is required");
        }
        if self.token_type == TokenType::NonFungibleUnique {
            if self.decimals != 0 {
                problems.push("non-fungible tokens must have 0 decimals");
            }
            if self.initial_supply != 0 {
                problems.push("non-fungible tokens must have 0 initial supply");
            }
            if self.keys.supply.is_none() {
                problems.push("non-fungible tokens need a supply key");
            }
        }
        if self.supply_type == TokenSupplyType::Finite && self.max_supply <= 0 {
            problems.push("finite supply requires a positive max supply");
        }
        if self.supply_type == TokenSupplyType::Infinite && self.max_supply != 0 {
            problems.push("infinite supply must not set a max supply");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(LedgerError::InvalidArgument(problems.join(", ")))
        }
    }

    fn to_body_data(&self) -> LedgerResult<proto::transaction_body::Data> {
        let key = |k: &Option<PublicKey>| k.as_ref().map(proto::Key::from);
        Ok(proto::transaction_body::Data::TokenCreation(
            proto::TokenCreateTransactionBody {
                name: self.name.clone(),
                symbol: self.symbol.clone(),
                decimals: self.decimals,
                initial_supply: self.initial_supply,
                treasury: self.treasury.map(Into::into),
                admin_key: key(&self.keys.admin),
                kyc_key: key(&self.keys.kyc),
                freeze_key: key(&self.keys.freeze),
                wipe_key: key(&self.keys.wipe),
                supply_key: key(&self.keys.supply),
                freeze_default: self.freeze_default,
                auto_renew_account: self.auto_renew_account.map(Into::into),
                auto_renew_period: Some(proto::Duration {
                    seconds: DEFAULT_AUTO_RENEW_PERIOD_SECS,
                }),
                memo: self.token_memo.clone(),
                token_type: self.token_type.into(),
                supply_type: self.supply_type.into(),
                max_supply: self.max_supply,
                fee_schedule_key: key(&self.keys.fee_schedule),
                custom_fees: Vec::new(),
                pause_key: key(&self.keys.pause),
                metadata: Vec::new(),
                metadata_key: key(&self.keys.metadata),
            },
        ))
    }
}

/// Creates a fungible token or an NFT collection.
pub type TokenCreateTransaction = Transaction<TokenCreateData>;

impl Transaction<TokenCreateData> {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.data_mut().name = name.into();
        self
    }

    pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
        self.data_mut().symbol = symbol.into();
        self
    }

    pub fn decimals(mut self, decimals: u32) -> Self {
        self.data_mut().decimals = decimals;
        self
    }

    pub fn initial_supply(mut self, supply: u64) -> Self {
        self.data_mut().initial_supply = supply;
        self
    }

    /// Account holding the initial supply. Its key must sign the create.
    pub fn treasury_account_id(mut self, account: AccountId) -> Self {
        self.data_mut().treasury = Some(account);
        self
    }

    pub fn token_type(mut self, token_type: TokenType) -> Self {
        self.data_mut().token_type = token_type;
        self
    }

    pub fn supply_type(mut self, supply_type: TokenSupplyType) -> Self {
        self.data_mut().supply_type = supply_type;
        self
    }

    pub fn max_supply(mut self, max: i64) -> Self {
        self.data_mut().max_supply = max;
        self
    }

    pub fn supply_key(mut self, key: PublicKey) -> Self {
        self.data_mut().keys.supply = Some(key);
        self
    }

    /// Replace all optional keys at once.
    pub fn keys(mut self, keys: TokenKeys) -> Self {
        self.data_mut().keys = keys;
        self
    }

    pub fn freeze_default(mut self, freeze: bool) -> Self {
        self.data_mut().freeze_default = freeze;
        self
    }

    pub fn auto_renew_account_id(mut self, account: AccountId) -> Self {
        self.data_mut().auto_renew_account = Some(account);
        self
    }

    pub fn token_memo(mut self, memo: impl Into<String>) -> Self {
        self.data_mut().token_memo = memo.into();
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct TokenMintData {
    token_id: Option<TokenId>,
    amount: u64,
    metadata: Vec<Vec<u8>>,
}

impl TransactionData for TokenMintData {
    const METHOD: ApiMethod = ApiMethod::MintToken;

    fn validate(&self) -> LedgerResult<()> {
        if self.token_id.is_none() {
            return Err(LedgerError::InvalidArgument(
                "mint requires a token id".to_string(),
            ));
        }
        match (self.amount, self.metadata.len()) {
            (0, 0) => Err(LedgerError::InvalidArgument(
                "mint needs an amount or NFT metadata".to_string(),
            )),
            (0, n) if n > MAX_NFT_MINT_BATCH => Err(LedgerError::InvalidArgument(format!(
                "{} NFTs in one mint, limit is {}",
                n, MAX_NFT_MINT_BATCH
            ))),
            (0, _) => {
                if let Some(too_long) = self
                    .metadata
                    .iter()
                    .find(|m| m.len() > MAX_NFT_METADATA_BYTES)
                {
                    return Err(LedgerError::InvalidArgument(format!(
                        "NFT metadata is {} bytes, limit is {}",
                        too_long.len(),
                        MAX_NFT_METADATA_BYTES
                    )));
                }
                Ok(())
            }
            (_, 0) => Ok(()),
            _ => Err(LedgerError::InvalidArgument(
                "mint takes an amount or NFT metadata, not both".to_string(),
            )),
        }
    }

    fn to_body_data(&self) -> LedgerResult<proto::transaction_body::Data> {
        Ok(proto::transaction_body::Data::TokenMint(
            proto::TokenMintTransactionBody {
                token: self.token_id.map(Into::into),
                amount: self.amount,
                metadata: self.metadata.clone(),
            },
        ))
    }
}

/// Mints fungible supply or a batch of NFT serials. Signed by the supply key.
pub type TokenMintTransaction = Transaction<TokenMintData>;

impl Transaction<TokenMintData> {
    pub fn token_id(mut self, id: TokenId) -> Self {
        self.data_mut().token_id = Some(id);
        self
    }

    /// Fungible amount, in the token's smallest unit.
    pub fn amount(mut self, amount: u64) -> Self {
        self.data_mut().amount = amount;
        self
    }

    /// One entry per NFT serial to mint.
    pub fn metadata<I, M>(mut self, metadata: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<Vec<u8>>,
    {
        self.data_mut().metadata = metadata.into_iter().map(Into::into).collect();
        self
    }
}
