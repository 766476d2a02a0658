//! Network explorer links.

use std::fmt::Display;

use url::Url;

use crate::ledger::types::{LedgerError, LedgerResult};
use crate::ledger::{AccountId, ContractId, NetworkName, TokenId, TopicId, TransactionId};

/// Builds HashScan-style links for one network.
#[derive(Debug, Clone)]
pub struct Explorer {
    base: String,
    network: NetworkName,
}

impl Explorer {
    pub fn new(base_url: &str, network: NetworkName) -> LedgerResult<Self> {
        let url = Url::parse(base_url)
            .map_err(|e| LedgerError::InvalidArgument(format!("explorer url '{}': {}", base_url, e)))?;
        Ok(Self {
            base: url.as_str().trim_end_matches('/').to_string(),
            network,
        })
    }

    fn link(&self, kind: &str, id: impl Display) -> String {
        format!("{}/{}/{}/{}", self.base, self.network, kind, id)
    }

    pub fn account(&self, id: AccountId) -> String {
        self.link("account", id)
    }

    pub fn topic(&self, id: TopicId) -> String {
        self.link("topic", id)
    }

    pub fn token(&self, id: TokenId) -> String {
        self.link("token", id)
    }

    pub fn nft(&self, id: TokenId, serial: i64) -> String {
        format!("{}/{}", self.token(id), serial)
    }

    pub fn contract(&self, id: ContractId) -> String {
        self.link("contract", id)
    }

    pub fn transaction(&self, id: &TransactionId) -> String {
        self.link("tx", id)
    }
}
