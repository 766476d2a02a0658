//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that ids, keys, URLs, and the network name parse
//! - Validate value ranges and network limits
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: StarterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::StarterConfig;
use crate::ledger::consensus::MAX_MESSAGE_BYTES;
use crate::ledger::token::{MAX_NFT_METADATA_BYTES, MAX_NFT_MINT_BATCH};
use crate::ledger::{AccountId, NetworkName, PrivateKey};

/// A single invalid field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Validate a fully loaded configuration.
pub fn validate_config(config: &StarterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match config.operator.account_id.as_deref() {
        None | Some("") => errors.push(ValidationError::new(
            "operator.account_id",
            "missing; set ACCOUNT_ID",
        )),
        Some(id) => {
            if id.parse::<AccountId>().is_err() {
                errors.push(ValidationError::new(
                    "operator.account_id",
                    format!("'{}' is not shard.realm.num", id),
                ));
            }
        }
    }
    match config.operator.private_key_hex.as_deref() {
        None | Some("") => errors.push(ValidationError::new(
            "operator.private_key_hex",
            "missing; set PRIVATE_KEY_HEX",
        )),
        Some(key) => {
            // The parse error never echoes the key.
            if let Err(e) = PrivateKey::from_str_ecdsa(key) {
                errors.push(ValidationError::new("operator.private_key_hex", e.to_string()));
            }
        }
    }

    if let Err(e) = config.network.name.parse::<NetworkName>() {
        errors.push(ValidationError::new("network.name", e.to_string()));
    }
    for (i, node) in config.network.nodes.iter().enumerate() {
        if node.account_id.parse::<AccountId>().is_err() {
            errors.push(ValidationError::new(
                &format!("network.nodes[{}].account_id", i),
                format!("'{}' is not shard.realm.num", node.account_id),
            ));
        }
        if !node.endpoint.contains(':') {
            errors.push(ValidationError::new(
                &format!("network.nodes[{}].endpoint", i),
                "must be host:port",
            ));
        }
    }
    if let Some(mirror) = &config.network.mirror_endpoint {
        if !mirror.contains(':') {
            errors.push(ValidationError::new("network.mirror_endpoint", "must be host:port"));
        }
    }

    if config.fees.max_transaction_fee_hbar <= 0 {
        errors.push(ValidationError::new(
            "fees.max_transaction_fee_hbar",
            "must be positive",
        ));
    }
    if config.fees.max_query_payment_hbar < 0 {
        errors.push(ValidationError::new(
            "fees.max_query_payment_hbar",
            "must not be negative",
        ));
    }

    for (field, value) in [
        ("timeouts.connect_secs", config.timeouts.connect_secs),
        ("timeouts.request_secs", config.timeouts.request_secs),
        ("timeouts.receipt_secs", config.timeouts.receipt_secs),
        ("timeouts.receipt_poll_ms", config.timeouts.receipt_poll_ms),
    ] {
        if value == 0 {
            errors.push(ValidationError::new(field, "must be greater than zero"));
        }
    }

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::new("retries.max_attempts", "must be at least 1"));
    }
    if config.retries.base_delay_ms > config.retries.max_delay_ms {
        errors.push(ValidationError::new(
            "retries.base_delay_ms",
            "must not exceed retries.max_delay_ms",
        ));
    }

    match url::Url::parse(&config.explorer.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            "explorer.base_url",
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new("explorer.base_url", e.to_string())),
    }

    let message_len = config.consensus.message.len();
    if message_len == 0 || message_len > MAX_MESSAGE_BYTES {
        errors.push(ValidationError::new(
            "consensus.message",
            format!("must be 1..={} bytes, got {}", MAX_MESSAGE_BYTES, message_len),
        ));
    }

    if config.contract.deploy_gas == 0 {
        errors.push(ValidationError::new("contract.deploy_gas", "must be greater than zero"));
    }
    if config.contract.call_gas == 0 {
        errors.push(ValidationError::new("contract.call_gas", "must be greater than zero"));
    }

    if config.token.name.is_empty() {
        errors.push(ValidationError::new("token.name", "must not be empty"));
    }
    if config.token.symbol.is_empty() {
        errors.push(ValidationError::new("token.symbol", "must not be empty"));
    }
    if config.token.max_supply <= 0 {
        errors.push(ValidationError::new("token.max_supply", "must be positive"));
    }
    if config.token.treasury_balance_hbar < 0 {
        errors.push(ValidationError::new(
            "token.treasury_balance_hbar",
            "must not be negative",
        ));
    }
    let count = config.token.metadata.len();
    if count == 0 || count > MAX_NFT_MINT_BATCH {
        errors.push(ValidationError::new(
            "token.metadata",
            format!("must have 1..={} entries, got {}", MAX_NFT_MINT_BATCH, count),
        ));
    }
    for (i, entry) in config.token.metadata.iter().enumerate() {
        if entry.len() > MAX_NFT_METADATA_BYTES {
            errors.push(ValidationError::new(
                &format!("token.metadata[{}]", i),
                format!("is {} bytes, limit is {}", entry.len(), MAX_NFT_METADATA_BYTES),
            ));
        }
    }

    if !LOG_LEVELS.contains(&config.observability.log_level.to_ascii_lowercase().as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("'{}' is not one of {}", config.observability.log_level, LOG_LEVELS.join(", ")),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
