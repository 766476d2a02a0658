//! Startup orchestration.
//!
//! # Responsibilities
//! - Turn a validated `StarterConfig` into client settings and an operator
//! - Resolve the node list and mirror endpoint, honouring overrides
//! - Build the client and explorer the scenarios run against
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Configuration is loaded and logging initialised before this runs

use std::time::Duration;

use crate::config::schema::NetworkConfig;
use crate::config::StarterConfig;
use crate::explorer::Explorer;
use crate::ledger::{
    AccountId, Client, ClientSettings, Hbar, LedgerError, LedgerResult, MirrorEndpoint,
    NetworkName, NodeAddress, Operator, PrivateKey,
};
use crate::resilience::RetryPolicy;
use crate::scenarios::ScenarioContext;

/// Client-wide settings from the fee, timeout, and retry sections.
pub fn client_settings(config: &StarterConfig) -> ClientSettings {
    ClientSettings {
        max_transaction_fee: Hbar::new(config.fees.max_transaction_fee_hbar),
        max_query_payment: Hbar::new(config.fees.max_query_payment_hbar),
        connect_timeout: Duration::from_secs(config.timeouts.connect_secs),
        request_timeout: Duration::from_secs(config.timeouts.request_secs),
        receipt_timeout: Duration::from_secs(config.timeouts.receipt_secs),
        receipt_poll_interval: Duration::from_millis(config.timeouts.receipt_poll_ms),
        node_cooldown: Duration::from_secs(config.retries.node_cooldown_secs),
        retry: RetryPolicy {
            max_attempts: config.retries.max_attempts,
            base_delay_ms: config.retries.base_delay_ms,
            max_delay_ms: config.retries.max_delay_ms,
        },
    }
}

/// Operator account and key.
pub fn operator(config: &StarterConfig) -> LedgerResult<Operator> {
    let account_id = config
        .operator
        .account_id
        .as_deref()
        .ok_or(LedgerError::MissingField("operator.account_id"))?
        .parse::<AccountId>()?;
    let key_hex = config
        .operator
        .private_key_hex
        .as_deref()
        .ok_or(LedgerError::MissingField("operator.private_key_hex"))?;
    Ok(Operator {
        account_id,
        key: PrivateKey::from_str_ecdsa(key_hex)?,
    })
}

/// Node list and mirror endpoint, with config overrides applied.
pub fn resolve_network(
    network: &NetworkConfig,
) -> LedgerResult<(NetworkName, Vec<NodeAddress>, MirrorEndpoint)> {
    let name: NetworkName = network.name.parse()?;

    let nodes = if network.nodes.is_empty() {
        name.nodes()
    } else {
        network
            .nodes
            .iter()
            .map(|node| {
                Ok(NodeAddress {
                    account_id: node.account_id.parse()?,
                    endpoint: node.endpoint.clone(),
                })
            })
            .collect::<LedgerResult<Vec<_>>>()?
    };

    let mirror = match &network.mirror_endpoint {
        Some(endpoint) => MirrorEndpoint {
            endpoint: endpoint.clone(),
            tls: network.mirror_tls.unwrap_or(name.mirror().tls),
        },
        None => name.mirror(),
    };

    Ok((name, nodes, mirror))
}

/// Build the client and explorer for a loaded configuration.
pub fn build_context(config: StarterConfig) -> LedgerResult<ScenarioContext> {
    let (network, nodes, mirror) = resolve_network(&config.network)?;
    let client = Client::for_nodes(nodes, &mirror, operator(&config)?, client_settings(&config))?;
    let explorer = Explorer::new(&config.explorer.base_url, network)?;

    tracing::info!(
        network = %network,
        mirror = %mirror.endpoint,
        "Startup complete"
    );
    Ok(ScenarioContext {
        client,
        config,
        explorer,
    })
}
