//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the starter.
//! All types derive Serde traits for deserialization from config files, and
//! every field has a default so an empty file (or no file) is valid.

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct StarterConfig {
    /// Paying account. Normally supplied through the environment.
    pub operator: OperatorConfig,

    /// Target network and optional address-book overrides.
    pub network: NetworkConfig,

    /// Default fee caps.
    pub fees: FeeConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Retry configuration.
    pub retries: RetryConfig,

    /// Pauses between scenario steps.
    pub delays: DelayConfig,

    /// Explorer link settings.
    pub explorer: ExplorerConfig,

    pub consensus: ConsensusConfig,

    pub contract: ContractConfig,

    pub token: TokenConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Operator credentials.
#[derive(Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct OperatorConfig {
    /// Account id, `shard.realm.num`.
    pub account_id: Option<String>,

    /// ECDSA private key, raw or DER hex.
    pub private_key_hex: Option<String>,
}

impl std::fmt::Debug for OperatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OperatorConfig")
            .field("account_id", &self.account_id)
            .field(
                "private_key_hex",
                &self.private_key_hex.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Network selection.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// `mainnet`, `testnet`, `previewnet`, or `local`.
    pub name: String,

    /// Replaces the built-in node list when non-empty.
    pub nodes: Vec<NodeConfig>,

    /// Replaces the built-in mirror endpoint (`host:port`).
    pub mirror_endpoint: Option<String>,

    /// Whether the mirror override uses TLS. Unset follows the network:
    /// plaintext for `local`, TLS for the public networks.
    pub mirror_tls: Option<bool>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "testnet".to_string(),
            nodes: Vec::new(),
            mirror_endpoint: None,
            mirror_tls: None,
        }
    }
}

/// A consensus node override.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NodeConfig {
    /// Node account id (e.g. "0.0.3").
    pub account_id: String,

    /// gRPC endpoint (e.g. "127.0.0.1:50211").
    pub endpoint: String,
}

/// Fee caps, in whole hbars.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeeConfig {
    pub max_transaction_fee_hbar: i64,
    pub max_query_payment_hbar: i64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            max_transaction_fee_hbar: 100,
            max_query_payment_hbar: 50,
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Single node call timeout in seconds.
    pub request_secs: u64,

    /// Time allowed for a receipt to become final, in seconds.
    pub receipt_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub receipt_poll_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            request_secs: 10,
            receipt_secs: 120,
            receipt_poll_ms: 500,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per request, across nodes.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// Base time a failing node is skipped, in seconds.
    pub node_cooldown_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 10,
            base_delay_ms: 250,
            max_delay_ms: 8000,
            node_cooldown_secs: 30,
        }
    }
}

/// Scenario pauses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DelayConfig {
    /// Wait after creating a topic so the mirror node knows it.
    pub mirror_propagation_secs: u64,

    /// How long the consensus scenario keeps its subscription open.
    pub subscription_hold_secs: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            mirror_propagation_secs: 5,
            subscription_hold_secs: 15,
        }
    }
}

/// Explorer link settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub base_url: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://hashscan.io".to_string(),
        }
    }
}

/// Consensus scenario settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsensusConfig {
    pub message: String,
    pub topic_memo: String,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            message: "Hello, HCS!".to_string(),
            topic_memo: String::new(),
        }
    }
}

/// Contract scenario settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Compiled bytecode, hex text or raw bytes.
    pub bytecode_path: String,

    /// Gas for deployment.
    pub deploy_gas: u64,

    /// Gas for calls and executes.
    pub call_gas: u64,

    /// Constructor entry.
    pub initial_name: String,
    pub initial_number: u64,

    /// Entry written by the execute step.
    pub update_name: String,
    pub update_number: u64,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            bytecode_path: "LookupContract.bin".to_string(),
            deploy_gas: 400_000,
            call_gas: 100_000,
            initial_name: "Alice".to_string(),
            initial_number: 111_111,
            update_name: "Bob".to_string(),
            update_number: 222_222,
        }
    }
}

/// Token scenario settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub max_supply: i64,

    /// Initial balance of the treasury account, in whole hbars.
    pub treasury_balance_hbar: i64,

    /// One entry per NFT to mint.
    pub metadata: Vec<String>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            name: "CARBON OFFSETS".to_string(),
            symbol: "CO2OFFS".to_string(),
            max_supply: 10_000,
            treasury_balance_hbar: 1,
            metadata: vec![
                "ipfs://bafyreiao6ajgsfji6qsgbqwdtjdu5gmul7tv2v3pd6kjgcw5o65b2ogst4/metadata.json".to_string(),
                "ipfs://bafyreic463uarchq4mlufp7pvfkfut7zeqsqmn3b2x3jjxwcjqx6b5pk7q/metadata.json".to_string(),
                "ipfs://bafyreihhja55q6h2rijscl3gra7a3ntiroyglz45z5wlyxdzs6kjh2dinu/metadata.json".to_string(),
                "ipfs://bafyreidb23oehkttjbff3gdi4vz7mjijcxjyxadwg32pyj6vtzwumrbk2m/metadata.json".to_string(),
                "ipfs://bafyreie7ftl6erd5etz5gscfwfiwjmht3b52cevdrf7hjwxx5ddns7zneu/metadata.json".to_string(),
            ],
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
