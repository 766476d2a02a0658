//! Address books for the public networks and a local node.

use std::fmt;
use std::str::FromStr;

use crate::ledger::types::{AccountId, LedgerError};

/// A consensus node: its account (paid for transactions) and gRPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeAddress {
    pub account_id: AccountId,
    pub endpoint: String,
}

impl NodeAddress {
    pub fn new(account_num: u64, endpoint: &str) -> Self {
        Self {
            account_id: AccountId::new(0, 0, account_num),
            endpoint: endpoint.to_string(),
        }
    }
}

/// Mirror node gRPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorEndpoint {
    /// `host:port`.
    pub endpoint: String,
    /// Whether the endpoint is served over TLS.
    pub tls: bool,
}

/// Named network a client can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkName {
    Mainnet,
    Testnet,
    Previewnet,
    /// A local node started from the ledger's local-node tooling.
    Local,
}

impl NetworkName {
    /// Name used in explorer URLs and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkName::Mainnet => "mainnet",
            NetworkName::Testnet => "testnet",
            NetworkName::Previewnet => "previewnet",
            NetworkName::Local => "local",
        }
    }

    /// Built-in consensus node list.
    pub fn nodes(&self) -> Vec<NodeAddress> {
        match self {
            NetworkName::Mainnet => vec![
                NodeAddress::new(3, "35.237.200.180:50211"),
                NodeAddress::new(4, "35.186.191.247:50211"),
                NodeAddress::new(5, "35.192.2.25:50211"),
                NodeAddress::new(6, "35.199.161.108:50211"),
                NodeAddress::new(7, "35.203.82.240:50211"),
                NodeAddress::new(8, "35.236.5.219:50211"),
                NodeAddress::new(9, "35.197.192.225:50211"),
            ],
            NetworkName::Testnet => vec![
                NodeAddress::new(3, "0.testnet.hedera.com:50211"),
                NodeAddress::new(4, "1.testnet.hedera.com:50211"),
                NodeAddress::new(5, "2.testnet.hedera.com:50211"),
                NodeAddress::new(6, "3.testnet.hedera.com:50211"),
            ],
            NetworkName::Previewnet => vec![
                NodeAddress::new(3, "0.previewnet.hedera.com:50211"),
                NodeAddress::new(4, "1.previewnet.hedera.com:50211"),
                NodeAddress::new(5, "2.previewnet.hedera.com:50211"),
                NodeAddress::new(6, "3.previewnet.hedera.com:50211"),
            ],
            NetworkName::Local => vec![NodeAddress::new(3, "127.0.0.1:50211")],
        }
    }

    /// Built-in mirror node endpoint.
    pub fn mirror(&self) -> MirrorEndpoint {
        let (endpoint, tls) = match self {
            NetworkName::Mainnet => ("mainnet-public.mirrornode.hedera.com:443", true),
            NetworkName::Testnet => ("testnet.mirrornode.hedera.com:443", true),
            NetworkName::Previewnet => ("previewnet.mirrornode.hedera.com:443", true),
            NetworkName::Local => ("127.0.0.1:5600", false),
        };
        MirrorEndpoint {
            endpoint: endpoint.to_string(),
            tls,
        }
    }
}

impl FromStr for NetworkName {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(NetworkName::Mainnet),
            "testnet" => Ok(NetworkName::Testnet),
            "previewnet" => Ok(NetworkName::Previewnet),
            "local" | "local-node" | "localhost" => Ok(NetworkName::Local),
            other => Err(LedgerError::InvalidArgument(format!(
                "unknown network '{}' (expected mainnet, testnet, previewnet or local)",
                other
            ))),
        }
    }
}

impl fmt::Display for NetworkName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_network_names() {
        assert_eq!("testnet".parse::<NetworkName>().unwrap(), NetworkName::Testnet);
        assert_eq!("MAINNET".parse::<NetworkName>().unwrap(), NetworkName::Mainnet);
        assert_eq!("local-node".parse::<NetworkName>().unwrap(), NetworkName::Local);
        assert!("devnet".parse::<NetworkName>().is_err());
    }

    #[test]
    fn test_address_books_start_at_node_three() {
        for name in [
            NetworkName::Mainnet,
            NetworkName::Testnet,
            NetworkName::Previewnet,
            NetworkName::Local,
        ] {
            let nodes = name.nodes();
            assert!(!nodes.is_empty());
            assert_eq!(nodes[0].account_id, AccountId::new(0, 0, 3));
        }
        assert!(NetworkName::Testnet.mirror().tls);
        assert!(!NetworkName::Local.mirror().tls);
    }
}
