//! Ledger client: operator, node list, fee caps, and shutdown.
//!
//! # Responsibilities
//! - Own the transport and the node selector
//! - Hold the operator that pays for and signs every request
//! - Carry default fee caps, timeouts, and the retry policy
//! - Broadcast shutdown to live subscriptions on close

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;

use crate::ledger::network::{MirrorEndpoint, NetworkName, NodeAddress};
use crate::ledger::selector::NodeSelector;
use crate::ledger::transport::{GrpcTransport, Transport, TransportSettings};
use crate::ledger::types::{AccountId, Hbar, LedgerError, LedgerResult};
use crate::ledger::wallet::{PrivateKey, PublicKey};
use crate::lifecycle::Shutdown;
use crate::resilience::RetryPolicy;

/// Account that pays for and signs requests.
#[derive(Debug, Clone)]
pub struct Operator {
    pub account_id: AccountId,
    pub key: PrivateKey,
}

/// Client-wide defaults.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub max_transaction_fee: Hbar,
    pub max_query_payment: Hbar,
    pub connect_timeout: Duration,
    /// Deadline for a single node call.
    pub request_timeout: Duration,
    /// Total time allowed for a receipt to become final.
    pub receipt_timeout: Duration,
    pub receipt_poll_interval: Duration,
    /// Base cooldown for a node after a failed attempt.
    pub node_cooldown: Duration,
    pub retry: RetryPolicy,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            max_transaction_fee: Hbar::new(100),
            max_query_payment: Hbar::new(50),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
            receipt_timeout: Duration::from_secs(120),
            receipt_poll_interval: Duration::from_millis(500),
            node_cooldown: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

struct ClientInner<T> {
    transport: T,
    selector: NodeSelector,
    operator: Operator,
    settings: ClientSettings,
    shutdown: Shutdown,
}

/// Handle to a ledger network. Cheap to clone.
pub struct Client<T: Transport = GrpcTransport> {
    inner: Arc<ClientInner<T>>,
}

impl<T: Transport> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Client<GrpcTransport> {
    /// Client for one of the built-in networks.
    pub fn for_network(
        network: NetworkName,
        operator: Operator,
        settings: ClientSettings,
    ) -> LedgerResult<Self> {
        Self::for_nodes(network.nodes(), &network.mirror(), operator, settings)
    }

    /// Client for an explicit node list and mirror endpoint.
    pub fn for_nodes(
        nodes: Vec<NodeAddress>,
        mirror: &MirrorEndpoint,
        operator: Operator,
        settings: ClientSettings,
    ) -> LedgerResult<Self> {
        let transport = GrpcTransport::new(
            mirror,
            TransportSettings {
                connect_timeout: settings.connect_timeout,
                request_timeout: settings.request_timeout,
            },
        )?;
        Self::with_transport(transport, nodes, operator, settings)
    }
}

impl<T: Transport> Client<T> {
    /// Client over any transport.
    pub fn with_transport(
        transport: T,
        nodes: Vec<NodeAddress>,
        operator: Operator,
        settings: ClientSettings,
    ) -> LedgerResult<Self> {
        if nodes.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "client needs at least one consensus node".to_string(),
            ));
        }

        tracing::info!(
            operator = %operator.account_id,
            nodes = nodes.len(),
            max_transaction_fee = %settings.max_transaction_fee,
            max_query_payment = %settings.max_query_payment,
            "Ledger client initialized"
        );

        Ok(Self {
            inner: Arc::new(ClientInner {
                transport,
                selector: NodeSelector::new(nodes, settings.node_cooldown),
                operator,
                settings,
                shutdown: Shutdown::new(),
            }),
        })
    }

    pub fn operator_account_id(&self) -> AccountId {
        self.inner.operator.account_id
    }

    pub fn operator_public_key(&self) -> PublicKey {
        self.inner.operator.key.public_key()
    }

    pub(crate) fn operator_key(&self) -> &PrivateKey {
        &self.inner.operator.key
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.inner.settings
    }

    pub(crate) fn transport(&self) -> &T {
        &self.inner.transport
    }

    pub(crate) fn selector(&self) -> &NodeSelector {
        &self.inner.selector
    }

    /// Receiver that fires once when the client is closed.
    pub fn subscribe_shutdown(&self) -> broadcast::Receiver<()> {
        self.inner.shutdown.subscribe()
    }

    /// Close the client. Live subscriptions stop; later requests fail with
    /// [`LedgerError::ClientClosed`]. Closing twice is a no-op.
    pub fn close(&self) {
        if self.inner.shutdown.trigger() {
            tracing::info!(
                subscriptions = self.inner.shutdown.receiver_count(),
                "Ledger client closed"
            );
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.shutdown.is_triggered()
    }

    pub(crate) fn ensure_open(&self) -> LedgerResult<()> {
        if self.is_closed() {
            return Err(LedgerError::ClientClosed);
        }
        Ok(())
    }
}
