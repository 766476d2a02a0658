//! Round-robin node selection with passive failure tracking.
//!
//! # Responsibilities
//! - Rotate requests across the consensus node list
//! - Skip nodes that recently failed (busy, unreachable, timed out)
//! - Fall back to the full list when every node is cooling down

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::ledger::network::NodeAddress;

/// A node plus its passive health state.
#[derive(Debug)]
pub struct Node {
    pub address: NodeAddress,
    /// Consecutive failure count.
    consecutive_failures: AtomicUsize,
    /// Millis since selector creation before which the node is skipped.
    unhealthy_until_ms: AtomicU64,
}

impl Node {
    fn new(address: NodeAddress) -> Self {
        Self {
            address,
            consecutive_failures: AtomicUsize::new(0),
            unhealthy_until_ms: AtomicU64::new(0),
        }
    }

    pub fn consecutive_failures(&self) -> usize {
        self.consecutive_failures.load(Ordering::Relaxed)
    }
}

/// Round-robin selector.
/// Stores an internal counter to rotate through nodes.
#[derive(Debug)]
pub struct NodeSelector {
    nodes: Vec<Arc<Node>>,
    counter: AtomicUsize,
    epoch: Instant,
    base_cooldown: Duration,
}

impl NodeSelector {
    pub fn new(nodes: Vec<NodeAddress>, base_cooldown: Duration) -> Self {
        Self {
            nodes: nodes.into_iter().map(|n| Arc::new(Node::new(n))).collect(),
            counter: AtomicUsize::new(0),
            epoch: Instant::now(),
            base_cooldown,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Next node in rotation, preferring nodes not cooling down.
    pub fn next_node(&self) -> Option<Arc<Node>> {
        if self.nodes.is_empty() {
            return None;
        }

        let start_count = self.counter.fetch_add(1, Ordering::Relaxed);
        let len = self.nodes.len();
        let now = self.now_ms();

        for i in 0..len {
            let node = &self.nodes[(start_count + i) % len];
            if node.unhealthy_until_ms.load(Ordering::Relaxed) <= now {
                return Some(node.clone());
            }
        }

        // Everything is cooling down; rotate anyway rather than stall.
        Some(self.nodes[start_count % len].clone())
    }

    /// Find the node serving `address`, for follow-up queries such as receipts.
    pub fn node_for(&self, address: &NodeAddress) -> Option<Arc<Node>> {
        self.nodes.iter().find(|n| &n.address == address).cloned()
    }

    pub fn mark_success(&self, node: &Node) {
        node.consecutive_failures.store(0, Ordering::Relaxed);
        node.unhealthy_until_ms.store(0, Ordering::Relaxed);
    }

    /// Record a failure; cooldown doubles with each consecutive failure.
    pub fn mark_failure(&self, node: &Node) {
        let failures = node.consecutive_failures.fetch_add(1, Ordering::Relaxed) + 1;
        let factor = 1u64 << (failures.min(6) as u32 - 1);
        let cooldown = self.base_cooldown.as_millis() as u64 * factor;
        node.unhealthy_until_ms
            .store(self.now_ms() + cooldown, Ordering::Relaxed);
        tracing::debug!(
            node = %node.address.account_id,
            failures = failures,
            cooldown_ms = cooldown,
            "Node marked unhealthy"
        );
    }

    fn now_ms(&self) -> u64 {
        self.epoch.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> NodeSelector {
        NodeSelector::new(
            vec![
                NodeAddress::new(3, "127.0.0.1:50211"),
                NodeAddress::new(4, "127.0.0.1:50212"),
            ],
            Duration::from_secs(60),
        )
    }

    #[test]
    fn test_round_robin() {
        let selector = selector();

        let s1 = selector.next_node().unwrap();
        assert_eq!(s1.address.account_id.num(), 3);

        let s2 = selector.next_node().unwrap();
        assert_eq!(s2.address.account_id.num(), 4);

        let s3 = selector.next_node().unwrap();
        assert_eq!(s3.address.account_id.num(), 3);
    }

    #[test]
    fn test_failed_node_is_skipped() {
        let selector = selector();
        let first = selector.next_node().unwrap();
        selector.mark_failure(&first);
        assert_eq!(first.consecutive_failures(), 1);

        for _ in 0..4 {
            assert_eq!(selector.next_node().unwrap().address.account_id.num(), 4);
        }

        selector.mark_success(&first);
        assert_eq!(first.consecutive_failures(), 0);
    }

    #[test]
    fn test_all_failed_still_rotates() {
        let selector = selector();
        for _ in 0..2 {
            let node = selector.next_node().unwrap();
            selector.mark_failure(&node);
        }
        assert!(selector.next_node().is_some());
    }

    #[test]
    fn test_empty_selector() {
        let selector = NodeSelector::new(Vec::new(), Duration::from_secs(1));
        assert!(selector.is_empty());
        assert!(selector.next_node().is_none());
    }
}
