//! Ring-based replication strategy.
//!
//! Delegates placement to the ring's own `preference_list`: the
//! primary is the first node clockwise from the key's token, and the
//! remaining `replication_factor - 1` replicas continue clockwise,
//! skipping nodes already chosen.
//!
//! # Limitations
//!
//! Doesn't consider data center/rack placement; two replicas can land
//! in the same failure domain. Rack-aware placement is future work,
//! not required here.

use crate::strategy::ReplicationStrategy;
use corelib::node::NodeId;
use corelib::ring::Ring;

/// Places `replication_factor` replicas sequentially around the ring.
#[derive(Debug, Clone)]
pub struct RingStrategy {
    replication_factor: usize,
}

impl RingStrategy {
    pub fn new(replication_factor: usize) -> Self {
        Self { replication_factor }
    }
}

impl Default for RingStrategy {
    fn default() -> Self {
        Self::new(3)
    }
}

impl ReplicationStrategy for RingStrategy {
    fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    fn replicas_for_key(&self, ring: &Ring, key: &[u8]) -> Vec<NodeId> {
        ring.preference_list(key, self.replication_factor)
    }

    fn name(&self) -> &'static str {
        "RingStrategy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use corelib::node::Node;
    use corelib::ring::RingBuilder;

    fn ring() -> Ring {
        RingBuilder::new()
            .with_vnodes(16)
            .add_node(Node::new(NodeId::from("node1"), "node1"))
            .add_node(Node::new(NodeId::from("node2"), "node2"))
            .add_node(Node::new(NodeId::from("node3"), "node3"))
            .build()
    }

    #[test]
    fn replication_factor_matches_constructor() {
        let strategy = RingStrategy::new(3);
        assert_eq!(strategy.replication_factor(), 3);
    }

    #[test]
    fn replicas_for_key_are_distinct() {
        let strategy = RingStrategy::new(3);
        let replicas = strategy.replicas_for_key(&ring(), b"test-key");

        assert_eq!(replicas.len(), 3);
        let unique: std::collections::HashSet<_> = replicas.iter().collect();
        assert_eq!(unique.len(), 3);
    }

    #[test]
    fn deterministic_for_the_same_key() {
        let strategy = RingStrategy::new(3);
        let a = strategy.replicas_for_key(&ring(), b"test-key");
        let b = strategy.replicas_for_key(&ring(), b"test-key");
        assert_eq!(a, b);
    }
}
