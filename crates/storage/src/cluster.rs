//! A `ReplicaTransport` backed by real in-process replica actors.
//!
//! This is the capability-interface implementation the coordinator and
//! synchronizer are written against: swap it for a fault-injecting or
//! networked transport without either of those crates noticing.

use crate::replica::{spawn_replica, ReplicaHandle};
use async_trait::async_trait;
use corelib::{Config, GetOutcome, MerkleTree, NodeFailMode, NodeId, PutOutcome, ReplicaTransport, VectorClock, Versioned};
use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

/// One actor per node, plus the `node_fail_mode` injection switch read
/// at put time.
pub struct ReplicaCluster {
    handles: HashMap<NodeId, ReplicaHandle>,
    fail_mode: RwLock<NodeFailMode>,
    /// Nodes that fail under `NodeFailMode::Partial`.
    partial_failing: RwLock<HashSet<NodeId>>,
}

impl ReplicaCluster {
    /// Spawns one replica actor per node.
    pub fn new(nodes: &[NodeId], config: &Config) -> Self {
        let handles = nodes
            .iter()
            .map(|id| (id.clone(), spawn_replica(id.clone())))
            .collect();

        Self {
            handles,
            fail_mode: RwLock::new(config.node_fail_mode),
            partial_failing: RwLock::new(HashSet::new()),
        }
    }

    pub fn set_fail_mode(&self, mode: NodeFailMode) {
        *self.fail_mode.write().unwrap() = mode;
    }

    /// Declares which nodes fail puts under `NodeFailMode::Partial`.
    pub fn set_partial_failing(&self, nodes: impl IntoIterator<Item = NodeId>) {
        *self.partial_failing.write().unwrap() = nodes.into_iter().collect();
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.handles.keys().cloned().collect()
    }

    fn should_fail_put(&self, node: &NodeId) -> bool {
        match *self.fail_mode.read().unwrap() {
            NodeFailMode::AlwaysSucceed => false,
            NodeFailMode::AlwaysFail => true,
            NodeFailMode::Partial => self.partial_failing.read().unwrap().contains(node),
        }
    }
}

#[async_trait]
impl ReplicaTransport for ReplicaCluster {
    async fn get(&self, node: &NodeId, key: &[u8]) -> GetOutcome {
        let Some(handle) = self.handles.get(node) else {
            return GetOutcome::Fatal(format!("unknown node {node}"));
        };
        match handle.get(key.to_vec()).await {
            Some(versioned) => GetOutcome::Found(versioned),
            None => GetOutcome::NotFound,
        }
    }

    async fn put(
        &self,
        node: &NodeId,
        key: &[u8],
        value: Vec<u8>,
        vc: VectorClock,
        timestamp: u64,
    ) -> PutOutcome {
        let Some(handle) = self.handles.get(node) else {
            return PutOutcome::Fatal(format!("unknown node {node}"));
        };

        if self.should_fail_put(node) {
            return PutOutcome::Fatal(format!("node {node} is injected to fail puts"));
        }

        let versioned = Versioned {
            value,
            vc,
            timestamp,
        };
        match handle.put(key.to_vec(), versioned).await {
            Some(value) => PutOutcome::Ok(value),
            None => PutOutcome::Transient(format!("replica actor for {node} is gone")),
        }
    }

    async fn get_all(&self, node: &NodeId) -> Option<Vec<(Vec<u8>, Versioned)>> {
        self.handles.get(node)?.get_all().await
    }

    async fn get_merkle(&self, node: &NodeId) -> Option<MerkleTree> {
        self.handles.get(node)?.get_merkle().await
    }
}
