//! Anti-entropy: a long-lived task that walks the ring and pairwise
//! reconciles replicas using Merkle diffs, falling back to a full sync
//! when a tree is unavailable within the fetch deadline.

use corelib::{GetOutcome, NodeId, ReplicaTransport, Ring};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

pub struct Synchronizer {
    transport: Arc<dyn ReplicaTransport>,
    sync_interval_ms: u64,
    merkle_fetch_timeout_ms: u64,
}

impl Synchronizer {
    pub fn new(
        transport: Arc<dyn ReplicaTransport>,
        sync_interval_ms: u64,
        merkle_fetch_timeout_ms: u64,
    ) -> Self {
        Self {
            transport,
            sync_interval_ms,
            merkle_fetch_timeout_ms,
        }
    }

    /// Runs forever, sweeping the current `ring` once per interval.
    /// `ring` is re-read from the watch on every tick so a topology
    /// change picked up between sweeps is honored on the next one.
    pub async fn run(&self, ring: tokio::sync::watch::Receiver<Ring>) {
        let mut interval = tokio::time::interval(Duration::from_millis(self.sync_interval_ms));
        loop {
            interval.tick().await;
            let snapshot = ring.borrow().clone();
            self.sync(&snapshot).await;
        }
    }

    /// One full pass, synchronous for tests: reconciles every distinct
    /// `(n, replica)` pair implied by the ring's preference lists.
    #[instrument(skip(self, ring))]
    pub async fn sync(&self, ring: &Ring) {
        for pair in self.replica_pairs(ring) {
            self.sync_pair(&pair.0, &pair.1).await;
        }
    }

    /// Reconciles just the pairs where `source` is the sync source,
    /// i.e. the directed half of `sync` rooted at one node. Used by
    /// operational tooling that wants to push one node's state out
    /// without waiting for the full ring sweep.
    pub async fn sync_from(&self, ring: &Ring, source: &NodeId) {
        for (n, replica) in self.replica_pairs(ring) {
            if &n == source {
                self.sync_pair(&n, &replica).await;
            }
        }
    }

    fn replica_pairs(&self, ring: &Ring) -> Vec<(NodeId, NodeId)> {
        let replication_factor = ring.node_count().min(3).max(1);
        let mut seen = HashSet::new();
        let mut pairs = Vec::new();

        for node in ring.nodes() {
            for hash in ring.owned_token_hashes(&node) {
                let preflist =
                    ring.preference_list_for_hash(corelib::token::RingToken(hash), replication_factor);
                for replica in preflist.iter().filter(|r| **r != node) {
                    let key = (node.clone(), replica.clone());
                    if seen.insert(key.clone()) {
                        pairs.push(key);
                    }
                }
            }
        }
        pairs
    }

    async fn sync_pair(&self, source: &NodeId, target: &NodeId) {
        let deadline = Duration::from_millis(self.merkle_fetch_timeout_ms);
        let src_tree = tokio::time::timeout(deadline, self.transport.get_merkle(source)).await;
        let dst_tree = tokio::time::timeout(deadline, self.transport.get_merkle(target)).await;

        let (src_tree, dst_tree) = match (src_tree, dst_tree) {
            (Ok(Some(s)), Ok(Some(d))) => (s, d),
            _ => {
                warn!(%source, %target, "merkle fetch unavailable, falling back to full sync");
                self.full_sync(source, target).await;
                return;
            }
        };

        let diff = src_tree.diff(&dst_tree);
        if diff.is_empty() {
            debug!(%source, %target, "no divergence");
            return;
        }

        for (key, _) in diff {
            if let GetOutcome::Found(versioned) = self.transport.get(source, &key).await {
                self.transport
                    .put(target, &key, versioned.value, versioned.vc, versioned.timestamp)
                    .await;
            }
        }
    }

    async fn full_sync(&self, source: &NodeId, target: &NodeId) {
        let Some(entries) = self.transport.get_all(source).await else {
            warn!(%source, "source unreachable, skipping full sync");
            return;
        };
        for (key, versioned) in entries {
            self.transport
                .put(target, &key, versioned.value, versioned.vc, versioned.timestamp)
                .await;
        }
    }
}
