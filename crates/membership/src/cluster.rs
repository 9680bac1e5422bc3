//! Wires one gossip actor per node, all sharing the same peer
//! directory and hint replayer, and seeds every view all-alive.

use crate::actor::{spawn_gossip, GossipHandle, PeerDirectory};
use crate::view::View;
use corelib::{Config, HintReplayer, NodeId};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

pub struct GossipCluster {
    peers: PeerDirectory,
}

impl GossipCluster {
    /// Starts one gossip task per node in `nodes`, each seeded with an
    /// all-alive view of the whole set.
    pub fn initialize_nodes(
        nodes: &[NodeId],
        hints: Arc<dyn HintReplayer>,
        config: &Config,
    ) -> Self {
        let peers: PeerDirectory = Arc::new(RwLock::new(HashMap::new()));
        let view = View::seed_all_alive(nodes.iter().cloned());

        for id in nodes {
            let handle = spawn_gossip(
                id.clone(),
                view.clone(),
                peers.clone(),
                hints.clone(),
                config.gossip_interval_ms,
                config.failure_threshold_ms,
            );
            peers.write().unwrap().insert(id.clone(), handle);
        }

        Self { peers }
    }

    pub fn handle(&self, node: &NodeId) -> Option<GossipHandle> {
        self.peers.read().unwrap().get(node).cloned()
    }

    pub fn known_nodes(&self) -> Vec<NodeId> {
        self.peers.read().unwrap().keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Status;
    use async_trait::async_trait;

    struct NoopReplayer;

    #[async_trait]
    impl HintReplayer for NoopReplayer {
        async fn retry_all(&self) {}
    }

    #[tokio::test]
    async fn initialize_nodes_seeds_every_view_alive() {
        let nodes = vec![NodeId::from("node1"), NodeId::from("node2"), NodeId::from("node3")];
        let cluster = GossipCluster::initialize_nodes(&nodes, Arc::new(NoopReplayer), &Config::default());

        let view = cluster
            .handle(&NodeId::from("node1"))
            .unwrap()
            .get_view()
            .await
            .unwrap();
        for node in &nodes {
            assert_eq!(view.status_of(node), Some(Status::Alive));
        }
    }
}
