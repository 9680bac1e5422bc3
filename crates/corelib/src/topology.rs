//! Ring topology abstractions and operations.
//!
//! A lightweight, read-only wrapper around `Ring` for operational
//! questions ("how balanced is the ring?", "who holds this key's
//! replicas?") — kept out of `Ring` itself so the ring's hot lookup
//! path stays minimal.

use crate::node::NodeId;
use crate::ring::Ring;
use std::collections::HashMap;

#[derive(Clone)]
pub struct Topology {
    ring: Ring,
}

impl Topology {
    pub fn new(ring: Ring) -> Self {
        Self { ring }
    }

    /// Which token hashes belong to which node.
    pub fn ownership(&self) -> HashMap<NodeId, Vec<u32>> {
        let mut ownership: HashMap<NodeId, Vec<u32>> = HashMap::new();
        for (hash, node_id) in self.ring.tokens() {
            ownership.entry(node_id).or_default().push(hash);
        }
        for hashes in ownership.values_mut() {
            hashes.sort_unstable();
        }
        ownership
    }

    /// What fraction of the ring's tokens each node owns.
    pub fn ownership_percentages(&self) -> HashMap<NodeId, f64> {
        let total_tokens = self.ring.token_count() as f64;
        if total_tokens == 0.0 {
            return HashMap::new();
        }
        self.ownership()
            .into_iter()
            .map(|(node_id, hashes)| (node_id, (hashes.len() as f64 / total_tokens) * 100.0))
            .collect()
    }

    /// Human-readable summary, used by the CLI's `ring describe`.
    pub fn describe(&self) -> String {
        let mut description = String::new();
        description.push_str("Ring Description:\n");
        description.push_str(&format!("  Nodes: {}\n", self.ring.node_count()));
        description.push_str(&format!("  Total Tokens: {}\n", self.ring.token_count()));
        description.push_str(&format!("  Partitioner: {}\n", self.ring.partitioner_name()));

        let percentages = self.ownership_percentages();
        let ownership = self.ownership();

        if !percentages.is_empty() {
            description.push_str("\nNode Ownership:\n");
            let mut nodes: Vec<_> = percentages.iter().collect();
            nodes.sort_by_key(|(node_id, _)| (*node_id).clone());

            for (node_id, percentage) in nodes {
                let node = self.ring.get_node(node_id);
                let node_name = node.map(|n| n.name.as_str()).unwrap_or("unknown");
                let token_count = ownership.get(node_id).map(|v| v.len()).unwrap_or(0);
                description.push_str(&format!(
                    "  Node {} ({}): {} tokens ({:.2}%)\n",
                    node_id, node_name, token_count, percentage
                ));
            }
        }

        description
    }

    /// The preference list for `key`, exposed at the topology level for
    /// callers that only have a `Topology` handle rather than a `Ring`.
    pub fn replicas_for_key(&self, key: &[u8], replica_count: usize) -> Vec<NodeId> {
        self.ring.preference_list(key, replica_count)
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }
}

impl From<Ring> for Topology {
    fn from(ring: Ring) -> Self {
        Self::new(ring)
    }
}
