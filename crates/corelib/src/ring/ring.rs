//! Consistent-hash ring.
//!
//! A `Ring` is an immutable, cheap-to-clone value: an ascending-by-hash
//! list of `(RingToken, NodeId)` tokens. Topology changes are expressed
//! by building a new `Ring`, never by mutating one in place — so there
//! is no `add_node`/`remove_node` here; use `RingBuilder`.

use crate::node::Node;
use crate::node::NodeId;
use crate::partitioner::{DynamoPartitioner, Partitioner};
use crate::token::ring_token::RingToken;
use crate::token::Token;
use std::collections::HashSet;
use std::sync::Arc;

/// One token position on the ring.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct RingEntry {
    hash: RingToken,
    // Breaks ties deterministically between vnodes that hash to the
    // same token, which cannot happen between two different nodes in
    // practice but trivially can for duplicate `add_node` calls.
    seq: u64,
    node_idx: u32,
}

/// An immutable, sharable view of the cluster's partitioning.
#[derive(Clone, Debug)]
pub struct Ring {
    inner: Arc<RingInner>,
}

#[derive(Debug)]
struct RingInner {
    nodes: Vec<Node>,
    entries: Vec<RingEntry>,
    partitioner: DynamoPartitioner,
}

impl Ring {
    fn node_id_for(&self, entry: &RingEntry) -> &NodeId {
        &self.inner.nodes[entry.node_idx as usize].id
    }

    /// Hash a key into ring space using the cluster's partitioner.
    pub fn key_hash(&self, key: &[u8]) -> RingToken {
        self.inner.partitioner.partition(key)
    }

    /// First node clockwise from `key`'s hash (the primary replica).
    pub fn lookup(&self, key: &[u8]) -> Option<NodeId> {
        self.preference_list(key, 1).into_iter().next()
    }

    /// Up to `r` distinct nodes responsible for `key`, walking clockwise
    /// from the first token `>= key_hash`, wrapping to index 0 if the
    /// key's hash exceeds every token.
    pub fn preference_list(&self, key: &[u8], r: usize) -> Vec<NodeId> {
        self.preference_list_for_hash(self.key_hash(key), r)
    }

    /// Same walk as `preference_list`, starting from an already-computed
    /// token hash rather than hashing a key. Used by anti-entropy, which
    /// walks tokens a node already owns.
    pub fn preference_list_for_hash(&self, hash: RingToken, r: usize) -> Vec<NodeId> {
        let entries = &self.inner.entries;
        if entries.is_empty() || r == 0 {
            return Vec::new();
        }

        let start = entries.partition_point(|e| e.hash < hash);
        let start = if start == entries.len() { 0 } else { start };

        let mut out = Vec::with_capacity(r);
        let mut seen = HashSet::with_capacity(r);

        for i in 0..entries.len() {
            let idx = (start + i) % entries.len();
            let node = self.node_id_for(&entries[idx]).clone();
            if seen.insert(node.clone()) {
                out.push(node);
                if out.len() >= r {
                    break;
                }
            }
        }
        out
    }

    /// The raw token hashes owned by `node`.
    pub fn owned_token_hashes(&self, node: &NodeId) -> Vec<u32> {
        self.inner
            .entries
            .iter()
            .filter(|e| self.node_id_for(e) == node)
            .map(|e| e.hash.0)
            .collect()
    }

    /// The distinct node identifiers on the ring.
    pub fn nodes(&self) -> HashSet<NodeId> {
        self.inner.nodes.iter().map(|n| n.id.clone()).collect()
    }

    pub fn node_count(&self) -> usize {
        self.inner.nodes.len()
    }

    pub fn token_count(&self) -> usize {
        self.inner.entries.len()
    }

    pub fn get_node(&self, id: &NodeId) -> Option<&Node> {
        self.inner.nodes.iter().find(|n| &n.id == id)
    }

    pub fn all_node_metas(&self) -> &[Node] {
        &self.inner.nodes
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.inner.partitioner.name()
    }

    /// Raw, sorted `(hash, NodeId)` pairs — used by `Topology`.
    pub fn tokens(&self) -> Vec<(u32, NodeId)> {
        self.inner
            .entries
            .iter()
            .map(|e| (e.hash.0, self.node_id_for(e).clone()))
            .collect()
    }
}

/// Builds an immutable `Ring` from a set of nodes and their virtual
/// node counts.
#[derive(Debug, Default)]
pub struct RingBuilder {
    default_vnodes: usize,
    nodes: Vec<(Node, usize)>,
}

impl RingBuilder {
    pub fn new() -> Self {
        Self {
            default_vnodes: 256,
            nodes: Vec::new(),
        }
    }

    pub fn with_vnodes(mut self, count: usize) -> Self {
        self.default_vnodes = count;
        self
    }

    pub fn add_node(mut self, node: Node) -> Self {
        let count = self.default_vnodes;
        self.nodes.push((node, count));
        self
    }

    pub fn add_node_with_vnodes(mut self, node: Node, vnodes: usize) -> Self {
        self.nodes.push((node, vnodes));
        self
    }

    pub fn build(self) -> Ring {
        let partitioner = DynamoPartitioner;
        let mut node_metas = Vec::with_capacity(self.nodes.len());
        let mut entries = Vec::new();
        let mut seq: u64 = 0;

        for (node_idx, (node, vnodes)) in self.nodes.into_iter().enumerate() {
            for i in 0..vnodes {
                let hash = RingToken::for_vnode(node.id.as_str(), i);
                entries.push(RingEntry {
                    hash,
                    seq,
                    node_idx: node_idx as u32,
                });
                seq += 1;
            }
            node_metas.push(node);
        }

        entries.sort_by(|a, b| a.hash.cmp(&b.hash).then(a.seq.cmp(&b.seq)));

        Ring {
            inner: Arc::new(RingInner {
                nodes: node_metas,
                entries,
                partitioner,
            }),
        }
    }
}

impl Ring {
    /// Convenience one-shot builder: every node gets the same vnode count.
    pub fn build(nodes: &[NodeId], tokens_per_node: usize) -> Ring {
        let mut builder = RingBuilder::new().with_vnodes(tokens_per_node);
        for id in nodes {
            builder = builder.add_node(Node::new(id.clone(), id.as_str()));
        }
        builder.build()
    }

    pub fn builder() -> RingBuilder {
        RingBuilder::new()
    }
}
