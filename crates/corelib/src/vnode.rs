//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Virtual nodes are a technique to improve load distribution in consistent hashing.
//! Instead of each physical node having a single token on the ring, each node has
//! multiple tokens (virtual nodes). This provides:
//!
//! 1. **Better Load Distribution**: More tokens = smoother distribution of keys
//! 2. **Gradual Rebalancing**: When nodes join/leave, only a fraction of keys move
//! 3. **Fault Tolerance**: Failure of one node affects fewer keys (distributed across vnodes)
//!
//! # Performance Characteristics
//!
//! - **Memory**: O(v) where v = number of vnodes per node
//! - **Lookup**: O(log n) where n = total vnodes (not affected by vnode count per node)
//! - **Rebalancing**: O(k/v) keys move when a node joins/leaves (k = total keys, v = vnodes/node)
//!
//! This module documents the vnode concept with the `Murmur3Token` family;
//! the ring actually built by `ring::RingBuilder` generates its vnode
//! tokens inline with `RingToken::for_vnode` rather than constructing
//! `VirtualNode` values, since it never needs to store a vnode separately
//! from its `(hash, node_idx)` ring entries.

use crate::node::NodeId;
use crate::token::murmur3::Murmur3Token;
use crate::token::Token;

/// A virtual node on the hash ring.
///
/// Represents a single token position owned by a physical node. Each physical
/// node has multiple virtual nodes (typically 256) distributed around the ring.
///
/// # Invariants
///
/// - Every `VirtualNode` has a unique token (no two vnodes share the same token)
/// - Every `VirtualNode` belongs to exactly one physical node
/// - Tokens are ordered (can be sorted/comparable)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualNode {
    /// Token position on the ring.
    ///
    /// This is the hash of a unique identifier like "node_id:vnode_index".
    /// The token determines where this vnode sits on the ring and which
    /// keys it's responsible for.
    pub token: Murmur3Token,

    /// The physical node that owns this virtual node.
    ///
    /// Multiple virtual nodes can share the same `node_id` (that's the point!).
    /// When looking up a key, we find the vnode's token, then use this
    /// `node_id` to route to the physical node.
    pub node_id: NodeId,
}

impl VirtualNode {
    /// Create a new virtual node.
    #[inline]
    pub fn new(token: Murmur3Token, node_id: NodeId) -> Self {
        Self { token, node_id }
    }

    /// Create a virtual node from a node ID and vnode index.
    ///
    /// Hashes `"node_id:vnode_index"` to derive the token, so distinct
    /// indices for the same node land at distinct ring positions.
    pub fn from_index(node_id: NodeId, vnode_index: usize) -> Self {
        let vnode_key = format!("{}:{}", node_id, vnode_index);
        let token = Murmur3Token::from_key(&vnode_key);
        Self::new(token, node_id)
    }

    #[inline]
    pub fn token(&self) -> Murmur3Token {
        self.token
    }

    #[inline]
    pub fn node_id(&self) -> NodeId {
        self.node_id.clone()
    }

    /// Calculate the distance to another virtual node (clockwise).
    #[inline]
    pub fn distance_to(&self, other: &Self) -> Murmur3Token {
        self.token.distance_to(&other.token)
    }
}

impl std::fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VNode(token={:016x}, node={})", self.token.0, self.node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vnode_creation() {
        let vnode = VirtualNode::new(Murmur3Token(100), NodeId::from("node1"));
        assert_eq!(vnode.token(), Murmur3Token(100));
        assert_eq!(vnode.node_id(), NodeId::from("node1"));
    }

    #[test]
    fn test_vnode_from_index() {
        let vnode0 = VirtualNode::from_index(NodeId::from("node1"), 0);
        let vnode1 = VirtualNode::from_index(NodeId::from("node1"), 1);

        assert_ne!(vnode0.token(), vnode1.token());
        assert_eq!(vnode0.node_id(), vnode1.node_id());
        assert_eq!(vnode0.node_id(), NodeId::from("node1"));
    }

    #[test]
    fn test_vnode_distance() {
        let vnode1 = VirtualNode::new(Murmur3Token(100), NodeId::from("node1"));
        let vnode2 = VirtualNode::new(Murmur3Token(200), NodeId::from("node2"));

        let distance = vnode1.distance_to(&vnode2);
        assert_eq!(distance, Murmur3Token(100));
    }

    #[test]
    fn test_vnode_ordering() {
        let vnode1 = VirtualNode::new(Murmur3Token(100), NodeId::from("node1"));
        let vnode2 = VirtualNode::new(Murmur3Token(200), NodeId::from("node2"));

        assert!(vnode1 < vnode2);
    }
}
