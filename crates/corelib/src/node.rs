//! Node abstractions for the consistent hash ring.
//!
//! Nodes represent logical participants in the ring. `NodeId` is a
//! string identifier rather than a numeric handle because replicas are
//! addressed by stable, human-assigned names (`"node1"`, `"node2"`, ...)
//! throughout the coordinator, hint table, and gossip view.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Stable identifier for a node in the cluster.
///
/// Cheap to clone (`Arc<str>` underneath) and to hash/compare, while
/// carrying a readable name across the coordinator, hint table, and
/// gossip view.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Arc<str>);

impl NodeId {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Logical node participating in the ring.
///
/// Keep this struct small and cheap to clone; heavy mutable state (the
/// replica's key/value map, open connections, metrics) lives in the
/// `storage` crate's actor, not here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    /// Human-readable name or hostname.
    pub name: String,
    /// Optional data center label for topology-aware replication.
    pub datacenter: Option<String>,
    /// Optional rack label for rack-aware replication.
    pub rack: Option<String>,
}

impl Node {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            datacenter: None,
            rack: None,
        }
    }

    pub fn with_topology(
        id: NodeId,
        name: impl Into<String>,
        datacenter: impl Into<Option<String>>,
        rack: impl Into<Option<String>>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            datacenter: datacenter.into(),
            rack: rack.into(),
        }
    }
}
