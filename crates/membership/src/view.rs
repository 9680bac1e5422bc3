//! The gossip view: each node's belief about every node's liveness.

use corelib::NodeId;
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the unix epoch")
        .as_millis() as u64
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Alive,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeRecord {
    pub status: Status,
    pub last_heard: u64,
}

/// One node's local belief about the whole cluster. Merging two views
/// keeps, per node, the record with the larger `last_heard` — this
/// makes the merge commutative, associative and idempotent, so gossip
/// reordering and duplication converge.
#[derive(Clone, Debug, Default)]
pub struct View(pub HashMap<NodeId, NodeRecord>);

impl View {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn seed_all_alive(nodes: impl IntoIterator<Item = NodeId>) -> Self {
        let now = now_millis();
        Self(
            nodes
                .into_iter()
                .map(|n| {
                    (
                        n,
                        NodeRecord {
                            status: Status::Alive,
                            last_heard: now,
                        },
                    )
                })
                .collect(),
        )
    }

    pub fn merge_from(&mut self, other: &View) {
        for (node, record) in &other.0 {
            match self.0.get(node) {
                Some(existing) if existing.last_heard >= record.last_heard => {}
                _ => {
                    self.0.insert(node.clone(), *record);
                }
            }
        }
    }

    pub fn status_of(&self, node: &NodeId) -> Option<Status> {
        self.0.get(node).map(|r| r.status)
    }
}
