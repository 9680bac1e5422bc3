//! Boundary traits connecting the coordinator/synchronizer to whatever
//! provides the actual replica and gossip transport.
//!
//! Keeping these as trait objects, rather than the coordinator knowing
//! about `storage::ReplicaStore` concretely, is what lets tests swap in
//! a fault-injecting transport without touching coordinator logic.

use crate::node::NodeId;
use crate::vector_clock::VectorClock;
use async_trait::async_trait;

/// The stored shape of a value: value, vector clock, and wall-clock
/// timestamp used for last-writer-wins tiebreaks.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Versioned {
    pub value: Vec<u8>,
    pub vc: VectorClock,
    pub timestamp: u64,
}

/// Outcome of a replica `get`, expressed exhaustively so callers never
/// need to guess what a missing value versus a failed RPC means.
#[derive(Clone, Debug)]
pub enum GetOutcome {
    Found(Versioned),
    NotFound,
    /// Timeout / unreachable — countable as a failure but safe to retry.
    Transient(String),
    /// An internal replica error that should not be retried blindly.
    Fatal(String),
}

/// Outcome of a replica `put`.
#[derive(Clone, Debug)]
pub enum PutOutcome {
    Ok(Vec<u8>),
    Transient(String),
    Fatal(String),
}

impl GetOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, GetOutcome::Found(_))
    }
}

impl PutOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, PutOutcome::Ok(_))
    }
}

/// The replica interface consumed by the `Coordinator` and the
/// anti-entropy synchronizer.
#[async_trait]
pub trait ReplicaTransport: Send + Sync {
    async fn get(&self, node: &NodeId, key: &[u8]) -> GetOutcome;

    async fn put(
        &self,
        node: &NodeId,
        key: &[u8],
        value: Vec<u8>,
        vc: VectorClock,
        timestamp: u64,
    ) -> PutOutcome;

    /// Full key/value snapshot, used by anti-entropy's full-sync path.
    async fn get_all(&self, node: &NodeId) -> Option<Vec<(Vec<u8>, Versioned)>>;

    /// Current Merkle root, used by anti-entropy's diff path.
    async fn get_merkle(&self, node: &NodeId) -> Option<crate::merkle::MerkleTree>;
}

/// Invoked by the gossip task on a `failed -> alive` transition. Kept
/// as a trait so `membership` need not depend on `replication` directly.
#[async_trait]
pub trait HintReplayer: Send + Sync {
    async fn retry_all(&self);
}
