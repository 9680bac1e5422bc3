//! Cluster-wide configuration recognized by the core.
//!
//! Loading this from a config file or environment is an external
//! collaborator's job; this module only owns the typed shape and its
//! defaults.

use serde::{Deserialize, Serialize};

/// Test-only injection switch for a replica's `put` behavior, read at
/// replica-put time. Lets integration tests exercise quorum failure
/// paths without a real network.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum NodeFailMode {
    #[default]
    AlwaysSucceed,
    AlwaysFail,
    /// Fails puts/gets on a fixed, caller-chosen subset of nodes.
    Partial,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// `R`: number of replicas a key is written to.
    pub replication_factor: usize,
    /// `W`: replica acknowledgments required for a `put` to succeed.
    pub write_quorum: usize,
    /// Virtual nodes per physical node when building a ring.
    pub tokens_per_node: usize,
    /// Anti-entropy sweep cadence, milliseconds.
    pub sync_interval_ms: u64,
    /// Gossip round cadence, milliseconds.
    pub gossip_interval_ms: u64,
    /// Gossip liveness threshold, milliseconds.
    pub failure_threshold_ms: u64,
    /// Per-replica dispatch deadline, milliseconds.
    pub dispatch_deadline_ms: u64,
    /// Merkle-fetch timeout used by anti-entropy before falling back to
    /// a full sync, milliseconds.
    pub merkle_fetch_timeout_ms: u64,
    /// Maximum retry attempts for a single hint before it is abandoned.
    pub max_hint_retries: u32,
    /// Test-only fault injection mode.
    pub node_fail_mode: NodeFailMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            replication_factor: 3,
            write_quorum: 2,
            tokens_per_node: 128,
            sync_interval_ms: 60_000,
            gossip_interval_ms: 1_000,
            failure_threshold_ms: 3_000,
            dispatch_deadline_ms: 5_000,
            merkle_fetch_timeout_ms: 5_000,
            max_hint_retries: 5,
            node_fail_mode: NodeFailMode::AlwaysSucceed,
        }
    }
}
