//! Gossip-based failure detection: one long-lived task per node,
//! converging on cluster liveness and triggering hint replay on
//! recovery.

pub mod actor;
pub mod cluster;
pub mod view;

pub use actor::{spawn_gossip, GossipHandle};
pub use cluster::GossipCluster;
pub use view::{NodeRecord, Status, View};
