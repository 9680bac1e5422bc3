//! Coordinator-side replication: placement strategy, quorum logic, and
//! hinted handoff for writes that miss quorum.

pub mod clock;
pub mod coordinator;
pub mod error;
pub mod hints;
pub mod strategy;

pub use coordinator::Coordinator;
pub use error::CoordinatorError;
pub use hints::{Hint, HintTable};
pub use strategy::{ReplicationStrategy, RingStrategy};
