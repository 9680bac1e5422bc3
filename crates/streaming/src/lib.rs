//! Anti-entropy synchronization between replica pairs.

pub mod error;
pub mod synchronizer;

pub use error::SyncError;
pub use synchronizer::Synchronizer;
