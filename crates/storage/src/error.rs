//! Errors for the replica store.

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, thiserror::Error)]
pub enum StorageError {
    #[error("replica actor for {0} is not running")]
    ActorGone(String),
    #[error("unknown node: {0}")]
    UnknownNode(String),
}
