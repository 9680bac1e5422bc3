//! Errors surfaced by anti-entropy sync.

#[derive(Debug, Clone, thiserror::Error)]
pub enum SyncError {
    #[error("source replica {0} is unreachable")]
    SourceUnreachable(String),
}
