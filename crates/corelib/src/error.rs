//! Error types for the core library.

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("invalid node: {0}")]
    InvalidNode(String),
    #[error("ring operation failed: {0}")]
    RingOperation(String),
    #[error("topology error: {0}")]
    Topology(String),
    #[error("internal error: {0}")]
    Internal(String),
}
