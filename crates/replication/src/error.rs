//! Errors surfaced by the coordinator.

#[derive(Debug, Clone, thiserror::Error)]
pub enum CoordinatorError {
    #[error("no replica returned a successful response")]
    NoResponses,
    #[error("quorum not met: fewer than the required acknowledgments succeeded")]
    QuorumNotMet,
}
