//! Core token trait definitions.
//!
//! Tokens are immutable values representing positions in the ring's
//! modular token space. `Murmur3Token` is the default; `RandomToken`/
//! `ByteOrderedToken` exist for partitioners that trade distribution
//! uniformity for other properties (Cassandra calls these out as
//! alternative partitioner families, which is why the trait is kept
//! generic rather than hard-coding one hash).

use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteComparableVersion {
    V1,
}

#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("invalid token bytes: {0}")]
    InvalidBytes(String),
    #[error("token space exhausted")]
    Exhausted,
}

/// Core token trait — foundation for all token types.
///
/// Deliberately minimal: ring lookup only needs ordering, a zero/max
/// pair to anchor wraparound, and clockwise distance.
pub trait Token: Clone + Debug + Eq + Ord + Hash + Send + Sync + 'static {
    /// The additive identity of the token space.
    fn zero() -> Self;
    /// The largest representable token (wraparound boundary).
    fn max() -> Self;
    fn is_zero(&self) -> bool;
    fn is_max(&self) -> bool;
    /// Clockwise distance from `self` to `other`, wrapping through `max()`.
    fn distance_to(&self, other: &Self) -> Self;
}
