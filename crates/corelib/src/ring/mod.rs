//! Consistent hash ring implementation.
//!
//! The ring manages token positions and provides efficient lookup
//! operations for finding nodes responsible for keys.

pub mod position;
pub mod ring;

pub use ring::{Ring, RingBuilder};

/// Alias kept for call sites that spell it `HashRing`.
pub type HashRing = Ring;
