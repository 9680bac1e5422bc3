//! Token abstraction module for consistent hashing.
//!
//! Tokens represent positions on the hash ring and must be comparable,
//! hashable, and thread-safe. `ring_token` is the type actually used by
//! `corelib::ring`; the others are alternative partitioner families
//! kept pluggable behind the same trait.

pub mod byte_ordered;
pub mod extended;
pub mod murmur3;
pub mod random;
pub mod ring_token;
pub mod traits;

pub use ring_token::RingToken;
pub use traits::{ByteComparableVersion, Token, TokenError};
