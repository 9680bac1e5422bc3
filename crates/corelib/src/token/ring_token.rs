//! The token type used by the cluster's actual hash ring.
//!
//! `H` is SHA-1 folded to 32 bits: the digest bytes are absorbed into a
//! big-endian accumulator (`acc = (acc << 8) + byte`, reduced mod `M`
//! after every byte to stay within range), then reduced mod
//! `M = 2^32 - 1`. The exact hash only has to agree within one cluster,
//! so this folding scheme is as good as any other as long as every
//! node runs the same code.

use super::traits::Token;
use sha1::{Digest, Sha1};

/// `M = 2^32 - 1`, the ring's modulus.
pub const RING_MODULUS: u64 = (1u64 << 32) - 1;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RingToken(pub u32);

impl Token for RingToken {
    fn zero() -> Self {
        RingToken(0)
    }

    fn max() -> Self {
        RingToken(RING_MODULUS as u32)
    }

    fn is_zero(&self) -> bool {
        self.0 == 0
    }

    fn is_max(&self) -> bool {
        self.0 as u64 == RING_MODULUS
    }

    fn distance_to(&self, other: &Self) -> Self {
        let a = self.0 as u64;
        let b = other.0 as u64;
        let d = if b >= a {
            b - a
        } else {
            (RING_MODULUS - a) + b
        };
        RingToken(d as u32)
    }
}

impl RingToken {
    /// Hash an arbitrary key into a ring position.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(data);
        let digest = hasher.finalize();

        let mut acc: u64 = 0;
        for byte in digest.iter() {
            acc = ((acc << 8) + *byte as u64) % RING_MODULUS;
        }
        RingToken(acc as u32)
    }

    /// Hash a virtual-node identifier of the form `"<node>-<index>"`.
    pub fn for_vnode(node: &str, index: usize) -> Self {
        Self::from_bytes(format!("{node}-{index}").as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deterministic() {
        assert_eq!(RingToken::from_bytes(b"hello"), RingToken::from_bytes(b"hello"));
    }

    #[test]
    fn within_modulus() {
        let t = RingToken::from_bytes(b"some-key-value-here");
        assert!((t.0 as u64) <= RING_MODULUS);
    }

    #[test]
    fn distance_wraps() {
        let a = RingToken(RING_MODULUS as u32 - 1);
        let b = RingToken(1);
        // 2 steps forward from a: (M-1) -> M-ish wrap -> 1
        assert_eq!(a.distance_to(&b).0 as u64, 2);
    }
}
