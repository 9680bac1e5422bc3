//! Vector clock algebra.
//!
//! A `VectorClock` is a finite mapping `NodeId -> u64` with absent keys
//! treated as zero. Clocks are never decremented; `update` always moves
//! a clock strictly forward for the node that issued the write.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering as CmpOrdering;
use std::collections::BTreeMap;

/// Result of comparing two vector clocks.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Ordering {
    Equal,
    Descendant,
    Ancestor,
    Concurrent,
}

/// A vector clock: one counter per node that has touched the value.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorClock(BTreeMap<NodeId, u64>);

impl VectorClock {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn get(&self, node: &NodeId) -> u64 {
        self.0.get(node).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.0.keys()
    }

    /// Advance the clock for `node` by one tick.
    ///
    /// If the clock is empty this produces `{node: 1}`; otherwise the
    /// node's existing counter (default 0) is incremented by one. Every
    /// other node's counter is left untouched.
    pub fn update(&self, node: &NodeId) -> Self {
        let mut next = self.0.clone();
        let counter = next.entry(node.clone()).or_insert(0);
        *counter += 1;
        Self(next)
    }

    /// Pointwise maximum over the union of both clocks' keys.
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.0.clone();
        for (node, &counter) in &other.0 {
            let entry = merged.entry(node.clone()).or_insert(0);
            *entry = (*entry).max(counter);
        }
        Self(merged)
    }

    /// Causal comparison over the union of both clocks' keys, missing
    /// entries treated as 0.
    pub fn compare(&self, other: &Self) -> Ordering {
        let mut self_ge = true;
        let mut other_ge = true;

        let mut keys: std::collections::BTreeSet<&NodeId> = self.0.keys().collect();
        keys.extend(other.0.keys());

        for node in keys {
            let a = self.get(node);
            let b = other.get(node);
            match a.cmp(&b) {
                CmpOrdering::Less => self_ge = false,
                CmpOrdering::Greater => other_ge = false,
                CmpOrdering::Equal => {}
            }
        }

        match (self_ge, other_ge) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Descendant,
            (false, true) => Ordering::Ancestor,
            (false, false) => Ordering::Concurrent,
        }
    }

    /// Fold `merge` over a collection of clocks, starting from the
    /// empty (bottom) clock.
    pub fn merge_all<'a, I: IntoIterator<Item = &'a VectorClock>>(clocks: I) -> Self {
        clocks
            .into_iter()
            .fold(VectorClock::new(), |acc, vc| acc.merge(vc))
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_node() -> impl Strategy<Value = NodeId> {
        "[a-e]".prop_map(NodeId::from)
    }

    fn arb_clock() -> impl Strategy<Value = VectorClock> {
        proptest::collection::vec((arb_node(), 0u64..5), 0..6).prop_map(|entries| {
            entries
                .into_iter()
                .fold(VectorClock::new(), |mut acc, (node, times)| {
                    for _ in 0..times {
                        acc = acc.update(&node);
                    }
                    acc
                })
        })
    }

    proptest! {
        #[test]
        fn merge_is_commutative(a in arb_clock(), b in arb_clock()) {
            prop_assert_eq!(a.merge(&b), b.merge(&a));
        }

        #[test]
        fn merge_is_idempotent(a in arb_clock()) {
            prop_assert_eq!(a.merge(&a), a);
        }

        #[test]
        fn merge_is_associative(a in arb_clock(), b in arb_clock(), c in arb_clock()) {
            prop_assert_eq!(a.merge(&b).merge(&c), a.merge(&b.merge(&c)));
        }

        #[test]
        fn compare_is_total_and_antisymmetric(a in arb_clock(), b in arb_clock()) {
            let ab = a.compare(&b);
            let ba = b.compare(&a);
            let expected = match ab {
                Ordering::Equal => Ordering::Equal,
                Ordering::Descendant => Ordering::Ancestor,
                Ordering::Ancestor => Ordering::Descendant,
                Ordering::Concurrent => Ordering::Concurrent,
            };
            prop_assert_eq!(ba, expected);
        }

        #[test]
        fn update_only_touches_named_node(a in arb_clock(), node in arb_node()) {
            let updated = a.update(&node);
            prop_assert_eq!(updated.get(&node), a.get(&node) + 1);
            for other in a.nodes().chain(updated.nodes()) {
                if other != &node {
                    prop_assert_eq!(updated.get(other), a.get(other));
                }
            }
        }
    }
}
