//! Merkle tree over a key/value map, for anti-entropy diffing.
//!
//! Leaves hash `(key, value)` pairs; inner nodes hash the concatenation
//! of their children's hashes. An odd node at any level is paired with
//! itself so every combining step sees a pair. `diff` walks two trees
//! together and stops descending as soon as subtree hashes match.

use sha2::{Digest, Sha256};
use std::cmp::Ordering;

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

fn hash_bytes(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Canonical `(key, value)` serialization fed to the leaf hash: length
/// prefixes keep the encoding unambiguous regardless of byte content.
fn canonical(key: &[u8], value: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(key.len() + value.len() + 16);
    buf.extend_from_slice(&(key.len() as u64).to_be_bytes());
    buf.extend_from_slice(key);
    buf.extend_from_slice(&(value.len() as u64).to_be_bytes());
    buf.extend_from_slice(value);
    buf
}

fn empty_hash() -> Hash {
    hash_bytes(b"empty")
}

/// A node in the Merkle tree.
#[derive(Debug, Clone)]
pub enum MerkleTree {
    Empty {
        hash: Hash,
    },
    Leaf {
        hash: Hash,
        key: Vec<u8>,
        value: Vec<u8>,
    },
    Inner {
        hash: Hash,
        left: Box<MerkleTree>,
        right: Box<MerkleTree>,
        range: (Vec<u8>, Vec<u8>),
    },
}

impl MerkleTree {
    pub fn root_hash(&self) -> Hash {
        match self {
            MerkleTree::Empty { hash } => *hash,
            MerkleTree::Leaf { hash, .. } => *hash,
            MerkleTree::Inner { hash, .. } => *hash,
        }
    }

    pub fn range(&self) -> Option<(&[u8], &[u8])> {
        match self {
            MerkleTree::Empty { .. } => None,
            MerkleTree::Leaf { key, .. } => Some((key, key)),
            MerkleTree::Inner { range, .. } => Some((&range.0, &range.1)),
        }
    }

    fn leaf(key: Vec<u8>, value: Vec<u8>) -> Self {
        let hash = hash_bytes(&canonical(&key, &value));
        MerkleTree::Leaf { hash, key, value }
    }

    fn combine(left: MerkleTree, right: MerkleTree) -> Self {
        let mut buf = Vec::with_capacity(64);
        buf.extend_from_slice(&left.root_hash());
        buf.extend_from_slice(&right.root_hash());
        let hash = hash_bytes(&buf);

        let lo = left.range().map(|(lo, _)| lo.to_vec());
        let hi = right.range().map(|(_, hi)| hi.to_vec());
        let range = match (lo, hi) {
            (Some(lo), Some(hi)) => (lo, hi),
            (Some(lo), None) => (lo.clone(), lo),
            (None, Some(hi)) => (hi.clone(), hi),
            (None, None) => (Vec::new(), Vec::new()),
        };

        MerkleTree::Inner {
            hash,
            left: Box::new(left),
            right: Box::new(right),
            range,
        }
    }

    /// Build a tree from a key-value map. Entries are sorted by key,
    /// then combined pairwise bottom-up; an odd entry at any level is
    /// duplicated so the combiner always sees a pair.
    pub fn build<K, V>(map: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let mut entries: Vec<(Vec<u8>, Vec<u8>)> = map
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_vec(), v.as_ref().to_vec()))
            .collect();

        if entries.is_empty() {
            return MerkleTree::Empty { hash: empty_hash() };
        }

        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut level: Vec<MerkleTree> = entries
            .into_iter()
            .map(|(k, v)| MerkleTree::leaf(k, v))
            .collect();

        while level.len() > 1 {
            if level.len() % 2 == 1 {
                let last = level.last().unwrap().clone();
                level.push(last);
            }
            let mut next = Vec::with_capacity(level.len() / 2);
            let mut iter = level.into_iter();
            while let (Some(l), Some(r)) = (iter.next(), iter.next()) {
                next.push(MerkleTree::combine(l, r));
            }
            level = next;
        }

        level.into_iter().next().unwrap()
    }

    /// Entries this tree holds that `other` needs, i.e. every `(k, v)`
    /// in `self` whose key is absent from `other` or whose value
    /// differs. The comparison is one-directional: entries present
    /// only in `other` are not reported.
    pub fn diff(&self, other: &MerkleTree) -> Vec<(Vec<u8>, Vec<u8>)> {
        let mut out = Vec::new();
        Self::diff_into(self, other, &mut out);
        out
    }

    fn diff_into(t1: &MerkleTree, t2: &MerkleTree, out: &mut Vec<(Vec<u8>, Vec<u8>)>) {
        if t1.root_hash() == t2.root_hash() {
            return;
        }

        match (t1, t2) {
            (MerkleTree::Empty { .. }, _) => {}
            (_, MerkleTree::Empty { .. }) => {
                Self::collect_all(t1, out);
            }
            (
                MerkleTree::Leaf {
                    key: k1, value: v1, ..
                },
                MerkleTree::Leaf { key: k2, value: v2, .. },
            ) => match k1.cmp(k2) {
                Ordering::Equal => {
                    if v1 != v2 {
                        out.push((k1.clone(), v1.clone()));
                    }
                }
                _ => {
                    out.push((k1.clone(), v1.clone()));
                }
            },
            (MerkleTree::Leaf { key, value, .. }, MerkleTree::Inner { .. }) => {
                if Self::find_leaf(t2, key).map(|v| &v != value).unwrap_or(true) {
                    out.push((key.clone(), value.clone()));
                }
            }
            (MerkleTree::Inner { left, right, .. }, MerkleTree::Leaf { .. }) => {
                Self::diff_into(left, t2, out);
                Self::diff_into(right, t2, out);
            }
            (
                MerkleTree::Inner {
                    left: l1, right: r1, ..
                },
                MerkleTree::Inner {
                    left: l2, right: r2, ..
                },
            ) => {
                Self::diff_into(l1, l2, out);
                Self::diff_into(r1, r2, out);
            }
        }
    }

    /// Look up a single key's value inside a tree, without assuming
    /// the two trees share structure (used when one side degrades to
    /// a leaf while the other is still an inner node).
    fn find_leaf(tree: &MerkleTree, key: &[u8]) -> Option<Vec<u8>> {
        match tree {
            MerkleTree::Empty { .. } => None,
            MerkleTree::Leaf { key: k, value, .. } => (k == key).then(|| value.clone()),
            MerkleTree::Inner { left, right, .. } => {
                Self::find_leaf(left, key).or_else(|| Self::find_leaf(right, key))
            }
        }
    }

    fn collect_all(tree: &MerkleTree, out: &mut Vec<(Vec<u8>, Vec<u8>)>) {
        match tree {
            MerkleTree::Empty { .. } => {}
            MerkleTree::Leaf { key, value, .. } => out.push((key.clone(), value.clone())),
            MerkleTree::Inner { left, right, .. } => {
                Self::collect_all(left, out);
                Self::collect_all(right, out);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn map(entries: &[(&str, &str)]) -> BTreeMap<Vec<u8>, Vec<u8>> {
        entries
            .iter()
            .map(|(k, v)| (k.as_bytes().to_vec(), v.as_bytes().to_vec()))
            .collect()
    }

    #[test]
    fn empty_map_yields_sentinel() {
        let t = MerkleTree::build(Vec::<(Vec<u8>, Vec<u8>)>::new());
        assert_eq!(t.root_hash(), empty_hash());
    }

    #[test]
    fn equal_maps_equal_roots() {
        let a = MerkleTree::build(map(&[("a", "1"), ("b", "2"), ("c", "3")]));
        let b = MerkleTree::build(map(&[("c", "3"), ("a", "1"), ("b", "2")]));
        assert_eq!(a.root_hash(), b.root_hash());
    }

    #[test]
    fn differing_value_changes_root_and_is_found_by_diff() {
        let a = MerkleTree::build(map(&[("a", "1"), ("b", "2")]));
        let b = MerkleTree::build(map(&[("a", "1"), ("b", "X")]));
        assert_ne!(a.root_hash(), b.root_hash());

        let d = a.diff(&b);
        assert_eq!(d, vec![(b"b".to_vec(), b"2".to_vec())]);
    }

    #[test]
    fn diff_of_equal_trees_is_empty() {
        let a = MerkleTree::build(map(&[("a", "1"), ("b", "2")]));
        assert!(a.diff(&a.clone()).is_empty());
    }

    #[test]
    fn diff_against_empty_returns_everything() {
        let a = MerkleTree::build(map(&[("a", "1"), ("b", "2")]));
        let empty = MerkleTree::build(Vec::<(Vec<u8>, Vec<u8>)>::new());
        let mut d = a.diff(&empty);
        d.sort();
        assert_eq!(d, vec![(b"a".to_vec(), b"1".to_vec()), (b"b".to_vec(), b"2".to_vec())]);
        assert!(empty.diff(&a).is_empty());
    }

    #[test]
    fn diff_missing_key_on_target_side() {
        let a = MerkleTree::build(map(&[("a", "1"), ("b", "2"), ("c", "3")]));
        let b = MerkleTree::build(map(&[("a", "1"), ("c", "3")]));
        let d = a.diff(&b);
        assert_eq!(d, vec![(b"b".to_vec(), b"2".to_vec())]);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn arb_map() -> impl Strategy<Value = BTreeMap<Vec<u8>, Vec<u8>>> {
        proptest::collection::btree_map(
            "[a-f]{1,4}".prop_map(|s| s.into_bytes()),
            "[0-9]{1,4}".prop_map(|s| s.into_bytes()),
            0..12,
        )
    }

    proptest! {
        #[test]
        fn root_hash_equality_iff_map_equality(m1 in arb_map(), m2 in arb_map()) {
            let t1 = MerkleTree::build(m1.clone());
            let t2 = MerkleTree::build(m2.clone());
            prop_assert_eq!(t1.root_hash() == t2.root_hash(), m1 == m2);
        }

        #[test]
        fn diff_entries_are_sound(m1 in arb_map(), m2 in arb_map()) {
            let t1 = MerkleTree::build(m1.clone());
            let t2 = MerkleTree::build(m2.clone());
            for (k, v) in t1.diff(&t2) {
                prop_assert_ne!(Some(&v), m2.get(&k));
                prop_assert_eq!(m1.get(&k), Some(&v));
            }
        }
    }
}
