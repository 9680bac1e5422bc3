//! Integration tests for the hash ring: building, lookup, and the
//! ring-builder API surface.

use corelib::node::{Node, NodeId};
use corelib::ring::{HashRing, RingBuilder};

fn node(name: &str) -> Node {
    Node::new(NodeId::from(name), name)
}

#[test]
fn empty_ring_lookup_returns_none() {
    let ring = RingBuilder::new().build();
    assert_eq!(ring.lookup(b"key1"), None);
    assert_eq!(ring.node_count(), 0);
    assert_eq!(ring.token_count(), 0);
}

#[test]
fn add_node_and_lookup() {
    let ring: HashRing = RingBuilder::new()
        .add_node_with_vnodes(node("node1"), 4)
        .build();

    assert_eq!(ring.node_count(), 1);
    assert_eq!(ring.token_count(), 4);

    let result = ring.lookup(b"test-key");
    assert_eq!(result, Some(NodeId::from("node1")));

    let retrieved = ring.get_node(&NodeId::from("node1"));
    assert!(retrieved.is_some());
}

#[test]
fn multiple_nodes_every_lookup_lands_on_a_known_node() {
    let ring = RingBuilder::new()
        .with_vnodes(4)
        .add_node(node("node1"))
        .add_node(node("node2"))
        .add_node(node("node3"))
        .build();

    assert_eq!(ring.node_count(), 3);
    assert_eq!(ring.token_count(), 12);

    let known: Vec<NodeId> = vec!["node1", "node2", "node3"]
        .into_iter()
        .map(NodeId::from)
        .collect();

    for key in [&b"key1"[..], &b"key2"[..], &b"key3"[..]] {
        let owner = ring.lookup(key).expect("lookup should always succeed on a non-empty ring");
        assert!(known.contains(&owner));
    }
}

#[test]
fn lookup_is_deterministic_for_the_same_key() {
    let ring = RingBuilder::new()
        .with_vnodes(4)
        .add_node(node("node1"))
        .add_node(node("node2"))
        .build();

    let key = b"consistent-key";
    let first = ring.lookup(key);
    let second = ring.lookup(key);
    let third = ring.lookup(key);
    assert_eq!(first, second);
    assert_eq!(second, third);
}

#[test]
fn builder_default_vnode_count_is_256() {
    let ring = RingBuilder::new()
        .add_node(node("node1"))
        .add_node(node("node2"))
        .build();

    assert!(ring.lookup(b"key").is_some());
    assert_eq!(ring.node_count(), 2);
    assert_eq!(ring.token_count(), 512);
}

#[test]
fn builder_respects_custom_vnode_count() {
    let ring = RingBuilder::new()
        .with_vnodes(8)
        .add_node(node("node1"))
        .add_node(node("node2"))
        .build();

    assert!(ring.lookup(b"key").is_some());
    assert_eq!(ring.node_count(), 2);
    assert_eq!(ring.token_count(), 16);
}

#[test]
fn builder_allows_mixed_per_node_vnode_counts() {
    let ring = RingBuilder::new()
        .with_vnodes(4)
        .add_node(node("node1"))
        .add_node_with_vnodes(node("node2"), 8)
        .build();

    assert_eq!(ring.node_count(), 2);
    assert_eq!(ring.token_count(), 12);
}

#[test]
fn single_node_ring_owns_every_key() {
    let ring = RingBuilder::new()
        .add_node_with_vnodes(node("node1"), 4)
        .build();

    for key in [&b"key1"[..], &b"key2"[..], &b"key3"[..], &b"very-long-key-name"[..]] {
        assert_eq!(ring.lookup(key), Some(NodeId::from("node1")));
    }
}

#[test]
fn get_all_nodes_returns_every_member() {
    let ring = RingBuilder::new()
        .add_node_with_vnodes(node("node1"), 4)
        .add_node_with_vnodes(node("node2"), 4)
        .build();

    let nodes = ring.nodes();
    assert_eq!(nodes.len(), 2);
    assert!(nodes.contains(&NodeId::from("node1")));
    assert!(nodes.contains(&NodeId::from("node2")));
}

#[test]
fn tokens_all_map_back_to_their_single_owner() {
    let ring = RingBuilder::new()
        .add_node_with_vnodes(node("node1"), 4)
        .build();

    let tokens = ring.tokens();
    assert_eq!(tokens.len(), 4);
    for (_, node_id) in tokens {
        assert_eq!(node_id, NodeId::from("node1"));
    }
}

#[test]
fn partitioner_name_identifies_the_dynamo_partitioner() {
    let ring = RingBuilder::new().add_node(node("node1")).build();
    assert_eq!(ring.partitioner_name(), "DynamoPartitioner");
}
