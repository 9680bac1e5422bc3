//! End-to-end scenarios exercising the assembled coordinator, replica
//! store, hinted handoff, and anti-entropy stack together.

use corelib::{Config, HintReplayer, NodeFailMode, NodeId, Ring};
use replication::{Coordinator, HintTable, RingStrategy};
use std::sync::Arc;
use storage::ReplicaCluster;
use streaming::Synchronizer;

fn node_ids(n: usize) -> Vec<NodeId> {
    (1..=n).map(|i| NodeId::from(format!("node{i}").as_str())).collect()
}

fn assemble(
    nodes: &[NodeId],
    config: &Config,
) -> (Ring, Arc<ReplicaCluster>, Coordinator) {
    let ring = Ring::build(nodes, config.tokens_per_node);
    let cluster = Arc::new(ReplicaCluster::new(nodes, config));
    let hints = Arc::new(HintTable::new(cluster.clone(), config.max_hint_retries));
    let strategy = Arc::new(RingStrategy::new(config.replication_factor));
    let coordinator = Coordinator::new(cluster.clone(), strategy, hints, config.clone());
    (ring, cluster, coordinator)
}

#[tokio::test]
async fn s1_all_succeed() {
    let nodes = node_ids(10);
    let mut config = Config::default();
    config.tokens_per_node = 10;
    config.node_fail_mode = NodeFailMode::AlwaysSucceed;
    let (ring, _cluster, coordinator) = assemble(&nodes, &config);

    coordinator
        .put(&ring, b"test_key", b"test_value".to_vec(), None)
        .await
        .expect("put should succeed when every replica is reachable");

    let value = coordinator.get(&ring, b"test_key").await.unwrap();
    assert_eq!(value, b"test_value");
}

#[tokio::test]
async fn s2_all_fail() {
    let nodes = node_ids(10);
    let mut config = Config::default();
    config.tokens_per_node = 10;
    config.node_fail_mode = NodeFailMode::AlwaysFail;
    let (ring, _cluster, coordinator) = assemble(&nodes, &config);

    let result = coordinator
        .put(&ring, b"key_fail", b"value_fail".to_vec(), None)
        .await;
    assert!(result.is_err());

    let get_result = coordinator.get(&ring, b"key_fail").await;
    assert!(get_result.is_err());

    let preference_list = RingStrategy::new(config.replication_factor).replicas_for_key(&ring, b"key_fail");
    assert_eq!(preference_list.len(), 3);
    assert_eq!(coordinator.hints().len(), 3);
    for replica in &preference_list {
        assert!(coordinator.hints().contains(replica, b"key_fail"));
    }
}

#[tokio::test]
async fn s3_partial_with_quorum() {
    let nodes = node_ids(10);
    let mut config = Config::default();
    config.tokens_per_node = 10;
    config.node_fail_mode = NodeFailMode::Partial;
    let (ring, cluster, coordinator) = assemble(&nodes, &config);
    cluster.set_partial_failing([
        NodeId::from("node1"),
        NodeId::from("node2"),
        NodeId::from("node4"),
        NodeId::from("node5"),
    ]);

    let preference_list =
        RingStrategy::new(config.replication_factor).replicas_for_key(&ring, b"key_partial");
    let failing = ["node1", "node2", "node4", "node5"];
    let healthy_in_list = preference_list
        .iter()
        .filter(|n| !failing.contains(&n.as_str()))
        .count();

    let result = coordinator
        .put(&ring, b"key_partial", b"value_partial".to_vec(), None)
        .await;

    if healthy_in_list >= config.write_quorum {
        assert!(result.is_ok());
        let value = coordinator.get(&ring, b"key_partial").await.unwrap();
        assert_eq!(value, b"value_partial");
    }
}

#[tokio::test]
async fn s4_hint_drains_on_recovery() {
    let nodes = node_ids(10);
    let mut config = Config::default();
    config.tokens_per_node = 10;
    config.node_fail_mode = NodeFailMode::AlwaysFail;
    let (ring, cluster, coordinator) = assemble(&nodes, &config);

    let result = coordinator
        .put(&ring, b"test_key", b"test_value".to_vec(), None)
        .await;
    assert!(result.is_err());
    assert_eq!(coordinator.hints().len(), 3);

    cluster.set_fail_mode(NodeFailMode::AlwaysSucceed);
    coordinator.hints().retry_all().await;
    assert!(coordinator.hints().is_empty());

    let value = coordinator.get(&ring, b"test_key").await.unwrap();
    assert_eq!(value, b"test_value");
}

#[tokio::test]
async fn s5_merkle_repair() {
    use corelib::{ReplicaTransport, VectorClock};

    let nodes = vec![NodeId::from("n1"), NodeId::from("n2")];
    let config = Config::default();
    let ring = Ring::build(&nodes, 10);
    let cluster: Arc<dyn ReplicaTransport> = Arc::new(ReplicaCluster::new(&nodes, &config));

    let preference_list = ring.preference_list(b"test_key", 2);
    let (primary, secondary) = (preference_list[0].clone(), preference_list[1].clone());

    cluster
        .put(
            &primary,
            b"test_key",
            b"original_value".to_vec(),
            VectorClock::new().update(&primary),
            100,
        )
        .await;
    cluster
        .put(
            &secondary,
            b"test_key",
            b"outdated_value".to_vec(),
            VectorClock::new().update(&secondary),
            50,
        )
        .await;

    let t1 = cluster.get_merkle(&primary).await.unwrap();
    let t2 = cluster.get_merkle(&secondary).await.unwrap();
    let diff = t1.diff(&t2);
    assert!(diff.iter().any(|(k, _)| k == b"test_key"));

    let synchronizer = Synchronizer::new(cluster.clone(), config.sync_interval_ms, config.merkle_fetch_timeout_ms);
    synchronizer.sync_from(&ring, &primary).await;

    let healed = cluster.get(&secondary, b"test_key").await;
    match healed {
        corelib::GetOutcome::Found(v) => assert_eq!(v.value, b"original_value"),
        other => panic!("expected repaired value, got {other:?}"),
    }
}

#[tokio::test]
async fn s6_concurrent_last_writer_wins() {
    let nodes = node_ids(5);
    let config = Config::default();
    let (ring, _cluster, coordinator) = assemble(&nodes, &config);

    coordinator
        .put(&ring, b"user2", b"Bob".to_vec(), None)
        .await
        .unwrap();
    coordinator
        .put(&ring, b"user2", b"Charlie".to_vec(), None)
        .await
        .unwrap();

    let value = coordinator.get(&ring, b"user2").await.unwrap();
    assert!(value == b"Bob" || value == b"Charlie");

    // Read-repair from the first `get` runs fire-and-forget; give it a
    // moment to land before asserting convergence.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    let second = coordinator.get(&ring, b"user2").await.unwrap();
    assert_eq!(value, second);
}
