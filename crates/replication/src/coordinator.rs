//! The coordinator: executes `get`/`put` against a preference list,
//! applies quorum policy, and reconciles divergent versions.
//!
//! Dispatch to each replica runs as its own short-lived task, spawned
//! per request, so one slow replica never blocks the others; a
//! per-dispatch deadline bounds how long the coordinator waits before
//! treating a missing reply as a failure.

use crate::clock::now_millis;
use crate::error::CoordinatorError;
use crate::hints::HintTable;
use crate::strategy::ReplicationStrategy;
use corelib::{Config, GetOutcome, NodeId, PutOutcome, ReplicaTransport, Ring, VectorClock};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

pub struct Coordinator {
    transport: Arc<dyn ReplicaTransport>,
    strategy: Arc<dyn ReplicationStrategy>,
    hints: Arc<HintTable>,
    config: Config,
}

impl Coordinator {
    pub fn new(
        transport: Arc<dyn ReplicaTransport>,
        strategy: Arc<dyn ReplicationStrategy>,
        hints: Arc<HintTable>,
        config: Config,
    ) -> Self {
        Self {
            transport,
            strategy,
            hints,
            config,
        }
    }

    pub fn hints(&self) -> &Arc<HintTable> {
        &self.hints
    }

    #[instrument(skip(self, ring, value, vc), fields(key_len = key.len()))]
    pub async fn put(
        &self,
        ring: &Ring,
        key: &[u8],
        value: Vec<u8>,
        vc: Option<VectorClock>,
    ) -> Result<(), CoordinatorError> {
        execute_put(
            self.transport.clone(),
            self.strategy.clone(),
            self.hints.clone(),
            self.config.clone(),
            ring.clone(),
            key.to_vec(),
            value,
            vc,
        )
        .await
    }

    #[instrument(skip(self, ring), fields(key_len = key.len()))]
    pub async fn get(&self, ring: &Ring, key: &[u8]) -> Result<Vec<u8>, CoordinatorError> {
        let replicas = self.strategy.replicas_for_key(ring, key);
        let deadline = Duration::from_millis(self.config.dispatch_deadline_ms);

        let mut handles = Vec::with_capacity(replicas.len());
        for replica in &replicas {
            let transport = self.transport.clone();
            let replica = replica.clone();
            let key = key.to_vec();
            handles.push(tokio::spawn(async move {
                tokio::time::timeout(deadline, transport.get(&replica, &key)).await
            }));
        }

        let mut found = Vec::new();
        for handle in handles {
            if let Ok(Ok(GetOutcome::Found(versioned))) = handle.await {
                found.push(versioned);
            }
        }

        if found.is_empty() {
            return Err(CoordinatorError::NoResponses);
        }
        if found.len() == 1 {
            return Ok(found.into_iter().next().unwrap().value);
        }

        // Causal reconciliation: a response whose clock dominates every
        // other response's clock wins outright.
        let causal_winner = found.iter().enumerate().find(|(i, candidate)| {
            found.iter().enumerate().all(|(j, other)| {
                i == &j
                    || matches!(
                        candidate.vc.compare(&other.vc),
                        corelib::vector_clock::Ordering::Equal
                            | corelib::vector_clock::Ordering::Descendant
                    )
            })
        });

        if let Some((_, winner)) = causal_winner {
            return Ok(winner.value.clone());
        }

        // Mutually concurrent: fall back to last-writer-wins, then
        // asynchronously heal replicas with the merged clock.
        let lww = found
            .iter()
            .max_by_key(|v| v.timestamp)
            .expect("found is non-empty")
            .clone();
        let merged_vc = VectorClock::merge_all(found.iter().map(|v| &v.vc));

        debug!("concurrent versions found, resolving via last-writer-wins");

        let transport = self.transport.clone();
        let strategy = self.strategy.clone();
        let hints = self.hints.clone();
        let config = self.config.clone();
        let ring = ring.clone();
        let key = key.to_vec();
        let value = lww.value.clone();
        tokio::spawn(async move {
            let _ = execute_put(
                transport,
                strategy,
                hints,
                config,
                ring,
                key,
                value,
                Some(merged_vc),
            )
            .await;
        });

        Ok(lww.value)
    }
}

async fn execute_put(
    transport: Arc<dyn ReplicaTransport>,
    strategy: Arc<dyn ReplicationStrategy>,
    hints: Arc<HintTable>,
    config: Config,
    ring: Ring,
    key: Vec<u8>,
    value: Vec<u8>,
    vc: Option<VectorClock>,
) -> Result<(), CoordinatorError> {
    let replicas = strategy.replicas_for_key(&ring, &key);
    let ts = now_millis();
    let deadline = Duration::from_millis(config.dispatch_deadline_ms);

    let mut handles = Vec::with_capacity(replicas.len());
    for replica in &replicas {
        let transport = transport.clone();
        let replica = replica.clone();
        let key = key.clone();
        let value = value.clone();
        let vc = vc.clone();
        handles.push((
            replica.clone(),
            tokio::spawn(async move {
                let vc_out = match vc {
                    Some(vc) => vc,
                    None => {
                        let existing = match transport.get(&replica, &key).await {
                            GetOutcome::Found(v) => v.vc,
                            _ => VectorClock::new(),
                        };
                        existing.update(&replica)
                    }
                };
                let outcome =
                    tokio::time::timeout(deadline, transport.put(&replica, &key, value, vc_out.clone(), ts))
                        .await;
                (vc_out, outcome)
            }),
        ));
    }

    let mut successes = 0usize;
    let mut failed: Vec<(NodeId, VectorClock)> = Vec::new();

    for (replica, handle) in handles {
        match handle.await {
            Ok((vc_out, Ok(outcome))) if outcome.is_success() => successes += 1,
            Ok((vc_out, _)) => failed.push((replica, vc_out)),
            Err(_join_error) => failed.push((replica, VectorClock::new())),
        }
    }

    if successes >= config.write_quorum {
        Ok(())
    } else {
        for (replica, vc_used) in failed {
            hints.store(replica, key.clone(), value.clone(), vc_used);
        }
        Err(CoordinatorError::QuorumNotMet)
    }
}
