//! Hinted handoff queue.
//!
//! A process-wide table keyed by `(target, key)`. Inserting is an
//! upsert: a later failed write for the same pair replaces the
//! pending hint rather than queuing a second one. `retry_all` takes a
//! snapshot before dispatching network calls, so the lock is never
//! held across an await point.

use crate::clock::now_millis;
use async_trait::async_trait;
use corelib::{HintReplayer, NodeId, PutOutcome, ReplicaTransport, VectorClock};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

#[derive(Clone, Debug)]
pub struct Hint {
    pub target: NodeId,
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    pub vc: VectorClock,
    pub retry_count: u32,
}

pub struct HintTable {
    transport: Arc<dyn ReplicaTransport>,
    max_retries: u32,
    hints: Mutex<HashMap<(NodeId, Vec<u8>), Hint>>,
}

impl HintTable {
    pub fn new(transport: Arc<dyn ReplicaTransport>, max_retries: u32) -> Self {
        Self {
            transport,
            max_retries,
            hints: Mutex::new(HashMap::new()),
        }
    }

    /// Insert with `retry_count = 0`, overwriting any prior hint for
    /// the same `(target, key)`.
    pub fn store(&self, target: NodeId, key: Vec<u8>, value: Vec<u8>, vc: VectorClock) {
        let mut hints = self.hints.lock().unwrap();
        hints.insert(
            (target.clone(), key.clone()),
            Hint {
                target,
                key,
                value,
                vc,
                retry_count: 0,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.hints.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, target: &NodeId, key: &[u8]) -> bool {
        self.hints
            .lock()
            .unwrap()
            .contains_key(&(target.clone(), key.to_vec()))
    }

    pub fn for_target(&self, target: &NodeId) -> Vec<Hint> {
        self.hints
            .lock()
            .unwrap()
            .values()
            .filter(|h| &h.target == target)
            .cloned()
            .collect()
    }

    /// Every pending hint, for operational listing.
    pub fn all(&self) -> Vec<Hint> {
        self.hints.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl HintReplayer for HintTable {
    async fn retry_all(&self) {
        let snapshot: Vec<Hint> = self.hints.lock().unwrap().values().cloned().collect();

        for hint in snapshot {
            if hint.retry_count >= self.max_retries {
                continue;
            }

            let ts = now_millis();
            let outcome = self
                .transport
                .put(&hint.target, &hint.key, hint.value.clone(), hint.vc.clone(), ts)
                .await;

            let key = (hint.target.clone(), hint.key.clone());
            match outcome {
                PutOutcome::Ok(_) => {
                    self.hints.lock().unwrap().remove(&key);
                    debug!(target = %hint.target, "hint drained");
                }
                _ => {
                    let retry_count = hint.retry_count + 1;
                    if retry_count >= self.max_retries {
                        warn!(target = %hint.target, "hint retries exhausted, abandoning");
                        self.hints.lock().unwrap().insert(
                            key,
                            Hint {
                                retry_count,
                                ..hint
                            },
                        );
                    } else {
                        info!(target = %hint.target, retry_count, "hint retry failed, will retry again");
                        self.hints.lock().unwrap().insert(
                            key,
                            Hint {
                                retry_count,
                                ..hint
                            },
                        );
                    }
                }
            }
        }
    }
}
