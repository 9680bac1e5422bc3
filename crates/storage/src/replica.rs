//! The per-replica actor: a single-writer task owning one node's
//! key/value map and its Merkle index.
//!
//! All mutation is serialized through the actor's mailbox — callers
//! never touch the map directly, only send `Command`s and await a
//! reply on a one-shot channel. This mirrors the source system's
//! in-process actor-per-replica model: a bounded channel stands in for
//! the mailbox, and a `ReplicaHandle` is the typed "process reference"
//! callers hold instead of the actor itself.

use corelib::{MerkleTree, NodeId, Versioned};
use std::collections::HashMap;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug)]
enum Command {
    Get {
        key: Vec<u8>,
        reply: oneshot::Sender<Option<Versioned>>,
    },
    Put {
        key: Vec<u8>,
        versioned: Versioned,
        reply: oneshot::Sender<Vec<u8>>,
    },
    GetAll {
        reply: oneshot::Sender<Vec<(Vec<u8>, Versioned)>>,
    },
    GetMerkle {
        reply: oneshot::Sender<MerkleTree>,
    },
    /// Test-only: makes the next `Put` panic partway through its
    /// mutation, to exercise panic isolation.
    #[cfg(test)]
    PoisonNextPut,
}

/// Owns the actual map and the derived Merkle tree. Lives on its own
/// `tokio` task; never accessed from more than one place at a time.
#[derive(Clone)]
struct ReplicaState {
    node_id: NodeId,
    data: HashMap<Vec<u8>, Versioned>,
    merkle: MerkleTree,
    #[cfg(test)]
    poison_next_put: bool,
}

impl ReplicaState {
    fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            data: HashMap::new(),
            merkle: MerkleTree::build(Vec::<(Vec<u8>, Vec<u8>)>::new()),
            #[cfg(test)]
            poison_next_put: false,
        }
    }

    fn rebuild_merkle(&mut self) {
        self.merkle = MerkleTree::build(
            self.data
                .iter()
                .map(|(k, v)| (k.clone(), v.value.clone())),
        );
    }

    /// Runs `mutate` against a clone of `self`, committing only if it
    /// returns without panicking. A panic partway through `mutate`
    /// leaves `self` exactly as it was before the attempt.
    fn try_apply(&mut self, mutate: impl FnOnce(&mut Self)) -> bool {
        let mut attempt = self.clone();
        match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| mutate(&mut attempt))) {
            Ok(()) => {
                *self = attempt;
                true
            }
            Err(_) => false,
        }
    }

    fn handle(&mut self, cmd: Command) {
        match cmd {
            Command::Get { key, reply } => {
                let _ = reply.send(self.data.get(&key).cloned());
            }
            Command::Put {
                key,
                versioned,
                reply,
            } => {
                let value = versioned.value.clone();

                #[cfg(test)]
                let force_panic = std::mem::take(&mut self.poison_next_put);
                #[cfg(not(test))]
                let force_panic = false;

                // Invariant: after any `ok` reply, merkle == build(kv_map).
                // A panic inside this mutation (e.g. a bug in
                // `rebuild_merkle`) must not leave the map and the
                // Merkle tree out of sync with each other or with what
                // was committed before this put.
                let applied = self.try_apply(|state| {
                    state.data.insert(key, versioned);
                    state.rebuild_merkle();
                    if force_panic {
                        panic!("simulated replica fault during put");
                    }
                });

                if applied {
                    tracing::debug!(node = %self.node_id, "replica put applied");
                    let _ = reply.send(value);
                } else {
                    tracing::warn!(node = %self.node_id, "replica put panicked, prior state retained");
                    drop(reply);
                }
            }
            Command::GetAll { reply } => {
                let snapshot = self
                    .data
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                let _ = reply.send(snapshot);
            }
            Command::GetMerkle { reply } => {
                let _ = reply.send(self.merkle.clone());
            }
            #[cfg(test)]
            Command::PoisonNextPut => {
                self.poison_next_put = true;
            }
        }
    }
}

/// A cloneable reference to a running replica actor.
#[derive(Clone)]
pub struct ReplicaHandle {
    node_id: NodeId,
    tx: mpsc::Sender<Command>,
}

impl ReplicaHandle {
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Unconditional write at the replica level — reconciliation of
    /// concurrent versions is the coordinator's job, not the replica's.
    pub async fn put(&self, key: Vec<u8>, versioned: Versioned) -> Option<Vec<u8>> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::Put {
                key,
                versioned,
                reply,
            })
            .await
            .ok()?;
        rx.await.ok()
    }

    pub async fn get(&self, key: Vec<u8>) -> Option<Versioned> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Command::Get { key, reply }).await.ok()?;
        rx.await.ok().flatten()
    }

    pub async fn get_all(&self) -> Option<Vec<(Vec<u8>, Versioned)>> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Command::GetAll { reply }).await.ok()?;
        rx.await.ok()
    }

    pub async fn get_merkle(&self) -> Option<MerkleTree> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Command::GetMerkle { reply }).await.ok()?;
        rx.await.ok()
    }

    /// Test-only: arms a deliberate panic on the actor's next `put`.
    #[cfg(test)]
    pub async fn poison_next_put(&self) {
        let _ = self.tx.send(Command::PoisonNextPut).await;
    }
}

/// Spawns a new replica actor task and returns a handle to it.
pub fn spawn_replica(node_id: NodeId) -> ReplicaHandle {
    let (tx, mut rx) = mpsc::channel::<Command>(256);
    let mut state = ReplicaState::new(node_id.clone());

    tokio::spawn(async move {
        while let Some(cmd) = rx.recv().await {
            state.handle(cmd);
        }
    });

    ReplicaHandle { node_id, tx }
}
