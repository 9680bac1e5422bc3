//! The per-node gossip task: a single-writer actor over its own view,
//! driven by a periodic round rather than by caller requests.

use crate::view::{now_millis, NodeRecord, Status, View};
use corelib::{HintReplayer, NodeId};
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

enum Message {
    Gossip(View),
    GetView(oneshot::Sender<View>),
}

/// Shared directory of running gossip actors, keyed by node id. Each
/// actor consults it to find a peer's mailbox; it is never mutated
/// once `GossipCluster` finishes spawning.
pub type PeerDirectory = Arc<RwLock<HashMap<NodeId, GossipHandle>>>;

#[derive(Clone)]
pub struct GossipHandle {
    tx: mpsc::Sender<Message>,
}

impl GossipHandle {
    /// Best-effort send: a full or closed mailbox is dropped silently,
    /// matching gossip's best-effort delivery model.
    pub fn send_gossip(&self, view: View) {
        let _ = self.tx.try_send(Message::Gossip(view));
    }

    pub async fn get_view(&self) -> Option<View> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Message::GetView(reply)).await.ok()?;
        rx.await.ok()
    }
}

pub fn spawn_gossip(
    id: NodeId,
    initial_view: View,
    peers: PeerDirectory,
    hints: Arc<dyn HintReplayer>,
    gossip_interval_ms: u64,
    failure_threshold_ms: u64,
) -> GossipHandle {
    let (tx, mut rx) = mpsc::channel::<Message>(256);
    let handle = GossipHandle { tx };

    tokio::spawn(async move {
        let mut view = initial_view;
        let mut interval = tokio::time::interval(Duration::from_millis(gossip_interval_ms));

        loop {
            interval.tick().await;

            view.0.insert(
                id.clone(),
                NodeRecord {
                    status: Status::Alive,
                    last_heard: now_millis(),
                },
            );

            let prior_status: HashMap<NodeId, Status> =
                view.0.iter().map(|(n, r)| (n.clone(), r.status)).collect();

            if let Some(peer) = pick_random_peer(&view, &id) {
                if let Some(peer_handle) = peers.read().unwrap().get(&peer).cloned() {
                    peer_handle.send_gossip(view.clone());
                }
            }

            let receive_window = Duration::from_millis(100);
            let deadline = tokio::time::Instant::now() + receive_window;
            loop {
                match tokio::time::timeout_at(deadline, rx.recv()).await {
                    Ok(Some(Message::Gossip(peer_view))) => view.merge_from(&peer_view),
                    Ok(Some(Message::GetView(reply))) => {
                        let _ = reply.send(view.clone());
                    }
                    Ok(None) => break,
                    Err(_elapsed) => break,
                }
            }

            let now = now_millis();
            for (node, record) in view.0.iter_mut() {
                if node != &id
                    && record.status == Status::Alive
                    && now.saturating_sub(record.last_heard) > failure_threshold_ms
                {
                    record.status = Status::Failed;
                    warn!(%node, "marking node failed");
                }
            }

            let revived = view.0.iter().any(|(node, record)| {
                prior_status.get(node) == Some(&Status::Failed) && record.status == Status::Alive
            });
            if revived {
                info!("observed a failed -> alive transition, replaying hints");
                hints.retry_all().await;
            }

            debug!(node = %id, "gossip round complete");
        }
    });

    handle
}

fn pick_random_peer(view: &View, self_id: &NodeId) -> Option<NodeId> {
    let candidates: Vec<&NodeId> = view.0.keys().filter(|n| *n != self_id).collect();
    candidates
        .choose(&mut rand::thread_rng())
        .map(|n| (*n).clone())
}
