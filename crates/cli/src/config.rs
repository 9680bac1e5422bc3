//! CLI entry point: builds an in-process cluster from `--nodes` and
//! runs a single command against it.

use crate::commands::{Command, CommandResult};
use clap::Parser;
use corelib::{Config, NodeId, Ring};
use membership::GossipCluster;
use replication::{Coordinator, HintTable, RingStrategy};
use std::sync::Arc;
use storage::ReplicaCluster;
use streaming::Synchronizer;

#[derive(Parser, Debug)]
#[command(name = "dynamo-rs", about = "A Dynamo-style key/value store demo")]
pub struct CliConfig {
    /// Comma-separated node names making up the ring.
    #[arg(long, value_delimiter = ',', default_value = "node1,node2,node3")]
    pub nodes: Vec<String>,

    #[arg(long, default_value_t = 3)]
    pub replication_factor: usize,

    #[arg(long, default_value_t = 2)]
    pub write_quorum: usize,

    #[arg(long, default_value_t = 128)]
    pub tokens_per_node: usize,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    pub fn run(&self) -> anyhow::Result<CommandResult> {
        let rt = tokio::runtime::Runtime::new()?;
        rt.block_on(self.run_async())
    }

    async fn run_async(&self) -> anyhow::Result<CommandResult> {
        let node_ids: Vec<NodeId> = self.nodes.iter().map(|n| NodeId::from(n.as_str())).collect();

        let mut config = Config::default();
        config.replication_factor = self.replication_factor;
        config.write_quorum = self.write_quorum;
        config.tokens_per_node = self.tokens_per_node;

        let ring = Ring::build(&node_ids, config.tokens_per_node);
        let transport: Arc<dyn corelib::ReplicaTransport> =
            Arc::new(ReplicaCluster::new(&node_ids, &config));
        let hints = Arc::new(HintTable::new(transport.clone(), config.max_hint_retries));
        let strategy = Arc::new(RingStrategy::new(config.replication_factor));
        let coordinator = Coordinator::new(transport.clone(), strategy, hints.clone(), config.clone());
        let _gossip = GossipCluster::initialize_nodes(&node_ids, hints.clone(), &config);

        let result = match &self.command {
            Command::Put { key, value } => {
                coordinator
                    .put(&ring, key.as_bytes(), value.clone().into_bytes(), None)
                    .await?;
                CommandResult::Put
            }
            Command::Get { key } => {
                match coordinator.get(&ring, key.as_bytes()).await {
                    Ok(value) => CommandResult::Get(Some(String::from_utf8_lossy(&value).into_owned())),
                    Err(_) => CommandResult::Get(None),
                }
            }
            Command::RingDescribe => {
                let topology = corelib::Topology::from(ring.clone());
                CommandResult::RingDescribe(topology.describe())
            }
            Command::HintsList => {
                let lines = hints
                    .all()
                    .iter()
                    .map(|h| format!("{} <- {:?} (retries={})", h.target, h.key, h.retry_count))
                    .collect();
                CommandResult::HintsList(lines)
            }
            Command::GossipView { node } => {
                let node_id = NodeId::from(node.as_str());
                let handle = _gossip
                    .handle(&node_id)
                    .ok_or_else(|| anyhow::anyhow!("unknown node: {node}"))?;
                let view = handle
                    .get_view()
                    .await
                    .ok_or_else(|| anyhow::anyhow!("gossip task for {node} is gone"))?;
                let mut lines: Vec<String> = view
                    .0
                    .iter()
                    .map(|(n, r)| format!("{n}: {:?} (last_heard={})", r.status, r.last_heard))
                    .collect();
                lines.sort();
                CommandResult::GossipView(lines.join("\n"))
            }
            Command::Resync => {
                let synchronizer =
                    Synchronizer::new(transport.clone(), config.sync_interval_ms, config.merkle_fetch_timeout_ms);
                synchronizer.sync(&ring).await;
                CommandResult::Resync
            }
        };

        Ok(result)
    }
}
