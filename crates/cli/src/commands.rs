//! Subcommands exposed on the command line.

use clap::Subcommand;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Write a key/value pair through the coordinator.
    Put { key: String, value: String },
    /// Read a key through the coordinator.
    Get { key: String },
    /// Print ring ownership.
    RingDescribe,
    /// List pending hinted-handoff entries.
    HintsList,
    /// Print one node's gossip view.
    GossipView { node: String },
    /// Run one anti-entropy pass synchronously.
    Resync,
}

#[derive(Debug)]
pub enum CommandResult {
    Put,
    Get(Option<String>),
    RingDescribe(String),
    HintsList(Vec<String>),
    GossipView(String),
    Resync,
}

impl std::fmt::Display for CommandResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandResult::Put => write!(f, "ok"),
            CommandResult::Get(Some(value)) => write!(f, "{value}"),
            CommandResult::Get(None) => write!(f, "(not found)"),
            CommandResult::RingDescribe(s) => write!(f, "{s}"),
            CommandResult::HintsList(lines) if lines.is_empty() => write!(f, "(no pending hints)"),
            CommandResult::HintsList(lines) => write!(f, "{}", lines.join("\n")),
            CommandResult::GossipView(s) => write!(f, "{s}"),
            CommandResult::Resync => write!(f, "sync pass complete"),
        }
    }
}
