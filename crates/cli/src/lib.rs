//! CLI demo harness for the key/value store.
//!
//! Each invocation assembles an in-process cluster from `--nodes` (ring,
//! replica store, hint table, coordinator, gossip) and runs one
//! subcommand against it:
//! - `put` / `get` through the coordinator
//! - `ring-describe` / `hints-list` / `gossip-view` for diagnostics
//! - `resync` to run one anti-entropy pass synchronously

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::CliConfig;
