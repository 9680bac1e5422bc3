//! Core library for the distributed key-value store.
//!
//! This crate provides the fundamental abstractions shared by every other
//! crate in the workspace:
//! - Token types and partitioner algorithms
//! - Ring position management and consistent-hash topology
//! - Node and virtual node abstractions
//! - Vector clocks for causal versioning
//! - Merkle trees for anti-entropy comparison
//! - The `ReplicaTransport`/`HintReplayer` capability traits other crates
//!   implement and depend on, decoupling them from each other
//! - Shared configuration and error types

pub mod config;
pub mod error;
pub mod merkle;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod token;
pub mod topology;
pub mod transport;
pub mod vector_clock;
pub mod vnode;

pub use config::{Config, NodeFailMode};
pub use error::{Error, Result};
pub use merkle::MerkleTree;
pub use node::{Node, NodeId};
pub use partitioner::Partitioner;
pub use ring::{Ring, RingBuilder};
pub use token::Token;
pub use topology::Topology;
pub use transport::{GetOutcome, HintReplayer, PutOutcome, ReplicaTransport, Versioned};
pub use vector_clock::VectorClock;
pub use vnode::VirtualNode;
