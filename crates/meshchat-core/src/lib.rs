//! Random peer network construction and one-hop message propagation.
//!
//! Builds a graph of nodes where every pair is connected with a fixed
//! probability, then runs rounds in which each node emits one message that is
//! delivered to itself and its direct neighbors. Each node keeps its own chat
//! history.
//!
//! # Architecture
//!
//! Pure, synchronous logic: time and randomness come from an [`Environment`]
//! supplied by the caller, and message content comes from a
//! [`MessageSource`]. The same code runs against the OS clock and entropy in
//! production and against a seeded RNG and virtual clock in simulation.
//!
//! # Components
//!
//! - [`NodeIdGenerator`]: unique 128-bit node identifiers
//! - [`GraphBuilder`]: `n` nodes, one edge draw per unordered pair
//! - [`Network`]: owns nodes, adjacency (by id) and histories
//! - [`propagate`]: one-hop delivery to origin and connected neighbors
//! - [`SimulationDriver`]: rounds over nodes in creation order
//! - [`MessageSource`]: pluggable content generator

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod builder;
pub mod config;
pub mod driver;
pub mod env;
pub mod error;
pub mod id;
pub mod message;
pub mod network;
pub mod node;
pub mod propagate;
pub mod source;

pub use builder::{GraphBuilder, build};
pub use config::{NetworkConfig, SimulationConfig};
pub use driver::{RunStats, SimulationDriver, run};
pub use env::{Environment, Timestamp};
pub use error::{NetworkError, NetworkResult};
pub use id::{NodeId, NodeIdGenerator};
pub use message::Message;
pub use network::Network;
pub use node::Node;
pub use propagate::propagate;
pub use source::{DEFAULT_VOCABULARY, MessageSource, VocabularySource};
