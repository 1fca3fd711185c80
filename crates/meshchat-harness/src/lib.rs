//! Deterministic simulation harness for mesh chat networks.
//!
//! Seeded implementation of the core `Environment` trait plus tooling for
//! checking a network while it runs.
//!
//! # Invariant Testing
//!
//! The `invariants` module extracts a [`NetworkSnapshot`] from a live network
//! and checks structural and delivery properties against it. Use
//! [`InvariantRegistry::standard()`] for the full set.
//!
//! # Scenarios
//!
//! [`Scenario`] wires a [`SimEnv`], the graph builder and the driver together
//! so a test only states the parameters and an oracle.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod invariants;
pub mod scenario;
pub mod sim_env;

pub use invariants::{
    ConnectedIffNeighbors, ConnectivityMonotonicity, EdgeSymmetry, HistoryAccounting,
    HistoryProvenance, Invariant, InvariantRegistry, InvariantResult, NetworkSnapshot,
    NoSelfLoops, NodeSnapshot, Violation,
};
pub use scenario::{Oracle, Scenario, ScenarioError, ScenarioOutcome};
pub use sim_env::{DEFAULT_TICK, SimEnv};
