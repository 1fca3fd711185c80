//! Error types for network construction and propagation.
//!
//! All failures are call-time validation failures: there is no I/O and no
//! transient state, so nothing here is retryable. A failed call leaves the
//! network exactly as it was before the call.

use thiserror::Error;

use crate::id::NodeId;

/// Errors returned by [`Network`](crate::Network) operations, the graph
/// builder, the propagator and the driver.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    /// Connection probability is NaN or outside `[0, 1]`
    #[error("invalid connection probability {probability}: must be within [0, 1]")]
    InvalidProbability {
        /// The rejected probability
        probability: f64,
    },

    /// Referenced node is not part of the network
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// Attempted to connect a node to itself
    #[error("node {0} cannot be its own neighbor")]
    SelfLoop(NodeId),
}

impl NetworkError {
    /// Returns true if the error was caused by construction parameters rather
    /// than by a node reference.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::InvalidProbability { .. })
    }
}

/// Convenience alias for `Result<T, NetworkError>`.
pub type NetworkResult<T> = Result<T, NetworkError>;
