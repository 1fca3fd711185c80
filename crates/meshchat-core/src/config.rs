//! Construction and driver parameters.

use serde::{Deserialize, Serialize};

use crate::error::{NetworkError, NetworkResult};

/// Parameters for building a random network.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Number of nodes to create.
    pub node_count: usize,
    /// Probability that any given pair of nodes is connected, in `[0, 1]`.
    pub connection_probability: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self { node_count: 10, connection_probability: 0.5 }
    }
}

impl NetworkConfig {
    /// Create a config for `node_count` nodes connected with `probability`.
    pub fn new(node_count: usize, connection_probability: f64) -> Self {
        Self { node_count, connection_probability }
    }

    /// Reject a probability that is NaN or outside `[0, 1]`.
    pub fn validate(&self) -> NetworkResult<()> {
        if (0.0..=1.0).contains(&self.connection_probability) {
            Ok(())
        } else {
            Err(NetworkError::InvalidProbability { probability: self.connection_probability })
        }
    }

    /// Number of unordered node pairs the builder will sample.
    ///
    /// Saturates at `usize::MAX` for node counts whose pair count does not
    /// fit.
    pub fn pair_count(&self) -> usize {
        let n = self.node_count as u128;
        usize::try_from(n * n.saturating_sub(1) / 2).unwrap_or(usize::MAX)
    }
}

/// Parameters for a full simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Network construction parameters.
    pub network: NetworkConfig,
    /// Number of rounds the driver runs.
    pub rounds: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { network: NetworkConfig::default(), rounds: 10 }
    }
}

impl SimulationConfig {
    /// Validate every nested parameter.
    pub fn validate(&self) -> NetworkResult<()> {
        self.network.validate()
    }
}
