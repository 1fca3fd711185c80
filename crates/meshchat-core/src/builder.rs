//! Random graph construction.
//!
//! Builds `n` nodes, then samples every unordered pair once: one uniform draw
//! in `[0, 1)` per pair, edge iff the draw is below the connection
//! probability. Pairs are visited row-major over creation indices, so a seeded
//! environment always consumes its random stream in the same positions.

use crate::{
    config::NetworkConfig,
    env::Environment,
    error::NetworkResult,
    network::Network,
};

/// Builds random networks from a [`NetworkConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphBuilder {
    config: NetworkConfig,
}

impl GraphBuilder {
    /// Create a builder for the given parameters.
    pub fn new(config: NetworkConfig) -> Self {
        Self { config }
    }

    /// Build a network, drawing identifiers and edges from `env`.
    ///
    /// The probability is validated before any node is created. All node
    /// identifiers are drawn before the first edge draw.
    pub fn build<E: Environment>(&self, env: &E) -> NetworkResult<Network> {
        self.config.validate()?;

        let probability = self.config.connection_probability;
        let mut network = Network::with_isolated_nodes(self.config.node_count, env);
        let ids = network.node_ids().to_vec();

        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                if env.random_f64() < probability {
                    network.connect(a, b)?;
                }
            }
        }

        tracing::debug!(
            nodes = network.len(),
            edges = network.edge_count(),
            connected = network.connected_count(),
            pairs = self.config.pair_count(),
            probability,
            "built random network"
        );

        Ok(network)
    }
}

/// Build a network of `node_count` nodes connected with `probability`.
///
/// Shorthand for `GraphBuilder::new(NetworkConfig::new(..)).build(env)`.
pub fn build<E: Environment>(
    node_count: usize,
    probability: f64,
    env: &E,
) -> NetworkResult<Network> {
    GraphBuilder::new(NetworkConfig::new(node_count, probability)).build(env)
}
