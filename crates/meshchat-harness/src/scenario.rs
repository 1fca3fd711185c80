//! Scenario runner.
//!
//! A scenario builds a network from a seed (or a forced topology), runs the
//! driver one round at a time, checks invariants after construction and after
//! every round, and finally hands the network to an oracle closure.
//!
//! ```ignore
//! let outcome = Scenario::new()
//!     .with_seed(7)
//!     .with_nodes(5)
//!     .with_probability(0.4)
//!     .with_rounds(3)
//!     .oracle(Box::new(|network| {
//!         assert_eq!(network.len(), 5);
//!         Ok(())
//!     }))
//!     .run()?;
//! ```

use meshchat_core::{
    Environment, GraphBuilder, MessageSource, Network, NetworkConfig, NetworkError, RunStats,
    SimulationDriver, VocabularySource,
};
use thiserror::Error;

use crate::{
    invariants::{InvariantRegistry, NetworkSnapshot, Violation},
    sim_env::SimEnv,
};

/// Final check run against the network once all rounds complete.
pub type Oracle = Box<dyn FnOnce(&Network) -> Result<(), String>>;

/// Errors that stop a scenario.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// Building, connecting or propagating failed
    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    /// A forced edge referenced a node index past the node count
    #[error("forced edge ({a}, {b}) is out of range for {nodes} nodes")]
    EdgeOutOfRange {
        /// First endpoint index
        a: usize,
        /// Second endpoint index
        b: usize,
        /// Number of nodes in the scenario
        nodes: usize,
    },

    /// One or more invariants failed
    #[error("invariant violation after round {round}: {}", join(.violations))]
    Invariant {
        /// Rounds completed when the violation was found
        round: usize,
        /// Every violated invariant
        violations: Vec<Violation>,
    },

    /// The oracle rejected the final network
    #[error("oracle failed: {0}")]
    Oracle(String),
}

fn join(violations: &[Violation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}

/// Result of a completed scenario.
#[derive(Debug)]
pub struct ScenarioOutcome {
    /// The network after the last round.
    pub network: Network,
    /// Driver totals.
    pub stats: RunStats,
    /// Seed the scenario ran with.
    pub seed: u64,
}

/// Builder-style description of a simulation run.
pub struct Scenario {
    seed: u64,
    config: NetworkConfig,
    edges: Option<Vec<(usize, usize)>>,
    rounds: usize,
    source: Option<Box<dyn MessageSource>>,
    invariants: InvariantRegistry,
    oracle: Option<Oracle>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::new()
    }
}

impl Scenario {
    /// A scenario with default parameters, seed 0 and standard invariants.
    pub fn new() -> Self {
        Self {
            seed: 0,
            config: NetworkConfig::default(),
            edges: None,
            rounds: 1,
            source: None,
            invariants: InvariantRegistry::standard(),
            oracle: None,
        }
    }

    /// Seed for the environment.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of nodes.
    #[must_use]
    pub fn with_nodes(mut self, count: usize) -> Self {
        self.config.node_count = count;
        self
    }

    /// Connection probability for the random builder.
    #[must_use]
    pub fn with_probability(mut self, probability: f64) -> Self {
        self.config.connection_probability = probability;
        self
    }

    /// Replace random edges with exactly these, by creation index.
    ///
    /// The probability is ignored when edges are forced.
    #[must_use]
    pub fn with_edges(mut self, edges: impl IntoIterator<Item = (usize, usize)>) -> Self {
        self.edges = Some(edges.into_iter().collect());
        self
    }

    /// Number of rounds to run.
    #[must_use]
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = rounds;
        self
    }

    /// Message source. Defaults to the greetings vocabulary seeded from the
    /// environment.
    #[must_use]
    pub fn with_source(mut self, source: Box<dyn MessageSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Replace the invariant registry.
    #[must_use]
    pub fn with_invariants(mut self, invariants: InvariantRegistry) -> Self {
        self.invariants = invariants;
        self
    }

    /// Final check on the network.
    #[must_use]
    pub fn oracle(mut self, oracle: Oracle) -> Self {
        self.oracle = Some(oracle);
        self
    }

    /// Build the network, run every round and check everything.
    pub fn run(self) -> Result<ScenarioOutcome, ScenarioError> {
        let env = SimEnv::with_seed(self.seed);
        let mut network = self.build_network(&env)?;

        let mut snapshot = NetworkSnapshot::from_network(&network).with_rounds(0);
        check(&self.invariants, &snapshot, 0)?;

        let mut source: Box<dyn MessageSource> = match self.source {
            Some(source) => source,
            None => Box::new(VocabularySource::greetings(env.fork_rng())),
        };

        let mut driver = SimulationDriver::new(env);
        for round in 1..=self.rounds {
            driver.run_round(&mut network, source.as_mut())?;
            snapshot.observe(&network);
            snapshot.rounds = Some(round);
            check(&self.invariants, &snapshot, round)?;
        }

        if let Some(oracle) = self.oracle {
            oracle(&network).map_err(ScenarioError::Oracle)?;
        }

        tracing::debug!(seed = self.seed, rounds = self.rounds, "scenario passed");
        Ok(ScenarioOutcome { network, stats: driver.completed(), seed: self.seed })
    }

    fn build_network<E: Environment>(&self, env: &E) -> Result<Network, ScenarioError> {
        let Some(edges) = &self.edges else {
            return Ok(GraphBuilder::new(self.config).build(env)?);
        };

        let nodes = self.config.node_count;
        let mut network = Network::with_isolated_nodes(nodes, env);
        for &(a, b) in edges {
            let (Some(&x), Some(&y)) = (network.node_ids().get(a), network.node_ids().get(b))
            else {
                return Err(ScenarioError::EdgeOutOfRange { a, b, nodes });
            };
            network.connect(x, y)?;
        }
        Ok(network)
    }
}

fn check(
    registry: &InvariantRegistry,
    snapshot: &NetworkSnapshot,
    round: usize,
) -> Result<(), ScenarioError> {
    registry.check_all(snapshot).map_err(|violations| ScenarioError::Invariant { round, violations })
}
