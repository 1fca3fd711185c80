//! Simulation driver.
//!
//! Runs rounds over a [`Network`]. Within a round every node, in creation
//! order, asks the [`MessageSource`] for content based on its current history
//! and broadcasts the result immediately. Delivery is not batched per round:
//! a node visited later in a round already sees what earlier nodes sent in
//! the same round, and its generated content may depend on that.

use crate::{
    env::Environment,
    error::NetworkResult,
    message::Message,
    network::Network,
    propagate::propagate,
    source::MessageSource,
};

/// Counters for a round or a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    /// Rounds completed.
    pub rounds: usize,
    /// Messages generated (one per node per round).
    pub messages: usize,
    /// Neighbor deliveries, not counting self-appends.
    pub deliveries: usize,
}

impl RunStats {
    fn absorb(&mut self, other: Self) {
        self.rounds += other.rounds;
        self.messages += other.messages;
        self.deliveries += other.deliveries;
    }
}

/// Drives message generation and propagation over a network.
///
/// Owns the [`Environment`] that stamps message timestamps.
#[derive(Debug, Clone)]
pub struct SimulationDriver<E> {
    env: E,
    completed: RunStats,
}

impl<E: Environment> SimulationDriver<E> {
    /// Create a driver stamping messages with `env`'s clock.
    pub fn new(env: E) -> Self {
        Self { env, completed: RunStats::default() }
    }

    /// Totals over every round this driver has run.
    pub fn completed(&self) -> RunStats {
        self.completed
    }

    /// Run `rounds` rounds.
    ///
    /// Stops at the first error; rounds and messages already committed stay
    /// in the network.
    pub fn run<S>(
        &mut self,
        network: &mut Network,
        source: &mut S,
        rounds: usize,
    ) -> NetworkResult<RunStats>
    where
        S: MessageSource + ?Sized,
    {
        tracing::info!(nodes = network.len(), edges = network.edge_count(), rounds, "run started");

        let mut stats = RunStats::default();
        for _ in 0..rounds {
            stats.absorb(self.run_round(network, source)?);
        }

        tracing::info!(
            rounds = stats.rounds,
            messages = stats.messages,
            deliveries = stats.deliveries,
            "run finished"
        );
        Ok(stats)
    }

    /// Run a single round: every node, in creation order, generates and
    /// broadcasts one message.
    pub fn run_round<S>(&mut self, network: &mut Network, source: &mut S) -> NetworkResult<RunStats>
    where
        S: MessageSource + ?Sized,
    {
        let order = network.node_ids().to_vec();
        let mut stats = RunStats { rounds: 1, ..RunStats::default() };

        for id in order {
            let content = source.generate(network.history(id)?);
            let message = Message::new(content, id, self.env.now());
            stats.deliveries += propagate(network, id, message)?;
            stats.messages += 1;
        }

        self.completed.absorb(stats);
        tracing::debug!(
            round = self.completed.rounds,
            messages = stats.messages,
            deliveries = stats.deliveries,
            "round finished"
        );
        Ok(stats)
    }
}

/// Run `rounds` rounds over `network` with a fresh driver.
pub fn run<E, S>(
    network: &mut Network,
    source: &mut S,
    env: E,
    rounds: usize,
) -> NetworkResult<RunStats>
where
    E: Environment,
    S: MessageSource + ?Sized,
{
    SimulationDriver::new(env).run(network, source, rounds)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    };

    use super::*;
    use crate::{env::Timestamp, id::NodeId};

    /// Sequential ids; clock ticks one microsecond per read.
    #[derive(Clone, Default)]
    struct TickEnv {
        next_id: Arc<AtomicU64>,
        clock: Arc<AtomicU64>,
    }

    impl Environment for TickEnv {
        fn now(&self) -> Timestamp {
            Timestamp::from_micros(self.clock.fetch_add(1, Ordering::Relaxed))
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            let value = u128::from(self.next_id.fetch_add(1, Ordering::Relaxed) + 1).to_be_bytes();
            buffer.copy_from_slice(&value[value.len() - buffer.len()..]);
        }
    }

    fn hi(_: &[Message]) -> String {
        "hi".to_string()
    }

    fn labels(network: &Network, id: NodeId, names: &[(NodeId, &str)]) -> Vec<String> {
        network
            .history(id)
            .unwrap()
            .iter()
            .map(|m| {
                let name = names.iter().find(|(n, _)| *n == m.sender()).map_or("?", |(_, s)| *s);
                format!("{}{}", m.content(), name)
            })
            .collect()
    }

    #[test]
    fn three_nodes_one_edge_one_round() {
        let env = TickEnv::default();
        let mut network = Network::with_isolated_nodes(3, &env);
        let [a, b, c] = [network.node_ids()[0], network.node_ids()[1], network.node_ids()[2]];
        network.connect(a, b).unwrap();

        let stats = run(&mut network, &mut hi, env, 1).unwrap();

        let names = [(a, "A"), (b, "B"), (c, "C")];
        assert_eq!(labels(&network, a, &names), ["hiA", "hiB"]);
        assert_eq!(labels(&network, b, &names), ["hiA", "hiB"]);
        assert_eq!(labels(&network, c, &names), ["hiC"]);
        assert_eq!(stats, RunStats { rounds: 1, messages: 3, deliveries: 2 });
    }

    #[test]
    fn single_node_hears_only_itself() {
        let env = TickEnv::default();
        let mut network = Network::with_isolated_nodes(1, &env);
        let only = network.node_ids()[0];

        run(&mut network, &mut hi, env, 5).unwrap();

        let history = network.history(only).unwrap();
        assert_eq!(history.len(), 5);
        assert!(history.iter().all(|m| m.sender() == only));
    }

    #[test]
    fn empty_network_runs_rounds_without_error() {
        let mut network = Network::new();
        let stats = run(&mut network, &mut hi, TickEnv::default(), 3).unwrap();
        assert_eq!(stats, RunStats { rounds: 3, messages: 0, deliveries: 0 });
    }

    #[test]
    fn zero_rounds_is_a_no_op() {
        let env = TickEnv::default();
        let mut network = Network::with_isolated_nodes(2, &env);
        let stats = run(&mut network, &mut hi, env, 0).unwrap();

        assert_eq!(stats, RunStats::default());
        assert!(network.nodes().all(|n| n.history().is_empty()));
    }

    #[test]
    fn later_nodes_see_earlier_messages_of_the_same_round() {
        let env = TickEnv::default();
        let mut network = Network::with_isolated_nodes(2, &env);
        let [a, b] = [network.node_ids()[0], network.node_ids()[1]];
        network.connect(a, b).unwrap();

        let mut count = |history: &[Message]| history.len().to_string();
        run(&mut network, &mut count, env, 1).unwrap();

        // a generates with an empty history; b already holds a's message.
        let contents: Vec<_> = network.history(b).unwrap().iter().map(Message::content).collect();
        assert_eq!(contents, ["0", "1"]);
    }

    #[test]
    fn timestamps_follow_generation_order() {
        let env = TickEnv::default();
        let mut network = Network::with_isolated_nodes(3, &env);
        let ids = network.node_ids().to_vec();
        for &other in &ids[1..] {
            network.connect(ids[0], other).unwrap();
        }

        run(&mut network, &mut hi, env, 2).unwrap();

        let stamps: Vec<_> =
            network.history(ids[0]).unwrap().iter().map(Message::timestamp).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(stamps.len(), 6);
    }

    #[test]
    fn driver_accumulates_across_calls() {
        let env = TickEnv::default();
        let mut network = Network::with_isolated_nodes(2, &env);
        let mut driver = SimulationDriver::new(env);

        driver.run_round(&mut network, &mut hi).unwrap();
        driver.run(&mut network, &mut hi, 2).unwrap();

        assert_eq!(driver.completed(), RunStats { rounds: 3, messages: 6, deliveries: 0 });
    }
}
