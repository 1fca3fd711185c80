//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of a network at a point in time.
//! Invariants operate on snapshots rather than the live network so checks
//! are consistent and can compare observations across rounds.

use std::collections::{BTreeSet, HashMap};

use meshchat_core::{Network, NodeId};

/// Snapshot of a whole network.
#[derive(Debug, Clone, Default)]
pub struct NetworkSnapshot {
    /// Per-node snapshots, in creation order.
    pub nodes: Vec<NodeSnapshot>,
    /// Completed driver rounds, when known. Enables history accounting.
    pub rounds: Option<usize>,
}

impl NetworkSnapshot {
    /// Create an empty snapshot (no nodes).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture the current state of `network`.
    pub fn from_network(network: &Network) -> Self {
        let mut snapshot = Self::empty();
        snapshot.observe(network);
        snapshot
    }

    /// Create a snapshot from explicit node snapshots.
    pub fn from_nodes(nodes: Vec<NodeSnapshot>) -> Self {
        Self { nodes, rounds: None }
    }

    /// Set the number of completed rounds.
    #[must_use]
    pub fn with_rounds(mut self, rounds: usize) -> Self {
        self.rounds = Some(rounds);
        self
    }

    /// Refresh from `network`, keeping each node's connectivity history.
    ///
    /// Nodes not seen before are appended; every node records one new
    /// connectivity observation.
    pub fn observe(&mut self, network: &Network) {
        let mut previous: HashMap<NodeId, Vec<bool>> = self
            .nodes
            .drain(..)
            .map(|node| (node.id, node.connected_history))
            .collect();

        self.nodes = network
            .nodes()
            .map(|node| {
                let mut snapshot = NodeSnapshot::new(node.id())
                    .with_connected(node.is_connected())
                    .with_neighbors(node.neighbors().iter().copied())
                    .with_senders(node.history().iter().map(|message| message.sender()));
                snapshot.connected_history = previous.remove(&node.id()).unwrap_or_default();
                snapshot.record_connected(node.is_connected());
                snapshot
            })
            .collect();
    }

    /// Look up a node snapshot by id.
    pub fn node(&self, id: NodeId) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|node| node.id == id)
    }
}

/// Snapshot of a single node's observable state.
#[derive(Debug, Clone)]
pub struct NodeSnapshot {
    /// Node identifier.
    pub id: NodeId,
    /// Current connectivity flag.
    pub connected: bool,
    /// Direct neighbors.
    pub neighbors: BTreeSet<NodeId>,
    /// Sender of every history entry, oldest first.
    pub senders: Vec<NodeId>,
    /// Connectivity flag at every observation (for monotonicity checks).
    pub connected_history: Vec<bool>,
}

impl NodeSnapshot {
    /// Create an isolated node snapshot with empty history.
    pub fn new(id: NodeId) -> Self {
        Self {
            id,
            connected: false,
            neighbors: BTreeSet::new(),
            senders: Vec::new(),
            connected_history: Vec::new(),
        }
    }

    /// Set the connectivity flag.
    #[must_use]
    pub fn with_connected(mut self, connected: bool) -> Self {
        self.connected = connected;
        self
    }

    /// Add neighbors.
    #[must_use]
    pub fn with_neighbors(mut self, neighbors: impl IntoIterator<Item = NodeId>) -> Self {
        self.neighbors.extend(neighbors);
        self
    }

    /// Append history senders.
    #[must_use]
    pub fn with_senders(mut self, senders: impl IntoIterator<Item = NodeId>) -> Self {
        self.senders.extend(senders);
        self
    }

    /// Record a connectivity observation.
    pub fn record_connected(&mut self, connected: bool) {
        self.connected_history.push(connected);
    }

    /// Number of history entries.
    pub fn history_len(&self) -> usize {
        self.senders.len()
    }
}
