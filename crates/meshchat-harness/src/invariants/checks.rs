//! Standard invariant checks.
//!
//! These invariants capture structural and delivery properties that must
//! always hold. They verify WHAT must be true, not specific test scenarios.

use std::collections::HashMap;

use meshchat_core::NodeId;

use super::{Invariant, InvariantResult, NetworkSnapshot, NodeSnapshot, Violation};

fn violation(invariant: &'static str, message: String) -> InvariantResult {
    Err(Violation { invariant, message })
}

/// Adjacency must be symmetric.
///
/// If `b` lists `a` as a neighbor, `a` must list `b`. A one-sided edge would
/// let a message travel in one direction only.
pub struct EdgeSymmetry;

impl Invariant for EdgeSymmetry {
    fn name(&self) -> &'static str {
        "edge_symmetry"
    }

    fn check(&self, state: &NetworkSnapshot) -> InvariantResult {
        let by_id: HashMap<NodeId, &NodeSnapshot> =
            state.nodes.iter().map(|node| (node.id, node)).collect();

        for node in &state.nodes {
            for neighbor in &node.neighbors {
                let Some(other) = by_id.get(neighbor) else {
                    return violation(
                        self.name(),
                        format!("node {}: neighbor {} is not in the network", node.id, neighbor),
                    );
                };
                if !other.neighbors.contains(&node.id) {
                    return violation(
                        self.name(),
                        format!("node {} lists {} but not the reverse", node.id, neighbor),
                    );
                }
            }
        }
        Ok(())
    }
}

/// No node may neighbor itself.
pub struct NoSelfLoops;

impl Invariant for NoSelfLoops {
    fn name(&self) -> &'static str {
        "no_self_loops"
    }

    fn check(&self, state: &NetworkSnapshot) -> InvariantResult {
        match state.nodes.iter().find(|node| node.neighbors.contains(&node.id)) {
            Some(node) => violation(self.name(), format!("node {} is its own neighbor", node.id)),
            None => Ok(()),
        }
    }
}

/// `connected` must be true exactly when the node has a neighbor.
pub struct ConnectedIffNeighbors;

impl Invariant for ConnectedIffNeighbors {
    fn name(&self) -> &'static str {
        "connected_iff_neighbors"
    }

    fn check(&self, state: &NetworkSnapshot) -> InvariantResult {
        for node in &state.nodes {
            if node.connected != !node.neighbors.is_empty() {
                return violation(
                    self.name(),
                    format!(
                        "node {}: connected={} with {} neighbors",
                        node.id,
                        node.connected,
                        node.neighbors.len()
                    ),
                );
            }
        }
        Ok(())
    }
}

/// Connectivity must never go from true back to false.
///
/// There is no edge removal, so once a node is connected it stays connected
/// for the life of the network.
pub struct ConnectivityMonotonicity;

impl Invariant for ConnectivityMonotonicity {
    fn name(&self) -> &'static str {
        "connectivity_monotonicity"
    }

    fn check(&self, state: &NetworkSnapshot) -> InvariantResult {
        for node in &state.nodes {
            for (i, window) in node.connected_history.windows(2).enumerate() {
                if window[0] && !window[1] {
                    return violation(
                        self.name(),
                        format!("node {}: disconnected at observation {}", node.id, i + 1),
                    );
                }
            }
        }
        Ok(())
    }
}

/// Every history entry must come from the node itself or a direct neighbor.
///
/// Delivery is one hop: a message from a node at distance two or more, or
/// from an unknown sender, means propagation leaked.
pub struct HistoryProvenance;

impl Invariant for HistoryProvenance {
    fn name(&self) -> &'static str {
        "history_provenance"
    }

    fn check(&self, state: &NetworkSnapshot) -> InvariantResult {
        for node in &state.nodes {
            if let Some(sender) = node
                .senders
                .iter()
                .find(|sender| **sender != node.id && !node.neighbors.contains(*sender))
            {
                return violation(
                    self.name(),
                    format!("node {}: holds message from non-neighbor {}", node.id, sender),
                );
            }
        }
        Ok(())
    }
}

/// After `R` rounds each node holds `R` own messages plus `R` per neighbor.
///
/// Only checked when the snapshot knows how many rounds completed.
pub struct HistoryAccounting;

impl Invariant for HistoryAccounting {
    fn name(&self) -> &'static str {
        "history_accounting"
    }

    fn check(&self, state: &NetworkSnapshot) -> InvariantResult {
        let Some(rounds) = state.rounds else {
            return Ok(());
        };

        for node in &state.nodes {
            let mut per_sender: HashMap<NodeId, usize> = HashMap::new();
            for sender in &node.senders {
                *per_sender.entry(*sender).or_default() += 1;
            }

            let expected = rounds * (1 + node.neighbors.len());
            if node.history_len() != expected {
                return violation(
                    self.name(),
                    format!(
                        "node {}: {} history entries after {} rounds with {} neighbors, expected {}",
                        node.id,
                        node.history_len(),
                        rounds,
                        node.neighbors.len(),
                        expected
                    ),
                );
            }

            let own = per_sender.get(&node.id).copied().unwrap_or(0);
            if own != rounds {
                return violation(
                    self.name(),
                    format!("node {}: {} own messages after {} rounds", node.id, own, rounds),
                );
            }
        }
        Ok(())
    }
}
