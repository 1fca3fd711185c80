//! A simulated network participant.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::{id::NodeId, message::Message};

/// A node: identity, connectivity flag, chat history and adjacency.
///
/// Nodes are owned by the [`Network`](crate::Network). Adjacency is held as
/// [`NodeId`]s, never as copies of other nodes, so a neighbor's history is
/// always read from the one owned record.
///
/// Mutation is crate-private: only the network can add edges or append
/// history, which is how the edge symmetry and `connected` invariants are
/// kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    id: NodeId,
    connected: bool,
    history: Vec<Message>,
    neighbors: BTreeSet<NodeId>,
}

impl Node {
    pub(crate) fn new(id: NodeId) -> Self {
        Self { id, connected: false, history: Vec::new(), neighbors: BTreeSet::new() }
    }

    /// Node identifier.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// True once the node has at least one edge. Never reset.
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Messages received so far, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Direct neighbors, in identifier order.
    pub fn neighbors(&self) -> &BTreeSet<NodeId> {
        &self.neighbors
    }

    /// Number of direct neighbors.
    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    /// Returns true if `other` is a direct neighbor.
    pub fn is_neighbor(&self, other: NodeId) -> bool {
        self.neighbors.contains(&other)
    }

    /// Record one side of an edge. Returns `false` if it already existed.
    pub(crate) fn link(&mut self, other: NodeId) -> bool {
        let added = self.neighbors.insert(other);
        self.connected = true;
        added
    }

    pub(crate) fn push_history(&mut self, message: Message) {
        self.history.push(message);
    }
}
