//! The network aggregate: node table, adjacency and history storage.
//!
//! The network exclusively owns every [`Node`]. Edges are relations between
//! [`NodeId`]s, recorded symmetrically on both endpoints in one call so the
//! two sides can never disagree. Creation order is kept separately and is the
//! stable traversal order used by the driver.

use std::collections::HashMap;

use crate::{
    env::Environment,
    error::{NetworkError, NetworkResult},
    id::{NodeId, NodeIdGenerator},
    message::Message,
    node::Node,
};

/// A simulated peer network.
#[derive(Debug, Clone, Default)]
pub struct Network {
    /// Node ID → node record
    nodes: HashMap<NodeId, Node>,
    /// Node IDs in creation order
    order: Vec<NodeId>,
    /// Number of undirected edges
    edges: usize,
}

impl Network {
    /// Create an empty network.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create `count` isolated nodes with fresh identifiers from `env`.
    pub fn with_isolated_nodes<E: Environment>(count: usize, env: &E) -> Self {
        let mut ids = NodeIdGenerator::new();
        let mut network = Self {
            nodes: HashMap::with_capacity(count),
            order: Vec::with_capacity(count),
            edges: 0,
        };
        for _ in 0..count {
            let id = ids.issue(env);
            network.nodes.insert(id, Node::new(id));
            network.order.push(id);
        }
        network
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the network has no nodes.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.edges
    }

    /// Number of nodes with at least one edge.
    pub fn connected_count(&self) -> usize {
        self.nodes.values().filter(|node| node.is_connected()).count()
    }

    /// Check if a node is part of the network.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Node record. `None` if the node doesn't exist.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Node record, or [`NetworkError::UnknownNode`].
    pub fn node(&self, id: NodeId) -> NetworkResult<&Node> {
        self.nodes.get(&id).ok_or(NetworkError::UnknownNode(id))
    }

    /// Node IDs in creation order.
    pub fn node_ids(&self) -> &[NodeId] {
        &self.order
    }

    /// Nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Direct neighbors of `id`, in identifier order.
    pub fn neighbors(&self, id: NodeId) -> NetworkResult<impl Iterator<Item = NodeId> + '_> {
        Ok(self.node(id)?.neighbors().iter().copied())
    }

    /// Chat history of `id`, oldest first.
    pub fn history(&self, id: NodeId) -> NetworkResult<&[Message]> {
        Ok(self.node(id)?.history())
    }

    /// Add an undirected edge between `a` and `b`.
    ///
    /// Both endpoints get the other in their neighbor set and are marked
    /// connected. Returns `false` if the edge already existed.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> NetworkResult<bool> {
        if a == b {
            return Err(NetworkError::SelfLoop(a));
        }
        if !self.contains(b) {
            return Err(NetworkError::UnknownNode(b));
        }

        let added = self.nodes.get_mut(&a).ok_or(NetworkError::UnknownNode(a))?.link(b);
        if let Some(node) = self.nodes.get_mut(&b) {
            node.link(a);
        }
        if added {
            self.edges += 1;
        }
        Ok(added)
    }

    /// Append `message` to the history of `id`.
    pub fn append_history(&mut self, id: NodeId, message: Message) -> NetworkResult<()> {
        self.nodes.get_mut(&id).ok_or(NetworkError::UnknownNode(id))?.push_history(message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    };

    use super::*;
    use crate::env::Timestamp;

    #[derive(Clone, Default)]
    struct SequentialEnv {
        next: Arc<AtomicU64>,
    }

    impl Environment for SequentialEnv {
        fn now(&self) -> Timestamp {
            Timestamp::ZERO
        }

        fn random_bytes(&self, buffer: &mut [u8]) {
            let value = u128::from(self.next.fetch_add(1, Ordering::Relaxed) + 1).to_be_bytes();
            let start = value.len() - buffer.len();
            buffer.copy_from_slice(&value[start..]);
        }
    }

    fn three_nodes() -> (Network, NodeId, NodeId, NodeId) {
        let network = Network::with_isolated_nodes(3, &SequentialEnv::default());
        let ids = network.node_ids().to_vec();
        (network, ids[0], ids[1], ids[2])
    }

    #[test]
    fn isolated_nodes_keep_creation_order() {
        let (network, a, b, c) = three_nodes();
        assert_eq!(network.len(), 3);
        assert_eq!((a, b, c), (NodeId::new(1), NodeId::new(2), NodeId::new(3)));
        assert_eq!(network.edge_count(), 0);
        assert_eq!(network.connected_count(), 0);

        let visited: Vec<_> = network.nodes().map(Node::id).collect();
        assert_eq!(visited, vec![a, b, c]);
    }

    #[test]
    fn connect_is_symmetric() {
        let (mut network, a, b, c) = three_nodes();
        assert!(network.connect(a, b).unwrap());

        assert!(network.node(a).unwrap().is_neighbor(b));
        assert!(network.node(b).unwrap().is_neighbor(a));
        assert!(network.node(a).unwrap().is_connected());
        assert!(network.node(b).unwrap().is_connected());
        assert!(!network.node(c).unwrap().is_connected());
        assert_eq!(network.edge_count(), 1);
        assert_eq!(network.connected_count(), 2);
    }

    #[test]
    fn duplicate_edge_is_not_counted() {
        let (mut network, a, b, _) = three_nodes();
        assert!(network.connect(a, b).unwrap());
        assert!(!network.connect(b, a).unwrap());
        assert_eq!(network.edge_count(), 1);
        assert_eq!(network.node(a).unwrap().degree(), 1);
    }

    #[test]
    fn self_loop_is_rejected() {
        let (mut network, a, _, _) = three_nodes();
        assert_eq!(network.connect(a, a), Err(NetworkError::SelfLoop(a)));
        assert!(!network.node(a).unwrap().is_connected());
    }

    #[test]
    fn connect_unknown_node_leaves_network_untouched() {
        let (mut network, a, _, _) = three_nodes();
        let ghost = NodeId::new(99);

        assert_eq!(network.connect(a, ghost), Err(NetworkError::UnknownNode(ghost)));
        assert_eq!(network.connect(ghost, a), Err(NetworkError::UnknownNode(ghost)));
        assert!(!network.node(a).unwrap().is_connected());
        assert_eq!(network.edge_count(), 0);
    }

    #[test]
    fn lookups_on_unknown_node_fail() {
        let (network, ..) = three_nodes();
        let ghost = NodeId::new(99);

        assert!(!network.contains(ghost));
        assert!(network.get(ghost).is_none());
        assert_eq!(network.node(ghost).err(), Some(NetworkError::UnknownNode(ghost)));
        assert!(network.history(ghost).is_err());
        assert!(network.neighbors(ghost).is_err());
    }

    #[test]
    fn append_history_targets_one_node() {
        let (mut network, a, b, _) = three_nodes();
        network.connect(a, b).unwrap();

        let msg = Message::new("Hey!", a, Timestamp::ZERO);
        network.append_history(b, msg.clone()).unwrap();

        assert_eq!(network.history(b).unwrap(), &[msg]);
        assert!(network.history(a).unwrap().is_empty());
        assert_eq!(
            network.append_history(NodeId::new(99), Message::new("x", a, Timestamp::ZERO)),
            Err(NetworkError::UnknownNode(NodeId::new(99)))
        );
    }

    #[test]
    fn neighbors_iterate_in_id_order() {
        let (mut network, a, b, c) = three_nodes();
        network.connect(b, c).unwrap();
        network.connect(b, a).unwrap();

        let neighbors: Vec<_> = network.neighbors(b).unwrap().collect();
        assert_eq!(neighbors, vec![a, c]);
    }

    #[test]
    fn empty_network() {
        let network = Network::new();
        assert!(network.is_empty());
        assert_eq!(network.nodes().count(), 0);
    }
}
