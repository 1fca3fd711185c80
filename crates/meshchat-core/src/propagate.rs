//! One-hop message propagation.
//!
//! A broadcast reaches the origin itself and each direct neighbor whose
//! `connected` flag is set. Neighbors of neighbors are not reached: there is
//! no relay or re-broadcast step.

use crate::{
    error::{NetworkError, NetworkResult},
    id::NodeId,
    message::Message,
    network::Network,
};

/// Deliver `message` from `origin` to itself and its direct neighbors.
///
/// The origin's own history always receives the message, even when it has no
/// neighbors. A neighbor receives it only while connected. Returns the number
/// of neighbor deliveries.
///
/// Every recipient is resolved before the first append, so an unknown origin
/// (or a dangling neighbor reference) fails with
/// [`NetworkError::UnknownNode`] and no history changes.
pub fn propagate(network: &mut Network, origin: NodeId, message: Message) -> NetworkResult<usize> {
    let mut recipients = Vec::new();
    for neighbor in network.neighbors(origin)? {
        let node = network.get(neighbor).ok_or(NetworkError::UnknownNode(neighbor))?;
        if node.is_connected() {
            recipients.push(neighbor);
        }
    }

    for &neighbor in &recipients {
        network.append_history(neighbor, message.clone())?;
    }
    network.append_history(origin, message)?;

    tracing::trace!(%origin, deliveries = recipients.len(), "propagated message");
    Ok(recipients.len())
}
