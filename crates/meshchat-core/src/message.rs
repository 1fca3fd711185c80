//! Chat message value type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{env::Timestamp, id::NodeId};

/// A chat message emitted by a node.
///
/// Immutable once created: fields are private and only readable through
/// accessors. Every recipient holds its own clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    content: String,
    sender: NodeId,
    timestamp: Timestamp,
}

impl Message {
    /// Create a message attributed to `sender`.
    pub fn new(content: impl Into<String>, sender: NodeId, timestamp: Timestamp) -> Self {
        Self { content: content.into(), sender, timestamp }
    }

    /// Message text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Node that produced the message.
    pub fn sender(&self) -> NodeId {
        self.sender
    }

    /// When the message was produced.
    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.content.chars().count() > 32 {
            let head: String = self.content.chars().take(32).collect();
            write!(f, "[{}] {}: {head}…", self.timestamp, self.sender)
        } else {
            write!(f, "[{}] {}: {}", self.timestamp, self.sender, self.content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors() {
        let msg = Message::new("Hi!", NodeId::new(7), Timestamp::from_micros(3));
        assert_eq!(msg.content(), "Hi!");
        assert_eq!(msg.sender(), NodeId::new(7));
        assert_eq!(msg.timestamp(), Timestamp::from_micros(3));
    }

    #[test]
    fn display_truncates_long_content() {
        let long = "x".repeat(40);
        let msg = Message::new(long, NodeId::new(1), Timestamp::ZERO);
        let shown = msg.to_string();
        assert!(shown.ends_with('…'));
        assert_eq!(shown.matches('x').count(), 32);
    }
}
