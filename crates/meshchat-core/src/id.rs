//! Node identifiers and their generator.

use std::{collections::HashSet, fmt, num::ParseIntError, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::env::Environment;

/// A unique identifier for a simulated node.
///
/// 128 random bits drawn from the [`Environment`] at node creation. Ordered
/// and hashable so it can key maps and sort neighbor sets. Serialized as the
/// same 32-digit hex string it displays as, since JSON numbers lose precision
/// past 53 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct NodeId(u128);

impl NodeId {
    /// Create a node ID from a raw integer.
    #[inline]
    pub const fn new(id: u128) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl FromStr for NodeId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        u128::from_str_radix(s, 16).map(Self)
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for NodeId {
    type Error = ParseIntError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Issues node identifiers that are unique for the generator's lifetime.
///
/// Collisions between random 128-bit values are astronomically unlikely with
/// a real RNG, but a scripted test environment can repeat itself, so issued
/// ids are tracked and a repeat is redrawn.
#[derive(Debug, Default)]
pub struct NodeIdGenerator {
    issued: HashSet<NodeId>,
}

impl NodeIdGenerator {
    /// Create a generator that has issued nothing yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Draw a fresh identifier from `env`.
    pub fn issue<E: Environment>(&mut self, env: &E) -> NodeId {
        loop {
            let id = NodeId::new(env.random_u128());
            if self.issued.insert(id) {
                return id;
            }
            tracing::trace!(%id, "node id collision, redrawing");
        }
    }
}
