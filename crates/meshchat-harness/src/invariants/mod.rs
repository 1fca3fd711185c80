//! Invariant checking for deterministic simulation testing.
//!
//! Invariants are properties that must always hold during a simulation.
//! Unlike example-based tests that check specific scenarios, invariants
//! verify structural and delivery properties across every generated network
//! and every round.
//!
//! # Architecture
//!
//! The invariant system extracts observable state from a
//! [`Network`](meshchat_core::Network) into a [`NetworkSnapshot`], then runs
//! registered [`Invariant`] checks against it.
//!
//! # Usage
//!
//! ```ignore
//! let registry = InvariantRegistry::standard();
//! let snapshot = NetworkSnapshot::from_network(&network);
//! registry.check_all(&snapshot)?;
//! ```

mod checks;
mod snapshot;

pub use checks::{
    ConnectedIffNeighbors, ConnectivityMonotonicity, EdgeSymmetry, HistoryAccounting,
    HistoryProvenance, NoSelfLoops,
};
pub use snapshot::{NetworkSnapshot, NodeSnapshot};

/// Invariant check result.
pub type InvariantResult = Result<(), Violation>;

/// Invariant violation with context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Name of the violated invariant.
    pub invariant: &'static str,
    /// Description of what went wrong.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.invariant, self.message)
    }
}

impl std::error::Error for Violation {}

/// An invariant that can be checked against network state.
pub trait Invariant: Send + Sync {
    /// Invariant name for error reporting.
    fn name(&self) -> &'static str;

    /// Check the invariant against the current state.
    ///
    /// Returns `Ok(())` if the invariant holds, or a [`Violation`]
    /// describing what went wrong.
    fn check(&self, state: &NetworkSnapshot) -> InvariantResult;
}

/// Registry of invariants to check.
pub struct InvariantRegistry {
    invariants: Vec<Box<dyn Invariant>>,
}

impl Default for InvariantRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InvariantRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.invariants.iter().map(|inv| inv.name())).finish()
    }
}

impl InvariantRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self { invariants: Vec::new() }
    }

    /// Create a registry with every standard invariant.
    ///
    /// Includes:
    /// - [`EdgeSymmetry`]: adjacency is symmetric
    /// - [`NoSelfLoops`]: nobody neighbors itself
    /// - [`ConnectedIffNeighbors`]: flag matches degree
    /// - [`ConnectivityMonotonicity`]: connected never resets
    /// - [`HistoryProvenance`]: messages come from self or neighbors
    /// - [`HistoryAccounting`]: history length matches rounds and degree
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.add(EdgeSymmetry);
        registry.add(NoSelfLoops);
        registry.add(ConnectedIffNeighbors);
        registry.add(ConnectivityMonotonicity);
        registry.add(HistoryProvenance);
        registry.add(HistoryAccounting);
        registry
    }

    /// Create a registry with only the graph-shape invariants.
    ///
    /// For checking a freshly built network before any round runs.
    pub fn topology() -> Self {
        let mut registry = Self::new();
        registry.add(EdgeSymmetry);
        registry.add(NoSelfLoops);
        registry.add(ConnectedIffNeighbors);
        registry
    }

    /// Add an invariant to the registry.
    pub fn add<I: Invariant + 'static>(&mut self, invariant: I) {
        self.invariants.push(Box::new(invariant));
    }

    /// Check all invariants against the given state.
    ///
    /// Returns `Ok(())` if all invariants hold, or all violations found.
    pub fn check_all(&self, state: &NetworkSnapshot) -> Result<(), Vec<Violation>> {
        let violations: Vec<_> =
            self.invariants.iter().filter_map(|inv| inv.check(state).err()).collect();

        if violations.is_empty() { Ok(()) } else { Err(violations) }
    }

    /// Check all invariants, panicking on first violation.
    ///
    /// Use this in tests where you want immediate failure with context.
    #[allow(clippy::panic)]
    pub fn assert_all(&self, state: &NetworkSnapshot, context: &str) {
        if let Err(violations) = self.check_all(state) {
            let messages: Vec<_> = violations.iter().map(ToString::to_string).collect();
            panic!("Invariant violation {context}:\n  {}", messages.join("\n  "));
        }
    }

    /// Number of registered invariants.
    pub fn len(&self) -> usize {
        self.invariants.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.invariants.is_empty()
    }
}
