//! Environment abstraction for deterministic testing.
//!
//! Decouples network construction and propagation from system resources
//! (time, randomness). Enables deterministic simulation (virtual clock, seeded
//! RNG) and production use with real system resources.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A point in time as observed by an [`Environment`], in microseconds.
///
/// Production environments count from the Unix epoch; simulation environments
/// count from the start of the simulation. Only ordering and equality are
/// meaningful across environments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The zero instant.
    pub const ZERO: Self = Self(0);

    /// Create a timestamp from raw microseconds.
    pub const fn from_micros(micros: u64) -> Self {
        Self(micros)
    }

    /// Raw microseconds.
    pub const fn as_micros(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}us", self.0)
    }
}

/// Abstract environment providing time and randomness.
///
/// # Invariants
///
/// Implementations MUST guarantee:
///
/// - `now()` never goes backwards
/// - given the same seed, a simulation environment produces the same sequence
///   of random bytes and the same sequence of instants
pub trait Environment: Clone + Send + Sync + 'static {
    /// Current time (monotonic).
    fn now(&self) -> Timestamp;

    /// Fills the provided buffer with random bytes.
    fn random_bytes(&self, buffer: &mut [u8]);

    /// Generates a random `u64`.
    fn random_u64(&self) -> u64 {
        let mut bytes = [0u8; 8];
        self.random_bytes(&mut bytes);
        u64::from_be_bytes(bytes)
    }

    /// Generates a random `u128`.
    ///
    /// Used for node identifiers.
    fn random_u128(&self) -> u128 {
        let mut bytes = [0u8; 16];
        self.random_bytes(&mut bytes);
        u128::from_be_bytes(bytes)
    }

    /// Generates a uniform `f64` in `[0.0, 1.0)`.
    ///
    /// Takes the top 53 bits of a `u64` so every representable value is
    /// equally likely and `1.0` is never produced.
    fn random_f64(&self) -> f64 {
        (self.random_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}
