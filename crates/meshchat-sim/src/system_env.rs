//! Production Environment implementation using system time and OS entropy.
//!
//! `SystemEnv` stamps messages with wall-clock microseconds since the Unix
//! epoch and draws node ids and edge rolls from the OS RNG (getrandom). Runs
//! are not reproducible; pass `--seed` to use the simulated environment.
//!
//! The wall clock can step backwards (NTP, manual changes), so readings are
//! clamped to the latest value any clone has returned.

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{SystemTime, UNIX_EPOCH},
};

use meshchat_core::{Environment, Timestamp};

/// Production environment using the system clock and OS randomness.
///
/// # Panics
///
/// Panics if the OS RNG fails. Without entropy there is no way to draw node
/// identifiers or edges, and the failure indicates an OS-level problem.
#[derive(Debug, Clone, Default)]
pub struct SystemEnv {
    /// Latest timestamp handed out, in microseconds.
    latest: Arc<AtomicU64>,
}

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Environment for SystemEnv {
    #[allow(clippy::disallowed_methods)]
    fn now(&self) -> Timestamp {
        // A clock set before 1970 reads as the epoch.
        let micros = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_micros() as u64);
        let previous = self.latest.fetch_max(micros, Ordering::Relaxed);
        Timestamp::from_micros(previous.max(micros))
    }

    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer).expect("invariant: OS RNG failure is unrecoverable");
    }
}
