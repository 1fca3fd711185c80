//! Errors that end a command-line run.

use meshchat_core::NetworkError;
use meshchat_harness::Violation;
use thiserror::Error;

use crate::report::ReportError;

/// Exit code for rejected parameters, matching clap's usage errors.
pub const EXIT_USAGE: u8 = 2;

/// Exit code for every other failure.
pub const EXIT_FAILURE: u8 = 1;

/// Failure of a simulation run.
#[derive(Error, Debug)]
pub enum SimError {
    /// Building or driving the network failed
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// `--check-invariants` found a broken invariant
    #[error("invariant violation after round {round}: {}", join(.violations))]
    Invariant {
        /// Rounds completed when the check ran
        round: usize,
        /// Every violated invariant
        violations: Vec<Violation>,
    },

    /// Writing `--output` failed
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl SimError {
    /// Process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Network(err) if err.is_invalid_parameter() => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }
}

fn join(violations: &[Violation]) -> String {
    violations.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ")
}
