//! Simulation errors

use crate::config::ConfigError;
use core_types::{ProcessId, Tick};
use thiserror::Error;

/// Errors raised by the scheduling engine
///
/// Apart from `Config`, `InvalidDescriptor`, `DuplicateProcess` and
/// `NoProcesses`, every variant signals an internal invariant violation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Process {0} is listed more than once")]
    DuplicateProcess(ProcessId),

    #[error("Process {id}: {reason}")]
    InvalidDescriptor { id: ProcessId, reason: &'static str },

    #[error("Cannot compute average turnaround: no processes were supplied")]
    NoProcesses,

    #[error("Invariant violation at t={now}: nothing ready, blocked or pending arrival")]
    NoRunnableProcess { now: Tick },

    #[error("Invariant violation at t={now}: ready queue is non-empty but no candidate was selected")]
    EmptySelection { now: Tick },

    #[error("Invariant violation: unknown process {0}")]
    UnknownProcess(ProcessId),

    #[error("Process {id} is not ready (state {state})")]
    NotReady { id: ProcessId, state: &'static str },

    #[error("Step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },

    #[error("Clock overflow advancing t={now} by {delta}")]
    ClockOverflow { now: Tick, delta: Tick },
}

impl SimulationError {
    /// Returns true if the error indicates a bug in the engine rather than
    /// bad input
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            SimulationError::NoRunnableProcess { .. }
                | SimulationError::EmptySelection { .. }
                | SimulationError::UnknownProcess(_)
                | SimulationError::NotReady { .. }
        )
    }
}
