//! # Simulated Scheduler
//!
//! A discrete-event simulator of preemptive, priority-driven Round-Robin
//! CPU scheduling.
//!
//! ## Purpose
//!
//! The engine replays a static workload against a single simulated CPU:
//! - Runs under `cargo test`
//! - Deterministic (logical clock, no real concurrency)
//! - Inspectable (every phase and every collection is observable)
//!
//! ## Model
//!
//! - **Priority first**: only processes of the highest ready priority run.
//! - **Time-sliced**: a dispatch runs at most one slice.
//! - **Bursty**: after a fixed amount of CPU a process blocks on I/O for a
//!   fixed duration, then re-enters the ready queue at the tail.
//! - **Logical time**: the clock jumps straight to the next event.
//!
//! ## Example
//!
//! ```
//! use core_types::ProcessDescriptor;
//! use sim_scheduler::{Scheduler, SchedulerConfig};
//!
//! let workload = vec![ProcessDescriptor::new("P1", 1, 0, 10, 10)];
//! let report = Scheduler::new(SchedulerConfig::new(4, 2), workload)
//!     .and_then(Scheduler::run)
//!     .unwrap();
//! assert_eq!(report.average_turnaround, 10.0);
//! ```

pub mod config;
pub mod error;
mod queue;
pub mod scheduler;
pub mod trace;

pub use config::{ConfigError, SchedulerConfig, SliceExpiry};
pub use error::SimulationError;
pub use queue::select_highest_priority;
pub use scheduler::{Completion, Dispatch, ProcessState, Scheduler, SimulationReport};
pub use trace::{format_significant, EventKind, Trace, TraceEvent, END_LABEL, IDLE_LABEL};
