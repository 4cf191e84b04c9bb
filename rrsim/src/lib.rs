//! # RRSim Host
//!
//! Command-line host for the priority Round-Robin scheduling simulator.
//!
//! ## Responsibilities
//!
//! The host:
//! - Parses the invocation (input file, block duration, time slice, options)
//! - Loads the workload and hands it to the engine
//! - Renders the finished trace as text or JSON
//! - Maps failures to exit codes
//!
//! ## Non-Responsibilities
//!
//! The host does NOT:
//! - Make scheduling decisions
//! - Touch the simulation clock
//! - Print partial traces: output is rendered only after a successful run

pub mod args;
pub mod render;
pub mod runtime;

pub use args::{parse_args, usage, Invocation};
pub use render::{render_json, render_text, OutputFormat};
pub use runtime::{HostConfig, HostError, HostOutput, HostRuntime};
