//! # Core Types
//!
//! This crate defines the vocabulary shared by the workload loader, the
//! scheduling engine and the host binary.
//!
//! ## Key Types
//!
//! - [`ProcessId`]: Unique name of a simulated process
//! - [`Tick`]: A point or span on the logical simulation clock
//! - [`ProcessDescriptor`]: Immutable description of one process

pub mod ids;
pub mod process;

pub use ids::ProcessId;
pub use process::{ProcessDescriptor, Tick};
