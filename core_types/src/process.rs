//! Static process descriptions

use crate::ProcessId;
use serde::{Deserialize, Serialize};

/// A point or a span on the logical simulation clock
pub type Tick = u64;

/// Immutable description of a simulated process
///
/// Created once when the workload is loaded and never mutated afterwards.
/// Runtime bookkeeping (remaining CPU, burst countdown, unblock time) lives
/// in the scheduling engine, keyed by [`ProcessId`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDescriptor {
    /// Unique process name
    pub id: ProcessId,
    /// Scheduling priority; higher is more urgent
    pub priority: u32,
    /// Clock value at which the process becomes eligible to run
    pub arrival_time: Tick,
    /// Total CPU units the process needs to finish
    pub total_cpu_time: Tick,
    /// CPU units the process runs before it issues an I/O request
    pub burst_before_block: Tick,
}

impl ProcessDescriptor {
    /// Creates a new process descriptor
    pub fn new(
        id: impl Into<ProcessId>,
        priority: u32,
        arrival_time: Tick,
        total_cpu_time: Tick,
        burst_before_block: Tick,
    ) -> Self {
        Self {
            id: id.into(),
            priority,
            arrival_time,
            total_cpu_time,
            burst_before_block,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_creation() {
        let desc = ProcessDescriptor::new("P1", 3, 5, 20, 4);
        assert_eq!(desc.id, ProcessId::new("P1"));
        assert_eq!(desc.priority, 3);
        assert_eq!(desc.arrival_time, 5);
        assert_eq!(desc.total_cpu_time, 20);
        assert_eq!(desc.burst_before_block, 4);
    }

    #[test]
    fn test_descriptor_json_shape() {
        let desc = ProcessDescriptor::new("P1", 1, 0, 10, 10);
        let value: serde_json::Value = serde_json::to_value(&desc).unwrap();
        assert_eq!(value["id"], "P1");
        assert_eq!(value["total_cpu_time"], 10);
    }
}
