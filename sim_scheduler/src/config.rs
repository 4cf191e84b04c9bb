//! Scheduler configuration

use core_types::Tick;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What happens to a process whose time slice expires without it
/// blocking or terminating
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SliceExpiry {
    /// The process keeps its position in the ready queue. With the FIFO
    /// tie-break it is reselected until a higher-priority process is ready,
    /// or until it blocks or terminates.
    #[default]
    Retain,
    /// The process moves to the tail of the ready queue, giving equal
    /// priority peers a turn (textbook Round-Robin).
    Requeue,
}

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Round-Robin quantum
    pub time_slice: Tick,
    /// How long a process stays blocked after issuing I/O
    pub block_duration: Tick,
    /// Slice expiry policy
    pub slice_expiry: SliceExpiry,
    /// Maximum loop iterations before giving up (optional)
    pub max_steps: Option<u64>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            time_slice: 4,
            block_duration: 2,
            slice_expiry: SliceExpiry::Retain,
            max_steps: None,
        }
    }
}

impl SchedulerConfig {
    /// Creates a configuration with the two global simulation parameters
    pub fn new(time_slice: Tick, block_duration: Tick) -> Self {
        Self {
            time_slice,
            block_duration,
            ..Self::default()
        }
    }

    /// Sets the slice expiry policy
    pub fn with_slice_expiry(mut self, slice_expiry: SliceExpiry) -> Self {
        self.slice_expiry = slice_expiry;
        self
    }

    /// Sets the loop guard
    pub fn with_max_steps(mut self, max_steps: u64) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Checks that the configuration can drive a simulation to completion
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_slice == 0 {
            return Err(ConfigError::ZeroTimeSlice);
        }
        if self.max_steps == Some(0) {
            return Err(ConfigError::ZeroStepLimit);
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Time slice must be greater than zero")]
    ZeroTimeSlice,

    #[error("Step limit must be greater than zero")]
    ZeroStepLimit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SchedulerConfig::default();
        assert_eq!(config.slice_expiry, SliceExpiry::Retain);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_time_slice_rejected() {
        let config = SchedulerConfig::new(0, 5);
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeSlice));
    }

    #[test]
    fn test_zero_block_duration_allowed() {
        assert!(SchedulerConfig::new(10, 0).validate().is_ok());
    }

    #[test]
    fn test_zero_step_limit_rejected() {
        let config = SchedulerConfig::new(4, 2).with_max_steps(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroStepLimit));
    }

    #[test]
    fn test_builder_methods() {
        let config = SchedulerConfig::new(3, 7)
            .with_slice_expiry(SliceExpiry::Requeue)
            .with_max_steps(100);
        assert_eq!(config.time_slice, 3);
        assert_eq!(config.block_duration, 7);
        assert_eq!(config.slice_expiry, SliceExpiry::Requeue);
        assert_eq!(config.max_steps, Some(100));
    }
}
