//! # Host Runtime
//!
//! Ties the workload loader, the engine and the renderer together.

use crate::render::{render_json, render_text, OutputFormat};
use core_types::Tick;
use sim_scheduler::{
    ConfigError, Scheduler, SchedulerConfig, SimulationError, SimulationReport, SliceExpiry,
};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;
use workload::{Workload, WorkloadError};

/// Exit code for usage and configuration errors
pub const EXIT_USAGE: i32 = 1;
/// Exit code when the input cannot be opened
pub const EXIT_UNREADABLE: i32 = 2;
/// Exit code for malformed workload records
pub const EXIT_MALFORMED: i32 = 3;
/// Exit code for simulation failures
pub const EXIT_SIMULATION: i32 = 4;
/// Exit code when the trace cannot be written
pub const EXIT_OUTPUT: i32 = 5;

/// Host error types
#[derive(Debug, Error)]
pub enum HostError {
    #[error("Missing value for {0}")]
    MissingValue(String),

    #[error("Invalid {name}: {value:?}")]
    InvalidArgument { name: &'static str, value: String },

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Expected <input-file> <block-duration> <time-slice>")]
    MissingPositional,

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Workload(#[from] WorkloadError),

    #[error("Simulation failed: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Failed to render JSON report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl HostError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            HostError::Workload(WorkloadError::Unreadable { .. }) => EXIT_UNREADABLE,
            HostError::Workload(_) => EXIT_MALFORMED,
            HostError::Simulation(SimulationError::Config(_)) => EXIT_USAGE,
            HostError::Simulation(_) => EXIT_SIMULATION,
            HostError::Output(_) => EXIT_OUTPUT,
            _ => EXIT_USAGE,
        }
    }
}

/// Host configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    /// Workload file
    pub input: PathBuf,
    /// How long a process stays blocked after issuing I/O
    pub block_duration: Tick,
    /// Round-Robin quantum
    pub time_slice: Tick,
    /// Slice expiry policy
    pub slice_expiry: SliceExpiry,
    /// Output format
    pub format: OutputFormat,
    /// Loop guard (None = unlimited)
    pub max_steps: Option<u64>,
    /// Whether to print the trace digest to stderr
    pub print_digest: bool,
    /// Whether text output starts with a `<block> <slice>` line
    pub header: bool,
}

impl Default for HostConfig {
    fn default() -> Self {
        let scheduler = SchedulerConfig::default();
        Self {
            input: PathBuf::new(),
            block_duration: scheduler.block_duration,
            time_slice: scheduler.time_slice,
            slice_expiry: scheduler.slice_expiry,
            format: OutputFormat::Text,
            max_steps: None,
            print_digest: false,
            header: false,
        }
    }
}

impl HostConfig {
    /// Builds the engine configuration
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            time_slice: self.time_slice,
            block_duration: self.block_duration,
            slice_expiry: self.slice_expiry,
            max_steps: self.max_steps,
        }
    }
}

/// Everything a finished run produces
#[derive(Debug, Clone, PartialEq)]
pub struct HostOutput {
    /// Rendered trace, ready to write to stdout
    pub rendered: String,
    /// Trace fingerprint
    pub digest: String,
    /// Full report
    pub report: SimulationReport,
}

impl HostOutput {
    /// Writes the rendered trace and flushes the writer
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<(), HostError> {
        writer.write_all(self.rendered.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// Host runtime
pub struct HostRuntime {
    config: HostConfig,
    workload: Workload,
}

impl HostRuntime {
    /// Validates the configuration and loads the workload
    pub fn new(config: HostConfig) -> Result<Self, HostError> {
        config.scheduler_config().validate()?;
        let workload = Workload::from_path(&config.input)?;
        Ok(Self { config, workload })
    }

    /// Creates a runtime over an already-loaded workload
    pub fn with_workload(config: HostConfig, workload: Workload) -> Result<Self, HostError> {
        config.scheduler_config().validate()?;
        Ok(Self { config, workload })
    }

    /// Returns the configuration
    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    /// Returns the loaded workload
    pub fn workload(&self) -> &Workload {
        &self.workload
    }

    /// Runs the simulation and renders its trace
    pub fn run(&self) -> Result<HostOutput, HostError> {
        log::info!(
            "simulating {} process(es): block_duration={}, time_slice={}",
            self.workload.len(),
            self.config.block_duration,
            self.config.time_slice
        );

        let scheduler = Scheduler::new(
            self.config.scheduler_config(),
            self.workload.descriptors().to_vec(),
        )?;
        let report = scheduler.run()?;

        let rendered = match self.config.format {
            OutputFormat::Text => {
                let header = self
                    .config
                    .header
                    .then_some((self.config.block_duration, self.config.time_slice));
                render_text(&report, header)
            }
            OutputFormat::Json => render_json(&report)?,
        };
        let digest = report.trace.digest();

        Ok(HostOutput {
            rendered,
            digest,
            report,
        })
    }
}
