//! # Argument Parsing
//!
//! ```text
//! rrsim <input-file> <block-duration> <time-slice> [OPTIONS]
//! ```
//!
//! Positional arguments keep the classic order: workload file, then the
//! I/O block duration, then the Round-Robin time slice.

use crate::render::OutputFormat;
use crate::runtime::{HostConfig, HostError};
use core_types::Tick;
use sim_scheduler::SliceExpiry;
use std::path::PathBuf;

/// What the command line asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Run a simulation
    Run(HostConfig),
    /// Print usage and exit
    Help,
}

/// Parses `args` (including the program name at index 0)
pub fn parse_args(args: &[String]) -> Result<Invocation, HostError> {
    let mut config = HostConfig::default();
    let mut positional: Vec<&str> = Vec::new();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--requeue" => {
                config.slice_expiry = SliceExpiry::Requeue;
            }
            "--format" | "-f" => {
                let value = option_value(args, &mut i)?;
                config.format = value.parse().map_err(|_| HostError::InvalidArgument {
                    name: "format",
                    value: value.to_string(),
                })?;
            }
            "--max-steps" => {
                let value = option_value(args, &mut i)?;
                config.max_steps = Some(parse_number("max-steps", value)?);
            }
            "--digest" => {
                config.print_digest = true;
            }
            "--header" => {
                config.header = true;
            }
            "--help" | "-h" => {
                return Ok(Invocation::Help);
            }
            other if other.starts_with('-') && other.len() > 1 => {
                return Err(HostError::UnknownOption(other.to_string()));
            }
            value => positional.push(value),
        }
        i += 1;
    }

    match positional.as_slice() {
        [input, block_duration, time_slice] => {
            config.input = PathBuf::from(input);
            config.block_duration = parse_number("block duration", block_duration)?;
            config.time_slice = parse_number("time slice", time_slice)?;
        }
        [_, _, _, extra, ..] => return Err(HostError::UnexpectedArgument(extra.to_string())),
        _ => return Err(HostError::MissingPositional),
    }

    if config.format == OutputFormat::Json && config.header {
        log::warn!("--header has no effect with --format json");
    }

    Ok(Invocation::Run(config))
}

fn option_value<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str, HostError> {
    let name = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| HostError::MissingValue(name.clone()))
}

fn parse_number(name: &'static str, value: &str) -> Result<Tick, HostError> {
    let invalid = || HostError::InvalidArgument {
        name,
        value: value.to_string(),
    };
    if !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    value.parse().map_err(|_| invalid())
}

/// Usage text
pub fn usage(program: &str) -> String {
    format!(
        "Usage: {program} <input-file> <block-duration> <time-slice> [OPTIONS]

Arguments:
  <input-file>             Workload file: <name> <priority> <arrival> <cpu> <burst> per line
  <block-duration>         Time a process stays blocked after issuing I/O
  <time-slice>             Round-Robin quantum

Options:
  --requeue                Move a process to the back of the ready queue when its slice expires
  -f, --format <FORMAT>    Output format: text (default) or json
  --max-steps <N>          Abort after N scheduling steps
  --digest                 Print the SHA-256 trace digest to stderr
  --header                 Start text output with a '<block-duration> <time-slice>' line,
                           as classic round-robin drivers always do; pass it when
                           comparing against their reference outputs
  -h, --help               Show this help message

Logging is controlled through RUST_LOG (e.g. RUST_LOG=debug).

Examples:
  {program} workload.txt 2 4
  {program} workload.txt 0 10 --requeue --format json"
    )
}
