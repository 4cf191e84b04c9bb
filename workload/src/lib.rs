//! # Workload Loader
//!
//! Turns a textual process table into typed [`ProcessDescriptor`]s.
//!
//! ## Format
//!
//! One process per line, whitespace-separated:
//!
//! ```text
//! # name  priority  arrival  total-cpu  burst-before-block
//! P1      2         0        10         4
//! P2      1         3        6          6
//! ```
//!
//! - Blank lines and lines starting with `#` are skipped
//! - All numeric fields are non-negative decimal integers
//! - Names must be unique
//!
//! The loader is strict: a bad line is reported with its line number and
//! text instead of being defaulted.

use core_types::{ProcessDescriptor, ProcessId, Tick};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Number of numeric fields following the process name
const NUMERIC_FIELDS: usize = 4;

/// Workload loading errors
#[derive(Debug, Error)]
pub enum WorkloadError {
    #[error("Cannot open file: {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed record at line {line} ({defect}): {content:?}")]
    MalformedRecord {
        line: usize,
        content: String,
        defect: RecordDefect,
    },

    #[error("Duplicate process name {name:?} at line {line}")]
    DuplicateProcess { line: usize, name: String },
}

/// What is wrong with a malformed record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordDefect {
    #[error("expected 4 numeric fields, found {found}")]
    MissingFields { found: usize },

    #[error("expected 4 numeric fields, found {found}")]
    TrailingFields { found: usize },

    #[error("{field} is not a non-negative integer: {token:?}")]
    InvalidNumber { field: &'static str, token: String },

    /// Total CPU time or burst before block is zero
    ///
    /// Rejected even though the format only asks for non-negative numbers.
    /// Classic round-robin drivers accept a zero CPU time and print a
    /// zero-length terminate line for it; here such a record is an input
    /// error. A zero burst could never make progress.
    #[error("{field} must be greater than zero")]
    ZeroField { field: &'static str },
}

/// A loaded workload: process descriptors in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Workload {
    descriptors: Vec<ProcessDescriptor>,
}

impl Workload {
    /// Creates a workload from already-built descriptors
    pub fn new(descriptors: Vec<ProcessDescriptor>) -> Self {
        Self { descriptors }
    }

    /// Reads and parses a workload file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WorkloadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| WorkloadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let workload = Self::from_text(&text)?;
        log::debug!(
            "loaded {} process(es) from {}",
            workload.len(),
            path.display()
        );
        Ok(workload)
    }

    /// Parses a workload from text
    pub fn from_text(text: &str) -> Result<Self, WorkloadError> {
        let mut descriptors = Vec::new();
        let mut seen = HashSet::new();

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let line_num = index + 1;
            let descriptor = Self::parse_line(line).map_err(|defect| {
                WorkloadError::MalformedRecord {
                    line: line_num,
                    content: line.to_string(),
                    defect,
                }
            })?;

            if !seen.insert(descriptor.id.clone()) {
                return Err(WorkloadError::DuplicateProcess {
                    line: line_num,
                    name: descriptor.id.to_string(),
                });
            }
            descriptors.push(descriptor);
        }

        Ok(Self { descriptors })
    }

    /// Parses one non-blank, non-comment record
    fn parse_line(line: &str) -> Result<ProcessDescriptor, RecordDefect> {
        let mut tokens = line.split_whitespace();
        // Callers never pass a blank line, so there is always a name token.
        let name = tokens.next().unwrap_or_default();
        let numbers: Vec<&str> = tokens.collect();

        if numbers.len() < NUMERIC_FIELDS {
            return Err(RecordDefect::MissingFields {
                found: numbers.len(),
            });
        }
        if numbers.len() > NUMERIC_FIELDS {
            return Err(RecordDefect::TrailingFields {
                found: numbers.len(),
            });
        }

        let priority: u32 = parse_field("priority", numbers[0])?;
        let arrival_time: Tick = parse_field("arrival time", numbers[1])?;
        let total_cpu_time: Tick = parse_field("total CPU time", numbers[2])?;
        let burst_before_block: Tick = parse_field("burst before block", numbers[3])?;

        if total_cpu_time == 0 {
            return Err(RecordDefect::ZeroField {
                field: "total CPU time",
            });
        }
        if burst_before_block == 0 {
            return Err(RecordDefect::ZeroField {
                field: "burst before block",
            });
        }

        Ok(ProcessDescriptor {
            id: ProcessId::new(name),
            priority,
            arrival_time,
            total_cpu_time,
            burst_before_block,
        })
    }

    /// Returns the descriptors in file order
    pub fn descriptors(&self) -> &[ProcessDescriptor] {
        &self.descriptors
    }

    /// Consumes the workload, returning its descriptors
    pub fn into_descriptors(self) -> Vec<ProcessDescriptor> {
        self.descriptors
    }

    /// Returns the number of processes
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns true if the workload has no processes
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

/// Parses a decimal field, rejecting signs and anything non-numeric
fn parse_field<T: FromStr>(field: &'static str, token: &str) -> Result<T, RecordDefect> {
    let invalid = || RecordDefect::InvalidNumber {
        field,
        token: token.to_string(),
    };
    if !token.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    token.parse().map_err(|_| invalid())
}
