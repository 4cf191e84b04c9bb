//! Event trace
//!
//! Every state transition the engine applies is recorded as a
//! [`TraceEvent`]. The trace is append-only and, for a given workload and
//! configuration, identical across runs.

use core_types::{ProcessId, Tick};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Subject label for idle intervals
pub const IDLE_LABEL: &str = "(IDLE)";
/// Subject label for the summary line
pub const END_LABEL: &str = "(END)";

/// Kind of trace event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// A full time slice ran
    Slice,
    /// The process ran until its burst ended and blocked on I/O
    Block,
    /// The process ran to completion
    Terminate,
    /// No process was runnable
    Idle,
    /// Simulation summary
    End,
}

impl EventKind {
    /// Returns the single-letter tag printed in the trace (none for `End`)
    pub fn tag(self) -> Option<char> {
        match self {
            EventKind::Slice => Some('S'),
            EventKind::Block => Some('B'),
            EventKind::Terminate => Some('T'),
            EventKind::Idle => Some('I'),
            EventKind::End => None,
        }
    }
}

/// A single trace event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum TraceEvent {
    /// `process` ran for a full time slice starting at `time`
    Slice {
        time: Tick,
        process: ProcessId,
        duration: Tick,
    },
    /// `process` ran for `duration` starting at `time`, then blocked
    Block {
        time: Tick,
        process: ProcessId,
        duration: Tick,
    },
    /// `process` ran its final `duration` units starting at `time`
    Terminate {
        time: Tick,
        process: ProcessId,
        duration: Tick,
    },
    /// The CPU idled for `duration` starting at `time`
    Idle { time: Tick, duration: Tick },
    /// All processes finished at `time`
    End {
        time: Tick,
        average_turnaround: f64,
    },
}

impl TraceEvent {
    /// Returns the clock value at which the event started
    pub fn time(&self) -> Tick {
        match self {
            TraceEvent::Slice { time, .. }
            | TraceEvent::Block { time, .. }
            | TraceEvent::Terminate { time, .. }
            | TraceEvent::Idle { time, .. }
            | TraceEvent::End { time, .. } => *time,
        }
    }

    /// Returns the event kind
    pub fn kind(&self) -> EventKind {
        match self {
            TraceEvent::Slice { .. } => EventKind::Slice,
            TraceEvent::Block { .. } => EventKind::Block,
            TraceEvent::Terminate { .. } => EventKind::Terminate,
            TraceEvent::Idle { .. } => EventKind::Idle,
            TraceEvent::End { .. } => EventKind::End,
        }
    }

    /// Returns the process the event concerns, if any
    pub fn process(&self) -> Option<&ProcessId> {
        match self {
            TraceEvent::Slice { process, .. }
            | TraceEvent::Block { process, .. }
            | TraceEvent::Terminate { process, .. } => Some(process),
            TraceEvent::Idle { .. } | TraceEvent::End { .. } => None,
        }
    }

    /// Returns the span covered by the event (none for `End`)
    pub fn duration(&self) -> Option<Tick> {
        match self {
            TraceEvent::Slice { duration, .. }
            | TraceEvent::Block { duration, .. }
            | TraceEvent::Terminate { duration, .. }
            | TraceEvent::Idle { duration, .. } => Some(*duration),
            TraceEvent::End { .. } => None,
        }
    }

    /// Returns the subject label: a process name, `(IDLE)` or `(END)`
    pub fn subject_label(&self) -> &str {
        match self {
            TraceEvent::Slice { process, .. }
            | TraceEvent::Block { process, .. }
            | TraceEvent::Terminate { process, .. } => process.as_str(),
            TraceEvent::Idle { .. } => IDLE_LABEL,
            TraceEvent::End { .. } => END_LABEL,
        }
    }
}

/// Renders the event as one tab-separated trace line (no newline)
impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::End {
                time,
                average_turnaround,
            } => write!(
                f,
                " {}\t{}\t{}",
                time,
                END_LABEL,
                format_significant(*average_turnaround)
            ),
            other => {
                let duration = other.duration().unwrap_or_default();
                let tag = other.kind().tag().unwrap_or('?');
                write!(
                    f,
                    " {}\t{}\t{}\t{}",
                    other.time(),
                    other.subject_label(),
                    duration,
                    tag
                )
            }
        }
    }
}

/// Significant digits kept when printing the average turnaround
const AVERAGE_DIGITS: usize = 6;

/// Formats a value like C's `%g`: six significant digits, no trailing
/// zeros, scientific notation outside `1e-4 ..= 1e6`.
pub fn format_significant(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    // Rounding to the target digit count decides the exponent.
    let scientific = format!("{:.*e}", AVERAGE_DIGITS - 1, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or_default();

    if exponent < -4 || exponent >= AVERAGE_DIGITS as i32 {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}e{}{:02}",
            trim_fraction(mantissa),
            sign,
            exponent.unsigned_abs()
        )
    } else {
        let decimals = (AVERAGE_DIGITS as i32 - 1 - exponent) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(number: &str) -> &str {
    if number.contains('.') {
        number.trim_end_matches('0').trim_end_matches('.')
    } else {
        number
    }
}

/// Append-only list of trace events
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    events: Vec<TraceEvent>,
}

impl Trace {
    /// Creates an empty trace
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    /// Returns the recorded events
    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Returns the number of recorded events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns true if nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates over the recorded events
    pub fn iter(&self) -> std::slice::Iter<'_, TraceEvent> {
        self.events.iter()
    }

    /// Returns the last recorded event
    pub fn last(&self) -> Option<&TraceEvent> {
        self.events.last()
    }

    /// Sums the CPU time charged to `process` by Slice, Block and
    /// Terminate events
    pub fn cpu_time_of(&self, process: &ProcessId) -> Tick {
        self.events
            .iter()
            .filter(|event| event.process() == Some(process))
            .filter_map(TraceEvent::duration)
            .sum()
    }

    /// Renders every event as a trace line
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.events.iter().map(|event| event.to_string())
    }

    /// SHA-256 fingerprint of the rendered trace, hex encoded
    ///
    /// Two runs over the same workload and configuration produce the same
    /// digest.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for line in self.lines() {
            hasher.update(line.as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a TraceEvent;
    type IntoIter = std::slice::Iter<'a, TraceEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
