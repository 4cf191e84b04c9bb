//! # Trace Rendering
//!
//! Rendering is a host concern: the engine produces events, the host turns
//! them into text. The renderer never inspects scheduler state.

use core_types::Tick;
use serde::{Deserialize, Serialize};
use sim_scheduler::SimulationReport;
use std::fmt::Write;
use std::str::FromStr;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// One tab-separated line per event
    #[default]
    Text,
    /// The full report as pretty-printed JSON
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(other.to_string()),
        }
    }
}

/// Renders the trace, one event per line
///
/// With `header = Some((block_duration, time_slice))` the output starts with
/// a line echoing the two parameters.
pub fn render_text(report: &SimulationReport, header: Option<(Tick, Tick)>) -> String {
    let mut out = String::new();
    if let Some((block_duration, time_slice)) = header {
        // Writing to a String cannot fail.
        let _ = writeln!(out, "{} {}", block_duration, time_slice);
    }
    for event in &report.trace {
        let _ = writeln!(out, "{}", event);
    }
    out
}

/// Renders the full report as JSON
pub fn render_json(report: &SimulationReport) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}
