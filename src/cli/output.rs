//! Output formatting for the CLI.
//!
//! Supports human-readable, JSON, and raw output formats.

use std::io::{self, Write};
use std::time::Duration;

use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::error::Error;
use crate::result::SnmpResult;

/// Results of one run, ready for output.
#[derive(Debug, Serialize)]
pub struct OperationResult<'a> {
    pub results: &'a [SnmpResult],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timing_ms: Option<f64>,
}

/// Output context for formatting.
#[derive(Debug, Clone, Copy)]
pub struct OutputContext {
    pub format: OutputFormat,
    pub show_timing: bool,
}

impl OutputContext {
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            show_timing: false,
        }
    }

    /// Write results to stdout.
    pub fn write_results(&self, results: &[SnmpResult], elapsed: Duration) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        self.write_to(&mut stdout, results, elapsed)
    }

    pub fn write_to<W: Write>(
        &self,
        w: &mut W,
        results: &[SnmpResult],
        elapsed: Duration,
    ) -> io::Result<()> {
        let result = OperationResult {
            results,
            timing_ms: self
                .show_timing
                .then(|| elapsed.as_secs_f64() * 1000.0),
        };
        match self.format {
            OutputFormat::Human => write_human(w, &result),
            OutputFormat::Json => write_json(w, &result),
            OutputFormat::Raw => write_raw(w, &result),
        }
    }
}

fn write_human<W: Write>(w: &mut W, result: &OperationResult<'_>) -> io::Result<()> {
    for r in result.results {
        if r.index.is_empty() {
            write!(w, "{}", r.oid)?;
        } else {
            write!(w, "{}.{}", r.oid, r.index)?;
        }
        writeln!(w, " = {}: {}", r.snmp_type, r.value)?;
    }
    if let Some(ms) = result.timing_ms {
        writeln!(w, "\nTiming: {:.1}ms", ms)?;
    }
    Ok(())
}

fn write_json<W: Write>(w: &mut W, result: &OperationResult<'_>) -> io::Result<()> {
    let json = serde_json::to_string_pretty(result).map_err(io::Error::other)?;
    writeln!(w, "{}", json)
}

fn write_raw<W: Write>(w: &mut W, result: &OperationResult<'_>) -> io::Result<()> {
    for r in result.results {
        writeln!(w, "{}\t{}\t{}\t{}", r.oid, r.index, r.snmp_type, r.value)?;
    }
    Ok(())
}

/// Write an error to stderr, prefixed with its kind.
pub fn write_error(err: &Error) {
    let mut stderr = io::stderr().lock();
    let message = err.to_string();
    let _ = writeln!(stderr, "{}: {}", err.kind(), message.trim_end());
}
