//! Output formatting for the `cube` binary.

use concurrent_cube::{CubeMetrics, CubeSnapshot, Side};
use serde::Serialize;
use serde_json::json;
use std::fmt::Write;
use std::time::Duration;

/// How results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Outcome of a stress run.
#[derive(Debug, Clone, Serialize)]
pub struct StressReport {
    pub size: usize,
    pub threads: usize,
    pub ops_per_thread: usize,
    pub seed: u64,
    pub elapsed_ms: u64,
    pub color_counts_ok: bool,
    pub metrics: CubeMetrics,
}

impl StressReport {
    pub fn new(
        size: usize,
        threads: usize,
        ops_per_thread: usize,
        seed: u64,
        elapsed: Duration,
        color_counts_ok: bool,
        metrics: CubeMetrics,
    ) -> Self {
        Self {
            size,
            threads,
            ops_per_thread,
            seed,
            elapsed_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            color_counts_ok,
            metrics,
        }
    }
}

/// Render a cube state.
///
/// Human mode prints each face as a grid under its name, followed by the
/// one-line symbol string.
pub fn format_state(snapshot: &CubeSnapshot, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => json!({
            "size": snapshot.size,
            "state": snapshot.to_string(),
            "solved": snapshot.is_solved(),
            "facelets": snapshot.facelets,
        })
        .to_string(),
        OutputMode::Human => {
            let mut out = String::new();
            for side in Side::ALL {
                let _ = writeln!(out, "{}:", side);
                for row in snapshot.face(side).chunks(snapshot.size.max(1)) {
                    let cells: Vec<String> = row.iter().map(|c| c.to_string()).collect();
                    let _ = writeln!(out, "  {}", cells.join(" "));
                }
            }
            out.push_str(&snapshot.to_string());
            out
        }
    }
}

/// Render a stress report.
pub fn format_stress(report: &StressReport, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => {
            serde_json::to_string_pretty(report).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
        }
        OutputMode::Human => {
            let m = &report.metrics;
            let c = &m.coordinator;
            let mut out = String::new();
            let _ = writeln!(
                out,
                "{} threads × {} ops on a cube of size {} (seed {})",
                report.threads, report.ops_per_thread, report.size, report.seed
            );
            let _ = writeln!(out, "elapsed:      {} ms", report.elapsed_ms);
            let _ = writeln!(
                out,
                "colors:       {}",
                if report.color_counts_ok { "ok" } else { "CORRUPTED" }
            );
            let _ = writeln!(out, "rotations:    {}", m.rotations);
            let _ = writeln!(out, "shows:        {}", m.shows);
            let _ = writeln!(out, "episodes:     {}", c.episodes);
            let _ = write!(
                out,
                "admissions:   {} immediate, {} after waiting",
                c.immediate_admissions, c.queued_admissions
            );
            out
        }
    }
}

/// Render an error message.
pub fn format_error(message: &str, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => json!({ "error": message }).to_string(),
        OutputMode::Human => format!("(error) {}", message),
    }
}
