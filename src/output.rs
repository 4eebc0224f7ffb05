// ABOUTME: Output formatting for CLI feedback.
// ABOUTME: Supports normal, quiet (CI), and JSON output modes.

use serde::Serialize;
use std::time::Instant;

use crate::smoke::{SmokeError, SmokeErrorKind, SmokeReport};

/// Output mode for CLI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-friendly output with progress messages
    Normal,
    /// Minimal output for CI (only final result)
    Quiet,
    /// JSON lines for scripting
    Json,
}

/// Handles CLI output based on the configured mode.
pub struct Output {
    mode: OutputMode,
    start_time: Option<Instant>,
}

impl Output {
    pub fn new(mode: OutputMode) -> Self {
        Self {
            mode,
            start_time: None,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Start timing an operation.
    pub fn start_timer(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Get elapsed time since timer started.
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn duration(&self) -> Option<f64> {
        self.start_time.map(|_| self.elapsed_secs())
    }

    /// Print a progress message (suppressed in quiet/json mode).
    pub fn progress(&self, message: &str) {
        if self.mode == OutputMode::Normal {
            println!("{message}");
        }
    }

    /// Print a warning (suppressed in quiet mode).
    pub fn warning(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => eprintln!("Warning: {message}"),
            OutputMode::Quiet => {}
            OutputMode::Json => emit_stderr(&JsonEvent {
                event: "warning",
                message,
                kind: None,
                duration_secs: None,
                logs: None,
            }),
        }
    }

    /// Print a success message with optional timing.
    pub fn success(&self, message: &str) {
        match self.mode {
            OutputMode::Normal => {
                let elapsed = self.elapsed_secs();
                if elapsed > 0.0 {
                    println!("{message} ({:.1}s)", elapsed);
                } else {
                    println!("{message}");
                }
            }
            OutputMode::Quiet => {
                println!("{message}");
            }
            OutputMode::Json => emit_stdout(&JsonEvent {
                event: "success",
                message,
                kind: None,
                duration_secs: self.duration(),
                logs: None,
            }),
        }
    }

    /// Print the summary of a passed run.
    pub fn report(&self, report: &SmokeReport) {
        match self.mode {
            OutputMode::Json => {
                if let Ok(json) = serde_json::to_string(&JsonReport {
                    event: "report",
                    report,
                }) {
                    println!("{json}");
                }
            }
            // Warnings were already logged as they happened.
            _ => self.success(&passed_line(report)),
        }
    }

    /// Print a failed run, including any captured container output.
    pub fn smoke_failure(&self, error: &SmokeError) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Smoke test failed: {error}");
                match error.logs() {
                    Some(logs) if logs.trim().is_empty() => {
                        eprintln!("(container produced no output)");
                    }
                    Some(logs) => {
                        eprintln!("--- container output ---");
                        eprint!("{logs}");
                        if !logs.ends_with('\n') {
                            eprintln!();
                        }
                        eprintln!("------------------------");
                    }
                    None if error.kind() == SmokeErrorKind::NotRunning => {
                        eprintln!("(no logs available)");
                    }
                    None => {}
                }
            }
            OutputMode::Json => {
                let message = error.to_string();
                emit_stderr(&JsonEvent {
                    event: "failure",
                    message: &message,
                    kind: Some(error.kind()),
                    duration_secs: self.duration(),
                    logs: error.logs(),
                });
            }
        }
    }

    /// Print an error message.
    pub fn error(&self, message: &str) {
        match self.mode {
            OutputMode::Normal | OutputMode::Quiet => {
                eprintln!("Error: {message}");
            }
            OutputMode::Json => emit_stderr(&JsonEvent {
                event: "error",
                message,
                kind: None,
                duration_secs: self.duration(),
                logs: None,
            }),
        }
    }
}

fn emit_stdout<T: Serialize>(event: &T) {
    if let Ok(json) = serde_json::to_string(event) {
        println!("{json}");
    }
}

fn emit_stderr<T: Serialize>(event: &T) {
    if let Ok(json) = serde_json::to_string(event) {
        eprintln!("{json}");
    }
}

#[derive(Serialize)]
struct JsonEvent<'a> {
    event: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<SmokeErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    duration_secs: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    logs: Option<&'a str>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    event: &'a str,
    #[serde(flatten)]
    report: &'a SmokeReport,
}

fn passed_line(report: &SmokeReport) -> String {
    let mut line = format!(
        "Smoke test passed: {} ran as {}",
        report.tag,
        report.container_id.short()
    );
    match report.warnings.len() {
        0 => {}
        1 => line.push_str(" (1 warning)"),
        n => line.push_str(&format!(" ({n} warnings)")),
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Warning;
    use crate::types::{ContainerId, ImageId, ImageRef};

    #[test]
    fn failure_event_carries_kind_and_logs() {
        let event = JsonEvent {
            event: "failure",
            message: "container exited",
            kind: Some(SmokeErrorKind::NotRunning),
            duration_secs: None,
            logs: Some("boom\n"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "not_running");
        assert_eq!(json["logs"], "boom\n");
        assert!(json.get("duration_secs").is_none());
    }

    #[test]
    fn elapsed_is_zero_without_timer() {
        let output = Output::new(OutputMode::Quiet);
        assert_eq!(output.elapsed_secs(), 0.0);
        assert_eq!(output.duration(), None);
    }

    fn passed_report(warnings: Vec<Warning>) -> SmokeReport {
        SmokeReport {
            tag: ImageRef::parse("intel_image:latest").unwrap(),
            image_id: ImageId::new("sha256:abc"),
            container_id: ContainerId::new("0123456789abcdef"),
            started_at: chrono::Utc::now(),
            steps: Vec::new(),
            stale_removed: 0,
            image_removed: false,
            warnings,
        }
    }

    #[test]
    fn passed_line_counts_warnings_instead_of_repeating_them() {
        assert_eq!(
            passed_line(&passed_report(Vec::new())),
            "Smoke test passed: intel_image:latest ran as 0123456789ab"
        );
        let line = passed_line(&passed_report(vec![Warning::cleanup_failed(
            "remove 0123456789ab: conflict",
        )]));
        assert!(line.ends_with("(1 warning)"));
        assert!(!line.contains("conflict"));
    }
}
