// ABOUTME: Diagnostics accumulator for non-fatal warnings during a smoke run.
// ABOUTME: Collects problems that shouldn't fail the run but should be shown to users.

use serde::Serialize;

/// Collects non-fatal warnings during a smoke run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    /// Record a warning, auto-logging it via tracing.
    pub fn warn(&mut self, warning: Warning) {
        tracing::warn!(kind = ?warning.kind, "{}", warning.message);
        self.warnings.push(warning);
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

/// A non-fatal warning collected during a smoke run.
#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    /// Container stop or removal failed; a container may remain.
    pub fn cleanup_failed(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::CleanupFailed,
            message: message.into(),
        }
    }

    /// Container output could not be read.
    pub fn logs_unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::LogsUnavailable,
            message: message.into(),
        }
    }

    /// The built image could not be removed.
    pub fn image_removal(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::ImageRemoval,
            message: message.into(),
        }
    }

    /// A container left by an earlier run could not be swept.
    pub fn stale_sweep(message: impl Into<String>) -> Self {
        Self {
            kind: WarningKind::StaleSweep,
            message: message.into(),
        }
    }
}

/// Categories of warnings that can occur during a smoke run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    CleanupFailed,
    LogsUnavailable,
    ImageRemoval,
    StaleSweep,
}
