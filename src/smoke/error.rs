// ABOUTME: Error types for smoke-test steps.
// ABOUTME: Build, start, not-running, timeout and cleanup failures.

use crate::build::BuildContextError;
use crate::runtime::{ContainerError, ImageError};
use crate::types::ContainerId;
use humantime_serde::re::humantime::format_duration;
use serde::Serialize;
use std::time::Duration;

/// A step of the smoke-test sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    Sweep,
    Build,
    Create,
    Start,
    Verify,
    Logs,
    Cleanup,
    RemoveImage,
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Step::Sweep => "sweep",
            Step::Build => "build",
            Step::Create => "create",
            Step::Start => "start",
            Step::Verify => "verify",
            Step::Logs => "logs",
            Step::Cleanup => "cleanup",
            Step::RemoveImage => "remove-image",
        };
        f.write_str(s)
    }
}

/// Errors that end a smoke test.
#[derive(Debug, thiserror::Error)]
pub enum SmokeError {
    /// The image build was rejected or failed.
    #[error("image build failed: {0}")]
    Build(String),

    /// The build context could not be packed.
    #[error(transparent)]
    BuildContext(#[from] BuildContextError),

    /// The container could not be created or started.
    #[error("failed to start container: {0}")]
    Start(String),

    /// The container was not running when checked.
    #[error("container {} is not running: {reason}", .container.short())]
    NotRunning {
        container: ContainerId,
        reason: String,
        /// Tail of the container's output, when it could be read.
        logs: Option<String>,
    },

    /// A runtime call did not answer in time.
    #[error("{step} step timed out after {}", human(.after))]
    Timeout { step: Step, after: Duration },

    /// Container teardown failed (strict cleanup only).
    #[error("cleanup failed: {0}")]
    Cleanup(String),
}

impl SmokeError {
    pub fn kind(&self) -> SmokeErrorKind {
        match self {
            SmokeError::Build(_) | SmokeError::BuildContext(_) => SmokeErrorKind::Build,
            SmokeError::Start(_) => SmokeErrorKind::Start,
            SmokeError::NotRunning { .. } => SmokeErrorKind::NotRunning,
            SmokeError::Timeout { .. } => SmokeErrorKind::Timeout,
            SmokeError::Cleanup(_) => SmokeErrorKind::Cleanup,
        }
    }

    /// Container output attached to the error, if any.
    pub fn logs(&self) -> Option<&str> {
        match self {
            SmokeError::NotRunning { logs, .. } => logs.as_deref(),
            _ => None,
        }
    }
}

fn human(duration: &Duration) -> String {
    format_duration(*duration).to_string()
}

/// Coarse classification of [`SmokeError`] for exit reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SmokeErrorKind {
    Build,
    Start,
    NotRunning,
    Timeout,
    Cleanup,
}

impl From<ImageError> for SmokeError {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::BuildFailed(msg) => SmokeError::Build(msg),
            other => SmokeError::Build(other.to_string()),
        }
    }
}

impl From<ContainerError> for SmokeError {
    fn from(err: ContainerError) -> Self {
        SmokeError::Start(err.to_string())
    }
}
