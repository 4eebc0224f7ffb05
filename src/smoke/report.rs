// ABOUTME: Summary of a passed smoke run.
// ABOUTME: Serializable for JSON output; carries step timings and warnings.

use std::future::Future;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::diagnostics::Warning;
use crate::types::{ContainerId, ImageId, ImageRef};

use super::error::Step;

#[derive(Debug, Clone, Serialize)]
pub struct SmokeReport {
    pub tag: ImageRef,
    pub image_id: ImageId,
    pub container_id: ContainerId,
    pub started_at: DateTime<Utc>,
    pub steps: Vec<StepTiming>,
    /// Containers from earlier runs removed before this one.
    pub stale_removed: usize,
    pub image_removed: bool,
    pub warnings: Vec<Warning>,
}

impl SmokeReport {
    pub fn total_secs(&self) -> f64 {
        self.steps.iter().map(|s| s.duration_secs).sum()
    }

    pub fn step(&self, step: Step) -> Option<&StepTiming> {
        self.steps.iter().find(|s| s.step == step)
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct StepTiming {
    pub step: Step,
    pub duration_secs: f64,
}

/// Records how long each awaited step took.
#[derive(Debug, Default)]
pub(crate) struct StepTimer {
    steps: Vec<StepTiming>,
}

impl StepTimer {
    pub(crate) async fn time<T>(&mut self, step: Step, fut: impl Future<Output = T>) -> T {
        let start = Instant::now();
        let out = fut.await;
        self.steps.push(StepTiming {
            step,
            duration_secs: start.elapsed().as_secs_f64(),
        });
        out
    }

    pub(crate) fn into_steps(self) -> Vec<StepTiming> {
        self.steps
    }
}
