// ABOUTME: Smoke-test orchestration using the type state pattern.
// ABOUTME: Exports the plan, state markers, runner and report types.

mod error;
#[cfg(test)]
pub(crate) mod fake;
mod housekeeping;
mod logs;
mod plan;
mod report;
mod runner;
mod smoke_test;
mod state;
mod transitions;

pub use error::{SmokeError, SmokeErrorKind, Step};
pub use housekeeping::{remove_image, sweep_stale};
pub use plan::SmokePlan;
pub use report::{SmokeReport, StepTiming};
pub use runner::run_smoke_test;
pub use smoke_test::SmokeTest;
pub use state::{
    CleanedUp, ContainerCreated, ContainerStarted, HasContainer, ImageBuilt, Initialized, Verified,
};
pub use transitions::{IMAGE_LABEL, MANAGED_LABEL, TransitionResult};
