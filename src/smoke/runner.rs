// ABOUTME: Runs the full smoke-test sequence against a container runtime.
// ABOUTME: Sweep, build, start, verify, then always tear the container down.

use chrono::Utc;

use crate::diagnostics::{Diagnostics, Warning};
use crate::runtime::FullRuntime;
use crate::types::ContainerId;

use super::SmokeTest;
use super::error::{SmokeError, Step};
use super::housekeeping::{remove_image, sweep_stale};
use super::plan::SmokePlan;
use super::report::{SmokeReport, StepTimer};

/// Build the image described by `plan`, run it, and check it stays up.
///
/// Whenever a container was created it is stopped and removed before this
/// returns, whether or not the check passed. Teardown problems are warnings
/// unless `plan.cleanup.strict` is set, in which case they fail an otherwise
/// passing run.
///
/// # Errors
///
/// Returns the first failing step's [`SmokeError`].
pub async fn run_smoke_test<R: FullRuntime>(
    runtime: &R,
    plan: &SmokePlan,
) -> Result<SmokeReport, SmokeError> {
    let started_at = Utc::now();
    let mut diag = Diagnostics::default();
    let mut timer = StepTimer::default();

    let stale_removed = if plan.cleanup.sweep_stale {
        timer
            .time(Step::Sweep, sweep_stale(runtime, plan, &mut diag))
            .await
    } else {
        0
    };

    let built = timer
        .time(Step::Build, SmokeTest::new(plan.clone()).build(runtime))
        .await?;
    let image_id = built.image_id().clone();

    let outcome = match timer
        .time(Step::Create, built.create_container(runtime))
        .await
    {
        Ok(created) => {
            let (outcome, cleaned) = match timer.time(Step::Start, created.start(runtime)).await {
                Ok(started) => match timer
                    .time(Step::Verify, started.verify(runtime, &mut diag))
                    .await
                {
                    Ok(verified) => {
                        let id = verified.container_id().clone();
                        let cleaned = timer.time(Step::Cleanup, verified.cleanup(runtime)).await;
                        (Ok(id), cleaned)
                    }
                    Err((started, e)) => {
                        (Err(e), timer.time(Step::Cleanup, started.cleanup(runtime)).await)
                    }
                },
                Err((created, e)) => {
                    (Err(e), timer.time(Step::Cleanup, created.cleanup(runtime)).await)
                }
            };
            let (_, failures) = cleaned;
            settle_cleanup(outcome, failures, plan.cleanup.strict, &mut diag)
        }
        Err(e) => Err(e),
    };

    let image_removed = plan.cleanup.remove_image
        && timer
            .time(
                Step::RemoveImage,
                remove_image(runtime, &plan.tag, plan.timeouts.cleanup, &mut diag),
            )
            .await;

    let container_id = outcome?;

    tracing::info!(tag = %plan.tag, container = %container_id.short(), "smoke test passed");

    Ok(SmokeReport {
        tag: plan.tag.clone(),
        image_id,
        container_id,
        started_at,
        steps: timer.into_steps(),
        stale_removed,
        image_removed,
        warnings: diag.into_warnings(),
    })
}

/// Fold teardown failures into the run's outcome.
fn settle_cleanup(
    outcome: Result<ContainerId, SmokeError>,
    failures: Vec<String>,
    strict: bool,
    diag: &mut Diagnostics,
) -> Result<ContainerId, SmokeError> {
    if failures.is_empty() {
        return outcome;
    }

    let message = failures.join("; ");
    match outcome {
        Ok(_) if strict => Err(SmokeError::Cleanup(message)),
        other => {
            diag.warn(Warning::cleanup_failed(message));
            other
        }
    }
}
