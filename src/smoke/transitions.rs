// ABOUTME: State transition methods for the smoke-test sequence.
// ABOUTME: Each method consumes self and returns the next state on success.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::future::Future;
use std::time::Duration;

use crate::build::archive_context;
use crate::diagnostics::Diagnostics;
use crate::runtime::{
    BuildRequest, ContainerConfig, ContainerError, ContainerInfo, ContainerOps, ImageOps, LogOps,
};

use super::SmokeTest;
use super::error::{SmokeError, Step};
use super::logs::collect_logs;
use super::state::{
    CleanedUp, ContainerCreated, ContainerStarted, HasContainer, ImageBuilt, Initialized, Verified,
};

/// Result type for transitions whose failure still leaves a container to tear down.
pub type TransitionResult<T, S> = Result<SmokeTest<T>, (SmokeTest<S>, SmokeError)>;

/// Label marking containers created by this tool.
pub const MANAGED_LABEL: &str = "smoke-runner.managed";
/// Label holding the image tag under test.
pub const IMAGE_LABEL: &str = "smoke-runner.image";

/// Await `fut`, giving up after `limit`.
pub(crate) async fn bounded<T>(
    step: Step,
    limit: Duration,
    fut: impl Future<Output = T>,
) -> Result<T, SmokeError> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| SmokeError::Timeout { step, after: limit })
}

/// Labels that identify containers created for `tag`.
pub(crate) fn managed_labels(tag: &str) -> HashMap<String, String> {
    HashMap::from([
        (MANAGED_LABEL.to_string(), "true".to_string()),
        (IMAGE_LABEL.to_string(), tag.to_string()),
    ])
}

// =============================================================================
// Initialized -> ImageBuilt
// =============================================================================

impl SmokeTest<Initialized> {
    /// Pack the build context and build the image under the plan's tag.
    ///
    /// # Errors
    ///
    /// Returns `SmokeError::BuildContext` if the context cannot be packed,
    /// `SmokeError::Build` if the runtime rejects the build and
    /// `SmokeError::Timeout` if it does not finish in time.
    #[must_use = "smoke test state must be used"]
    pub async fn build<R: ImageOps>(self, runtime: &R) -> Result<SmokeTest<ImageBuilt>, SmokeError> {
        let dockerfile = self.plan.dockerfile.clone();
        let context_dir = self.plan.context.clone();
        let context =
            tokio::task::spawn_blocking(move || archive_context(&context_dir, &dockerfile))
                .await
                .map_err(|e| SmokeError::Build(format!("context packing aborted: {e}")))??;

        tracing::info!(
            tag = %self.plan.tag,
            dockerfile = %context.dockerfile,
            files = context.file_count,
            "building image"
        );

        let request = BuildRequest {
            tag: self.plan.tag.clone(),
            dockerfile: context.dockerfile,
            context: context.archive,
            build_args: self.plan.build_args.clone(),
            no_cache: self.plan.no_cache,
        };
        let image_id =
            bounded(Step::Build, self.plan.timeouts.build, runtime.build_image(&request)).await??;

        tracing::info!(image = %image_id.short(), "image built");

        Ok(SmokeTest {
            plan: self.plan,
            state: ImageBuilt { image_id },
        })
    }
}

// =============================================================================
// ImageBuilt -> ContainerCreated
// =============================================================================

impl SmokeTest<ImageBuilt> {
    /// Create the smoke container from the built image.
    ///
    /// # Errors
    ///
    /// Returns `SmokeError::Start` if the runtime refuses to create it.
    #[must_use = "smoke test state must be used"]
    pub async fn create_container<R: ContainerOps>(
        self,
        runtime: &R,
    ) -> Result<SmokeTest<ContainerCreated>, SmokeError> {
        let config = self.container_config();
        let container_id = bounded(
            Step::Create,
            self.plan.timeouts.start,
            runtime.create_container(&config),
        )
        .await?
        .map_err(|e| SmokeError::Start(e.to_string()))?;

        tracing::debug!(container = %container_id.short(), "container created");

        Ok(SmokeTest {
            plan: self.plan,
            state: ContainerCreated {
                image_id: self.state.image_id,
                container_id,
            },
        })
    }

    fn container_config(&self) -> ContainerConfig {
        ContainerConfig {
            name: Some(self.plan.container_name()),
            image: self.plan.tag.clone(),
            command: self.plan.command.clone(),
            env: self.plan.env.clone(),
            labels: managed_labels(&self.plan.tag.to_string()),
            stop_timeout: Some(self.plan.stop_timeout),
        }
    }
}

// =============================================================================
// ContainerCreated -> ContainerStarted
// =============================================================================

impl SmokeTest<ContainerCreated> {
    /// Start the created container. On failure the created container is
    /// handed back so it can still be removed.
    #[must_use = "smoke test state must be used"]
    pub async fn start<R: ContainerOps>(
        self,
        runtime: &R,
    ) -> TransitionResult<ContainerStarted, ContainerCreated> {
        let started = bounded(
            Step::Start,
            self.plan.timeouts.start,
            runtime.start_container(&self.state.container_id),
        )
        .await
        .and_then(|r| r.map_err(|e| SmokeError::Start(e.to_string())));

        if let Err(e) = started {
            return Err((self, e));
        }

        tracing::info!(container = %self.state.container_id.short(), "container started");

        Ok(SmokeTest {
            plan: self.plan,
            state: ContainerStarted {
                image_id: self.state.image_id,
                container_id: self.state.container_id,
            },
        })
    }
}

// =============================================================================
// ContainerStarted -> Verified
// =============================================================================

impl SmokeTest<ContainerStarted> {
    /// Wait for the settle delay, then check that the container is running.
    /// A container that is not running fails with its recent output attached.
    #[must_use = "smoke test state must be used"]
    pub async fn verify<R: ContainerOps + LogOps>(
        self,
        runtime: &R,
        diag: &mut Diagnostics,
    ) -> TransitionResult<Verified, ContainerStarted> {
        if !self.plan.settle.is_zero() {
            tokio::time::sleep(self.plan.settle).await;
        }

        let id = self.state.container_id.clone();
        let inspected = match bounded(
            Step::Verify,
            self.plan.timeouts.inspect,
            runtime.inspect_container(&id),
        )
        .await
        {
            Ok(inspected) => inspected,
            Err(e) => return Err((self, e)),
        };

        let reason = match inspected {
            Ok(info) if info.running => {
                tracing::info!(container = %id.short(), "container is running");
                return Ok(SmokeTest {
                    plan: self.plan,
                    state: Verified {
                        image_id: self.state.image_id,
                        container_id: self.state.container_id,
                    },
                });
            }
            Ok(info) => not_running_reason(&info),
            Err(ContainerError::NotFound(_)) => "container no longer exists".to_string(),
            Err(e) => format!("could not inspect container: {e}"),
        };

        let logs = collect_logs(
            runtime,
            &id,
            self.plan.log_tail,
            self.plan.timeouts.logs,
            diag,
        )
        .await;

        Err((
            self,
            SmokeError::NotRunning {
                container: id,
                reason,
                logs,
            },
        ))
    }
}

fn not_running_reason(info: &ContainerInfo) -> String {
    let mut reason = format!("state is {}", info.state);
    if let Some(code) = info.exit_code {
        let _ = write!(reason, ", exit code {code}");
    }
    if info.oom_killed {
        reason.push_str(", killed for running out of memory");
    }
    if let Some(error) = info.error.as_deref().filter(|e| !e.is_empty()) {
        let _ = write!(reason, ": {error}");
    }
    reason
}

// =============================================================================
// any state holding a container -> CleanedUp
// =============================================================================

impl<S: HasContainer> SmokeTest<S> {
    /// Stop and force-remove the container. Never fails; problems are
    /// returned as messages so the caller decides how strict to be.
    pub async fn cleanup<R: ContainerOps>(self, runtime: &R) -> (SmokeTest<CleanedUp>, Vec<String>) {
        let id = self.state.container_id().clone();
        let image_id = self.state.image_id().clone();
        let mut failures = Vec::new();

        // The runtime waits up to stop_timeout before killing.
        let stop_limit = self.plan.timeouts.cleanup + self.plan.stop_timeout;
        match bounded(
            Step::Cleanup,
            stop_limit,
            runtime.stop_container(&id, self.plan.stop_timeout),
        )
        .await
        {
            Ok(Ok(())) => tracing::debug!(container = %id.short(), "container stopped"),
            Ok(Err(ContainerError::NotRunning(_) | ContainerError::NotFound(_))) => {}
            Ok(Err(e)) => failures.push(format!("stop {}: {e}", id.short())),
            Err(e) => failures.push(format!("stop {}: {e}", id.short())),
        }

        match bounded(
            Step::Cleanup,
            self.plan.timeouts.cleanup,
            runtime.remove_container(&id, true),
        )
        .await
        {
            Ok(Ok(())) => tracing::info!(container = %id.short(), "container removed"),
            Ok(Err(ContainerError::NotFound(_))) => {
                tracing::debug!(container = %id.short(), "container already gone")
            }
            Ok(Err(e)) => failures.push(format!("remove {}: {e}", id.short())),
            Err(e) => failures.push(format!("remove {}: {e}", id.short())),
        }

        (
            SmokeTest {
                plan: self.plan,
                state: CleanedUp {
                    image_id,
                    container_id: id,
                },
            },
            failures,
        )
    }
}
