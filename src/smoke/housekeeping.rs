// ABOUTME: Sweeps containers left by earlier runs and prunes the built image.
// ABOUTME: Both are best effort; failures are recorded as warnings.

use std::time::Duration;

use crate::diagnostics::{Diagnostics, Warning};
use crate::runtime::{ContainerError, ContainerFilters, ContainerOps, ImageOps};
use crate::types::ImageRef;

use super::error::Step;
use super::plan::SmokePlan;
use super::transitions::{bounded, managed_labels};

/// Stop and remove every managed container labelled with `plan.tag`.
///
/// Returns how many containers were removed.
pub async fn sweep_stale<R: ContainerOps>(
    runtime: &R,
    plan: &SmokePlan,
    diag: &mut Diagnostics,
) -> usize {
    let filters = ContainerFilters {
        labels: managed_labels(&plan.tag.to_string()),
        // Include stopped containers
        all: true,
    };
    let limit = plan.timeouts.cleanup;

    let stale = match bounded(Step::Sweep, limit, runtime.list_containers(&filters)).await {
        Ok(Ok(stale)) => stale,
        Ok(Err(e)) => {
            diag.warn(Warning::stale_sweep(format!(
                "could not list earlier smoke containers: {e}"
            )));
            return 0;
        }
        Err(e) => {
            diag.warn(Warning::stale_sweep(e.to_string()));
            return 0;
        }
    };

    let mut removed = 0;
    for container in stale {
        tracing::info!(
            container = %container.id.short(),
            name = %container.name,
            state = %container.state,
            "removing container left by an earlier run"
        );
        match bounded(Step::Sweep, limit, runtime.remove_container(&container.id, true)).await {
            Ok(Ok(())) | Ok(Err(ContainerError::NotFound(_))) => removed += 1,
            Ok(Err(e)) => diag.warn(Warning::stale_sweep(format!(
                "could not remove {}: {e}",
                container.id.short()
            ))),
            Err(e) => diag.warn(Warning::stale_sweep(e.to_string())),
        }
    }

    removed
}

/// Remove the image under test. Failures become warnings.
pub async fn remove_image<R: ImageOps>(
    runtime: &R,
    tag: &ImageRef,
    limit: Duration,
    diag: &mut Diagnostics,
) -> bool {
    match bounded(Step::RemoveImage, limit, runtime.remove_image(tag, false)).await {
        Ok(Ok(())) => {
            tracing::info!(image = %tag, "image removed");
            true
        }
        Ok(Err(e)) => {
            diag.warn(Warning::image_removal(format!("could not remove {tag}: {e}")));
            false
        }
        Err(e) => {
            diag.warn(Warning::image_removal(e.to_string()));
            false
        }
    }
}
