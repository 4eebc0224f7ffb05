// ABOUTME: Captures the tail of a container's output for failure reports.
// ABOUTME: A failed or slow read becomes a warning instead of an error.

use std::time::Duration;

use futures::StreamExt;

use crate::diagnostics::{Diagnostics, Warning};
use crate::runtime::{LogError, LogOps, LogOptions};
use crate::types::ContainerId;

use super::error::Step;
use super::transitions::bounded;

/// Read the last `tail` lines of output. `None` means no logs are available.
pub(crate) async fn collect_logs<R: LogOps>(
    runtime: &R,
    id: &ContainerId,
    tail: u64,
    limit: Duration,
    diag: &mut Diagnostics,
) -> Option<String> {
    match bounded(Step::Logs, limit, read_tail(runtime, id, tail)).await {
        Ok(Ok(text)) => Some(text),
        Ok(Err(e)) => {
            diag.warn(Warning::logs_unavailable(format!(
                "could not read logs of {}: {e}",
                id.short()
            )));
            None
        }
        Err(e) => {
            diag.warn(Warning::logs_unavailable(e.to_string()));
            None
        }
    }
}

async fn read_tail<R: LogOps>(runtime: &R, id: &ContainerId, tail: u64) -> Result<String, LogError> {
    let mut stream = runtime.container_logs(id, &LogOptions::tail(tail)).await?;
    let mut text = String::new();
    while let Some(line) = stream.next().await {
        text.push_str(&line?.content);
    }
    Ok(text)
}
