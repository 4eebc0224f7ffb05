// ABOUTME: Shared helper for connecting to the local container runtime.
// ABOUTME: Used by the run and check commands.

use smoke_runner::error::Result;
use smoke_runner::output::Output;
use smoke_runner::runtime::{BollardRuntime, RuntimeConfig, connect};

/// Detect, connect to and ping the container runtime.
pub async fn connect_to_runtime(config: &RuntimeConfig, output: &Output) -> Result<BollardRuntime> {
    output.progress("  → Detecting runtime...");
    let runtime = connect(config).await?;

    output.progress(&format!(
        "  → Found {} at {}",
        runtime.runtime_type(),
        runtime.endpoint().socket_path
    ));

    Ok(runtime)
}
