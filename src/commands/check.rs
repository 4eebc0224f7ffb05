// ABOUTME: Check command implementation.
// ABOUTME: Connects to the runtime, prints its metadata and whether the tag exists.

use std::env;

use smoke_runner::config::Config;
use smoke_runner::error::Result;
use smoke_runner::output::Output;
use smoke_runner::runtime::{ImageOps, RuntimeConfig, RuntimeError, RuntimeInfo};

use super::runtime_connection::connect_to_runtime;

pub async fn check(overrides: RuntimeConfig, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;
    let config = Config::discover_or_default(&cwd)?;

    let runtime_config = RuntimeConfig {
        runtime: overrides.runtime.or(config.runtime.runtime),
        socket: overrides.socket.or(config.runtime.socket),
    };

    let runtime = connect_to_runtime(&runtime_config, &output).await?;
    let info = runtime.info().await.map_err(RuntimeError::from)?;

    output.progress(&format!(
        "  → {} {} (API {}, {}/{}) at {}",
        info.name, info.version, info.api_version, info.os, info.arch, info.socket
    ));

    if let Some(tag) = &config.tag {
        match runtime.image_exists(tag).await {
            Ok(true) => output.progress(&format!("  → Image {tag} is present")),
            Ok(false) => output.progress(&format!("  → Image {tag} has not been built yet")),
            Err(e) => output.warning(&format!("could not look up {tag}: {e}")),
        }
    }

    output.success(&format!("{} is reachable", info.name));
    Ok(())
}
