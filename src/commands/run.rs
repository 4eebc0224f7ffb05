// ABOUTME: Run command implementation.
// ABOUTME: Resolves config and overrides into a plan, then runs the smoke test.

use std::env;
use std::path::{Path, PathBuf};

use nonempty::NonEmpty;
use smoke_runner::config::{Config, Overrides};
use smoke_runner::error::{Error, Result};
use smoke_runner::output::Output;
use smoke_runner::smoke::run_smoke_test;

use super::runtime_connection::connect_to_runtime;
use crate::cli::RunArgs;

pub async fn run(args: RunArgs, mut output: Output) -> Result<()> {
    let cwd = env::current_dir()?;
    let (config, base_dir) = match &args.config {
        Some(path) => {
            let base = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(|p| cwd.join(p))
                .unwrap_or_else(|| cwd.clone());
            (Config::load(&cwd.join(path))?, base)
        }
        None => (Config::discover_or_default(&cwd)?, cwd.clone()),
    };

    let overrides = Overrides {
        dockerfile: args.file.map(|f| relative_to(&cwd, &base_dir, &f)),
        tag: args.tag,
        context: args.context.map(|c| relative_to(&cwd, &base_dir, &c)),
        command: NonEmpty::from_vec(args.command),
        no_keep_alive: args.no_keep_alive,
        no_cache: args.no_cache,
        settle: args.settle,
        remove_image: args.remove_image,
        strict_cleanup: args.strict_cleanup,
        runtime: args.runtime,
        socket: args.socket,
    };
    let config = config.apply(overrides)?;
    let plan = config.plan(&base_dir)?;

    output.start_timer();
    output.progress(&format!(
        "Smoke testing {} from {}",
        plan.tag,
        plan.dockerfile.display()
    ));

    let runtime = connect_to_runtime(&config.runtime, &output).await?;

    output.progress("  → Building image and starting container...");
    match run_smoke_test(&runtime, &plan).await {
        Ok(report) => {
            output.report(&report);
            Ok(())
        }
        Err(e) => {
            output.smoke_failure(&e);
            Err(Error::Smoke(e))
        }
    }
}

/// CLI paths are relative to the working directory, config paths to the
/// config file's directory.
fn relative_to(cwd: &Path, base_dir: &Path, path: &Path) -> PathBuf {
    let absolute = cwd.join(path);
    match absolute.strip_prefix(base_dir) {
        Ok(rest) => rest.to_path_buf(),
        Err(_) => absolute,
    }
}
