// ABOUTME: Entry point for the smoke-runner CLI application.
// ABOUTME: Parses arguments, sets up tracing and dispatches to command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use smoke_runner::config;
use smoke_runner::error::{Error, Result};
use smoke_runner::output::{Output, OutputMode};
use smoke_runner::runtime::RuntimeConfig;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // --verbose wins over RUST_LOG
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = if cli.json {
        OutputMode::Json
    } else if cli.quiet {
        OutputMode::Quiet
    } else {
        OutputMode::Normal
    };

    if let Err(e) = run(cli.command, mode).await {
        // Smoke failures were already reported with their logs.
        if !matches!(e, Error::Smoke(_)) {
            Output::new(mode).error(&e.to_string());
        }
        std::process::exit(1);
    }
}

async fn run(command: Commands, mode: OutputMode) -> Result<()> {
    let output = Output::new(mode);
    match command {
        Commands::Run(args) => commands::run(args, output).await,
        Commands::Init { file, tag, force } => {
            let cwd = env::current_dir()?;
            config::init_config(&cwd, file.as_deref(), tag.as_deref(), force)?;
            output.success(&format!("Wrote {}", config::CONFIG_FILENAME));
            Ok(())
        }
        Commands::Check { runtime, socket } => {
            commands::check(RuntimeConfig { runtime, socket }, output).await
        }
    }
}
