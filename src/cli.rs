// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use humantime_serde::re::humantime;
use smoke_runner::runtime::RuntimeType;
use smoke_runner::types::ImageRef;

#[derive(Parser)]
#[command(name = "smoke-runner")]
#[command(about = "Build a container image and check that it starts and stays running")]
#[command(version)]
pub struct Cli {
    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print only the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON events
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the image, start a container and check that it is running
    Run(RunArgs),

    /// Write a smoke.yml template in the current directory
    Init {
        /// Dockerfile path to put in the template
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Image tag to put in the template
        #[arg(short, long)]
        tag: Option<String>,

        /// Overwrite an existing smoke.yml
        #[arg(long)]
        force: bool,
    },

    /// Detect the container runtime and show its version
    Check {
        /// Runtime to use instead of auto-detection
        #[arg(long, value_enum)]
        runtime: Option<RuntimeType>,

        /// Runtime socket path
        #[arg(long)]
        socket: Option<String>,
    },
}

#[derive(Args)]
pub struct RunArgs {
    /// Dockerfile to build
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// Tag for the built image
    #[arg(short, long, value_parser = parse_tag)]
    pub tag: Option<ImageRef>,

    /// Build context directory (defaults to the Dockerfile's directory)
    #[arg(long)]
    pub context: Option<PathBuf>,

    /// Config file (defaults to smoke.yml in the current directory)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Run the image's own CMD instead of a keep-alive command
    #[arg(long, conflicts_with = "command")]
    pub no_keep_alive: bool,

    /// Build without the layer cache
    #[arg(long)]
    pub no_cache: bool,

    /// Wait after start before checking the container, e.g. "5s"
    #[arg(long, value_parser = parse_duration)]
    pub settle: Option<Duration>,

    /// Remove the built image after the run
    #[arg(long)]
    pub remove_image: bool,

    /// Fail the run when the container cannot be removed
    #[arg(long)]
    pub strict_cleanup: bool,

    /// Runtime to use instead of auto-detection
    #[arg(long, value_enum)]
    pub runtime: Option<RuntimeType>,

    /// Runtime socket path
    #[arg(long)]
    pub socket: Option<String>,

    /// Command to run in the container instead of the keep-alive command
    #[arg(last = true)]
    pub command: Vec<String>,
}

fn parse_tag(s: &str) -> Result<ImageRef, String> {
    ImageRef::parse(s).map_err(|e| e.to_string())
}

fn parse_duration(s: &str) -> Result<Duration, String> {
    humantime::parse_duration(s).map_err(|e| e.to_string())
}
