// ABOUTME: Fully resolved inputs for one smoke-test run.
// ABOUTME: Built from smoke.yml plus CLI overrides, or directly with SmokePlan::new.

use crate::config::{CleanupConfig, KEEP_ALIVE_COMMAND, Timeouts};
use crate::types::ImageRef;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SmokePlan {
    /// Build descriptor reference.
    pub dockerfile: PathBuf,
    pub context: PathBuf,
    pub tag: ImageRef,
    pub build_args: HashMap<String, String>,
    pub no_cache: bool,
    /// Container command; `None` runs the image's own CMD.
    pub command: Option<Vec<String>>,
    pub env: HashMap<String, String>,
    pub settle: Duration,
    pub log_tail: u64,
    pub timeouts: Timeouts,
    pub stop_timeout: Duration,
    pub cleanup: CleanupConfig,
}

impl SmokePlan {
    /// A plan with default settings and the keep-alive command. The build
    /// context is the Dockerfile's directory.
    pub fn new(dockerfile: impl Into<PathBuf>, tag: ImageRef) -> Self {
        let dockerfile = dockerfile.into();
        let context = dockerfile
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            dockerfile,
            context,
            tag,
            build_args: HashMap::new(),
            no_cache: false,
            command: Some(KEEP_ALIVE_COMMAND.iter().map(|s| s.to_string()).collect()),
            env: HashMap::new(),
            settle: Duration::from_secs(2),
            log_tail: 100,
            timeouts: Timeouts::default(),
            stop_timeout: Duration::from_secs(10),
            cleanup: CleanupConfig::default(),
        }
    }

    pub fn context(mut self, dir: impl Into<PathBuf>) -> Self {
        self.context = dir.into();
        self
    }

    pub fn command(mut self, command: Option<Vec<String>>) -> Self {
        self.command = command;
        self
    }

    pub fn settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn cleanup(mut self, cleanup: CleanupConfig) -> Self {
        self.cleanup = cleanup;
        self
    }

    /// Name given to the smoke container.
    pub(crate) fn container_name(&self) -> String {
        format!("smoke-{}-{}", self.tag.slug(), std::process::id())
    }
}
