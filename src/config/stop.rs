// ABOUTME: Teardown configuration for the smoke container and built image.
// ABOUTME: Graceful stop timeout, strict vs lenient cleanup, image pruning, stale sweep.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct StopConfig {
    /// Grace period before the runtime kills the container.
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_timeout() -> Duration {
    Duration::from_secs(10)
}

impl Default for StopConfig {
    fn default() -> Self {
        StopConfig {
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CleanupConfig {
    /// Fail the run when the container cannot be torn down.
    #[serde(default)]
    pub strict: bool,

    /// Remove the built image after the run.
    #[serde(default)]
    pub remove_image: bool,

    /// Remove containers left behind by interrupted runs before starting.
    #[serde(default = "default_sweep_stale")]
    pub sweep_stale: bool,
}

fn default_sweep_stale() -> bool {
    true
}

impl Default for CleanupConfig {
    fn default() -> Self {
        CleanupConfig {
            strict: false,
            remove_image: false,
            sweep_stale: default_sweep_stale(),
        }
    }
}
