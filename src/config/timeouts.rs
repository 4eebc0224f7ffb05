// ABOUTME: Per-step time bounds for runtime calls.
// ABOUTME: Every build, start, inspect, log and cleanup call is wrapped in one of these.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Timeouts {
    #[serde(default = "default_build", with = "humantime_serde")]
    pub build: Duration,

    #[serde(default = "default_start", with = "humantime_serde")]
    pub start: Duration,

    #[serde(default = "default_inspect", with = "humantime_serde")]
    pub inspect: Duration,

    #[serde(default = "default_logs", with = "humantime_serde")]
    pub logs: Duration,

    #[serde(default = "default_cleanup", with = "humantime_serde")]
    pub cleanup: Duration,
}

fn default_build() -> Duration {
    Duration::from_secs(30 * 60)
}

fn default_start() -> Duration {
    Duration::from_secs(120)
}

fn default_inspect() -> Duration {
    Duration::from_secs(30)
}

fn default_logs() -> Duration {
    Duration::from_secs(30)
}

fn default_cleanup() -> Duration {
    Duration::from_secs(60)
}

impl Default for Timeouts {
    fn default() -> Self {
        Timeouts {
            build: default_build(),
            start: default_start(),
            inspect: default_inspect(),
            logs: default_logs(),
            cleanup: default_cleanup(),
        }
    }
}
