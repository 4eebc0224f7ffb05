// ABOUTME: Configuration types and parsing for smoke.yml.
// ABOUTME: Handles YAML parsing, defaults, CLI overrides and conversion into a SmokePlan.

mod deserialize;
mod env_value;
mod init;
mod stop;
mod timeouts;

pub use env_value::{EnvValue, resolve_env_map};
pub use init::init_config;
pub use stop::{CleanupConfig, StopConfig};
pub use timeouts::Timeouts;

use crate::error::{Error, Result};
use crate::runtime::{RuntimeConfig, RuntimeType};
use crate::smoke::SmokePlan;
use crate::types::ImageRef;
use deserialize::deserialize_command;
use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = "smoke.yml";
pub const CONFIG_FILENAME_ALT: &str = "smoke.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".smoke/config.yml";

pub const DEFAULT_DOCKERFILE: &str = "Dockerfile";

/// Command that keeps a container alive until it is stopped.
pub const KEEP_ALIVE_COMMAND: [&str; 3] = ["tail", "-f", "/dev/null"];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_dockerfile")]
    pub dockerfile: PathBuf,

    #[serde(default)]
    pub tag: Option<ImageRef>,

    /// Build context directory; defaults to the Dockerfile's directory.
    #[serde(default)]
    pub context: Option<PathBuf>,

    #[serde(default)]
    pub build_args: HashMap<String, EnvValue>,

    #[serde(default)]
    pub no_cache: bool,

    /// Container command; replaces the keep-alive command when set. A string
    /// runs through `/bin/sh -c`, a list is used as argv.
    #[serde(default, deserialize_with = "deserialize_command")]
    pub command: Option<NonEmpty<String>>,

    /// Run the keep-alive command when no `command` is given. With `false`
    /// the image's own CMD runs.
    #[serde(default = "default_keep_alive")]
    pub keep_alive: bool,

    #[serde(default)]
    pub env: HashMap<String, EnvValue>,

    /// Wait between starting the container and checking it.
    #[serde(default = "default_settle", with = "humantime_serde")]
    pub settle: Duration,

    #[serde(default)]
    pub logs: LogsConfig,

    #[serde(default)]
    pub timeouts: Timeouts,

    #[serde(default)]
    pub stop: StopConfig,

    #[serde(default)]
    pub cleanup: CleanupConfig,

    #[serde(flatten)]
    pub runtime: RuntimeConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LogsConfig {
    /// Lines of container output to show when the check fails.
    #[serde(default = "default_log_tail")]
    pub tail: u64,
}

impl Default for LogsConfig {
    fn default() -> Self {
        LogsConfig {
            tail: default_log_tail(),
        }
    }
}

fn default_dockerfile() -> PathBuf {
    PathBuf::from(DEFAULT_DOCKERFILE)
}

fn default_keep_alive() -> bool {
    true
}

fn default_settle() -> Duration {
    Duration::from_secs(2)
}

fn default_log_tail() -> u64 {
    100
}

/// Values given on the command line; each one that is set wins over the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub dockerfile: Option<PathBuf>,
    pub tag: Option<ImageRef>,
    pub context: Option<PathBuf>,
    pub command: Option<NonEmpty<String>>,
    pub no_keep_alive: bool,
    pub no_cache: bool,
    pub settle: Option<Duration>,
    pub remove_image: bool,
    pub strict_cleanup: bool,
    pub runtime: Option<RuntimeType>,
    pub socket: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dockerfile: default_dockerfile(),
            tag: None,
            context: None,
            build_args: HashMap::new(),
            no_cache: false,
            command: None,
            keep_alive: default_keep_alive(),
            env: HashMap::new(),
            settle: default_settle(),
            logs: LogsConfig::default(),
            timeouts: Timeouts::default(),
            stop: StopConfig::default(),
            cleanup: CleanupConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Find a config file in `dir`.
    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!(path = %path.display(), "loading config");
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Like [`Config::discover`], but a missing file yields the defaults.
    pub fn discover_or_default(dir: &Path) -> Result<Self> {
        match Self::discover(dir) {
            Err(Error::ConfigNotFound(_)) => Ok(Self::default()),
            other => other,
        }
    }

    /// # Errors
    ///
    /// `--no-keep-alive` together with a command (from either source), since
    /// the command would win and the flag would do nothing.
    pub fn apply(mut self, overrides: Overrides) -> Result<Self> {
        if let Some(dockerfile) = overrides.dockerfile {
            self.dockerfile = dockerfile;
        }
        if overrides.tag.is_some() {
            self.tag = overrides.tag;
        }
        if overrides.context.is_some() {
            self.context = overrides.context;
        }
        if overrides.command.is_some() {
            self.command = overrides.command;
        }
        if overrides.no_keep_alive {
            if let Some(cmd) = &self.command {
                return Err(Error::InvalidConfig(format!(
                    "--no-keep-alive has no effect while `command` is set ({})",
                    cmd.iter().cloned().collect::<Vec<_>>().join(" ")
                )));
            }
            self.keep_alive = false;
        }
        if overrides.no_cache {
            self.no_cache = true;
        }
        if let Some(settle) = overrides.settle {
            self.settle = settle;
        }
        if overrides.remove_image {
            self.cleanup.remove_image = true;
        }
        if overrides.strict_cleanup {
            self.cleanup.strict = true;
        }
        if overrides.runtime.is_some() {
            self.runtime.runtime = overrides.runtime;
        }
        if overrides.socket.is_some() {
            self.runtime.socket = overrides.socket;
        }
        Ok(self)
    }

    /// The argv the container runs, or `None` for the image's own CMD.
    pub fn container_command(&self) -> Option<Vec<String>> {
        match (&self.command, self.keep_alive) {
            (Some(cmd), _) => Some(cmd.iter().cloned().collect()),
            (None, true) => Some(KEEP_ALIVE_COMMAND.iter().map(|s| s.to_string()).collect()),
            (None, false) => None,
        }
    }

    /// Resolve paths against `base_dir` and env references against the host.
    pub fn plan(&self, base_dir: &Path) -> Result<SmokePlan> {
        let tag = self.tag.clone().ok_or(Error::MissingTag)?;

        let dockerfile = base_dir.join(&self.dockerfile);
        let context = match &self.context {
            Some(dir) => base_dir.join(dir),
            None => dockerfile
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| base_dir.to_path_buf()),
        };

        Ok(SmokePlan {
            dockerfile,
            context,
            tag,
            build_args: resolve_env_map("build_args", &self.build_args)?,
            no_cache: self.no_cache,
            command: self.container_command(),
            env: resolve_env_map("env", &self.env)?,
            settle: self.settle,
            log_tail: self.logs.tail,
            timeouts: self.timeouts,
            stop_timeout: self.stop.timeout,
            cleanup: self.cleanup,
        })
    }

    pub fn template() -> Self {
        Config {
            tag: ImageRef::parse("my-app:smoke").ok(),
            ..Config::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keep_alive_is_default_command() {
        let config = Config::default();
        assert_eq!(
            config.container_command(),
            Some(vec![
                "tail".to_string(),
                "-f".to_string(),
                "/dev/null".to_string()
            ])
        );
    }

    #[test]
    fn explicit_command_beats_keep_alive() {
        let config = Config {
            command: NonEmpty::from_vec(vec!["sleep".to_string(), "infinity".to_string()]),
            ..Config::default()
        };
        assert_eq!(
            config.container_command(),
            Some(vec!["sleep".to_string(), "infinity".to_string()])
        );
    }

    #[test]
    fn disabling_keep_alive_uses_image_cmd() {
        let config = Config {
            keep_alive: false,
            ..Config::default()
        };
        assert_eq!(config.container_command(), None);
    }

    #[test]
    fn plan_requires_tag() {
        let err = Config::default().plan(Path::new("/work")).unwrap_err();
        assert!(matches!(err, Error::MissingTag));
    }

    #[test]
    fn plan_defaults_context_to_dockerfile_dir() {
        let config = Config {
            dockerfile: PathBuf::from("docker/Dockerfile.ipex"),
            tag: ImageRef::parse("intel_image:latest").ok(),
            ..Config::default()
        };
        let plan = config.plan(Path::new("/work")).unwrap();
        assert_eq!(plan.dockerfile, PathBuf::from("/work/docker/Dockerfile.ipex"));
        assert_eq!(plan.context, PathBuf::from("/work/docker"));
    }
}
