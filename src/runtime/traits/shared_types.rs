// ABOUTME: Shared types used across runtime trait definitions.
// ABOUTME: BuildRequest, ContainerConfig, ContainerInfo, RuntimeMetadata.

use crate::types::{ContainerId, ImageRef};
use bytes::Bytes;
use std::collections::HashMap;
use std::time::Duration;

/// Input for an image build.
#[derive(Debug, Clone)]
pub struct BuildRequest {
    /// Tag to apply to the built image.
    pub tag: ImageRef,
    /// Dockerfile path inside the context archive.
    pub dockerfile: String,
    /// Tar archive of the build context.
    pub context: Bytes,
    /// `--build-arg` values.
    pub build_args: HashMap<String, String>,
    /// Do not use the build cache.
    pub no_cache: bool,
}

/// Configuration for creating a container.
#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Container name; the runtime picks one when `None`.
    pub name: Option<String>,
    pub image: ImageRef,
    /// Command to run (overrides image CMD).
    pub command: Option<Vec<String>>,
    pub env: HashMap<String, String>,
    pub labels: HashMap<String, String>,
    pub stop_timeout: Option<Duration>,
}

/// Inspected state of a container.
#[derive(Debug, Clone)]
pub struct ContainerInfo {
    pub id: ContainerId,
    pub name: String,
    pub image: String,
    pub state: ContainerState,
    /// The runtime's `State.Running` flag.
    pub running: bool,
    pub exit_code: Option<i64>,
    /// Runtime-reported error (e.g. exec format error on start).
    pub error: Option<String>,
    pub oom_killed: bool,
    pub labels: HashMap<String, String>,
}

/// Container state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerState {
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
}

impl std::fmt::Display for ContainerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ContainerState::Created => "created",
            ContainerState::Running => "running",
            ContainerState::Paused => "paused",
            ContainerState::Restarting => "restarting",
            ContainerState::Removing => "removing",
            ContainerState::Exited => "exited",
            ContainerState::Dead => "dead",
        };
        f.write_str(s)
    }
}

/// Runtime metadata.
#[derive(Debug, Clone)]
pub struct RuntimeMetadata {
    /// Runtime name ("Docker" or "Podman").
    pub name: String,
    pub version: String,
    pub api_version: String,
    pub os: String,
    pub arch: String,
    /// Socket the daemon answered on.
    pub socket: String,
}
