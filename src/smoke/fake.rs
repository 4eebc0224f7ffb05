// ABOUTME: Scripted in-memory runtime for exercising the smoke sequence.
// ABOUTME: Records every call so tests can assert on ordering and counts.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::runtime::traits::sealed::Sealed;
use crate::runtime::{
    BuildRequest, ContainerConfig, ContainerError, ContainerFilters, ContainerInfo, ContainerOps,
    ContainerState, ContainerSummary, ImageError, ImageOps, LogError, LogLine, LogOps, LogOptions,
    LogStream, LogStreamBox, RuntimeInfo, RuntimeInfoError, RuntimeMetadata,
};
use crate::types::{ContainerId, ImageId, ImageRef};

pub(crate) const CONTAINER: &str = "c0ffee0123456789c0ffee0123456789";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    List,
    Build {
        tag: String,
        dockerfile: String,
    },
    Create {
        name: Option<String>,
        command: Option<Vec<String>>,
    },
    Start(String),
    Inspect(String),
    Logs(String),
    Stop(String),
    Remove(String),
    RemoveImage(String),
}

/// Calls that never answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Hang {
    Build,
    Inspect,
}

/// How the fake runtime behaves. The default builds, starts and keeps
/// running; log reads fail unless `logs` is set.
#[derive(Debug, Default)]
pub(crate) struct Script {
    pub build_error: Option<String>,
    pub create_error: Option<String>,
    pub start_error: Option<String>,
    /// Inspect reports the container as exited.
    pub exits: bool,
    /// Inspect reports the container as missing.
    pub vanished: bool,
    pub logs: Option<String>,
    pub stop_not_running: bool,
    pub remove_error: Option<String>,
    pub hang: Option<Hang>,
    /// IDs returned by the stale-container listing.
    pub stale: Vec<String>,
}

pub(crate) struct FakeRuntime {
    script: Script,
    calls: Mutex<Vec<Call>>,
}

impl FakeRuntime {
    pub(crate) fn new(script: Script) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Sealed for FakeRuntime {}

#[async_trait]
impl ImageOps for FakeRuntime {
    async fn build_image(&self, request: &BuildRequest) -> Result<ImageId, ImageError> {
        self.record(Call::Build {
            tag: request.tag.to_string(),
            dockerfile: request.dockerfile.clone(),
        });
        if self.script.hang == Some(Hang::Build) {
            return futures::future::pending().await;
        }
        match &self.script.build_error {
            Some(msg) => Err(ImageError::BuildFailed(msg.clone())),
            None => Ok(ImageId::new("sha256:feedface")),
        }
    }

    async fn image_exists(&self, _reference: &ImageRef) -> Result<bool, ImageError> {
        Ok(true)
    }

    async fn remove_image(&self, reference: &ImageRef, _force: bool) -> Result<(), ImageError> {
        self.record(Call::RemoveImage(reference.to_string()));
        Ok(())
    }
}

#[async_trait]
impl ContainerOps for FakeRuntime {
    async fn create_container(
        &self,
        config: &ContainerConfig,
    ) -> Result<ContainerId, ContainerError> {
        self.record(Call::Create {
            name: config.name.clone(),
            command: config.command.clone(),
        });
        match &self.script.create_error {
            Some(msg) => Err(ContainerError::ImageNotFound(msg.clone())),
            None => Ok(ContainerId::new(CONTAINER)),
        }
    }

    async fn start_container(&self, id: &ContainerId) -> Result<(), ContainerError> {
        self.record(Call::Start(id.to_string()));
        match &self.script.start_error {
            Some(msg) => Err(ContainerError::Runtime(msg.clone())),
            None => Ok(()),
        }
    }

    async fn stop_container(
        &self,
        id: &ContainerId,
        _timeout: std::time::Duration,
    ) -> Result<(), ContainerError> {
        self.record(Call::Stop(id.to_string()));
        if self.script.stop_not_running || self.script.exits {
            return Err(ContainerError::NotRunning(id.to_string()));
        }
        Ok(())
    }

    async fn remove_container(&self, id: &ContainerId, _force: bool) -> Result<(), ContainerError> {
        self.record(Call::Remove(id.to_string()));
        match &self.script.remove_error {
            Some(msg) if id.as_str() == CONTAINER => Err(ContainerError::Runtime(msg.clone())),
            _ => Ok(()),
        }
    }

    async fn inspect_container(&self, id: &ContainerId) -> Result<ContainerInfo, ContainerError> {
        self.record(Call::Inspect(id.to_string()));
        if self.script.hang == Some(Hang::Inspect) {
            return futures::future::pending().await;
        }
        if self.script.vanished {
            return Err(ContainerError::NotFound(id.to_string()));
        }
        let running = !self.script.exits;
        Ok(ContainerInfo {
            id: id.clone(),
            name: "smoke".to_string(),
            image: "sha256:feedface".to_string(),
            state: if running {
                ContainerState::Running
            } else {
                ContainerState::Exited
            },
            running,
            exit_code: (!running).then_some(2),
            error: None,
            oom_killed: false,
            labels: HashMap::new(),
        })
    }

    async fn list_containers(
        &self,
        _filters: &ContainerFilters,
    ) -> Result<Vec<ContainerSummary>, ContainerError> {
        self.record(Call::List);
        Ok(self
            .script
            .stale
            .iter()
            .map(|id| ContainerSummary {
                id: ContainerId::new(id.as_str()),
                name: format!("smoke-{id}"),
                image: "app:smoke".to_string(),
                state: "exited".to_string(),
                labels: HashMap::new(),
            })
            .collect())
    }
}

#[async_trait]
impl LogOps for FakeRuntime {
    async fn container_logs(
        &self,
        id: &ContainerId,
        _opts: &LogOptions,
    ) -> Result<LogStreamBox, LogError> {
        self.record(Call::Logs(id.to_string()));
        let Some(text) = self.script.logs.clone() else {
            return Err(LogError::StreamError("log driver does not support reading".into()));
        };
        let lines = text
            .split_inclusive('\n')
            .map(|line| {
                Ok(LogLine {
                    content: line.to_string(),
                    stream: LogStream::Stderr,
                })
            })
            .collect::<Vec<_>>();
        Ok(Box::pin(futures::stream::iter(lines)))
    }
}

#[async_trait]
impl RuntimeInfo for FakeRuntime {
    async fn info(&self) -> Result<RuntimeMetadata, RuntimeInfoError> {
        Ok(RuntimeMetadata {
            name: "Fake".to_string(),
            version: "0.0.0".to_string(),
            api_version: "1.45".to_string(),
            os: "linux".to_string(),
            arch: "amd64".to_string(),
            socket: "/fake/docker.sock".to_string(),
        })
    }

    async fn ping(&self) -> Result<(), RuntimeInfoError> {
        Ok(())
    }
}
