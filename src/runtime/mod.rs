// ABOUTME: Container runtime access for Docker and Podman.
// ABOUTME: Detection, capability traits, and the bollard-backed implementation.

mod detection;
mod docker_api;
mod error;
pub mod traits;
mod types;

pub use detection::{DetectionError, detect_local, resolve_endpoint};
pub use docker_api::{BollardRuntime, connect};
pub use error::{RuntimeError, RuntimeErrorKind};
pub use traits::{
    BuildRequest, ContainerConfig, ContainerError, ContainerFilters, ContainerInfo, ContainerOps,
    ContainerState, ContainerSummary, FullRuntime, ImageError, ImageOps, LogError, LogLine,
    LogOps, LogOptions, LogStream, LogStreamBox, RuntimeInfo, RuntimeInfoError, RuntimeMetadata,
};
pub use types::{RuntimeConfig, RuntimeEndpoint, RuntimeType};
