// ABOUTME: Smoke-test state marker types for the type state pattern.
// ABOUTME: States after the build carry the image ID; states after create carry the container handle.

use crate::types::{ContainerId, ImageId};

/// Nothing built yet.
/// Available actions: `build()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Image built and tagged.
/// Available actions: `create_container()`
#[derive(Debug, Clone)]
pub struct ImageBuilt {
    pub(crate) image_id: ImageId,
}

/// Container created but not started.
/// Available actions: `start()`, `cleanup()`
#[derive(Debug, Clone)]
pub struct ContainerCreated {
    pub(crate) image_id: ImageId,
    pub(crate) container_id: ContainerId,
}

/// Container started.
/// Available actions: `verify()`, `cleanup()`
#[derive(Debug, Clone)]
pub struct ContainerStarted {
    pub(crate) image_id: ImageId,
    pub(crate) container_id: ContainerId,
}

/// Container observed running.
/// Available actions: `cleanup()`
#[derive(Debug, Clone)]
pub struct Verified {
    pub(crate) image_id: ImageId,
    pub(crate) container_id: ContainerId,
}

/// Container removed (or removal attempted); the image remains.
#[derive(Debug, Clone)]
pub struct CleanedUp {
    pub(crate) image_id: ImageId,
    pub(crate) container_id: ContainerId,
}

/// States that own a container handle and therefore need teardown.
pub trait HasContainer {
    fn container_id(&self) -> &ContainerId;
    fn image_id(&self) -> &ImageId;
}

macro_rules! has_container {
    ($($state:ty),*) => {
        $(
            impl HasContainer for $state {
                fn container_id(&self) -> &ContainerId {
                    &self.container_id
                }

                fn image_id(&self) -> &ImageId {
                    &self.image_id
                }
            }
        )*
    };
}

has_container!(ContainerCreated, ContainerStarted, Verified);
