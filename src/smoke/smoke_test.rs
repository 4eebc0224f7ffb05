// ABOUTME: Generic smoke-test struct parameterized by state marker.
// ABOUTME: State types carry the image and container handles they guarantee.

use crate::types::{ContainerId, ImageId, ImageRef};

use super::plan::SmokePlan;
use super::state::{CleanedUp, HasContainer, ImageBuilt, Initialized};

/// A smoke test in progress, parameterized by its current state.
///
/// Steps are methods on the state they start from, so a container cannot be
/// verified before it is started, and only states that own a container can be
/// cleaned up.
#[derive(Debug)]
pub struct SmokeTest<S> {
    pub(crate) plan: SmokePlan,
    pub(crate) state: S,
}

impl SmokeTest<Initialized> {
    pub fn new(plan: SmokePlan) -> Self {
        SmokeTest {
            plan,
            state: Initialized,
        }
    }
}

impl<S> SmokeTest<S> {
    pub fn plan(&self) -> &SmokePlan {
        &self.plan
    }

    pub fn tag(&self) -> &ImageRef {
        &self.plan.tag
    }
}

impl SmokeTest<ImageBuilt> {
    pub fn image_id(&self) -> &ImageId {
        &self.state.image_id
    }
}

impl<S: HasContainer> SmokeTest<S> {
    pub fn image_id(&self) -> &ImageId {
        self.state.image_id()
    }

    pub fn container_id(&self) -> &ContainerId {
        self.state.container_id()
    }
}

impl SmokeTest<CleanedUp> {
    pub fn image_id(&self) -> &ImageId {
        &self.state.image_id
    }

    /// The removed container's ID.
    pub fn container_id(&self) -> &ContainerId {
        &self.state.container_id
    }
}
