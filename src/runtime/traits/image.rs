// ABOUTME: Image operations trait for container runtimes.
// ABOUTME: Build images from a context archive, check existence, remove.

use super::sealed::Sealed;
use super::shared_types::BuildRequest;
use crate::types::{ImageId, ImageRef};
use async_trait::async_trait;

/// Image operations: build, check existence, remove.
#[async_trait]
pub trait ImageOps: Sealed + Send + Sync {
    /// Build an image from a tar build context and tag it.
    async fn build_image(&self, request: &BuildRequest) -> Result<ImageId, ImageError>;

    /// Check if an image exists locally.
    async fn image_exists(&self, reference: &ImageRef) -> Result<bool, ImageError>;

    /// Remove an image.
    async fn remove_image(&self, reference: &ImageRef, force: bool) -> Result<(), ImageError>;
}

/// Errors from image operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image not found: {0}")]
    NotFound(String),

    #[error("build failed: {0}")]
    BuildFailed(String),

    #[error("image in use, cannot remove: {0}")]
    InUse(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
