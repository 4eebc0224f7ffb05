// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to keep container and image IDs apart at compile time.

mod id;
mod image_ref;

pub use id::{ContainerId, ImageId};
pub use image_ref::{ImageRef, ParseImageRefError};
