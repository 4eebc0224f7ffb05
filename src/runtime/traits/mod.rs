// ABOUTME: Composable capability traits for container runtimes.
// ABOUTME: Defines ImageOps, ContainerOps, LogOps and RuntimeInfo.

mod container;
mod image;
mod logs;
mod runtime_info;
pub(crate) mod sealed;
mod shared_types;

pub use container::{ContainerError, ContainerFilters, ContainerOps, ContainerSummary};
pub use image::{ImageError, ImageOps};
pub use logs::{LogError, LogLine, LogOps, LogOptions, LogStream, LogStreamBox};
pub use runtime_info::{RuntimeInfo, RuntimeInfoError};
pub use shared_types::*;

/// Everything the smoke runner needs from a runtime.
pub trait FullRuntime: ImageOps + ContainerOps + LogOps + RuntimeInfo {}

impl<T> FullRuntime for T where T: ImageOps + ContainerOps + LogOps + RuntimeInfo {}
