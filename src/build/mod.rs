// ABOUTME: Build-context assembly for image builds.
// ABOUTME: Packs a directory into the tar archive the Engine API build endpoint expects.

mod context;
mod ignore;

pub use context::{BuildContext, BuildContextError, archive_context};
pub use ignore::IgnoreRules;
