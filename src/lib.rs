// ABOUTME: Library root for smoke-runner - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod build;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod runtime;
pub mod smoke;
pub mod types;
