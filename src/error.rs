// ABOUTME: Application-wide error types for smoke-runner.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::runtime::RuntimeError;
use crate::smoke::SmokeError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("no image tag given (use --tag or set `tag` in smoke.yml)")]
    MissingTag,

    #[error("{key} needs environment variable {var}, which is not set")]
    MissingEnvVar { key: String, var: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Runtime(#[from] RuntimeError),

    #[error(transparent)]
    Smoke(#[from] SmokeError),
}

pub type Result<T> = std::result::Result<T, Error>;
