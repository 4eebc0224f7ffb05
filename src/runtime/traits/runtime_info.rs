// ABOUTME: Daemon reachability and metadata for the smoke runner.
// ABOUTME: Used by `check` and before every run to fail fast on a dead socket.

use super::sealed::Sealed;
use super::shared_types::RuntimeMetadata;
use async_trait::async_trait;

#[async_trait]
pub trait RuntimeInfo: Sealed + Send + Sync {
    /// Daemon name, version and platform, plus the socket that answered.
    async fn info(&self) -> Result<RuntimeMetadata, RuntimeInfoError>;

    /// Round-trip to the daemon without touching images or containers.
    async fn ping(&self) -> Result<(), RuntimeInfoError>;
}

/// The daemon behind a socket could not be used.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeInfoError {
    /// The client could not be set up for the socket.
    #[error("cannot open runtime socket {socket}: {reason}")]
    Connect { socket: String, reason: String },

    /// The socket exists but the daemon did not answer.
    #[error("no answer from runtime at {socket}: {reason}")]
    NoAnswer { socket: String, reason: String },
}

impl RuntimeInfoError {
    pub fn socket(&self) -> &str {
        match self {
            RuntimeInfoError::Connect { socket, .. } | RuntimeInfoError::NoAnswer { socket, .. } => {
                socket
            }
        }
    }
}
