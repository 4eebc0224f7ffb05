// ABOUTME: Runtime error types with SNAFU pattern.
// ABOUTME: Unifies detection and connection errors for programmatic handling.

use snafu::Snafu;

use super::detection::DetectionError;
use super::traits::RuntimeInfoError;

/// Unified runtime error for detection and connection failures.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RuntimeError {
    #[snafu(display("runtime detection failed: {source}"))]
    Detection { source: DetectionError },

    #[snafu(display("runtime connection failed: {source}"))]
    Connection { source: RuntimeInfoError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// No container runtime found on the system.
    NoRuntimeFound,
    /// DOCKER_HOST points somewhere we cannot reach.
    UnsupportedHost,
    /// The client could not be set up for the socket.
    ConnectionFailed,
    /// The daemon behind the socket did not answer.
    NoAnswer,
}

impl RuntimeError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> RuntimeErrorKind {
        match self {
            RuntimeError::Detection { source } => match source {
                DetectionError::NoRuntimeFound => RuntimeErrorKind::NoRuntimeFound,
                DetectionError::UnsupportedHost(_) => RuntimeErrorKind::UnsupportedHost,
            },
            RuntimeError::Connection { source } => match source {
                RuntimeInfoError::Connect { .. } => RuntimeErrorKind::ConnectionFailed,
                RuntimeInfoError::NoAnswer { .. } => RuntimeErrorKind::NoAnswer,
            },
        }
    }
}

impl From<DetectionError> for RuntimeError {
    fn from(source: DetectionError) -> Self {
        RuntimeError::Detection { source }
    }
}

impl From<RuntimeInfoError> for RuntimeError {
    fn from(source: RuntimeInfoError) -> Self {
        RuntimeError::Connection { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silent_daemon_is_its_own_kind() {
        let err = RuntimeError::from(RuntimeInfoError::NoAnswer {
            socket: "/run/user/1000/podman/podman.sock".to_string(),
            reason: "timed out".to_string(),
        });
        assert_eq!(err.kind(), RuntimeErrorKind::NoAnswer);
        assert!(err.to_string().contains("/run/user/1000/podman/podman.sock"));
    }
}
