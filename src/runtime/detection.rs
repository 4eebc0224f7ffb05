// ABOUTME: Runtime detection logic for the local host.
// ABOUTME: Honors explicit overrides and DOCKER_HOST, then checks Podman and Docker sockets.

use super::types::{RuntimeConfig, RuntimeEndpoint, RuntimeType};
use std::path::Path;

const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";
const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Error during runtime detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no container runtime found (checked Podman and Docker sockets)")]
    NoRuntimeFound,

    #[error("unsupported DOCKER_HOST {0:?}: only unix:// sockets are supported")]
    UnsupportedHost(String),
}

/// Resolve which runtime socket to use.
///
/// Order:
/// 1. Explicit `runtime` / `socket` from `config`
/// 2. `DOCKER_HOST` (unix sockets only)
/// 3. Auto-detection via [`detect_local`]
pub fn resolve_endpoint(config: &RuntimeConfig) -> Result<RuntimeEndpoint, DetectionError> {
    match (config.runtime, &config.socket) {
        (Some(runtime_type), socket) => {
            return Ok(RuntimeEndpoint {
                runtime_type,
                socket_path: socket
                    .clone()
                    .unwrap_or_else(|| default_socket_path(runtime_type).to_string()),
            });
        }
        (None, Some(socket)) => {
            return Ok(RuntimeEndpoint {
                runtime_type: guess_type(socket),
                socket_path: socket.clone(),
            });
        }
        (None, None) => {}
    }

    if let Ok(host) = std::env::var("DOCKER_HOST")
        && !host.is_empty()
    {
        let socket = host
            .strip_prefix("unix://")
            .ok_or_else(|| DetectionError::UnsupportedHost(host.clone()))?;
        return Ok(RuntimeEndpoint {
            runtime_type: guess_type(socket),
            socket_path: socket.to_string(),
        });
    }

    detect_local()
}

/// Detect container runtime on the local system.
///
/// Detection order:
/// 1. Rootless Podman socket (`/run/user/$UID/podman/podman.sock`)
/// 2. Rootful Podman socket (`/run/podman/podman.sock`)
/// 3. Docker socket (`/var/run/docker.sock`)
pub fn detect_local() -> Result<RuntimeEndpoint, DetectionError> {
    if let Some(uid) = get_uid() {
        let rootless_socket = format!("/run/user/{}/podman/podman.sock", uid);
        if Path::new(&rootless_socket).exists() {
            return Ok(RuntimeEndpoint {
                runtime_type: RuntimeType::Podman,
                socket_path: rootless_socket,
            });
        }
    }

    if Path::new(ROOTFUL_PODMAN).exists() {
        return Ok(RuntimeEndpoint {
            runtime_type: RuntimeType::Podman,
            socket_path: ROOTFUL_PODMAN.to_string(),
        });
    }

    if Path::new(DOCKER_SOCKET).exists() {
        return Ok(RuntimeEndpoint {
            runtime_type: RuntimeType::Docker,
            socket_path: DOCKER_SOCKET.to_string(),
        });
    }

    Err(DetectionError::NoRuntimeFound)
}

fn get_uid() -> Option<String> {
    std::env::var("UID").ok().or_else(|| {
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(|s| s.to_string())
            })
    })
}

fn default_socket_path(runtime: RuntimeType) -> &'static str {
    match runtime {
        RuntimeType::Docker => DOCKER_SOCKET,
        RuntimeType::Podman => ROOTFUL_PODMAN,
    }
}

fn guess_type(socket: &str) -> RuntimeType {
    if socket.contains("podman") {
        RuntimeType::Podman
    } else {
        RuntimeType::Docker
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_runtime_uses_default_socket() {
        let config = RuntimeConfig {
            runtime: Some(RuntimeType::Docker),
            socket: None,
        };
        let endpoint = resolve_endpoint(&config).unwrap();
        assert_eq!(endpoint.runtime_type, RuntimeType::Docker);
        assert_eq!(endpoint.socket_path, DOCKER_SOCKET);
    }

    #[test]
    fn explicit_socket_guesses_podman() {
        let config = RuntimeConfig {
            runtime: None,
            socket: Some("/run/user/1000/podman/podman.sock".to_string()),
        };
        let endpoint = resolve_endpoint(&config).unwrap();
        assert_eq!(endpoint.runtime_type, RuntimeType::Podman);
    }

    #[test]
    fn explicit_pair_is_taken_verbatim() {
        let config = RuntimeConfig {
            runtime: Some(RuntimeType::Podman),
            socket: Some("/tmp/custom.sock".to_string()),
        };
        let endpoint = resolve_endpoint(&config).unwrap();
        assert_eq!(
            endpoint,
            RuntimeEndpoint {
                runtime_type: RuntimeType::Podman,
                socket_path: "/tmp/custom.sock".to_string(),
            }
        );
    }
}
