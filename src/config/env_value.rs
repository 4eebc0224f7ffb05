// ABOUTME: Values for `build_args` and container `env` entries in smoke.yml.
// ABOUTME: Plain scalars pass through; `{ env, default }` reads the host environment at plan time.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::HashMap;

/// One `build_args` or `env` value.
///
/// ```yaml
/// build_args:
///   PYTHON_VERSION: "3.10"      # quote versions, YAML reads 3.10 as 3.1
///   WORKERS: 4
///   TOKEN: { env: BUILD_TOKEN }  # required on the host
///   MIRROR: { env: PIP_MIRROR, default: "" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    Number(serde_yaml::Number),
    Flag(bool),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    /// The string handed to the build or the container. Fails with the host
    /// variable's name when it is unset and there is no default.
    pub fn resolve(&self) -> std::result::Result<String, &str> {
        match self {
            EnvValue::Literal(s) => Ok(s.clone()),
            EnvValue::Number(n) => Ok(n.to_string()),
            EnvValue::Flag(b) => Ok(b.to_string()),
            EnvValue::FromEnv { var, default } => std::env::var(var)
                .ok()
                .or_else(|| default.clone())
                .ok_or(var.as_str()),
        }
    }
}

/// Resolve every entry of a smoke.yml section (`build_args` or `env`).
pub fn resolve_env_map(
    section: &str,
    map: &HashMap<String, EnvValue>,
) -> Result<HashMap<String, String>> {
    map.iter()
        .map(|(key, value)| {
            let resolved = value.resolve().map_err(|var| Error::MissingEnvVar {
                key: format!("{section}.{key}"),
                var: var.to_string(),
            })?;
            Ok((key.clone(), resolved))
        })
        .collect()
}
