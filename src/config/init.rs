// ABOUTME: Config scaffolding for new projects.
// ABOUTME: Writes a commented smoke.yml template.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::ImageRef;

use super::{CONFIG_FILENAME, Config};

pub fn init_config(
    dir: &Path,
    dockerfile: Option<&Path>,
    tag: Option<&str>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();

    if let Some(path) = dockerfile {
        config.dockerfile = path.to_path_buf();
    }

    if let Some(t) = tag {
        config.tag = Some(ImageRef::parse(t).map_err(|e| Error::InvalidConfig(e.to_string()))?);
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"dockerfile: {}
tag: {}
# context: .
# build_args:
#   VERSION: "1.0"
#   TOKEN: {{ env: BUILD_TOKEN, default: "" }}

# The container runs `tail -f /dev/null` unless a command is given.
# Set keep_alive: false to run the image's own CMD instead.
# A string runs through /bin/sh -c; a list is the exact argv.
# command: ["sleep", "infinity"]
settle: {}

timeouts:
  build: 30m
  start: 2m
  inspect: 30s

cleanup:
  strict: false
  remove_image: false
"#,
        config.dockerfile.display(),
        config
            .tag
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        humantime_serde::re::humantime::format_duration(config.settle),
    )
}
