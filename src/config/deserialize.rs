// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Accepts the container command as a shell string or an argv list.

use nonempty::NonEmpty;
use serde::Deserialize;

/// Interpreter for string commands, as with a Dockerfile's shell-form `CMD`.
const SHELL: [&str; 2] = ["/bin/sh", "-c"];

pub fn deserialize_command<'de, D>(deserializer: D) -> Result<Option<NonEmpty<String>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let entry: Option<CommandEntry> = Option::deserialize(deserializer)?;
    let Some(entry) = entry else {
        return Ok(None);
    };

    let argv = match entry {
        CommandEntry::Shell(s) if s.trim().is_empty() => Vec::new(),
        CommandEntry::Shell(s) => SHELL.iter().map(|a| a.to_string()).chain([s]).collect(),
        CommandEntry::Argv(v) => v,
    };

    NonEmpty::from_vec(argv)
        .map(Some)
        .ok_or_else(|| serde::de::Error::custom("command cannot be empty"))
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CommandEntry {
    Shell(String),
    Argv(Vec<String>),
}
