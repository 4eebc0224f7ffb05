// ABOUTME: Image tag parsing and validation for build output names.
// ABOUTME: Accepts name, name:tag, registry[:port]/path/name:tag and @digest forms.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

const MAX_TAG_LEN: usize = 128;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseImageRefError {
    #[error("image reference cannot be empty")]
    Empty,

    #[error("invalid character in image reference: {0:?}")]
    InvalidChar(char),

    #[error("repository name must be lowercase: {0}")]
    Uppercase(String),

    #[error("invalid tag {0:?}: must be 1-128 chars of [A-Za-z0-9_.-], not starting with '.' or '-'")]
    InvalidTag(String),

    #[error("invalid image reference format: {0}")]
    InvalidFormat(String),
}

/// A validated image reference used as the build tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    registry: Option<String>,
    name: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl ImageRef {
    pub fn parse(input: &str) -> Result<Self, ParseImageRefError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ParseImageRefError::Empty);
        }

        if let Some(c) = input
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '-' | '_' | '@')))
        {
            return Err(ParseImageRefError::InvalidChar(c));
        }

        let (without_digest, digest) = match input.split_once('@') {
            Some((before, after)) => {
                if !after.contains(':') || after.ends_with(':') {
                    return Err(ParseImageRefError::InvalidFormat(input.to_string()));
                }
                (before, Some(after.to_string()))
            }
            None => (input, None),
        };

        // A colon followed by a slash belongs to a registry port, not a tag.
        let (without_tag, tag) = match without_digest.rsplit_once(':') {
            Some((before, after)) if !after.contains('/') => {
                validate_tag(after)?;
                (before, Some(after.to_string()))
            }
            _ => (without_digest, None),
        };

        let (registry, name) = split_registry(without_tag)?;
        validate_name(&name)?;

        let tag = match (&tag, &digest) {
            (None, None) => Some("latest".to_string()),
            _ => tag,
        };

        Ok(Self {
            registry,
            name,
            tag,
            digest,
        })
    }

    pub fn registry(&self) -> Option<&str> {
        self.registry.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// Name fragment safe to embed in a container name (`[a-z0-9_.-]`).
    pub fn slug(&self) -> String {
        let mut slug: String = self
            .name
            .chars()
            .map(|c| if c == '/' { '-' } else { c })
            .collect();
        if let Some(tag) = &self.tag {
            slug.push('-');
            slug.push_str(&tag.to_ascii_lowercase());
        }
        slug
    }
}

fn split_registry(input: &str) -> Result<(Option<String>, String), ParseImageRefError> {
    match input.split_once('/') {
        None => Ok((None, input.to_string())),
        Some((first, rest)) => {
            if first.contains('.') || first.contains(':') || first == "localhost" {
                if rest.is_empty() {
                    return Err(ParseImageRefError::InvalidFormat(input.to_string()));
                }
                Ok((Some(first.to_string()), rest.to_string()))
            } else {
                Ok((None, input.to_string()))
            }
        }
    }
}

fn validate_name(name: &str) -> Result<(), ParseImageRefError> {
    if name.is_empty() || name.contains(':') {
        return Err(ParseImageRefError::InvalidFormat(name.to_string()));
    }
    for component in name.split('/') {
        let bad_edge = |c: char| !c.is_ascii_alphanumeric();
        if component.is_empty()
            || component.starts_with(bad_edge)
            || component.ends_with(bad_edge)
        {
            return Err(ParseImageRefError::InvalidFormat(name.to_string()));
        }
    }
    if name.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ParseImageRefError::Uppercase(name.to_string()));
    }
    Ok(())
}

fn validate_tag(tag: &str) -> Result<(), ParseImageRefError> {
    let valid = !tag.is_empty()
        && tag.len() <= MAX_TAG_LEN
        && !tag.starts_with(['.', '-'])
        && !tag.contains('@')
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if valid {
        Ok(())
    } else {
        Err(ParseImageRefError::InvalidTag(tag.to_string()))
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref registry) = self.registry {
            write!(f, "{}/", registry)?;
        }
        write!(f, "{}", self.name)?;
        if let Some(ref tag) = self.tag {
            write!(f, ":{}", tag)?;
        }
        if let Some(ref digest) = self.digest {
            write!(f, "@{}", digest)?;
        }
        Ok(())
    }
}

impl FromStr for ImageRef {
    type Err = ParseImageRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ImageRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ImageRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_flattens_path_and_tag() {
        let img = ImageRef::parse("ghcr.io/org/app:V1").unwrap();
        assert_eq!(img.slug(), "org-app-v1");
    }

    #[test]
    fn registry_port_is_not_a_tag() {
        let img = ImageRef::parse("localhost:5000/app").unwrap();
        assert_eq!(img.registry(), Some("localhost:5000"));
        assert_eq!(img.name(), "app");
        assert_eq!(img.tag(), Some("latest"));
    }
}
