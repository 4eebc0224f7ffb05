// ABOUTME: Tar archive of a build context directory.
// ABOUTME: Honors .dockerignore and injects a Dockerfile that lives outside the context.

use super::ignore::IgnoreRules;
use bytes::Bytes;
use std::path::{Path, PathBuf};

/// Archive name used when the Dockerfile lives outside the context directory.
const INJECTED_DOCKERFILE: &str = ".smoke-runner.Dockerfile";

#[derive(Debug, thiserror::Error)]
pub enum BuildContextError {
    #[error("build context is not a directory: {0}")]
    ContextNotFound(PathBuf),

    #[error("build descriptor not found: {0}")]
    DockerfileNotFound(PathBuf),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to archive build context: {0}")]
    Archive(#[source] std::io::Error),
}

/// A packed build context ready to send to the build endpoint.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Tar archive bytes.
    pub archive: Bytes,
    /// Dockerfile path inside the archive.
    pub dockerfile: String,
    /// Number of regular files packed.
    pub file_count: usize,
}

/// Pack `context_dir` into a tar archive and locate `dockerfile` inside it.
pub fn archive_context(
    context_dir: &Path,
    dockerfile: &Path,
) -> Result<BuildContext, BuildContextError> {
    if !context_dir.is_dir() {
        return Err(BuildContextError::ContextNotFound(context_dir.to_path_buf()));
    }
    if !dockerfile.is_file() {
        return Err(BuildContextError::DockerfileNotFound(dockerfile.to_path_buf()));
    }

    let context_dir = canonical(context_dir)?;
    let dockerfile = canonical(dockerfile)?;
    let rules = IgnoreRules::load(&context_dir).map_err(|source| BuildContextError::Read {
        path: context_dir.join(".dockerignore"),
        source,
    })?;

    let inside = dockerfile
        .strip_prefix(&context_dir)
        .ok()
        .map(slash_path);

    let mut builder = tar::Builder::new(Vec::new());
    builder.follow_symlinks(false);

    let mut packer = Packer {
        builder: &mut builder,
        root: &context_dir,
        rules: &rules,
        keep: inside.as_deref(),
        file_count: 0,
    };
    packer.walk(&context_dir)?;
    let mut file_count = packer.file_count;

    let dockerfile_name = match inside {
        Some(name) => name,
        None => {
            let content = std::fs::read(&dockerfile).map_err(|source| BuildContextError::Read {
                path: dockerfile.clone(),
                source,
            })?;
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, INJECTED_DOCKERFILE, content.as_slice())
                .map_err(BuildContextError::Archive)?;
            file_count += 1;
            INJECTED_DOCKERFILE.to_string()
        }
    };

    let archive = builder.into_inner().map_err(BuildContextError::Archive)?;

    tracing::debug!(
        files = file_count,
        bytes = archive.len(),
        dockerfile = %dockerfile_name,
        "packed build context"
    );

    Ok(BuildContext {
        archive: Bytes::from(archive),
        dockerfile: dockerfile_name,
        file_count,
    })
}

struct Packer<'a> {
    builder: &'a mut tar::Builder<Vec<u8>>,
    root: &'a Path,
    rules: &'a IgnoreRules,
    /// Always packed, even when ignored (the Dockerfile itself).
    keep: Option<&'a str>,
    file_count: usize,
}

impl Packer<'_> {
    fn walk(&mut self, dir: &Path) -> Result<(), BuildContextError> {
        let read = |source: std::io::Error| BuildContextError::Read {
            path: dir.to_path_buf(),
            source,
        };
        let mut entries = std::fs::read_dir(dir)
            .map_err(read)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(read)?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let path = entry.path();
            let Ok(relative) = path.strip_prefix(self.root) else {
                continue;
            };
            let relative = slash_path(relative);
            let file_type = entry.file_type().map_err(read)?;
            let excluded =
                self.rules.is_excluded(&relative) && self.keep != Some(relative.as_str());

            if file_type.is_dir() {
                if !excluded {
                    self.append(&path, &relative)?;
                }
                // A later `!` rule may re-include something below an excluded
                // directory, and the Dockerfile is packed wherever it lives.
                if !excluded || self.rules.has_negations() || self.holds_keep(&relative) {
                    self.walk(&path)?;
                }
            } else if !excluded {
                self.append(&path, &relative)?;
                if file_type.is_file() {
                    self.file_count += 1;
                }
            }
        }
        Ok(())
    }

    fn holds_keep(&self, dir: &str) -> bool {
        self.keep
            .and_then(|keep| keep.strip_prefix(dir))
            .is_some_and(|rest| rest.starts_with('/'))
    }

    fn append(&mut self, path: &Path, relative: &str) -> Result<(), BuildContextError> {
        self.builder
            .append_path_with_name(path, relative)
            .map_err(BuildContextError::Archive)
    }
}

fn canonical(path: &Path) -> Result<PathBuf, BuildContextError> {
    path.canonicalize().map_err(|source| BuildContextError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn slash_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn entry_names(context: &BuildContext) -> Vec<String> {
        let mut archive = tar::Archive::new(context.archive.as_ref());
        archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn packs_context_with_dockerfile_inside() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Dockerfile.ipex"), "FROM alpine\n").unwrap();
        std::fs::create_dir(dir.path().join("src")).unwrap();
        std::fs::write(dir.path().join("src/app.py"), "print('hi')\n").unwrap();

        let ctx = archive_context(dir.path(), &dir.path().join("Dockerfile.ipex")).unwrap();

        assert_eq!(ctx.dockerfile, "Dockerfile.ipex");
        assert_eq!(ctx.file_count, 2);
        let names = entry_names(&ctx);
        assert!(names.contains(&"Dockerfile.ipex".to_string()));
        assert!(names.contains(&"src/app.py".to_string()));
    }

    #[test]
    fn injects_dockerfile_from_outside_context() {
        let outer = tempfile::tempdir().unwrap();
        let context = outer.path().join("ctx");
        std::fs::create_dir(&context).unwrap();
        std::fs::write(context.join("data.txt"), "x").unwrap();
        std::fs::write(outer.path().join("Dockerfile"), "FROM busybox\n").unwrap();

        let ctx = archive_context(&context, &outer.path().join("Dockerfile")).unwrap();

        assert_eq!(ctx.dockerfile, INJECTED_DOCKERFILE);
        let mut archive = tar::Archive::new(ctx.archive.as_ref());
        let mut found = false;
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            if entry.path().unwrap().to_string_lossy() == INJECTED_DOCKERFILE {
                let mut content = String::new();
                entry.read_to_string(&mut content).unwrap();
                assert_eq!(content, "FROM busybox\n");
                found = true;
            }
        }
        assert!(found, "injected Dockerfile should be in the archive");
    }

    #[test]
    fn dockerignore_excludes_but_keeps_dockerfile() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Dockerfile"), "FROM alpine\n").unwrap();
        std::fs::write(dir.path().join(".dockerignore"), "Dockerfile\ntarget\n").unwrap();
        std::fs::create_dir(dir.path().join("target")).unwrap();
        std::fs::write(dir.path().join("target/big.bin"), "0000").unwrap();

        let ctx = archive_context(dir.path(), &dir.path().join("Dockerfile")).unwrap();

        let names = entry_names(&ctx);
        assert!(names.contains(&"Dockerfile".to_string()));
        assert!(!names.iter().any(|n| n.starts_with("target")));
    }

    #[test]
    fn dockerfile_inside_ignored_directory_is_still_packed() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("docker")).unwrap();
        std::fs::write(dir.path().join("docker/Dockerfile.ipex"), "FROM alpine\n").unwrap();
        std::fs::write(dir.path().join("docker/notes.md"), "ignored").unwrap();
        std::fs::write(dir.path().join(".dockerignore"), "docker\n").unwrap();

        let ctx =
            archive_context(dir.path(), &dir.path().join("docker/Dockerfile.ipex")).unwrap();

        assert_eq!(ctx.dockerfile, "docker/Dockerfile.ipex");
        let names = entry_names(&ctx);
        assert!(names.contains(&"docker/Dockerfile.ipex".to_string()));
        assert!(!names.contains(&"docker/notes.md".to_string()));
    }

    #[test]
    fn missing_dockerfile_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = archive_context(dir.path(), &dir.path().join("Dockerfile.nope")).unwrap_err();
        assert!(matches!(err, BuildContextError::DockerfileNotFound(_)));
    }

    #[test]
    fn missing_context_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let err = archive_context(&dir.path().join("nope"), &dir.path().join("Dockerfile"))
            .unwrap_err();
        assert!(matches!(err, BuildContextError::ContextNotFound(_)));
    }
}
