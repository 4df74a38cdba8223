use crate::error::{Result, WayfinderError};
use std::path::{Component, Path, PathBuf};

/// Confines every path the engine touches to one workspace root.
pub trait PathGuard: Send + Sync {
    fn root(&self) -> &Path;

    /// Absolute, normalized form of `path`, or a violation when it escapes the root.
    ///
    /// Relative inputs are taken relative to the root. Existing paths are
    /// canonicalized, so symlinks pointing outside the root are rejected too.
    fn resolve(&self, path: &Path) -> Result<PathBuf>;

    /// Workspace-relative display form with `/` separators.
    fn relative(&self, path: &Path) -> String {
        let rel = path.strip_prefix(self.root()).unwrap_or(path);
        rel.to_string_lossy().replace('\\', "/")
    }
}

#[derive(Debug, Clone)]
pub struct RootGuard {
    root: PathBuf,
}

impl RootGuard {
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        let root = root.canonicalize().map_err(|source| WayfinderError::Read {
            path: root.display().to_string(),
            source,
        })?;
        Ok(Self { root })
    }
}

/// Resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

impl PathGuard for RootGuard {
    fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        let resolved = match joined.canonicalize() {
            Ok(real) => real,
            Err(_) => normalize(&joined),
        };
        if resolved.starts_with(&self.root) {
            Ok(resolved)
        } else {
            let shown = if path.is_absolute() {
                "path outside workspace".to_string()
            } else {
                path.display().to_string()
            };
            Err(WayfinderError::WorkspaceViolation(shown))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_relative_inputs_resolve_under_root() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.ts"), "").unwrap();
        let guard = RootGuard::new(dir.path()).unwrap();

        let resolved = guard.resolve(Path::new("./a.ts")).unwrap();
        assert_eq!(resolved, guard.root().join("a.ts"));
        assert_eq!(guard.relative(&resolved), "a.ts");
    }

    #[test]
    fn test_parent_escape_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let guard = RootGuard::new(dir.path()).unwrap();
        assert!(matches!(
            guard.resolve(Path::new("../../etc/passwd")),
            Err(WayfinderError::WorkspaceViolation(_))
        ));
    }

    #[test]
    fn test_violation_message_hides_absolute_input() {
        let dir = tempfile::tempdir().unwrap();
        let guard = RootGuard::new(dir.path()).unwrap();
        let outside = std::env::temp_dir().join("elsewhere").join("x.ts");
        match guard.resolve(&outside) {
            Err(WayfinderError::WorkspaceViolation(shown)) => {
                assert_eq!(shown, "path outside workspace")
            }
            other => panic!("expected a violation, got {:?}", other),
        }
        match guard.resolve(Path::new("../x.ts")) {
            Err(WayfinderError::WorkspaceViolation(shown)) => assert_eq!(shown, "../x.ts"),
            other => panic!("expected a violation, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_is_rejected() {
        let outside = tempfile::tempdir().unwrap();
        fs::write(outside.path().join("secret.ts"), "").unwrap();
        let dir = tempfile::tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret.ts"), dir.path().join("link.ts"))
            .unwrap();

        let guard = RootGuard::new(dir.path()).unwrap();
        assert!(guard.resolve(Path::new("link.ts")).is_err());
    }

    #[test]
    fn test_missing_file_inside_root_is_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let guard = RootGuard::new(dir.path()).unwrap();
        let resolved = guard.resolve(Path::new("src/../missing.ts")).unwrap();
        assert_eq!(resolved, guard.root().join("missing.ts"));
    }
}
