use crate::workspace::{PathGuard, SourceProvider};
use std::path::{Path, PathBuf};

/// Outcome of resolving one import specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// An existing file inside the workspace root.
    Internal(PathBuf),
    /// Anything else, keyed by the specifier as written.
    External(String),
}

/// package.json fields consulted, in order, for a package's entry file.
const PACKAGE_ENTRY_FIELDS: [&str; 4] = ["types", "typings", "module", "main"];

/// Maps a specifier written in one file to the file it names.
pub struct ModuleResolver<'a> {
    pub source: &'a dyn SourceProvider,
    pub guard: &'a dyn PathGuard,
    pub extensions: &'a [&'a str],
    pub index_basenames: &'a [&'a str],
    pub resolve_roots: &'a [PathBuf],
}

fn is_relative(specifier: &str) -> bool {
    specifier == "."
        || specifier == ".."
        || specifier.starts_with("./")
        || specifier.starts_with("../")
}

/// Split `@scope/pkg/sub/path` into `@scope/pkg` and `sub/path`.
fn split_package(specifier: &str) -> (&str, &str) {
    let segments = if specifier.starts_with('@') { 2 } else { 1 };
    let mut cut = None;
    for (count, (at, _)) in specifier.match_indices('/').enumerate() {
        if count + 1 == segments {
            cut = Some(at);
            break;
        }
    }
    match cut {
        Some(at) => (&specifier[..at], &specifier[at + 1..]),
        None => (specifier, ""),
    }
}

impl<'a> ModuleResolver<'a> {
    pub fn resolve(&self, from: &Path, specifier: &str, include_external: bool) -> Resolution {
        let clean = specifier.split(['?', '#']).next().unwrap_or(specifier);
        let root = self.guard.root();

        let found = if is_relative(clean) {
            let base = from.parent().unwrap_or(root).join(clean);
            self.resolve_file(&base)
        } else if let Some(absolute) = clean.strip_prefix('/') {
            self.resolve_file(&root.join(absolute))
        } else {
            self.resolve_bare(clean, include_external)
        };

        let Some(candidate) = found else {
            return Resolution::External(specifier.to_string());
        };
        match self.guard.resolve(&candidate) {
            Ok(path) => Resolution::Internal(path),
            Err(_) => {
                tracing::debug!("Import '{}' leaves the workspace", specifier);
                Resolution::External(specifier.to_string())
            }
        }
    }

    fn resolve_bare(&self, specifier: &str, include_external: bool) -> Option<PathBuf> {
        let root = self.guard.root();
        for extra in self.resolve_roots {
            if let Some(found) = self.resolve_file(&root.join(extra).join(specifier)) {
                return Some(found);
            }
        }
        if include_external {
            return self.resolve_package(specifier);
        }
        None
    }

    fn resolve_package(&self, specifier: &str) -> Option<PathBuf> {
        let (package, subpath) = split_package(specifier);
        let dir = self.guard.root().join("node_modules").join(package);
        if !subpath.is_empty() {
            return self.resolve_file(&dir.join(subpath));
        }
        if let Ok(raw) = self.source.read(&dir.join("package.json")) {
            match serde_json::from_str::<serde_json::Value>(&raw) {
                Ok(manifest) => {
                    for field in PACKAGE_ENTRY_FIELDS {
                        let Some(entry) = manifest.get(field).and_then(|v| v.as_str()) else {
                            continue;
                        };
                        if let Some(found) = self.resolve_file(&dir.join(entry)) {
                            return Some(found);
                        }
                    }
                }
                Err(e) => tracing::debug!("Unreadable package.json for {}: {}", package, e),
            }
        }
        self.resolve_index(&dir)
    }

    /// Exact file, then appended extensions, then `.js`-style source swaps, then index files.
    fn resolve_file(&self, base: &Path) -> Option<PathBuf> {
        if self.source.is_file(base) {
            return Some(base.to_path_buf());
        }
        if let Some(name) = base.file_name().map(|n| n.to_string_lossy().into_owned()) {
            if let Some(found) = self.with_extension_variants(base, &name) {
                return Some(found);
            }
        }
        self.resolve_index(base)
    }

    fn with_extension_variants(&self, base: &Path, name: &str) -> Option<PathBuf> {
        for ext in self.extensions {
            let candidate = base.with_file_name(format!("{}.{}", name, ext));
            if self.source.is_file(&candidate) {
                return Some(candidate);
            }
        }
        let (stem, ext) = name.rsplit_once('.')?;
        let swaps: &[&str] = match ext {
            "js" | "jsx" => &["ts", "tsx"],
            "mjs" => &["mts"],
            "cjs" => &["cts"],
            _ => &[],
        };
        swaps
            .iter()
            .map(|swap| base.with_file_name(format!("{}.{}", stem, swap)))
            .find(|candidate| self.source.is_file(candidate))
    }

    fn resolve_index(&self, dir: &Path) -> Option<PathBuf> {
        for basename in self.index_basenames {
            for ext in self.extensions {
                let candidate = dir.join(format!("{}.{}", basename, ext));
                if self.source.is_file(&candidate) {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workspace::{FsSource, RootGuard};
    use std::fs;

    const EXTENSIONS: &[&str] = &["ts", "tsx", "d.ts", "js"];

    fn resolver<'a>(guard: &'a RootGuard, roots: &'a [PathBuf]) -> ModuleResolver<'a> {
        ModuleResolver {
            source: &FsSource,
            guard,
            extensions: EXTENSIONS,
            index_basenames: &["index"],
            resolve_roots: roots,
        }
    }

    #[test]
    fn test_split_package() {
        assert_eq!(split_package("react"), ("react", ""));
        assert_eq!(split_package("lodash/fp/map"), ("lodash", "fp/map"));
        assert_eq!(split_package("@types/node"), ("@types/node", ""));
        assert_eq!(split_package("@scope/pkg/sub"), ("@scope/pkg", "sub"));
    }

    #[test]
    fn test_relative_extension_and_index() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("lib/util")).unwrap();
        fs::write(dir.path().join("lib/a.ts"), "").unwrap();
        fs::write(dir.path().join("lib/util/index.tsx"), "").unwrap();
        fs::write(dir.path().join("main.ts"), "").unwrap();
        let guard = RootGuard::new(dir.path()).unwrap();
        let r = resolver(&guard, &[]);
        let from = guard.root().join("main.ts");

        assert_eq!(
            r.resolve(&from, "./lib/a", false),
            Resolution::Internal(guard.root().join("lib/a.ts"))
        );
        assert_eq!(
            r.resolve(&from, "./lib/a.js", false),
            Resolution::Internal(guard.root().join("lib/a.ts"))
        );
        assert_eq!(
            r.resolve(&from, "./lib/util", false),
            Resolution::Internal(guard.root().join("lib/util/index.tsx"))
        );
        assert_eq!(
            r.resolve(&from, "./missing", false),
            Resolution::External("./missing".into())
        );
    }

    #[test]
    fn test_bare_specifiers() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/shared")).unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg/dist")).unwrap();
        fs::write(dir.path().join("src/shared/log.ts"), "").unwrap();
        fs::write(dir.path().join("node_modules/pkg/dist/main.js"), "").unwrap();
        fs::write(
            dir.path().join("node_modules/pkg/package.json"),
            r#"{"main": "dist/main.js"}"#,
        )
        .unwrap();
        fs::write(dir.path().join("app.ts"), "").unwrap();
        let guard = RootGuard::new(dir.path()).unwrap();
        let roots = [PathBuf::from("src")];
        let r = resolver(&guard, &roots);
        let from = guard.root().join("app.ts");

        assert_eq!(
            r.resolve(&from, "shared/log", false),
            Resolution::Internal(guard.root().join("src/shared/log.ts"))
        );
        assert_eq!(r.resolve(&from, "pkg", false), Resolution::External("pkg".into()));
        assert_eq!(
            r.resolve(&from, "pkg", true),
            Resolution::Internal(guard.root().join("node_modules/pkg/dist/main.js"))
        );
    }

    #[test]
    fn test_escaping_import_is_external() {
        let outer = tempfile::tempdir().unwrap();
        let inner = outer.path().join("ws");
        fs::create_dir_all(&inner).unwrap();
        fs::write(outer.path().join("shared.ts"), "").unwrap();
        fs::write(inner.join("a.ts"), "").unwrap();
        let guard = RootGuard::new(&inner).unwrap();
        let r = resolver(&guard, &[]);

        assert_eq!(
            r.resolve(&guard.root().join("a.ts"), "../shared", false),
            Resolution::External("../shared".into())
        );
    }
}
