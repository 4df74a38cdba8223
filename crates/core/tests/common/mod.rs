#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use wayfinder_core::workspace::SourceProvider;
use wayfinder_core::{CodeEngine, EngineConfig, EngineHandle};
use wayfinder_typescript::TypeScriptPlugin;

/// A temporary workspace holding `files` and an engine rooted at it.
pub fn workspace(files: &[(&str, &str)]) -> (TempDir, EngineHandle) {
    workspace_with(files, EngineConfig::default())
}

pub fn workspace_with(files: &[(&str, &str)], config: EngineConfig) -> (TempDir, EngineHandle) {
    let dir = tempfile::tempdir().expect("tempdir");
    for (path, content) in files {
        write(dir.path(), path, content);
    }
    let engine = CodeEngine::builder(dir.path())
        .with_config(config)
        .with_plugin(Arc::new(TypeScriptPlugin::new()))
        .build()
        .expect("engine");
    (dir, EngineHandle::from_engine(Arc::new(engine)))
}

pub fn write(root: &Path, path: &str, content: &str) {
    let full = root.join(path);
    if let Some(parent) = full.parent() {
        fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(full, content).expect("write");
}

/// Workspace-relative display of a symbol's file.
pub fn rel(handle: &EngineHandle, path: &Path) -> String {
    use wayfinder_core::WorkspaceIndex;
    handle.engine().relative_path(path)
}

/// Files served from memory under a real root.
pub struct MemorySource {
    files: BTreeMap<PathBuf, String>,
    reversed: bool,
}

impl SourceProvider for MemorySource {
    fn read(&self, path: &Path) -> std::io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "not in memory"))
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn list_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = self
            .files
            .keys()
            .filter(|p| p.starts_with(root))
            .cloned()
            .collect();
        if self.reversed {
            files.reverse();
        }
        files
    }
}

/// An engine over in-memory `files` under `root`, listed in reverse name order
/// when `reversed` is set.
pub fn memory_workspace(root: &Path, files: &[(&str, &str)], reversed: bool) -> EngineHandle {
    let files = files
        .iter()
        .map(|(path, content)| (root.join(path), content.to_string()))
        .collect();
    let engine = CodeEngine::builder(root)
        .with_config(EngineConfig::default())
        .with_source(Arc::new(MemorySource { files, reversed }))
        .with_plugin(Arc::new(TypeScriptPlugin::new()))
        .build()
        .expect("engine");
    EngineHandle::from_engine(Arc::new(engine))
}
