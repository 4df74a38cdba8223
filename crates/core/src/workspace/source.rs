use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Read access to workspace files.
///
/// The engine never touches the filesystem directly, which lets tests and
/// embedders serve content from elsewhere.
pub trait SourceProvider: Send + Sync {
    fn read(&self, path: &Path) -> std::io::Result<String>;

    fn is_file(&self, path: &Path) -> bool;

    /// Every regular file under `root`, depth-first in name order.
    fn list_files(&self, root: &Path) -> Vec<PathBuf>;
}

/// Local disk, honouring `.gitignore` and hidden-file rules like the `ignore` crate does.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSource;

impl SourceProvider for FsSource {
    fn read(&self, path: &Path) -> std::io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn list_files(&self, root: &Path) -> Vec<PathBuf> {
        WalkBuilder::new(root)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    None
                }
            })
            .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
            .map(|entry| entry.into_path())
            .collect()
    }
}
