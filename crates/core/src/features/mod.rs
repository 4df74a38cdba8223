use crate::config::EngineConfig;
use crate::dependency::Resolution;
use crate::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use wayfinder_api::{CodeSymbol, ScanScope};
use wayfinder_plugin::{ClassHeader, ModuleSyntax};

pub mod analytics;
pub mod context;
pub mod hints;
pub mod navigation;
pub mod references;
pub mod search;
pub mod unused;

/// What the query features need from the engine.
///
/// Features only see files through this view, so they can run against the
/// cached engine or a purpose-built index in tests.
pub trait WorkspaceIndex: Send + Sync {
    fn root(&self) -> &Path;

    fn config(&self) -> &EngineConfig;

    fn relative_path(&self, path: &Path) -> String;

    /// Absolute in-root form of a user-supplied path.
    fn resolve_path(&self, path: &Path) -> Result<PathBuf>;

    /// Supported files selected by `scope`, in traversal order.
    fn eligible_files(&self, scope: &ScanScope) -> Result<Vec<PathBuf>>;

    fn content(&self, path: &Path) -> Result<Arc<str>>;

    /// Flat, source-ordered symbols of one file.
    fn symbols(&self, path: &Path) -> Result<Arc<Vec<CodeSymbol>>>;

    fn module_syntax(&self, path: &Path) -> Result<Arc<ModuleSyntax>>;

    fn class_headers(&self, path: &Path) -> Result<Arc<Vec<ClassHeader>>>;

    fn resolve_import(&self, from: &Path, specifier: &str, include_external: bool) -> Resolution;

    /// Workspace files `path` imports directly, in first-import order.
    fn direct_dependencies(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let syntax = self.module_syntax(path)?;
        let mut out = Vec::new();
        for specifier in syntax.specifiers() {
            if let Resolution::Internal(target) = self.resolve_import(path, specifier, false)
                && !out.contains(&target)
            {
                out.push(target);
            }
        }
        Ok(out)
    }
}
