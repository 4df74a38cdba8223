use crate::BoxError;
use crate::model::ModuleSyntax;
use std::path::Path;

pub trait ModuleSyntaxCap: Send + Sync {
    /// Import and export statements of one file, in source order.
    fn module_syntax(&self, path: &Path, content: &str) -> Result<ModuleSyntax, BoxError>;

    /// Extensions tried, in order, when a specifier omits one.
    fn resolution_extensions(&self) -> &[&str];

    /// Basenames tried inside a directory specifier.
    fn index_basenames(&self) -> &[&str] {
        &["index"]
    }
}
