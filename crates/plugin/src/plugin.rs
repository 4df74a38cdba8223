use crate::cap::{FileMatcherCap, HeritageCap, ModuleSyntaxCap, SymbolParseCap};
use wayfinder_api::models::Language;

/// Metadata for a plugin (plugin's own information).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PluginInfo {
    pub id: String,
    pub name: String,
    pub version: String,
    pub description: Option<String>,
}

/// Unified interface for language-specific support.
pub trait LanguagePlugin: FileMatcherCap + SymbolParseCap + ModuleSyntaxCap + HeritageCap {
    fn info(&self) -> PluginInfo;

    /// Language of a supported path.
    fn language_for(&self, path: &std::path::Path) -> Language;

    /// Supported file extensions
    fn supported_extensions(&self) -> &[&str];
}
